//! 导入上下文
//!
//! 封装"我正在导入第几个 URL"这一信息

use std::fmt::Display;

/// 导入上下文
#[derive(Debug, Clone)]
pub struct ImportCtx {
    /// 当前序号（从1开始）
    pub index: usize,

    /// 本批总数
    pub total: usize,

    /// 原始 URL
    pub url: String,
}

impl ImportCtx {
    pub fn new(index: usize, total: usize, url: impl Into<String>) -> Self {
        Self {
            index,
            total,
            url: url.into(),
        }
    }

    /// 单个导入
    pub fn single(url: impl Into<String>) -> Self {
        Self::new(1, 1, url)
    }
}

impl Display for ImportCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[导入 {}/{}]", self.index, self.total)
    }
}
