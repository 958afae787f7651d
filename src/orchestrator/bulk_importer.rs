//! 批量 URL 导入 - 编排层
//!
//! 逐个调用 `ImportFlow`，单个 URL 失败不影响后续；
//! 结果列表与输入顺序一致

use tracing::info;

use crate::models::{CourseOverrides, Instructor};
use crate::workflow::{ImportCtx, ImportFlow};

/// 批量导入结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkImportOutcome {
    /// 至少导入成功一个
    pub success: bool,
    /// 成功导入的课程ID（按输入顺序）
    pub imported: Vec<String>,
    /// 失败的条目（URL 或条目说明，按输入顺序）
    pub failed: Vec<String>,
    /// 加载阶段被跳过的条目数
    pub skipped: usize,
}

impl BulkImportOutcome {
    pub fn total(&self) -> usize {
        self.imported.len() + self.failed.len()
    }

    pub(crate) fn finish(mut self) -> Self {
        self.success = !self.imported.is_empty();
        self
    }
}

/// 依次导入所有 URL
///
/// # 参数
/// - `flow`: 单个 URL 的导入流程
/// - `urls`: 待导入的 URL 列表
/// - `instructor`: 课程讲师
pub async fn bulk_import_from_youtube(
    flow: &ImportFlow<'_>,
    urls: &[String],
    instructor: &Instructor,
) -> BulkImportOutcome {
    let total = urls.len();
    let overrides = CourseOverrides::default();
    let mut outcome = BulkImportOutcome::default();

    log_bulk_start(total);

    for (idx, url) in urls.iter().enumerate() {
        let ctx = ImportCtx::new(idx + 1, total, url.as_str());
        let result = flow.run(url, instructor, &overrides, &ctx).await;

        match result.course_id {
            Some(course_id) if result.success => outcome.imported.push(course_id),
            _ => outcome.failed.push(url.clone()),
        }
    }

    let outcome = outcome.finish();
    log_bulk_complete(&outcome);
    outcome
}

// ========== 日志辅助函数 ==========

fn log_bulk_start(total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始批量导入: 共 {} 个 URL", total);
    info!("💡 逐个导入，单个失败不影响后续");
    info!("{}", "=".repeat(60));
}

fn log_bulk_complete(outcome: &BulkImportOutcome) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ 批量导入完成: 成功 {}/{}",
        outcome.imported.len(),
        outcome.total()
    );
    for url in &outcome.failed {
        info!("  ✗ {}", url);
    }
    info!("{}", "─".repeat(60));
}
