use crate::models::course::Module;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tokio::fs;

/// JSON 文件中的一条课程（字段都可缺省，由导入时补全）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub published: Option<bool>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub instructor_id: Option<String>,
    #[serde(default)]
    pub instructor_name: Option<String>,
    #[serde(default)]
    pub modules: Vec<Module>,
}

/// 一次加载的结果
#[derive(Debug, Default)]
pub struct DraftBatch {
    /// (条目序号, 课程)，序号从 1 开始
    pub drafts: Vec<(usize, CourseDraft)>,
    /// 被跳过的条目说明
    pub skipped: Vec<String>,
}

/// 从 JSON 文件加载课程列表
///
/// 文件顶层必须是数组；单个条目解析失败只记录警告并跳过
pub async fn load_course_drafts(json_file_path: &Path) -> Result<DraftBatch> {
    let content = fs::read_to_string(json_file_path)
        .await
        .with_context(|| format!("无法读取JSON文件: {}", json_file_path.display()))?;

    let root: Value = serde_json::from_str(&content)
        .with_context(|| format!("无法解析JSON文件: {}", json_file_path.display()))?;

    let entries = match root {
        Value::Array(entries) => entries,
        _ => anyhow::bail!("JSON文件顶层必须是数组: {}", json_file_path.display()),
    };

    let mut batch = DraftBatch::default();

    for (idx, entry) in entries.into_iter().enumerate() {
        let entry_index = idx + 1;
        match serde_json::from_value::<CourseDraft>(entry) {
            Ok(draft) if draft.title.trim().is_empty() => {
                tracing::warn!("第 {} 条课程缺少标题，已跳过", entry_index);
                batch.skipped.push(format!("#{} (缺少标题)", entry_index));
            }
            Ok(draft) => {
                tracing::debug!("成功解析第 {} 条课程: {}", entry_index, draft.title);
                batch.drafts.push((entry_index, draft));
            }
            Err(e) => {
                tracing::warn!("第 {} 条课程格式错误，已跳过: {}", entry_index, e);
                batch.skipped.push(format!("#{} ({})", entry_index, e));
            }
        }
    }

    tracing::info!(
        "从 {} 加载 {} 条课程，跳过 {} 条",
        json_file_path.display(),
        batch.drafts.len(),
        batch.skipped.len()
    );

    Ok(batch)
}

/// 读取 URL 列表文件：每行一个，忽略空行和 `#` 注释
pub async fn load_url_list(list_file_path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(list_file_path)
        .await
        .with_context(|| format!("无法读取URL列表: {}", list_file_path.display()))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
