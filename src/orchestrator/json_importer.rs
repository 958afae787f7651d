//! JSON 课程导入 - 编排层
//!
//! 加载 JSON 数组，逐条转换并写入存储

use anyhow::Result;
use std::path::Path;
use tracing::{error, info};

use crate::clients::CourseStore;
use crate::models::{load_course_drafts, Instructor};
use crate::orchestrator::bulk_importer::BulkImportOutcome;
use crate::services::playlist_converter::convert_draft_to_course;

/// 从 JSON 文件导入课程
///
/// 只有文件本身无法读取或不是数组时返回 `Err`；
/// 格式错误的条目计入 `skipped`，写入失败的条目计入 `failed`
pub async fn import_courses_from_json(
    path: &Path,
    store: &dyn CourseStore,
    instructor: &Instructor,
) -> Result<BulkImportOutcome> {
    let batch = load_course_drafts(path).await?;
    let total = batch.drafts.len();

    let mut outcome = BulkImportOutcome {
        skipped: batch.skipped.len(),
        ..Default::default()
    };

    for (position, (entry_index, draft)) in batch.drafts.into_iter().enumerate() {
        let label = format!("#{} {}", entry_index, draft.title);
        let prefix = format!("[课程 {}/{}]", position + 1, total);

        let course = match convert_draft_to_course(draft, instructor) {
            Ok(course) => course,
            Err(e) => {
                error!("{} ❌ 转换失败 {}: {}", prefix, label, e);
                outcome.failed.push(label);
                continue;
            }
        };

        match store.create(&course).await {
            Ok(course_id) => {
                info!("{} ✅ 已创建 {} (ID: {})", prefix, course.title, course_id);
                outcome.imported.push(course_id);
            }
            Err(e) => {
                error!("{} ❌ 创建失败 {}: {}", prefix, label, e);
                outcome.failed.push(label);
            }
        }
    }

    Ok(outcome.finish())
}
