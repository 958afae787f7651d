//! 重复课程清理 - 编排层
//!
//! 读取快照 → 扫描 → 逐个删除 → 重新扫描
//!
//! 每个删除相互独立，一个失败不影响同组其他记录

use tracing::{error, info, warn};

use crate::clients::CourseStore;
use crate::error::AppResult;
use crate::services::duplicate_resolver::{resolve_group, scan_for_duplicates, DuplicateGroup};

/// 清理结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemovalReport {
    /// 本次处理的重复组数
    pub groups: usize,
    /// 计划删除的记录数
    pub requested: usize,
    /// 实际删除成功的记录数
    pub removed: usize,
    /// 删除失败的记录 (ID, 原因)
    pub failed: Vec<(String, String)>,
    /// 清理后重新扫描仍存在的重复组数；重新扫描失败时为 `None`
    pub remaining_groups: Option<usize>,
}

/// 只扫描不删除
pub async fn scan_duplicates(store: &dyn CourseStore) -> AppResult<Vec<DuplicateGroup>> {
    info!("📁 正在读取课程列表...");
    let records = store.list().await?;
    let groups = scan_for_duplicates(&records);

    info!(
        "✓ 共 {} 门课程，发现 {} 组重复",
        records.len(),
        groups.len()
    );
    for group in &groups {
        log_group(group);
    }

    Ok(groups)
}

/// 删除所有重复课程，每组保留最早创建的一条
///
/// 只有读取快照失败时返回 `Err`；删除失败记录在报告中
pub async fn remove_duplicates(store: &dyn CourseStore) -> AppResult<RemovalReport> {
    let groups = scan_duplicates(store).await?;

    let mut report = RemovalReport {
        groups: groups.len(),
        ..Default::default()
    };

    for (group_idx, group) in groups.iter().enumerate() {
        let ids = resolve_group(group);
        report.requested += ids.len();

        info!(
            "[重复组 {}/{}] 🧹 保留 {}，删除 {} 条",
            group_idx + 1,
            groups.len(),
            group.keeper().map(|r| r.id.as_str()).unwrap_or("-"),
            ids.len()
        );

        for id in ids {
            match store.delete(&id).await {
                Ok(()) => {
                    report.removed += 1;
                    info!("[重复组 {}/{}] ✓ 已删除 {}", group_idx + 1, groups.len(), id);
                }
                Err(e) => {
                    error!(
                        "[重复组 {}/{}] ❌ 删除 {} 失败: {}",
                        group_idx + 1,
                        groups.len(),
                        id,
                        e
                    );
                    report.failed.push((id, e.to_string()));
                }
            }
        }
    }

    // 删除后快照已失效，重新扫描
    report.remaining_groups = match store.list().await {
        Ok(records) => Some(scan_for_duplicates(&records).len()),
        Err(e) => {
            warn!("⚠️ 清理后重新扫描失败: {}", e);
            None
        }
    };

    log_report(&report);
    Ok(report)
}

// ========== 日志辅助函数 ==========

fn log_group(group: &DuplicateGroup) {
    let title = group.keeper().map(|r| r.display_title()).unwrap_or_default();
    info!("\n📚 \"{}\" ({} 条)", title, group.len());
    for (idx, record) in group.records.iter().enumerate() {
        let created = record
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "未知".to_string());
        let marker = if idx == 0 { "保留" } else { "删除" };
        info!(
            "  [{}] {} | 讲师: {} | 创建: {}",
            marker,
            record.id,
            record.instructor.as_deref().unwrap_or("-"),
            created
        );
    }
}

fn log_report(report: &RemovalReport) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ 清理完成: 删除 {}/{}，失败 {}",
        report.removed,
        report.requested,
        report.failed.len()
    );
    if let Some(remaining) = report.remaining_groups {
        info!("🔁 重新扫描后剩余 {} 组重复", remaining);
    }
    info!("{}", "─".repeat(60));
}
