//! 重复课程识别 - 业务能力层
//!
//! 只负责"找出重复、决定删谁"，不做任何 I/O
//!
//! 重复的判定只看规范化后的标题，不区分讲师

use std::collections::HashMap;

use crate::models::CourseRecord;

/// 一组标题相同的课程
///
/// `records` 按创建时间升序排列，第一条是保留项
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateGroup {
    pub normalized_title: String,
    pub records: Vec<CourseRecord>,
}

impl DuplicateGroup {
    /// 最早创建的一条（保留），空组为 `None`
    pub fn keeper(&self) -> Option<&CourseRecord> {
        self.records.first()
    }

    /// 除保留项以外的所有记录
    pub fn removable(&self) -> &[CourseRecord] {
        self.records.get(1..).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// 规范化标题：去掉首尾空白并转小写
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// 扫描重复课程
///
/// # 参数
/// - `records`: 课程快照
///
/// # 返回
/// 按"首次出现"顺序排列的重复组，每组至少 2 条
pub fn scan_for_duplicates(records: &[CourseRecord]) -> Vec<DuplicateGroup> {
    let mut index_by_title: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<(String, Vec<CourseRecord>)> = Vec::new();

    for record in records {
        let Some(title) = record.title.as_deref() else {
            continue;
        };
        let normalized = normalize_title(title);
        if normalized.is_empty() {
            continue;
        }

        match index_by_title.get(&normalized) {
            Some(&idx) => buckets[idx].1.push(record.clone()),
            None => {
                index_by_title.insert(normalized.clone(), buckets.len());
                buckets.push((normalized, vec![record.clone()]));
            }
        }
    }

    buckets
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|(normalized_title, mut members)| {
            // sort_by_key 是稳定排序，时间相同时保持原有顺序
            members.sort_by_key(|r| r.created_at_or_epoch());
            DuplicateGroup {
                normalized_title,
                records: members,
            }
        })
        .collect()
}

/// 计算一组重复课程中需要删除的ID
///
/// 只剩保留项时返回空列表
pub fn resolve_group(group: &DuplicateGroup) -> Vec<String> {
    group
        .records
        .iter()
        .skip(1)
        .map(|r| r.id.clone())
        .collect()
}
