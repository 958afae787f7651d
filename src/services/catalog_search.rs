//! 课程目录检索
//!
//! 在已读取的课程快照上做过滤和排序，不访问存储

use std::cmp::Ordering;
use std::str::FromStr;

use crate::models::{Category, CourseRecord, Level};

/// 过滤条件；`None` / `false` 表示不限制
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    pub query: Option<String>,
    pub category: Option<Category>,
    pub level: Option<Level>,
    pub max_price: Option<f64>,
    pub free_only: bool,
    pub published_only: bool,
}

/// 排序方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    Title,
    PriceLow,
    PriceHigh,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            "title" => Ok(SortOrder::Title),
            "price-low" | "price_low" => Ok(SortOrder::PriceLow),
            "price-high" | "price_high" => Ok(SortOrder::PriceHigh),
            other => Err(format!("未知的排序方式: {}", other)),
        }
    }
}

impl CatalogFilter {
    /// 判断单个课程是否满足全部条件
    pub fn matches(&self, record: &CourseRecord) -> bool {
        let price = record.price.unwrap_or(0.0);

        if let Some(query) = self.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let query = query.to_lowercase();
            let hit = [&record.title, &record.description, &record.instructor]
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&query));
            if !hit {
                return false;
            }
        }

        if let Some(category) = self.category {
            if !same_name(record.category.as_deref(), category.name()) {
                return false;
            }
        }

        if let Some(level) = self.level {
            if !same_name(record.level.as_deref(), level.name()) {
                return false;
            }
        }

        if self.max_price.is_some_and(|max| price > max) {
            return false;
        }

        if self.free_only && price > 0.0 {
            return false;
        }

        !(self.published_only && record.published != Some(true))
    }
}

fn same_name(value: Option<&str>, name: &str) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case(name))
}

/// 过滤课程，保持原有顺序
pub fn filter_courses<'a>(records: &'a [CourseRecord], filter: &CatalogFilter) -> Vec<&'a CourseRecord> {
    records.iter().filter(|r| filter.matches(r)).collect()
}

/// 稳定排序；缺失的创建时间视为最早，缺失的价格视为免费
pub fn sort_courses(records: &mut [&CourseRecord], order: SortOrder) {
    match order {
        SortOrder::Newest => records.sort_by(|a, b| b.created_at_or_epoch().cmp(&a.created_at_or_epoch())),
        SortOrder::Oldest => records.sort_by_key(|r| r.created_at_or_epoch()),
        SortOrder::Title => records.sort_by_key(|r| r.display_title().to_lowercase()),
        SortOrder::PriceLow => records.sort_by(|a, b| compare_price(a, b)),
        SortOrder::PriceHigh => records.sort_by(|a, b| compare_price(b, a)),
    }
}

fn compare_price(a: &CourseRecord, b: &CourseRecord) -> Ordering {
    a.price
        .unwrap_or(0.0)
        .partial_cmp(&b.price.unwrap_or(0.0))
        .unwrap_or(Ordering::Equal)
}
