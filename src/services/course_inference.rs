//! 课程分类 / 难度推断
//!
//! 基于标题和简介的关键词匹配，匹配不到时回落到默认值

use crate::models::{Category, Level};

/// 分类关键词表，按优先级排列
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Programming,
        &["programming", "coding", "javascript", "python", "react", "web development"],
    ),
    (Category::Mathematics, &["math", "calculus", "algebra", "geometry"]),
    (Category::Science, &["science", "physics", "chemistry", "biology"]),
    (Category::Business, &["business", "marketing", "entrepreneur", "finance"]),
    (Category::Design, &["design", "photoshop", "illustrator", "ui/ux"]),
    (Category::Language, &["language", "english", "spanish", "french"]),
    (Category::Engineering, &["engineering", "mechanical", "electrical"]),
    (Category::Medicine, &["medicine", "medical", "health"]),
];

const BEGINNER_KEYWORDS: &[&str] = &[
    "beginner",
    "introduction",
    "basics",
    "fundamentals",
    "getting started",
];

const ADVANCED_KEYWORDS: &[&str] = &["advanced", "expert", "master", "professional"];

fn searchable_text(title: &str, description: &str) -> String {
    format!("{} {}", title, description).to_lowercase()
}

/// 推断课程分类，都不匹配时返回 `Other`
pub fn infer_category(title: &str, description: &str) -> Category {
    let text = searchable_text(title, description);

    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}

/// 推断课程难度，入门关键词优先，默认 `Intermediate`
pub fn infer_level(title: &str, description: &str) -> Level {
    let text = searchable_text(title, description);

    if BEGINNER_KEYWORDS.iter().any(|k| text.contains(k)) {
        Level::Beginner
    } else if ADVANCED_KEYWORDS.iter().any(|k| text.contains(k)) {
        Level::Advanced
    } else {
        Level::Intermediate
    }
}
