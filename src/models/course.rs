use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// 存储中已有的课程文档（只读快照）
///
/// 文档中的其他字段会被忽略；类型不对的字段按缺失处理，不会丢弃整条记录
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub title: Option<String>,
    #[serde(default, alias = "instructorName", deserialize_with = "deserialize_lenient")]
    pub instructor: Option<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub level: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub published: Option<bool>,
}

impl CourseRecord {
    /// 排序用的创建时间，缺失时视为 epoch 0
    pub fn created_at_or_epoch(&self) -> DateTime<Utc> {
        self.created_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// 显示用的标题
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("(无标题)")
    }
}

/// 课程分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    Programming,
    Mathematics,
    Science,
    Business,
    Design,
    Language,
    Engineering,
    Medicine,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Programming,
        Category::Mathematics,
        Category::Science,
        Category::Business,
        Category::Design,
        Category::Language,
        Category::Engineering,
        Category::Medicine,
        Category::Other,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Programming => "Programming",
            Category::Mathematics => "Mathematics",
            Category::Science => "Science",
            Category::Business => "Business",
            Category::Design => "Design",
            Category::Language => "Language",
            Category::Engineering => "Engineering",
            Category::Medicine => "Medicine",
            Category::Other => "Other",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("未知分类: {}", s))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 课程难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Level {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Level {
    pub fn name(self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Level::Beginner),
            "intermediate" => Ok(Level::Intermediate),
            "advanced" => Ok(Level::Advanced),
            other => Err(format!("未知难度: {}", other)),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 课时附带的资源链接
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// 课时（对应一个视频）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub order: usize,
    pub video_url: String,
    pub content: String,
    pub resources: Vec<Resource>,
}

/// 模块（一批连续的视频）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub order: usize,
    pub lessons: Vec<Lesson>,
}

/// 导入来源
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSource {
    pub kind: String,
    pub source_id: String,
    pub url: String,
}

/// 待写入存储的课程
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub level: Level,
    pub price: f64,
    pub duration: String,
    pub modules: Vec<Module>,
    pub published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub instructor_id: String,
    pub instructor_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<CourseSource>,
}

impl Course {
    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }

    /// 按顺序展开所有课时
    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.modules.iter().flat_map(|m| m.lessons.iter())
    }
}

/// 课程所属讲师
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Instructor {
    pub id: String,
    pub name: String,
}

impl Instructor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// 调用方提供的覆盖字段，优先于推断值
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseOverrides {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub level: Option<Level>,
    pub price: Option<f64>,
    pub published: Option<bool>,
    pub image: Option<String>,
}

/// 类型不符时返回 `None` 并记录警告
pub fn deserialize_lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }

    match T::deserialize(value.clone()) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            warn!("⚠️ 字段值 {} 无法识别，按缺失处理: {}", value, e);
            Ok(None)
        }
    }
}

/// 把各种时间戳形态统一转换为 `DateTime<Utc>`
///
/// 接受：RFC 3339 字符串、毫秒时间戳、`{seconds, nanoseconds}` /
/// `{_seconds, _nanoseconds}` 对象、null；无法识别的值按缺失处理
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match parse_timestamp(value.clone()) {
        Ok(timestamp) => Ok(timestamp),
        Err(e) => {
            warn!("⚠️ 时间戳 {} 无法识别，按缺失处理: {}", value, e);
            Ok(None)
        }
    }
}

fn parse_timestamp(value: serde_json::Value) -> Result<Option<DateTime<Utc>>, serde_json::Error> {
    use serde::de::{Deserializer, MapAccess, Visitor};

    struct TimestampVisitor;

    impl<'de> Visitor<'de> for TimestampVisitor {
        type Value = Option<DateTime<Utc>>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an RFC 3339 string, epoch milliseconds or a {seconds, nanoseconds} map")
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            deserializer.deserialize_any(TimestampVisitor)
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            if value.trim().is_empty() {
                return Ok(None);
            }
            DateTime::parse_from_rfc3339(value.trim())
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(E::custom)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Utc.timestamp_millis_opt(value).single())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            let millis = i64::try_from(value).map_err(E::custom)?;
            self.visit_i64(millis)
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            self.visit_i64(value as i64)
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut seconds: Option<i64> = None;
            let mut nanos: u32 = 0;

            while let Some(key) = map.next_key::<String>()? {
                match key.as_str() {
                    "seconds" | "_seconds" => seconds = Some(map.next_value()?),
                    "nanoseconds" | "_nanoseconds" => nanos = map.next_value()?,
                    _ => {
                        map.next_value::<serde::de::IgnoredAny>()?;
                    }
                }
            }

            Ok(seconds.and_then(|s| Utc.timestamp_opt(s, nanos).single()))
        }
    }

    value.deserialize_option(TimestampVisitor)
}
