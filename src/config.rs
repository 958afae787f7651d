use crate::error::{AppError, AppResult, FileError};
use serde::Deserialize;
use std::path::Path;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- YouTube Data API 配置 ---
    pub youtube_api_key: String,
    pub youtube_api_base_url: String,
    /// 单个播放列表最多导入的视频数
    pub max_playlist_videos: usize,
    // --- Firestore 配置 ---
    pub firestore_base_url: String,
    pub firestore_project_id: String,
    pub firestore_collection: String,
    pub firestore_api_key: Option<String>,
    pub firestore_auth_token: Option<String>,
    // --- 导入参数 ---
    /// 每个模块包含的课时数
    pub lessons_per_module: usize,
    /// 课时简介截取的字符数
    pub lesson_preview_chars: usize,
    /// 默认讲师ID
    pub instructor_id: String,
    /// 默认讲师名称
    pub instructor_name: String,
    /// HTTP 请求超时（秒）
    pub request_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            youtube_api_key: String::new(),
            youtube_api_base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            max_playlist_videos: 200,
            firestore_base_url: "https://firestore.googleapis.com/v1".to_string(),
            firestore_project_id: String::new(),
            firestore_collection: "courses".to_string(),
            firestore_api_key: None,
            firestore_auth_token: None,
            lessons_per_module: 8,
            lesson_preview_chars: 200,
            instructor_id: String::new(),
            instructor_name: String::new(),
            request_timeout_secs: 30,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    /// 只从环境变量加载（未设置的项使用默认值）
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载，再用环境变量覆盖
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Err(AppError::File(FileError::NotFound {
                path: path.display().to_string(),
            }));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            AppError::File(FileError::TomlParseFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            })
        })?;

        Ok(config.with_env_overrides())
    }

    fn with_env_overrides(self) -> Self {
        let default = self;
        Self {
            youtube_api_key: std::env::var("YOUTUBE_API_KEY").unwrap_or(default.youtube_api_key),
            youtube_api_base_url: std::env::var("YOUTUBE_API_BASE_URL").unwrap_or(default.youtube_api_base_url),
            max_playlist_videos: std::env::var("MAX_PLAYLIST_VIDEOS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_playlist_videos),
            firestore_base_url: std::env::var("FIRESTORE_BASE_URL").unwrap_or(default.firestore_base_url),
            firestore_project_id: std::env::var("FIRESTORE_PROJECT_ID").unwrap_or(default.firestore_project_id),
            firestore_collection: std::env::var("FIRESTORE_COLLECTION").unwrap_or(default.firestore_collection),
            firestore_api_key: std::env::var("FIRESTORE_API_KEY").ok().or(default.firestore_api_key),
            firestore_auth_token: std::env::var("FIRESTORE_AUTH_TOKEN").ok().or(default.firestore_auth_token),
            lessons_per_module: std::env::var("LESSONS_PER_MODULE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.lessons_per_module),
            lesson_preview_chars: std::env::var("LESSON_PREVIEW_CHARS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.lesson_preview_chars),
            instructor_id: std::env::var("INSTRUCTOR_ID").unwrap_or(default.instructor_id),
            instructor_name: std::env::var("INSTRUCTOR_NAME").unwrap_or(default.instructor_name),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }
}
