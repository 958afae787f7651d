use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 课程存储相关错误
    #[error("存储错误: {0}")]
    Store(#[from] StoreError),
    /// 元数据抓取错误（YouTube API）
    #[error("抓取错误: {0}")]
    Fetch(#[from] FetchError),
    /// 导入流程错误
    #[error("导入错误: {0}")]
    Import(#[from] ImportError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 其他错误（用于包装第三方库错误）
    #[error("错误: {0}")]
    Other(String),
}

/// 课程存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 网络请求失败
    #[error("存储请求失败 ({operation}): {source}")]
    RequestFailed {
        operation: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 存储返回错误状态
    #[error("存储返回错误响应 ({operation}): status={status}, body={body}")]
    BadResponse {
        operation: String,
        status: u16,
        body: String,
    },
    /// 文档不存在
    #[error("文档不存在: {id}")]
    NotFound { id: String },
    /// 文档格式无法识别
    #[error("文档格式无法识别 ({name}): {reason}")]
    MalformedDocument { name: String, reason: String },
}

/// 元数据抓取错误
#[derive(Debug, Error)]
pub enum FetchError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// API 返回错误响应
    #[error("API返回错误响应 ({endpoint}): status={status}, message={message:?}")]
    BadResponse {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },
    /// 请求配额耗尽
    #[error("API配额已耗尽 ({endpoint})")]
    QuotaExceeded { endpoint: String },
    /// JSON 解析失败
    #[error("JSON解析失败: {source}")]
    JsonParseFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 导入流程错误
#[derive(Debug, Error)]
pub enum ImportError {
    /// URL 为空
    #[error("URL不能为空")]
    EmptyUrl,
    /// URL 无法识别
    #[error("无效的 YouTube URL: {url}")]
    InvalidUrl { url: String },
    /// 频道导入不支持
    #[error("暂不支持导入频道: {url}")]
    ChannelNotSupported { url: String },
    /// 每个模块的课时数非法
    #[error("每个模块的课时数必须大于 0 (当前: {batch_size})")]
    InvalidBatchSize { batch_size: usize },
    /// 缺少必填字段
    #[error("缺少必填字段: {field}")]
    MissingField { field: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 缺少必需的配置项
    #[error("缺少配置项 {key}")]
    MissingValue { key: String },
    /// 配置值无效
    #[error("配置项 {key} 无效: {reason}")]
    InvalidValue { key: String, reason: String },
}

// ========== 从常见错误类型转换 ==========

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let endpoint = err
            .url()
            .map(|u| u.path().to_string())
            .unwrap_or_default();
        AppError::Fetch(FetchError::RequestFailed {
            endpoint,
            source: Box::new(err),
        })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Fetch(FetchError::JsonParseFailed {
            source: Box::new(err),
        })
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::File(FileError::TomlParseFailed {
            path: String::new(), // TOML错误通常不包含路径信息
            source: Box::new(err),
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建存储请求失败错误
    pub fn store_request_failed(
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Store(StoreError::RequestFailed {
            operation: operation.into(),
            source: Box::new(source),
        })
    }

    /// 创建存储错误响应
    pub fn store_bad_response(operation: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        AppError::Store(StoreError::BadResponse {
            operation: operation.into(),
            status,
            body: body.into(),
        })
    }

    /// 创建 API 请求失败错误
    pub fn fetch_request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Fetch(FetchError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
