//! 外部协作方（基础设施层）
//!
//! 上层只依赖这里的 trait，测试时可以换成内存实现

pub mod firestore_store;
pub mod youtube_client;

pub use firestore_store::FirestoreStore;
pub use youtube_client::YouTubeClient;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{Course, CourseRecord, VideoRecord, YouTubePlaylist};

/// 课程存储
#[async_trait]
pub trait CourseStore: Send + Sync {
    /// 读取全部课程快照
    async fn list(&self) -> AppResult<Vec<CourseRecord>>;

    /// 删除单个课程；每次调用相互独立
    async fn delete(&self, id: &str) -> AppResult<()>;

    /// 写入新课程，返回存储分配的ID
    async fn create(&self, course: &Course) -> AppResult<String>;
}

/// 视频元数据抓取
///
/// `Ok(None)` 表示不存在或无权访问，`Err` 表示请求本身失败
#[async_trait]
pub trait MetadataFetcher: Send + Sync {
    async fn fetch_playlist(&self, playlist_id: &str) -> AppResult<Option<YouTubePlaylist>>;

    async fn fetch_video(&self, video_id: &str) -> AppResult<Option<VideoRecord>>;
}
