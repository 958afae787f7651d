use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 单个视频的元数据
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// 格式化后的时长，如 "4:05" 或 "1:23:45"
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// 在来源列表中的位置（从0开始）
    #[serde(default)]
    pub position: usize,
}

impl VideoRecord {
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id)
    }
}

/// 播放列表及其视频（按播放列表顺序）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YouTubePlaylist {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub channel_title: String,
    pub videos: Vec<VideoRecord>,
}

impl YouTubePlaylist {
    pub fn playlist_url(&self) -> String {
        format!("https://www.youtube.com/playlist?list={}", self.id)
    }
}
