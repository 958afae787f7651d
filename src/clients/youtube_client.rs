/// YouTube Data API 客户端
///
/// 封装播放列表和视频元数据的抓取；ISO 8601 时长在这里一次性转换为 "M:SS" / "H:MM:SS"
use crate::clients::MetadataFetcher;
use crate::config::Config;
use crate::error::{AppError, AppResult, ConfigError, FetchError};
use crate::models::{VideoRecord, YouTubePlaylist};
use crate::services::duration::format_clock;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// 单次请求的最大条目数（API 上限）
const MAX_RESULTS: usize = 50;

/// YouTube 客户端
pub struct YouTubeClient {
    client: Client,
    base_url: String,
    api_key: String,
    max_playlist_videos: usize,
}

// ========== API 响应结构 ==========

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    thumbnails: HashMap<String, Thumbnail>,
    #[serde(default)]
    position: Option<usize>,
    #[serde(default)]
    resource_id: Option<ResourceId>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    #[serde(default)]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    id: String,
    #[serde(default)]
    snippet: Snippet,
    #[serde(default)]
    content_details: VideoContentDetails,
}

#[derive(Debug, Default, Deserialize)]
struct VideoContentDetails {
    #[serde(default)]
    duration: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItem {
    #[serde(default)]
    snippet: Snippet,
    #[serde(default)]
    content_details: Option<PlaylistItemContentDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemContentDetails {
    #[serde(default)]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistResource {
    #[serde(default)]
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ApiErrorReason>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorReason {
    #[serde(default)]
    reason: String,
}

impl YouTubeClient {
    /// 创建新的 YouTube 客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        if config.youtube_api_key.trim().is_empty() {
            return Err(ConfigError::MissingValue {
                key: "youtube_api_key".to_string(),
            }
            .into());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::fetch_request_failed("build client", e))?;

        Ok(Self {
            client,
            base_url: config.youtube_api_base_url.trim_end_matches('/').to_string(),
            api_key: config.youtube_api_key.clone(),
            max_playlist_videos: config.max_playlist_videos,
        })
    }

    /// 调用 API 并解析响应；404 返回 `None`
    ///
    /// # 参数
    /// - `endpoint`: 接口名，如 `videos`
    /// - `params`: 查询参数（不含 key）
    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> AppResult<Option<T>> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("请求 YouTube API: {} {:?}", endpoint, params);

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", &self.api_key)])
            .send()
            .await
            .map_err(|e| AppError::fetch_request_failed(endpoint, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorBody>(&body).ok().map(|b| b.error);

            let quota_exceeded = detail.as_ref().is_some_and(|d| {
                d.errors
                    .iter()
                    .any(|r| r.reason == "quotaExceeded" || r.reason == "dailyLimitExceeded")
            });
            if quota_exceeded {
                return Err(FetchError::QuotaExceeded {
                    endpoint: endpoint.to_string(),
                }
                .into());
            }

            return Err(FetchError::BadResponse {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message: detail.and_then(|d| d.message),
            }
            .into());
        }

        let parsed = response
            .json::<T>()
            .await
            .map_err(|e| AppError::fetch_request_failed(endpoint, e))?;

        Ok(Some(parsed))
    }

    /// 按播放列表顺序列出视频ID（受 `max_playlist_videos` 限制）
    async fn list_playlist_video_ids(&self, playlist_id: &str) -> AppResult<Vec<(usize, String)>> {
        let mut ids = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params = vec![
                ("part", "snippet,contentDetails".to_string()),
                ("playlistId", playlist_id.to_string()),
                ("maxResults", MAX_RESULTS.to_string()),
            ];
            if let Some(token) = &page_token {
                params.push(("pageToken", token.clone()));
            }

            let Some(page) = self
                .get::<ListResponse<PlaylistItem>>("playlistItems", &params)
                .await?
            else {
                break;
            };

            for item in page.items {
                let video_id = item
                    .content_details
                    .and_then(|c| c.video_id)
                    .or_else(|| item.snippet.resource_id.and_then(|r| r.video_id));

                if let Some(video_id) = video_id {
                    let position = item.snippet.position.unwrap_or(ids.len());
                    ids.push((position, video_id));
                }
            }

            if ids.len() >= self.max_playlist_videos {
                ids.truncate(self.max_playlist_videos);
                break;
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        ids.sort_by_key(|(position, _)| *position);
        Ok(ids)
    }

    /// 批量获取视频详情（每次最多 50 个）
    async fn fetch_video_items(&self, video_ids: &[String]) -> AppResult<HashMap<String, VideoItem>> {
        let mut items = HashMap::new();

        for chunk in video_ids.chunks(MAX_RESULTS) {
            let params = [
                ("part", "snippet,contentDetails".to_string()),
                ("id", chunk.join(",")),
            ];

            if let Some(page) = self.get::<ListResponse<VideoItem>>("videos", &params).await? {
                for item in page.items {
                    items.insert(item.id.clone(), item);
                }
            }
        }

        Ok(items)
    }
}

#[async_trait]
impl MetadataFetcher for YouTubeClient {
    async fn fetch_playlist(&self, playlist_id: &str) -> AppResult<Option<YouTubePlaylist>> {
        let params = [("part", "snippet".to_string()), ("id", playlist_id.to_string())];

        let Some(resource) = self
            .get::<ListResponse<PlaylistResource>>("playlists", &params)
            .await?
            .and_then(|page| page.items.into_iter().next())
        else {
            return Ok(None);
        };

        let entries = self.list_playlist_video_ids(playlist_id).await?;
        let ids: Vec<String> = entries.iter().map(|(_, id)| id.clone()).collect();
        let mut details = self.fetch_video_items(&ids).await?;

        let mut videos = Vec::with_capacity(entries.len());
        for (position, video_id) in entries {
            match details.remove(&video_id) {
                Some(item) => videos.push(video_from_item(item, position)),
                None => warn!("⚠️ 视频 {} 不可用（已删除或私有），跳过", video_id),
            }
        }

        info!(
            "✓ 播放列表 {} 获取完成: {} 个可用视频",
            playlist_id,
            videos.len()
        );

        Ok(Some(YouTubePlaylist {
            id: playlist_id.to_string(),
            thumbnail: best_thumbnail(&resource.snippet.thumbnails),
            title: resource.snippet.title,
            description: resource.snippet.description,
            channel_title: resource.snippet.channel_title,
            videos,
        }))
    }

    async fn fetch_video(&self, video_id: &str) -> AppResult<Option<VideoRecord>> {
        let mut items = self.fetch_video_items(&[video_id.to_string()]).await?;
        Ok(items.remove(video_id).map(|item| video_from_item(item, 0)))
    }
}

fn video_from_item(item: VideoItem, position: usize) -> VideoRecord {
    VideoRecord {
        thumbnail: best_thumbnail(&item.snippet.thumbnails),
        duration: format_clock(parse_iso8601_duration(&item.content_details.duration)),
        id: item.id,
        title: item.snippet.title,
        description: item.snippet.description,
        published_at: item.snippet.published_at,
        position,
    }
}

/// 按清晰度从高到低选缩略图
fn best_thumbnail(thumbnails: &HashMap<String, Thumbnail>) -> String {
    ["maxres", "standard", "high", "medium", "default"]
        .iter()
        .find_map(|key| thumbnails.get(*key))
        .map(|t| t.url.clone())
        .unwrap_or_default()
}

/// 解析 ISO 8601 时长（如 `PT1H2M3S`、`P1DT2H`），无法解析返回 0
pub fn parse_iso8601_duration(duration: &str) -> u64 {
    let Ok(re) = Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$") else {
        return 0;
    };

    let Some(caps) = re.captures(duration.trim()) else {
        return 0;
    };

    // 缺失的分量为 0，数字超出 u64 为 None
    let part = |i: usize| match caps.get(i) {
        Some(m) => m.as_str().parse::<u64>().ok(),
        None => Some(0),
    };

    let total = [(1, 86_400u64), (2, 3600), (3, 60), (4, 1)]
        .into_iter()
        .try_fold(0u64, |acc, (i, unit)| acc.checked_add(part(i)?.checked_mul(unit)?));

    // 溢出按无法解析处理
    total.unwrap_or(0)
}
