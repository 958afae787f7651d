//! YouTube URL 识别
//!
//! 只做解析，不发请求

use std::fmt;
use url::Url;

/// URL 指向的资源类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Video,
    Playlist,
    Channel,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetKind::Video => "视频",
            TargetKind::Playlist => "播放列表",
            TargetKind::Channel => "频道",
        };
        write!(f, "{}", name)
    }
}

/// 识别结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YouTubeTarget {
    pub kind: TargetKind,
    pub id: String,
}

impl YouTubeTarget {
    fn new(kind: TargetKind, id: &str) -> Option<Self> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        valid.then(|| Self {
            kind,
            id: id.to_string(),
        })
    }
}

const YOUTUBE_HOSTS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
];

/// 识别 YouTube URL
///
/// `list` 参数存在时按播放列表处理（优先于 `v`）；
/// 空字符串、无法解析的 URL 和其他站点返回 `None`
pub fn classify_youtube_url(input: &str) -> Option<YouTubeTarget> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    // 允许省略协议
    let url = Url::parse(input)
        .or_else(|_| Url::parse(&format!("https://{}", input)))
        .ok()?;
    let host = url.host_str()?.to_ascii_lowercase();

    if host == "youtu.be" {
        let id = url.path_segments()?.next()?;
        return YouTubeTarget::new(TargetKind::Video, id);
    }

    if !YOUTUBE_HOSTS.contains(&host.as_str()) {
        return None;
    }

    let query_value = |key: &str| {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    };

    if let Some(list_id) = query_value("list") {
        return YouTubeTarget::new(TargetKind::Playlist, &list_id);
    }

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    match segments.as_slice() {
        ["watch"] => YouTubeTarget::new(TargetKind::Video, &query_value("v")?),
        ["embed" | "shorts" | "live" | "v", id, ..] => YouTubeTarget::new(TargetKind::Video, id),
        ["channel" | "c" | "user", name, ..] => YouTubeTarget::new(TargetKind::Channel, name),
        [handle, ..] if handle.starts_with('@') => {
            YouTubeTarget::new(TargetKind::Channel, &handle[1..])
        }
        _ => None,
    }
}
