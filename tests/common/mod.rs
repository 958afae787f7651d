#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use course_catalog::clients::{CourseStore, MetadataFetcher};
use course_catalog::error::{AppError, AppResult, FetchError, StoreError};
use course_catalog::models::{Course, CourseRecord, VideoRecord, YouTubePlaylist};

/// 内存课程存储
#[derive(Default)]
pub struct MemoryStore {
    pub records: Mutex<Vec<CourseRecord>>,
    pub created: Mutex<Vec<Course>>,
    pub deleted: Mutex<Vec<String>>,
    /// 删除这些ID时返回错误
    pub failing_deletes: HashSet<String>,
    /// 创建这些标题的课程时返回错误
    pub failing_creates: HashSet<String>,
}

impl MemoryStore {
    pub fn with_records(records: Vec<CourseRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Default::default()
        }
    }

    pub fn fail_delete(mut self, id: &str) -> Self {
        self.failing_deletes.insert(id.to_string());
        self
    }

    pub fn fail_create(mut self, title: &str) -> Self {
        self.failing_creates.insert(title.to_string());
        self
    }

    pub fn created_titles(&self) -> Vec<String> {
        self.created
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.title.clone())
            .collect()
    }
}

#[async_trait]
impl CourseStore for MemoryStore {
    async fn list(&self) -> AppResult<Vec<CourseRecord>> {
        Ok(self.records.lock().unwrap().clone())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        if self.failing_deletes.contains(id) {
            return Err(AppError::store_bad_response("delete", 500, "boom"));
        }

        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(StoreError::NotFound { id: id.to_string() }.into());
        }

        self.deleted.lock().unwrap().push(id.to_string());
        Ok(())
    }

    async fn create(&self, course: &Course) -> AppResult<String> {
        if self.failing_creates.contains(&course.title) {
            return Err(AppError::store_bad_response("create", 503, "unavailable"));
        }

        let mut created = self.created.lock().unwrap();
        created.push(course.clone());
        let id = format!("course-{}", created.len());

        self.records.lock().unwrap().push(CourseRecord {
            id: id.clone(),
            title: Some(course.title.clone()),
            instructor: Some(course.instructor_name.clone()),
            created_at: Some(Utc::now()),
            ..Default::default()
        });

        Ok(id)
    }
}

/// 内存元数据源；未登记的ID返回 `None`
#[derive(Default)]
pub struct FakeFetcher {
    pub playlists: HashMap<String, YouTubePlaylist>,
    pub videos: HashMap<String, VideoRecord>,
    /// 请求这些ID时返回错误
    pub failing_ids: HashSet<String>,
}

impl FakeFetcher {
    pub fn with_playlist(mut self, playlist: YouTubePlaylist) -> Self {
        self.playlists.insert(playlist.id.clone(), playlist);
        self
    }

    pub fn with_video(mut self, video: VideoRecord) -> Self {
        self.videos.insert(video.id.clone(), video);
        self
    }

    pub fn fail_on(mut self, id: &str) -> Self {
        self.failing_ids.insert(id.to_string());
        self
    }

    fn check(&self, id: &str) -> AppResult<()> {
        if self.failing_ids.contains(id) {
            return Err(FetchError::QuotaExceeded {
                endpoint: "videos".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl MetadataFetcher for FakeFetcher {
    async fn fetch_playlist(&self, playlist_id: &str) -> AppResult<Option<YouTubePlaylist>> {
        self.check(playlist_id)?;
        Ok(self.playlists.get(playlist_id).cloned())
    }

    async fn fetch_video(&self, video_id: &str) -> AppResult<Option<VideoRecord>> {
        self.check(video_id)?;
        Ok(self.videos.get(video_id).cloned())
    }
}

pub fn record(id: &str, title: Option<&str>, day: Option<u32>) -> CourseRecord {
    CourseRecord {
        id: id.to_string(),
        title: title.map(str::to_string),
        instructor: Some("Ada".to_string()),
        created_at: day.and_then(|d| Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).single()),
        ..Default::default()
    }
}

pub fn video(id: &str, title: &str, duration: &str) -> VideoRecord {
    VideoRecord {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("{} description", title),
        duration: duration.to_string(),
        thumbnail: format!("https://img.example/{}.jpg", id),
        ..Default::default()
    }
}

pub fn playlist(id: &str, title: &str, count: usize) -> YouTubePlaylist {
    YouTubePlaylist {
        id: id.to_string(),
        title: title.to_string(),
        description: "A complete series".to_string(),
        thumbnail: format!("https://img.example/{}.jpg", id),
        channel_title: "Channel".to_string(),
        videos: (0..count)
            .map(|i| {
                let mut v = video(&format!("{}-v{}", id, i), &format!("Part {} of {}", i + 1, title), "10:00");
                v.position = i;
                v
            })
            .collect(),
    }
}
