//! 单个 URL 导入流程 - 流程层
//!
//! 核心职责：定义"一个 URL"的完整导入流程
//!
//! 流程顺序：
//! 1. 识别 URL（视频 / 播放列表 / 频道）
//! 2. 抓取元数据
//! 3. 转换为课程
//! 4. 写入存储
//!
//! 任何一步失败都转为 `ImportOutcome`，不向上抛错

use tracing::{error, info, warn};

use crate::clients::{CourseStore, MetadataFetcher};
use crate::error::{AppResult, ImportError};
use crate::models::{Course, CourseOverrides, Instructor};
use crate::services::playlist_converter::{
    convert_playlist_to_course, convert_video_to_course, ConvertOptions,
};
use crate::services::youtube_url::{classify_youtube_url, TargetKind};
use crate::workflow::import_ctx::ImportCtx;

/// 单个导入的结果
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    pub success: bool,
    pub message: String,
    /// 成功时为存储分配的课程ID
    pub course_id: Option<String>,
}

impl ImportOutcome {
    fn imported(course_id: String, course: &Course) -> Self {
        Self {
            success: true,
            message: format!(
                "已导入课程「{}」({} 个模块, {} 个课时)",
                course.title,
                course.modules.len(),
                course.lesson_count()
            ),
            course_id: Some(course_id),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            course_id: None,
        }
    }
}

/// 导入流程
///
/// - 编排识别、抓取、转换、写入
/// - 不持有资源，只借用协作方
pub struct ImportFlow<'a> {
    store: &'a dyn CourseStore,
    fetcher: &'a dyn MetadataFetcher,
    options: ConvertOptions,
}

impl<'a> ImportFlow<'a> {
    /// 创建新的导入流程
    pub fn new(
        store: &'a dyn CourseStore,
        fetcher: &'a dyn MetadataFetcher,
        options: ConvertOptions,
    ) -> Self {
        Self {
            store,
            fetcher,
            options,
        }
    }

    /// 导入单个 URL
    pub async fn run(
        &self,
        url: &str,
        instructor: &Instructor,
        overrides: &CourseOverrides,
        ctx: &ImportCtx,
    ) -> ImportOutcome {
        info!("{} 🔗 {}", ctx, url);

        match self.try_run(url, instructor, overrides, ctx).await {
            Ok(Ok((course_id, course))) => {
                info!(
                    "{} ✅ 导入成功: {} (ID: {})",
                    ctx, course.title, course_id
                );
                ImportOutcome::imported(course_id, &course)
            }
            Ok(Err(message)) => {
                warn!("{} ⚠️ {}", ctx, message);
                ImportOutcome::failed(message)
            }
            Err(e) => {
                error!("{} ❌ 导入失败: {}", ctx, e);
                ImportOutcome::failed(e.to_string())
            }
        }
    }

    /// 外层 `Err` 是错误，内层 `Err` 是可预期的失败说明
    async fn try_run(
        &self,
        url: &str,
        instructor: &Instructor,
        overrides: &CourseOverrides,
        ctx: &ImportCtx,
    ) -> AppResult<Result<(String, Course), String>> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ImportError::EmptyUrl.into());
        }

        let target = classify_youtube_url(url).ok_or_else(|| ImportError::InvalidUrl {
            url: url.to_string(),
        })?;

        info!("{} 识别为{}: {}", ctx, target.kind, target.id);

        let course = match target.kind {
            TargetKind::Channel => {
                return Err(ImportError::ChannelNotSupported {
                    url: url.to_string(),
                }
                .into());
            }
            TargetKind::Playlist => match self.fetcher.fetch_playlist(&target.id).await? {
                Some(playlist) => {
                    info!(
                        "{} ✓ 播放列表「{}」共 {} 个视频",
                        ctx,
                        playlist.title,
                        playlist.videos.len()
                    );
                    convert_playlist_to_course(&playlist, instructor, overrides, &self.options)?
                }
                None => return Ok(Err(format!("无法获取播放列表详情: {}", target.id))),
            },
            TargetKind::Video => match self.fetcher.fetch_video(&target.id).await? {
                Some(video) => {
                    convert_video_to_course(&video, instructor, overrides, &self.options)?
                }
                None => return Ok(Err(format!("无法获取视频详情: {}", target.id))),
            },
        };

        info!(
            "{} 📝 {} 个模块 / {} 个课时 / {}",
            ctx,
            course.modules.len(),
            course.lesson_count(),
            course.duration
        );

        let course_id = self.store.create(&course).await?;
        Ok(Ok((course_id, course)))
    }
}
