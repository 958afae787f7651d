//! 播放列表 / 视频 → 课程 - 业务能力层
//!
//! 只负责构建课程树，不关心抓取和存储
//!
//! ```text
//! Course
//!   └── Module (每 lessons_per_module 个视频一组)
//!         └── Lesson (一个视频)
//! ```

use tracing::{debug, warn};

use crate::error::{AppResult, ImportError};
use crate::models::{
    Course, CourseDraft, CourseOverrides, CourseSource, Instructor, Lesson, Module, Resource,
    VideoRecord, YouTubePlaylist,
};
use crate::services::course_inference::{infer_category, infer_level};
use crate::services::duration::aggregate_duration;
use crate::utils::truncate_text;

/// 每个模块默认包含的课时数
pub const DEFAULT_LESSONS_PER_MODULE: usize = 8;

/// 课时简介默认截取的字符数
pub const DEFAULT_PREVIEW_CHARS: usize = 200;

/// 转换参数
#[derive(Debug, Clone, Copy)]
pub struct ConvertOptions {
    pub lessons_per_module: usize,
    pub preview_chars: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            lessons_per_module: DEFAULT_LESSONS_PER_MODULE,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

/// 把视频按固定数量分组为模块
///
/// # 参数
/// - `videos`: 按来源顺序排列的视频
/// - `batch_size`: 每个模块的视频数，必须大于 0
/// - `preview_chars`: 课时简介截取的字符数
///
/// # 返回
/// 模块列表；最后一个模块包含剩余的视频
pub fn batch_videos_into_modules(
    videos: &[VideoRecord],
    batch_size: usize,
    preview_chars: usize,
) -> AppResult<Vec<Module>> {
    if batch_size == 0 {
        return Err(ImportError::InvalidBatchSize { batch_size }.into());
    }

    let modules = videos
        .chunks(batch_size)
        .enumerate()
        .map(|(batch_index, batch)| build_module(batch_index, batch, preview_chars))
        .collect();

    Ok(modules)
}

fn build_module(batch_index: usize, batch: &[VideoRecord], preview_chars: usize) -> Module {
    let module_number = batch_index + 1;
    let lesson_count = batch.len();

    let lessons: Vec<Lesson> = batch
        .iter()
        .enumerate()
        .map(|(order, video)| build_lesson(order, video, preview_chars))
        .collect();

    Module {
        id: format!("module-{}", module_number),
        title: format!(
            "Module {}: {}",
            module_number,
            title_phrase(batch.first().map(|v| v.title.as_str()).unwrap_or(""))
        ),
        description: format!(
            "This module contains {} video {}.",
            lesson_count,
            if lesson_count == 1 { "lesson" } else { "lessons" }
        ),
        duration: aggregate_duration(batch.iter().map(|v| v.duration.as_str())),
        order: batch_index,
        lessons,
    }
}

/// 取标题的前三个词作为模块短语
fn title_phrase(title: &str) -> String {
    let words: Vec<&str> = title.split_whitespace().take(3).collect();
    if words.is_empty() {
        "Video Lessons".to_string()
    } else {
        words.join(" ")
    }
}

fn build_lesson(order: usize, video: &VideoRecord, preview_chars: usize) -> Lesson {
    let video_url = video.watch_url();

    Lesson {
        id: video.id.clone(),
        title: video.title.clone(),
        description: truncate_text(&video.description, preview_chars),
        duration: video.duration.clone(),
        order,
        video_url: video_url.clone(),
        content: video.description.clone(),
        resources: vec![Resource {
            title: "Watch on YouTube".to_string(),
            url: video_url,
            kind: "link".to_string(),
        }],
    }
}

/// 汇总整个课程的时长（按课时顺序）
pub fn course_duration(modules: &[Module]) -> String {
    aggregate_duration(
        modules
            .iter()
            .flat_map(|m| m.lessons.iter())
            .map(|l| l.duration.as_str()),
    )
}

/// 播放列表 → 课程
///
/// 覆盖字段优先；分类和难度只在没有覆盖时才根据播放列表标题和简介推断
pub fn convert_playlist_to_course(
    playlist: &YouTubePlaylist,
    instructor: &Instructor,
    overrides: &CourseOverrides,
    options: &ConvertOptions,
) -> AppResult<Course> {
    let modules = batch_videos_into_modules(
        &playlist.videos,
        options.lessons_per_module,
        options.preview_chars,
    )?;

    debug!(
        "播放列表 {} 共 {} 个视频，分为 {} 个模块",
        playlist.id,
        playlist.videos.len(),
        modules.len()
    );

    let source = CourseSource {
        kind: "youtube_playlist".to_string(),
        source_id: playlist.id.clone(),
        url: playlist.playlist_url(),
    };

    Ok(assemble_course(
        &playlist.title,
        &playlist.description,
        &playlist.thumbnail,
        modules,
        source,
        instructor,
        overrides,
    ))
}

/// 单个视频 → 只有一个模块、一个课时的课程
pub fn convert_video_to_course(
    video: &VideoRecord,
    instructor: &Instructor,
    overrides: &CourseOverrides,
    options: &ConvertOptions,
) -> AppResult<Course> {
    let modules = batch_videos_into_modules(
        std::slice::from_ref(video),
        options.lessons_per_module,
        options.preview_chars,
    )?;

    let source = CourseSource {
        kind: "youtube_video".to_string(),
        source_id: video.id.clone(),
        url: video.watch_url(),
    };

    Ok(assemble_course(
        &video.title,
        &video.description,
        &video.thumbnail,
        modules,
        source,
        instructor,
        overrides,
    ))
}

fn assemble_course(
    source_title: &str,
    source_description: &str,
    source_thumbnail: &str,
    modules: Vec<Module>,
    source: CourseSource,
    instructor: &Instructor,
    overrides: &CourseOverrides,
) -> Course {
    let thumbnail = (!source_thumbnail.is_empty()).then(|| source_thumbnail.to_string());

    Course {
        title: overrides
            .title
            .clone()
            .unwrap_or_else(|| source_title.to_string()),
        description: overrides
            .description
            .clone()
            .unwrap_or_else(|| source_description.to_string()),
        category: overrides
            .category
            .unwrap_or_else(|| infer_category(source_title, source_description)),
        level: overrides
            .level
            .unwrap_or_else(|| infer_level(source_title, source_description)),
        price: overrides.price.unwrap_or(0.0),
        duration: course_duration(&modules),
        modules,
        published: overrides.published.unwrap_or(false),
        image: overrides.image.clone().or(thumbnail),
        instructor_id: instructor.id.clone(),
        instructor_name: instructor.name.clone(),
        source: Some(source),
    }
}

/// JSON 条目 → 课程
///
/// 条目里的讲师信息优先于 `instructor`；无法识别的分类/难度按推断处理
pub fn convert_draft_to_course(draft: CourseDraft, instructor: &Instructor) -> AppResult<Course> {
    if draft.title.trim().is_empty() {
        return Err(ImportError::MissingField {
            field: "title".to_string(),
        }
        .into());
    }

    let category = match draft.category.as_deref().map(str::parse) {
        Some(Ok(category)) => category,
        Some(Err(e)) => {
            warn!("{}，改为自动推断: {}", e, draft.title);
            infer_category(&draft.title, &draft.description)
        }
        None => infer_category(&draft.title, &draft.description),
    };

    let level = match draft.level.as_deref().map(str::parse) {
        Some(Ok(level)) => level,
        Some(Err(e)) => {
            warn!("{}，改为自动推断: {}", e, draft.title);
            infer_level(&draft.title, &draft.description)
        }
        None => infer_level(&draft.title, &draft.description),
    };

    Ok(Course {
        duration: course_duration(&draft.modules),
        category,
        level,
        price: draft.price.unwrap_or(0.0),
        published: draft.published.unwrap_or(false),
        image: draft.image,
        instructor_id: draft.instructor_id.unwrap_or_else(|| instructor.id.clone()),
        instructor_name: draft
            .instructor_name
            .unwrap_or_else(|| instructor.name.clone()),
        source: None,
        modules: draft.modules,
        title: draft.title,
        description: draft.description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Level};
    use crate::services::duration::{aggregate_to_minutes, parse_clock};

    fn video(i: usize, duration: &str) -> VideoRecord {
        VideoRecord {
            id: format!("vid{:03}", i),
            title: format!("Episode {} of the Rust series", i),
            description: format!("Description for episode {}", i),
            duration: duration.to_string(),
            thumbnail: format!("https://i.ytimg.com/vi/vid{:03}/hq.jpg", i),
            published_at: None,
            position: i,
        }
    }

    fn playlist(count: usize) -> YouTubePlaylist {
        YouTubePlaylist {
            id: "PLrust".to_string(),
            title: "Rust Programming for Beginners".to_string(),
            description: "A complete walkthrough".to_string(),
            thumbnail: "https://i.ytimg.com/pl/hq.jpg".to_string(),
            channel_title: "Rustaceans".to_string(),
            videos: (0..count).map(|i| video(i, "12:34")).collect(),
        }
    }

    fn instructor() -> Instructor {
        Instructor::new("inst-1", "Ferris")
    }

    #[test]
    fn test_twenty_videos_make_three_modules() {
        let videos: Vec<_> = (0..20).map(|i| video(i, "7:45")).collect();

        let modules = batch_videos_into_modules(&videos, 8, 200).unwrap();

        let sizes: Vec<_> = modules.iter().map(|m| m.lessons.len()).collect();
        assert_eq!(sizes, vec![8, 8, 4]);

        for (module_index, module) in modules.iter().enumerate() {
            assert_eq!(module.order, module_index);
            for (lesson_index, lesson) in module.lessons.iter().enumerate() {
                assert_eq!(lesson.order, lesson_index);
                assert_eq!(lesson.id, videos[module_index * 8 + lesson_index].id);
            }
        }

        // 各模块时长相加与整体汇总的差距不超过每个模块丢弃的秒数
        let summed: u64 = modules.iter().map(|m| aggregate_to_minutes(&m.duration)).sum();
        let overall = aggregate_to_minutes(&aggregate_duration(videos.iter().map(|v| v.duration.as_str())));
        assert!(overall >= summed && overall - summed < modules.len() as u64);
    }

    #[test]
    fn test_module_title_and_description() {
        let mut videos = vec![video(0, "1:00"), video(1, "2:00")];
        let modules = batch_videos_into_modules(&videos, 8, 200).unwrap();

        assert_eq!(modules[0].id, "module-1");
        assert_eq!(modules[0].title, "Module 1: Episode 0 of");
        assert_eq!(modules[0].description, "This module contains 2 video lessons.");
        assert_eq!(modules[0].duration, "3m");

        videos[0].title = "   ".to_string();
        let modules = batch_videos_into_modules(&videos[..1], 8, 200).unwrap();
        assert_eq!(modules[0].title, "Module 1: Video Lessons");
        assert_eq!(modules[0].description, "This module contains 1 video lesson.");
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let result = batch_videos_into_modules(&[video(0, "1:00")], 0, 200);
        assert!(matches!(
            result,
            Err(crate::error::AppError::Import(ImportError::InvalidBatchSize { batch_size: 0 }))
        ));
    }

    #[test]
    fn test_empty_input_yields_no_modules() {
        assert!(batch_videos_into_modules(&[], 8, 200).unwrap().is_empty());
    }

    #[test]
    fn test_lesson_fields() {
        let mut v = video(7, "4:05");
        v.description = "x".repeat(250);

        let modules = batch_videos_into_modules(std::slice::from_ref(&v), 8, 200).unwrap();
        let lesson = &modules[0].lessons[0];

        assert_eq!(lesson.description.chars().count(), 203);
        assert!(lesson.description.ends_with("..."));
        assert_eq!(lesson.content.len(), 250);
        assert_eq!(lesson.video_url, "https://www.youtube.com/watch?v=vid007");
        assert_eq!(lesson.resources[0].url, lesson.video_url);
        assert_eq!(lesson.duration, "4:05");
    }

    #[test]
    fn test_playlist_conversion_infers_and_aggregates() {
        let playlist = playlist(10);

        let course = convert_playlist_to_course(
            &playlist,
            &instructor(),
            &CourseOverrides::default(),
            &ConvertOptions::default(),
        )
        .unwrap();

        assert_eq!(course.title, "Rust Programming for Beginners");
        assert_eq!(course.category, Category::Programming);
        assert_eq!(course.level, Level::Beginner);
        assert_eq!(course.price, 0.0);
        assert!(!course.published);
        assert_eq!(course.modules.len(), 2);
        assert_eq!(course.lesson_count(), 10);
        // 10 × 12:34 = 7540 秒
        assert_eq!(course.duration, "2h 5m");
        assert_eq!(course.image.as_deref(), Some("https://i.ytimg.com/pl/hq.jpg"));
        assert_eq!(course.instructor_name, "Ferris");
        assert_eq!(course.source.as_ref().unwrap().kind, "youtube_playlist");
    }

    #[test]
    fn test_course_duration_matches_resummed_lessons() {
        let mut playlist = playlist(0);
        playlist.videos = ["1:02:03", "45:10", "0:59", "bad", "3:21"]
            .iter()
            .enumerate()
            .map(|(i, d)| video(i, d))
            .collect();

        let course = convert_playlist_to_course(
            &playlist,
            &instructor(),
            &CourseOverrides::default(),
            &ConvertOptions { lessons_per_module: 2, preview_chars: 200 },
        )
        .unwrap();

        let resummed: u64 = course.lessons().map(|l| parse_clock(&l.duration)).sum();
        assert_eq!(aggregate_to_minutes(&course.duration), resummed / 60);
    }

    #[test]
    fn test_overrides_take_precedence() {
        let overrides = CourseOverrides {
            title: Some("Custom".to_string()),
            description: Some("Custom description".to_string()),
            category: Some(Category::Design),
            level: Some(Level::Advanced),
            price: Some(19.99),
            published: Some(true),
            image: Some("https://cdn.example.com/cover.png".to_string()),
        };

        let course = convert_video_to_course(
            &video(1, "9:00"),
            &instructor(),
            &overrides,
            &ConvertOptions::default(),
        )
        .unwrap();

        assert_eq!(course.title, "Custom");
        assert_eq!(course.description, "Custom description");
        assert_eq!(course.category, Category::Design);
        assert_eq!(course.level, Level::Advanced);
        assert_eq!(course.price, 19.99);
        assert!(course.published);
        assert_eq!(course.image.as_deref(), Some("https://cdn.example.com/cover.png"));
    }

    #[test]
    fn test_single_video_course() {
        let course = convert_video_to_course(
            &video(3, "1:05:00"),
            &instructor(),
            &CourseOverrides::default(),
            &ConvertOptions::default(),
        )
        .unwrap();

        assert_eq!(course.modules.len(), 1);
        assert_eq!(course.modules[0].lessons.len(), 1);
        assert_eq!(course.modules[0].lessons[0].id, "vid003");
        assert_eq!(course.duration, "1h 5m");
        assert_eq!(course.source.as_ref().unwrap().url, "https://www.youtube.com/watch?v=vid003");
    }

    #[test]
    fn test_draft_conversion_fills_defaults() {
        let draft = CourseDraft {
            title: "Organic Chemistry Basics".to_string(),
            category: Some("cooking".to_string()),
            ..Default::default()
        };

        let course = convert_draft_to_course(draft, &instructor()).unwrap();

        assert_eq!(course.category, Category::Science);
        assert_eq!(course.level, Level::Beginner);
        assert_eq!(course.duration, "0m");
        assert_eq!(course.instructor_id, "inst-1");
    }

    #[test]
    fn test_draft_without_title_is_rejected() {
        let draft = CourseDraft::default();
        assert!(convert_draft_to_course(draft, &instructor()).is_err());
    }
}
