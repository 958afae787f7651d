pub mod catalog_search;
pub mod course_inference;
pub mod duplicate_resolver;
pub mod duration;
pub mod playlist_converter;
pub mod youtube_url;

pub use catalog_search::{filter_courses, sort_courses, CatalogFilter, SortOrder};
pub use course_inference::{infer_category, infer_level};
pub use duplicate_resolver::{resolve_group, scan_for_duplicates, DuplicateGroup};
pub use duration::aggregate_duration;
pub use playlist_converter::{
    batch_videos_into_modules, convert_draft_to_course, convert_playlist_to_course,
    convert_video_to_course, ConvertOptions,
};
pub use youtube_url::{classify_youtube_url, TargetKind, YouTubeTarget};
