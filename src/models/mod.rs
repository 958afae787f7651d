pub mod course;
pub mod loaders;
pub mod video;

pub use course::{
    Category, Course, CourseOverrides, CourseRecord, CourseSource, Instructor, Lesson, Level, Module,
    Resource,
};
pub use loaders::{load_course_drafts, load_url_list, CourseDraft, DraftBatch};
pub use video::{VideoRecord, YouTubePlaylist};
