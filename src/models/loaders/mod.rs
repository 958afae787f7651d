pub mod json_loader;

pub use json_loader::{load_course_drafts, load_url_list, CourseDraft, DraftBatch};
