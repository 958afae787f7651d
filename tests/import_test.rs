mod common;

use common::{playlist, video, FakeFetcher, MemoryStore};
use course_catalog::models::{Category, CourseOverrides, Instructor, Level};
use course_catalog::orchestrator::{bulk_import_from_youtube, import_courses_from_json};
use course_catalog::services::ConvertOptions;
use course_catalog::workflow::{ImportCtx, ImportFlow};
use std::io::Write;
use tokio_test::{assert_err, assert_ok};

fn instructor() -> Instructor {
    Instructor::new("inst-1", "Ada Lovelace")
}

#[tokio::test]
async fn test_import_playlist_creates_course() {
    let store = MemoryStore::default();
    let fetcher = FakeFetcher::default().with_playlist(playlist("PLrust", "Python Programming Basics", 20));
    let flow = ImportFlow::new(&store, &fetcher, ConvertOptions::default());

    let url = "https://www.youtube.com/playlist?list=PLrust";
    let outcome = flow
        .run(url, &instructor(), &CourseOverrides::default(), &ImportCtx::single(url))
        .await;

    assert!(outcome.success, "{}", outcome.message);
    assert_eq!(outcome.course_id.as_deref(), Some("course-1"));

    let created = store.created.lock().unwrap();
    let course = &created[0];
    assert_eq!(course.modules.len(), 3);
    assert_eq!(course.lesson_count(), 20);
    assert_eq!(course.duration, "3h 20m");
    assert_eq!(course.category, Category::Programming);
    assert_eq!(course.level, Level::Beginner);
    assert_eq!(course.instructor_id, "inst-1");
    assert_eq!(course.price, 0.0);
    assert!(!course.published);
}

#[tokio::test]
async fn test_import_video_with_overrides() {
    let store = MemoryStore::default();
    let fetcher = FakeFetcher::default().with_video(video("dQw4w9WgXcQ", "Intro to Calculus", "1:02:03"));
    let flow = ImportFlow::new(&store, &fetcher, ConvertOptions::default());

    let overrides = CourseOverrides {
        title: Some("My Course".to_string()),
        category: Some(Category::Design),
        price: Some(19.0),
        published: Some(true),
        ..Default::default()
    };
    let url = "https://youtu.be/dQw4w9WgXcQ";
    let outcome = flow.run(url, &instructor(), &overrides, &ImportCtx::single(url)).await;

    assert!(outcome.success);

    let created = store.created.lock().unwrap();
    let course = &created[0];
    assert_eq!(course.title, "My Course");
    assert_eq!(course.category, Category::Design);
    assert_eq!(course.price, 19.0);
    assert!(course.published);
    assert_eq!(course.modules.len(), 1);
    assert_eq!(course.duration, "1h 2m");
}

#[tokio::test]
async fn test_channel_url_is_rejected() {
    let store = MemoryStore::default();
    let fetcher = FakeFetcher::default();
    let flow = ImportFlow::new(&store, &fetcher, ConvertOptions::default());

    let url = "https://www.youtube.com/@rustlang";
    let outcome = flow
        .run(url, &instructor(), &CourseOverrides::default(), &ImportCtx::single(url))
        .await;

    assert!(!outcome.success);
    assert!(outcome.message.contains("频道"));
    assert!(outcome.course_id.is_none());
    assert!(store.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_metadata_and_bad_urls_are_failures() {
    let store = MemoryStore::default();
    let fetcher = FakeFetcher::default();
    let flow = ImportFlow::new(&store, &fetcher, ConvertOptions::default());
    let overrides = CourseOverrides::default();

    for url in [
        "https://www.youtube.com/playlist?list=PLmissing",
        "https://www.youtube.com/watch?v=missing123",
        "https://vimeo.com/1234",
        "",
    ] {
        let outcome = flow.run(url, &instructor(), &overrides, &ImportCtx::single(url)).await;
        assert!(!outcome.success, "expected failure for {:?}", url);
        assert!(!outcome.message.is_empty());
    }

    assert!(store.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_zero_lessons_per_module_is_reported() {
    let store = MemoryStore::default();
    let fetcher = FakeFetcher::default().with_playlist(playlist("PLzero", "Zero", 3));
    let options = ConvertOptions {
        lessons_per_module: 0,
        ..Default::default()
    };
    let flow = ImportFlow::new(&store, &fetcher, options);

    let url = "https://www.youtube.com/playlist?list=PLzero";
    let outcome = flow
        .run(url, &instructor(), &CourseOverrides::default(), &ImportCtx::single(url))
        .await;

    assert!(!outcome.success);
    assert!(store.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_bulk_import_isolates_failures() {
    let store = MemoryStore::default();
    let fetcher = FakeFetcher::default()
        .with_playlist(playlist("PLone", "First", 2))
        .with_playlist(playlist("PLthree", "Third", 2))
        .fail_on("PLtwo");
    let flow = ImportFlow::new(&store, &fetcher, ConvertOptions::default());

    let urls = vec![
        "https://www.youtube.com/playlist?list=PLone".to_string(),
        "https://www.youtube.com/playlist?list=PLtwo".to_string(),
        "https://www.youtube.com/playlist?list=PLthree".to_string(),
    ];
    let outcome = bulk_import_from_youtube(&flow, &urls, &instructor()).await;

    assert!(outcome.success);
    assert_eq!(outcome.imported, vec!["course-1", "course-2"]);
    assert_eq!(outcome.failed, vec![urls[1].clone()]);
    assert_eq!(store.created_titles(), vec!["First", "Third"]);
}

#[tokio::test]
async fn test_bulk_import_with_no_success_is_failure() {
    let store = MemoryStore::default();
    let fetcher = FakeFetcher::default();
    let flow = ImportFlow::new(&store, &fetcher, ConvertOptions::default());

    let urls = vec!["https://www.youtube.com/channel/UC123".to_string()];
    let outcome = bulk_import_from_youtube(&flow, &urls, &instructor()).await;

    assert!(!outcome.success);
    assert!(outcome.imported.is_empty());
    assert_eq!(outcome.failed.len(), 1);

    let empty = bulk_import_from_youtube(&flow, &[], &instructor()).await;
    assert!(!empty.success);
    assert_eq!(empty.total(), 0);
}

#[tokio::test]
async fn test_import_json_skips_bad_entries_and_isolates_creates() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
            {{ "title": "Rust for Beginners", "description": "Learn Rust programming" }},
            {{ "description": "no title here" }},
            {{ "title": 42 }},
            {{ "title": "Broken Store", "category": "Business" }},
            {{ "title": "Chemistry", "category": "science", "level": "advanced", "price": 12.5, "published": true }}
        ]"#
    )
    .unwrap();

    let store = MemoryStore::default().fail_create("Broken Store");
    let outcome = assert_ok!(import_courses_from_json(file.path(), &store, &instructor()).await);

    assert!(outcome.success);
    assert_eq!(outcome.skipped, 2);
    assert_eq!(outcome.imported.len(), 2);
    assert_eq!(outcome.failed.len(), 1);
    assert!(outcome.failed[0].contains("Broken Store"));

    let created = store.created.lock().unwrap();
    assert_eq!(created[0].category, Category::Programming);
    assert_eq!(created[0].level, Level::Beginner);
    assert_eq!(created[0].instructor_name, "Ada Lovelace");
    assert_eq!(created[1].category, Category::Science);
    assert_eq!(created[1].level, Level::Advanced);
    assert_eq!(created[1].price, 12.5);
    assert!(created[1].published);
}

#[tokio::test]
async fn test_import_json_rejects_non_array() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "title": "Not an array" }}"#).unwrap();

    let store = MemoryStore::default();
    assert_err!(import_courses_from_json(file.path(), &store, &instructor()).await);
}
