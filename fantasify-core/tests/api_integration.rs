//! Integration tests that call the real Gemini and Unsplash APIs.
//!
//! These tests require GEMINI_API_KEY (and optionally UNSPLASH_ACCESS_KEY)
//! to be set via .env file or environment.
//! Run with: `cargo test -p fantasify-core --test api_integration -- --ignored`

use fantasify_core::{JournalConfig, JournalSession, MemoryStore, Realm};
use fantasify_core::{Chronicler, Illustrator};
use gemini::Gemini;
use std::sync::Arc;

fn setup() {
    let _ = dotenvy::dotenv();
}

fn has_api_key() -> bool {
    std::env::var("GEMINI_API_KEY").is_ok()
}

#[tokio::test]
#[ignore] // Run with: cargo test -p fantasify-core --test api_integration -- --ignored
async fn test_real_chapter_generation() {
    setup();
    if !has_api_key() {
        eprintln!("Skipping test: GEMINI_API_KEY not set");
        return;
    }

    let config = JournalConfig::from_env();
    let client = Gemini::from_env().expect("Failed to create Gemini client");
    let mut session = JournalSession::new(
        Chronicler::new(Arc::new(client)),
        Illustrator::new(config.unsplash_access_key.clone()),
        Arc::new(MemoryStore::new()),
    );

    session
        .begin("Kaelen", Realm::DragonsToothMountains)
        .await
        .expect("setup should succeed");
    let submission = session
        .submit_entry("I found a strange key under a rock on my walk today.")
        .await
        .expect("Gemini should respond");

    println!("Title: {}", submission.chapter.chapter_title);
    println!("Image: {}", submission.chapter.image_url);
    println!("{}", submission.chapter.story);

    assert!(!submission.chapter.chapter_title.is_empty());
    assert!(!submission.chapter.story.is_empty());
    assert!(submission.chapter.image_url.starts_with("https://"));
}
