//! QA tests for the journal flow: setup, submissions, rollback, reset and
//! restoring from the store.

use fantasify_core::chronicler::{FIRST_CHAPTER_CONTEXT, GENERATION_FAILED};
use fantasify_core::persist::{CHAPTERS_KEY, JOURNAL_KEY, PROFILE_KEY};
use fantasify_core::{
    Chronicler, FileStore, FlakyStore, Illustrator, JournalSession, MockBackend, Realm,
    SessionError, TestHarness,
};
use std::sync::Arc;
use tempfile::TempDir;

fn chapter_reply(title: &str, story: &str, image: &str) -> Result<String, gemini::Error> {
    Ok(format!("Title: {title}\n{story}\n[Image: {image}]"))
}

#[tokio::test]
async fn test_kaelen_first_chapter() {
    let mut harness = TestHarness::new(vec![chapter_reply(
        "The Hidden Key",
        "Kaelen found a strange key glinting in the moss.",
        "a rusty key on mossy stone",
    )]);

    harness
        .session
        .begin("Kaelen", Realm::DragonsToothMountains)
        .await
        .expect("setup should succeed");

    let submission = harness
        .session
        .submit_entry("I found a strange key.")
        .await
        .expect("submission should succeed");

    let chapter = &submission.chapter;
    assert_eq!(chapter.chapter_title, "The Hidden Key");
    assert_eq!(chapter.story, "Kaelen found a strange key glinting in the moss.");
    assert!(chapter.image_url.starts_with(
        "https://source.unsplash.com/1024x768/?fantasy,Dragons,Tooth,Mountains,Kaelen,a,rusty,key,on,mossy,stone&t="
    ));
    assert_eq!(chapter.journal_entry_id, harness.session.entries()[0].id);

    let calls = harness.backend.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].prompt.contains("Character Name: Kaelen"));
    assert!(calls[0].prompt.contains("Setting: The Dragon's Tooth Mountains"));
    assert!(calls[0].prompt.contains(FIRST_CHAPTER_CONTEXT));
    assert!(calls[0].prompt.contains("I found a strange key."));
}

#[tokio::test]
async fn test_later_chapters_carry_story_context() {
    let mut harness = TestHarness::new(vec![
        chapter_reply("The Hidden Key", "Kaelen found a key.", "a key"),
        chapter_reply("The Locked Door", "The key fit a door.", "a door"),
    ]);
    harness
        .session
        .begin("Kaelen", Realm::default())
        .await
        .unwrap();

    harness.session.submit_entry("I found a key.").await.unwrap();
    harness.session.submit_entry("I found a door.").await.unwrap();

    let calls = harness.backend.calls();
    assert_eq!(calls.len(), 2);
    assert!(!calls[1].prompt.contains(FIRST_CHAPTER_CONTEXT));
    assert!(calls[1]
        .prompt
        .contains("Chapter: The Hidden Key\nKaelen found a key."));
}

#[tokio::test]
async fn test_only_last_five_chapters_in_prompt() {
    let responses = (1..=7)
        .map(|n| chapter_reply(&format!("Part {n}"), &format!("Body {n}."), "sky"))
        .collect();
    let mut harness = TestHarness::new(responses);
    harness
        .session
        .begin("Kaelen", Realm::default())
        .await
        .unwrap();

    for n in 1..=7 {
        harness
            .session
            .submit_entry(&format!("Entry {n}"))
            .await
            .unwrap();
    }

    let calls = harness.backend.calls();
    let last_prompt = &calls[6].prompt;
    assert!(!last_prompt.contains("Chapter: Part 1\n"));
    for n in 2..=6 {
        assert!(last_prompt.contains(&format!("Chapter: Part {n}\nBody {n}.")));
    }
}

#[tokio::test]
async fn test_generation_failure_keeps_entries_and_chapters_paired() {
    let mut harness = TestHarness::new(vec![
        chapter_reply("One", "First.", "a"),
        Err(gemini::Error::Api {
            status: 503,
            message: "overloaded".to_string(),
        }),
    ]);
    harness
        .session
        .begin("Kaelen", Realm::default())
        .await
        .unwrap();

    harness.session.submit_entry("first").await.unwrap();
    let err = harness.session.submit_entry("second").await.unwrap_err();

    assert!(matches!(err, SessionError::Chronicle { .. }));
    assert!(err.persist_warning().is_none());
    assert_eq!(err.to_string(), GENERATION_FAILED);
    assert_eq!(harness.session.entries().len(), 1);
    assert_eq!(harness.session.chapters().len(), 1);
    assert_eq!(harness.session.entries()[0].text, "first");

    let (reopened, warning) = harness.reopen().await;
    assert!(warning.is_none());
    assert_eq!(reopened.entries().len(), 1);
    assert_eq!(reopened.chapters().len(), 1);
}

#[tokio::test]
async fn test_failed_rollback_save_is_reported_with_generation_error() {
    // begin writes 3 blobs and the entry save 3 more; the rollback save fails
    let store = Arc::new(FlakyStore::failing_after(6));
    let backend = Arc::new(MockBackend::new(vec![Err(gemini::Error::Network(
        "connection reset".into(),
    ))]));
    let mut session = JournalSession::new(
        Chronicler::new(backend.clone()),
        Illustrator::new(None),
        store.clone(),
    );

    let warning = session.begin("Kaelen", Realm::default()).await.unwrap();
    assert!(warning.is_none());

    let err = session.submit_entry("A quiet day.").await.unwrap_err();
    assert_eq!(err.to_string(), GENERATION_FAILED);
    assert!(err.persist_warning().is_some());
    assert!(session.entries().is_empty());

    // The store still holds the rolled-back entry, which is what the warning is about
    let mut reopened = JournalSession::new(
        Chronicler::new(backend),
        Illustrator::new(None),
        store,
    );
    assert!(reopened.restore().await.is_none());
    assert_eq!(reopened.entries().len(), 1);
    assert!(reopened.chapters().is_empty());
}

#[tokio::test]
async fn test_back_to_back_submissions_get_distinct_ids() {
    let mut harness = TestHarness::new(vec![
        chapter_reply("One", "First.", "a"),
        chapter_reply("Two", "Second.", "b"),
        chapter_reply("Three", "Third.", "c"),
    ]);
    harness
        .session
        .begin("Kaelen", Realm::default())
        .await
        .unwrap();

    for text in ["first", "second", "third"] {
        harness.session.submit_entry(text).await.unwrap();
    }

    let entries = harness.session.entries();
    let chapters = harness.session.chapters();
    let mut ids: Vec<&str> = entries
        .iter()
        .map(|e| e.id.as_str())
        .chain(chapters.iter().map(|c| c.id.as_str()))
        .collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 6);

    for (entry, chapter) in entries.iter().zip(chapters) {
        assert_eq!(chapter.journal_entry_id, entry.id);
    }
}

#[tokio::test]
async fn test_setup_clears_previous_history() {
    let mut harness = TestHarness::new(vec![chapter_reply("One", "First.", "a")]);
    harness
        .session
        .begin("Kaelen", Realm::default())
        .await
        .unwrap();
    harness.session.submit_entry("first").await.unwrap();

    harness
        .session
        .begin("Mira", Realm::CelestialIslesOfAethelgard)
        .await
        .unwrap();
    assert!(harness.session.entries().is_empty());
    assert!(harness.session.chapters().is_empty());

    let (reopened, _) = harness.reopen().await;
    assert_eq!(reopened.profile().map(|p| p.name.as_str()), Some("Mira"));
    assert!(reopened.chapters().is_empty());
    assert!(reopened.entries().is_empty());
}

#[tokio::test]
async fn test_reset_removes_all_blobs() {
    let mut harness = TestHarness::new(vec![chapter_reply("One", "First.", "a")]);
    harness
        .session
        .begin("Kaelen", Realm::default())
        .await
        .unwrap();
    harness.session.submit_entry("first").await.unwrap();
    assert!(harness.store.contains(PROFILE_KEY));

    let warning = harness.session.reset().await;
    assert!(warning.is_none());
    assert!(harness.session.profile().is_none());
    assert!(!harness.store.contains(PROFILE_KEY));
    assert!(!harness.store.contains(CHAPTERS_KEY));
    assert!(!harness.store.contains(JOURNAL_KEY));
}

#[tokio::test]
async fn test_file_store_round_trip_across_sessions() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let backend = Arc::new(MockBackend::new(vec![chapter_reply(
        "The Hidden Key",
        "Kaelen found a key.",
        "a key",
    )]));

    let mut session = JournalSession::new(
        Chronicler::new(backend.clone()),
        Illustrator::new(None),
        Arc::new(FileStore::new(temp_dir.path())),
    );
    session
        .begin("Kaelen", Realm::SunkenCityOfAeridor)
        .await
        .unwrap();
    session.submit_entry("I found a key.").await.unwrap();

    let mut restored = JournalSession::new(
        Chronicler::new(backend),
        Illustrator::new(None),
        Arc::new(FileStore::new(temp_dir.path())),
    );
    assert!(restored.restore().await.is_none());

    assert_eq!(restored.profile(), session.profile());
    assert_eq!(restored.entries(), session.entries());
    assert_eq!(restored.chapters(), session.chapters());
}

#[tokio::test]
async fn test_corrupt_store_restores_empty_with_warning() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(temp_dir.path().join("fantasify-profile.json"), "not json").unwrap();

    let mut session = JournalSession::new(
        Chronicler::unconfigured(),
        Illustrator::new(None),
        Arc::new(FileStore::new(temp_dir.path())),
    );
    let warning = session.restore().await;

    assert!(warning.is_some());
    assert!(session.profile().is_none());
    assert!(session.chapters().is_empty());
}
