//! JournalSession - the primary public API for keeping a fantasy journal.
//!
//! The session owns the hero's profile, the journal entries and the
//! generated chapters, and is the only path that changes them. Each
//! submission runs generate then illustrate, rolls back the entry if
//! generation fails, and persists the result after every change.

use crate::chronicler::{ChronicleError, Chronicler};
use crate::config::JournalConfig;
use crate::illustrator::Illustrator;
use crate::journal::{CharacterProfile, JournalEntry, Realm, StoryChapter};
use crate::persist::{self, BlobStore, FileStore, PersistError};
use gemini::Gemini;
use std::sync::Arc;
use thiserror::Error;

/// Shown when saving to the store fails.
pub const SAVE_WARNING: &str = "Your progress could not be saved to the grand library.";

/// Shown when the saved journal can't be loaded.
pub const LOAD_WARNING: &str =
    "Could not load your saved adventure. The ancient scrolls may be corrupted.";

/// Errors from JournalSession operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No hero has been created yet.")]
    NoProfile,

    #[error("Your hero needs a name.")]
    EmptyName,

    #[error("Write something in your journal first.")]
    EmptyEntry,

    /// Generation failed and the entry was rolled back.
    ///
    /// `persist_warning` is set when the store could not be brought back in
    /// line with memory, so it may still hold the rolled-back entry.
    #[error("{source}")]
    Chronicle {
        #[source]
        source: ChronicleError,
        persist_warning: Option<PersistError>,
    },
}

impl SessionError {
    /// The persistence failure reported alongside this error, if any.
    pub fn persist_warning(&self) -> Option<&PersistError> {
        match self {
            Self::Chronicle {
                persist_warning, ..
            } => persist_warning.as_ref(),
            _ => None,
        }
    }
}

impl From<ChronicleError> for SessionError {
    fn from(source: ChronicleError) -> Self {
        Self::Chronicle {
            source,
            persist_warning: None,
        }
    }
}

/// A successful submission.
#[derive(Debug)]
pub struct Submission {
    /// The chapter that was added.
    pub chapter: StoryChapter,

    /// Set when the chapter was kept in memory but could not be saved.
    pub persist_warning: Option<PersistError>,
}

/// A fantasy journal.
pub struct JournalSession {
    chronicler: Chronicler,
    illustrator: Illustrator,
    store: Arc<dyn BlobStore>,
    profile: Option<CharacterProfile>,
    entries: Vec<JournalEntry>,
    chapters: Vec<StoryChapter>,
}

impl JournalSession {
    /// Create an empty session from its parts.
    pub fn new(
        chronicler: Chronicler,
        illustrator: Illustrator,
        store: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            chronicler,
            illustrator,
            store,
            profile: None,
            entries: Vec::new(),
            chapters: Vec::new(),
        }
    }

    /// Create an empty session backed by Gemini, Unsplash and a file store.
    ///
    /// Missing credentials are not an error: without a Gemini key every
    /// submission fails with a configuration error, and without an Unsplash
    /// key chapters get fallback images.
    pub fn from_config(config: &JournalConfig) -> Self {
        let chronicler = match &config.gemini_api_key {
            Some(key) => {
                let mut client = Gemini::new(key.clone());
                if let Some(model) = &config.model {
                    client = client.with_model(model.clone());
                }
                Chronicler::new(Arc::new(client))
            }
            None => {
                tracing::warn!(
                    "{} is not set. Story generation will not work.",
                    gemini::API_KEY_VAR
                );
                Chronicler::unconfigured()
            }
        };

        let illustrator = Illustrator::new(config.unsplash_access_key.clone());
        let data_dir = config.resolved_data_dir();
        tracing::info!(data_dir = %data_dir.display(), "using journal store");

        Self::new(chronicler, illustrator, Arc::new(FileStore::new(data_dir)))
    }

    /// Load the saved journal into this session.
    ///
    /// On failure the session is left empty and the error is returned as a
    /// warning.
    pub async fn restore(&mut self) -> Option<PersistError> {
        match persist::load_journal(self.store.as_ref()).await {
            Ok(saved) => {
                tracing::info!(
                    has_profile = saved.profile.is_some(),
                    entries = saved.entries.len(),
                    chapters = saved.chapters.len(),
                    "restored journal"
                );
                self.profile = saved.profile;
                self.entries = saved.entries;
                self.chapters = saved.chapters;
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load journal");
                self.profile = None;
                self.entries.clear();
                self.chapters.clear();
                Some(e)
            }
        }
    }

    /// Create the hero and start a fresh chronicle.
    ///
    /// Any earlier entries and chapters are discarded. The returned option
    /// carries a persistence warning, if saving failed.
    pub async fn begin(
        &mut self,
        name: &str,
        setting: Realm,
    ) -> Result<Option<PersistError>, SessionError> {
        let profile = CharacterProfile::new(name, setting).ok_or(SessionError::EmptyName)?;
        tracing::info!(hero = %profile.name, realm = %profile.setting, "beginning adventure");

        self.profile = Some(profile);
        self.entries.clear();
        self.chapters.clear();

        Ok(self.save().await)
    }

    /// Turn a journal entry into the next chapter.
    ///
    /// The entry text is trimmed before it is stored.
    /// If generation fails the entry is removed again, so entries and
    /// chapters stay paired, and the error is returned.
    pub async fn submit_entry(&mut self, text: &str) -> Result<Submission, SessionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyEntry);
        }
        let profile = self.profile.clone().ok_or(SessionError::NoProfile)?;

        let entry = JournalEntry::new(text);
        let entry_id = entry.id.clone();
        self.entries.push(entry);
        let mut persist_warning = self.save().await;

        let draft = match self.chronicler.generate(&profile, &self.chapters, text).await {
            Ok(draft) => draft,
            Err(source) => {
                self.entries.pop();
                // Every save writes the full journal, so only the rollback
                // save decides whether the store still holds the entry.
                return Err(SessionError::Chronicle {
                    source,
                    persist_warning: self.save().await,
                });
            }
        };

        let image_url = self
            .illustrator
            .resolve(&draft.image_prompt, &profile.name, profile.setting.name())
            .await;

        let chapter = StoryChapter::new(entry_id, draft.chapter_title, draft.story, image_url);
        tracing::info!(id = %chapter.id, title = %chapter.chapter_title, "chapter added");
        self.chapters.push(chapter.clone());

        if let Some(e) = self.save().await {
            persist_warning = Some(e);
        }

        Ok(Submission {
            chapter,
            persist_warning,
        })
    }

    /// Forget the hero and the whole chronicle, in memory and in the store.
    pub async fn reset(&mut self) -> Option<PersistError> {
        tracing::info!("resetting journal");
        self.profile = None;
        self.entries.clear();
        self.chapters.clear();

        persist::clear_all(self.store.as_ref())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to clear saved journal");
                e
            })
            .err()
    }

    /// Get the hero's profile, if one has been created.
    pub fn profile(&self) -> Option<&CharacterProfile> {
        self.profile.as_ref()
    }

    /// Journal entries, oldest first.
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Chapters, oldest first.
    pub fn chapters(&self) -> &[StoryChapter] {
        &self.chapters
    }

    /// Chapters in feed order, newest first.
    pub fn feed(&self) -> impl Iterator<Item = &StoryChapter> {
        self.chapters.iter().rev()
    }

    /// Whether chapters can be generated at all.
    pub fn can_generate(&self) -> bool {
        self.chronicler.is_configured()
    }

    /// Whether chapter images come from Unsplash search.
    pub fn has_image_search(&self) -> bool {
        self.illustrator.has_access_key()
    }

    async fn save(&self) -> Option<PersistError> {
        persist::save_journal(
            self.store.as_ref(),
            self.profile.as_ref(),
            &self.entries,
            &self.chapters,
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to save journal");
            e
        })
        .err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingStore, MockBackend, TestHarness};

    const REPLY: &str = "Title: The Hidden Key\nKaelen found a strange key glinting in the moss.\n[Image: a rusty key on mossy stone]";

    #[tokio::test]
    async fn test_submit_requires_profile() {
        let mut harness = TestHarness::new(vec![Ok(REPLY.to_string())]);
        let err = harness
            .session
            .submit_entry("I found a strange key.")
            .await
            .expect_err("no profile yet");
        assert!(matches!(err, SessionError::NoProfile));
        assert!(harness.session.entries().is_empty());
    }

    #[tokio::test]
    async fn test_blank_entry_is_rejected_without_calling_backend() {
        let mut harness = TestHarness::new(vec![]);
        harness
            .session
            .begin("Kaelen", Realm::DragonsToothMountains)
            .await
            .unwrap();

        let err = harness.session.submit_entry("   \n").await.unwrap_err();
        assert!(matches!(err, SessionError::EmptyEntry));
        assert!(harness.backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_begin_rejects_blank_name() {
        let mut harness = TestHarness::new(vec![]);
        let err = harness.session.begin("  ", Realm::default()).await.unwrap_err();
        assert!(matches!(err, SessionError::EmptyName));
        assert!(harness.session.profile().is_none());
    }

    #[tokio::test]
    async fn test_submit_adds_paired_chapter() {
        let mut harness = TestHarness::new(vec![Ok(REPLY.to_string())]);
        harness
            .session
            .begin("Kaelen", Realm::DragonsToothMountains)
            .await
            .unwrap();

        let submission = harness
            .session
            .submit_entry("I found a strange key.")
            .await
            .expect("submission should succeed");

        assert!(submission.persist_warning.is_none());
        let entries = harness.session.entries();
        let chapters = harness.session.chapters();
        assert_eq!(entries.len(), 1);
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].journal_entry_id, entries[0].id);
        assert_eq!(chapters[0].chapter_title, "The Hidden Key");
    }

    #[tokio::test]
    async fn test_failed_generation_rolls_back_entry() {
        let mut harness = TestHarness::new(vec![Err(gemini::Error::Network("down".into()))]);
        harness
            .session
            .begin("Kaelen", Realm::default())
            .await
            .unwrap();

        let err = harness.session.submit_entry("A quiet day.").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            crate::chronicler::GENERATION_FAILED
        );
        assert!(harness.session.entries().is_empty());
        assert!(harness.session.chapters().is_empty());

        let (reopened, _) = harness.reopen().await;
        assert!(reopened.entries().is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_session_reports_missing_key() {
        let mut session = JournalSession::new(
            Chronicler::unconfigured(),
            Illustrator::new(None),
            Arc::new(crate::persist::MemoryStore::new()),
        );
        assert!(!session.can_generate());
        session.begin("Kaelen", Realm::default()).await.unwrap();

        let err = session.submit_entry("Hello").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot generate story: Gemini API key is missing."
        );
        assert!(session.entries().is_empty());
    }

    #[tokio::test]
    async fn test_failing_store_warns_but_keeps_chapter() {
        let backend = Arc::new(MockBackend::new(vec![Ok(REPLY.to_string())]));
        let mut session = JournalSession::new(
            Chronicler::new(backend),
            Illustrator::new(None),
            Arc::new(FailingStore),
        );

        let warning = session.begin("Kaelen", Realm::default()).await.unwrap();
        assert!(warning.is_some());

        let submission = session.submit_entry("Hello").await.unwrap();
        assert!(submission.persist_warning.is_some());
        assert_eq!(session.chapters().len(), 1);
    }

    #[tokio::test]
    async fn test_restore_failure_leaves_session_empty() {
        let mut session = JournalSession::new(
            Chronicler::unconfigured(),
            Illustrator::new(None),
            Arc::new(FailingStore),
        );
        let warning = session.restore().await;
        assert!(warning.is_some());
        assert!(session.profile().is_none());
    }

    #[tokio::test]
    async fn test_feed_is_newest_first() {
        let mut harness = TestHarness::new(vec![
            Ok("Title: One\nFirst.".to_string()),
            Ok("Title: Two\nSecond.".to_string()),
        ]);
        harness
            .session
            .begin("Kaelen", Realm::default())
            .await
            .unwrap();
        harness.session.submit_entry("first").await.unwrap();
        harness.session.submit_entry("second").await.unwrap();

        let titles: Vec<_> = harness
            .session
            .feed()
            .map(|c| c.chapter_title.as_str())
            .collect();
        assert_eq!(titles, vec!["Two", "One"]);
    }
}
