//! Testing utilities for the journal.
//!
//! - `MockBackend` returns scripted replies in place of Gemini
//! - `FailingStore` rejects every read and write
//! - `FlakyStore` accepts a fixed number of writes, then rejects them
//! - `TestHarness` wires a session to both without touching the network

use crate::chronicler::{Chronicler, SamplingConfig, TextBackend};
use crate::illustrator::Illustrator;
use crate::persist::{BlobStore, MemoryStore, PersistError};
use crate::session::JournalSession;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A text backend that replies from a script.
///
/// Each call pops the next scripted result. Once the script runs out every
/// call fails with a configuration error.
#[derive(Debug, Default)]
pub struct MockBackend {
    responses: Mutex<VecDeque<Result<String, gemini::Error>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

/// Arguments of one call made to a [`MockBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub system_instruction: String,
    pub prompt: String,
    pub sampling: SamplingConfig,
}

impl MockBackend {
    pub fn new(responses: Vec<Result<String, gemini::Error>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A backend that always answers with the same well-formed chapter.
    pub fn with_chapter(title: &str, story: &str, image_prompt: &str) -> Self {
        Self::new(vec![Ok(format!(
            "Title: {title}\n{story}\n[Image: {image_prompt}]"
        ))])
    }

    /// Queue another reply.
    pub fn push(&self, response: Result<String, gemini::Error>) {
        self.responses
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push_back(response);
    }

    /// Every call made so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

#[async_trait]
impl TextBackend for MockBackend {
    async fn generate_text(
        &self,
        system_instruction: &str,
        prompt: &str,
        sampling: &SamplingConfig,
    ) -> Result<String, gemini::Error> {
        self.calls
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(RecordedCall {
                system_instruction: system_instruction.to_string(),
                prompt: prompt.to_string(),
                sampling: *sampling,
            });

        self.responses
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .pop_front()
            .unwrap_or_else(|| Err(gemini::Error::Config("no more scripted responses".into())))
    }
}

/// A store where every operation fails.
#[derive(Debug, Default)]
pub struct FailingStore;

#[async_trait]
impl BlobStore for FailingStore {
    async fn read(&self, key: &str) -> Result<Option<String>, PersistError> {
        Err(PersistError::Unavailable(format!("cannot read {key}")))
    }

    async fn write(&self, key: &str, _value: &str) -> Result<(), PersistError> {
        Err(PersistError::Unavailable(format!("cannot write {key}")))
    }

    async fn remove(&self, key: &str) -> Result<(), PersistError> {
        Err(PersistError::Unavailable(format!("cannot remove {key}")))
    }
}

/// An in-memory store whose writes start failing after a budget runs out.
///
/// Reads and removes always succeed.
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    writes_left: AtomicUsize,
}

impl FlakyStore {
    pub fn failing_after(writes: usize) -> Self {
        Self {
            inner: MemoryStore::new(),
            writes_left: AtomicUsize::new(writes),
        }
    }
}

#[async_trait]
impl BlobStore for FlakyStore {
    async fn read(&self, key: &str) -> Result<Option<String>, PersistError> {
        self.inner.read(key).await
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), PersistError> {
        let allowed = self
            .writes_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if !allowed {
            return Err(PersistError::Unavailable(format!("cannot write {key}")));
        }
        self.inner.write(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), PersistError> {
        self.inner.remove(key).await
    }
}

/// A session wired to a scripted backend and an in-memory store.
///
/// Images always resolve to fallback URLs since no access key is set.
pub struct TestHarness {
    pub session: JournalSession,
    pub backend: Arc<MockBackend>,
    pub store: Arc<MemoryStore>,
}

impl TestHarness {
    pub fn new(responses: Vec<Result<String, gemini::Error>>) -> Self {
        let backend = Arc::new(MockBackend::new(responses));
        let store = Arc::new(MemoryStore::new());
        let session = JournalSession::new(
            Chronicler::new(backend.clone()),
            Illustrator::new(None),
            store.clone(),
        );

        Self {
            session,
            backend,
            store,
        }
    }

    /// Open a fresh session over the same store, as a restart would.
    pub async fn reopen(&self) -> (JournalSession, Option<PersistError>) {
        let mut session = JournalSession::new(
            Chronicler::new(self.backend.clone()),
            Illustrator::new(None),
            self.store.clone(),
        );
        let warning = session.restore().await;
        (session, warning)
    }
}
