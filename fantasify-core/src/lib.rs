//! Fantasy journal engine.
//!
//! This crate provides:
//! - The journal data model (hero profile, entries, chapters)
//! - Chapter generation with Gemini
//! - Chapter illustration with Unsplash
//! - Blob-store persistence
//!
//! # Quick Start
//!
//! ```ignore
//! use fantasify_core::{JournalConfig, JournalSession, Realm};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = JournalConfig::from_env();
//!     let mut session = JournalSession::from_config(&config);
//!     session.restore().await;
//!
//!     session.begin("Kaelen", Realm::DragonsToothMountains).await?;
//!     let submission = session.submit_entry("I found a strange key.").await?;
//!     println!("{}\n\n{}", submission.chapter.chapter_title, submission.chapter.story);
//!     Ok(())
//! }
//! ```

pub mod chronicler;
pub mod config;
pub mod illustrator;
pub mod journal;
pub mod persist;
pub mod session;
pub mod testing;

// Re-export so callers can build backends and match on client errors
pub use gemini;

// Primary public API
pub use chronicler::{ChapterDraft, ChronicleError, Chronicler, SamplingConfig, TextBackend};
pub use config::JournalConfig;
pub use illustrator::Illustrator;
pub use journal::{CharacterProfile, JournalEntry, Realm, StoryChapter};
pub use persist::{BlobStore, FileStore, MemoryStore, PersistError};
pub use session::{JournalSession, SessionError, Submission};
pub use testing::{FailingStore, FlakyStore, MockBackend, TestHarness};
