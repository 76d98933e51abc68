//! Chapter generation.
//!
//! The [`Chronicler`] turns a journal entry into a [`ChapterDraft`]: it
//! builds the storyteller prompt, sends it to a [`TextBackend`], and parses
//! the reply. Parsing never fails; only the backend call can.

mod parse;
mod prompts;

pub use parse::{parse_chapter_response, ChapterDraft, DEFAULT_IMAGE_PROMPT, DEFAULT_TITLE};
pub use prompts::{
    build_chapter_prompt, build_story_context, CONTEXT_CHAPTERS, FIRST_CHAPTER_CONTEXT,
    SYSTEM_INSTRUCTION,
};

use crate::journal::{CharacterProfile, StoryChapter};
use async_trait::async_trait;
use gemini::{FinishReason, Gemini, Message, Request};
use std::sync::Arc;
use thiserror::Error;

/// Message shown to the user whenever the backend call fails.
pub const GENERATION_FAILED: &str =
    "Failed to conjure a new chapter. The mists of creation are cloudy.";

/// Errors from chapter generation.
#[derive(Debug, Error)]
pub enum ChronicleError {
    #[error("Cannot generate story: Gemini API key is missing.")]
    NotConfigured,

    /// The cause is kept for logs; the display text is always the same.
    #[error("{}", GENERATION_FAILED)]
    Generation(#[source] gemini::Error),
}

/// Sampling parameters sent with every chapter request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            top_p: 0.9,
            top_k: 40,
        }
    }
}

/// Something that turns a system instruction and a prompt into text.
#[async_trait]
pub trait TextBackend: Send + Sync {
    async fn generate_text(
        &self,
        system_instruction: &str,
        prompt: &str,
        sampling: &SamplingConfig,
    ) -> Result<String, gemini::Error>;
}

#[async_trait]
impl TextBackend for Gemini {
    async fn generate_text(
        &self,
        system_instruction: &str,
        prompt: &str,
        sampling: &SamplingConfig,
    ) -> Result<String, gemini::Error> {
        let request = Request::new(vec![Message::user(prompt)])
            .with_system(system_instruction)
            .with_temperature(sampling.temperature)
            .with_top_p(sampling.top_p)
            .with_top_k(sampling.top_k);

        let response = self.generate(request).await?;
        tracing::debug!(
            model = %response.model,
            prompt_tokens = response.usage.prompt_tokens,
            candidate_tokens = response.usage.candidate_tokens,
            "chapter text received"
        );
        if let Some(reason) = &response.block_reason {
            tracing::warn!(reason = %reason, "prompt was blocked, no candidates returned");
        }
        match response.finish_reason() {
            None | Some(FinishReason::Stop) => {}
            Some(reason) => tracing::warn!(?reason, "chapter text may be cut short"),
        }
        Ok(response.text())
    }
}

/// Generates chapters from journal entries.
#[derive(Clone)]
pub struct Chronicler {
    backend: Option<Arc<dyn TextBackend>>,
    sampling: SamplingConfig,
}

impl Chronicler {
    /// Create a chronicler backed by the given text generator.
    pub fn new(backend: Arc<dyn TextBackend>) -> Self {
        Self {
            backend: Some(backend),
            sampling: SamplingConfig::default(),
        }
    }

    /// A chronicler with no backend. Every generation fails with
    /// [`ChronicleError::NotConfigured`].
    pub fn unconfigured() -> Self {
        Self {
            backend: None,
            sampling: SamplingConfig::default(),
        }
    }

    pub fn with_sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    /// Write the next chapter for `entry_text`, continuing from `chapters`.
    pub async fn generate(
        &self,
        profile: &CharacterProfile,
        chapters: &[StoryChapter],
        entry_text: &str,
    ) -> Result<ChapterDraft, ChronicleError> {
        let Some(backend) = &self.backend else {
            tracing::error!("story generation requested without a Gemini API key");
            return Err(ChronicleError::NotConfigured);
        };

        let prompt = build_chapter_prompt(profile, chapters, entry_text);
        tracing::debug!(
            hero = %profile.name,
            prior_chapters = chapters.len(),
            "generating chapter"
        );

        let text = backend
            .generate_text(SYSTEM_INSTRUCTION, &prompt, &self.sampling)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "error generating story chapter");
                ChronicleError::Generation(e)
            })?;

        Ok(parse_chapter_response(&text))
    }
}
