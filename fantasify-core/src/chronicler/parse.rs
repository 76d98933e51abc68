//! Parsing of the storyteller's free-text reply.
//!
//! The model is asked for a `Title: ` line, a body, and a trailing
//! `[Image: ...]` marker, but nothing forces it to comply. Each field falls
//! back to a default on its own, so parsing never fails.

use once_cell::sync::Lazy;
use regex::Regex;

/// Title used when the reply has no `Title:` line.
pub const DEFAULT_TITLE: &str = "An Unexpected Chapter";

/// Image prompt used when the reply has no `[Image: ...]` marker.
pub const DEFAULT_IMAGE_PROMPT: &str = "A fantasy landscape, epic, detailed.";

static TITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Title: (.*)").expect("valid regex"));
static IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[Image: (.*?)\]").expect("valid regex"));

/// The three parts of a generated chapter, before illustration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterDraft {
    pub chapter_title: String,
    pub story: String,
    pub image_prompt: String,
}

/// Split a raw reply into title, story body and image prompt.
pub fn parse_chapter_response(response: &str) -> ChapterDraft {
    let title_match = TITLE_RE.captures(response);
    let image_match = IMAGE_RE.captures(response);

    let chapter_title = title_match
        .as_ref()
        .map(|c| c[1].trim().to_string())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let image_prompt = image_match
        .as_ref()
        .map(|c| c[1].trim().to_string())
        .unwrap_or_else(|| DEFAULT_IMAGE_PROMPT.to_string());

    let mut story = response.to_string();
    if let Some(m) = title_match.as_ref().and_then(|c| c.get(0)) {
        story = story.replacen(m.as_str(), "", 1);
    }
    if let Some(m) = image_match.as_ref().and_then(|c| c.get(0)) {
        story = story.replacen(m.as_str(), "", 1);
    }

    ChapterDraft {
        chapter_title,
        story: story.trim().to_string(),
        image_prompt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_all_three_parts() {
        let draft = parse_chapter_response(
            "Title: The Hidden Key\nKaelen found a strange key glinting in the moss.\n[Image: a rusty key on mossy stone]",
        );

        assert_eq!(draft.chapter_title, "The Hidden Key");
        assert_eq!(draft.story, "Kaelen found a strange key glinting in the moss.");
        assert_eq!(draft.image_prompt, "a rusty key on mossy stone");
    }

    #[test]
    fn test_missing_title_defaults_and_keeps_body() {
        let draft = parse_chapter_response(
            "The wind howled across the fen.\nA lantern flickered.\n[Image: a lantern in fog]",
        );

        assert_eq!(draft.chapter_title, DEFAULT_TITLE);
        assert_eq!(draft.story, "The wind howled across the fen.\nA lantern flickered.");
        assert_eq!(draft.image_prompt, "a lantern in fog");
    }

    #[test]
    fn test_missing_image_defaults() {
        let draft = parse_chapter_response("Title: Quiet Day\nNothing stirred.");

        assert_eq!(draft.chapter_title, "Quiet Day");
        assert_eq!(draft.story, "Nothing stirred.");
        assert_eq!(draft.image_prompt, DEFAULT_IMAGE_PROMPT);
    }

    #[test]
    fn test_empty_response_uses_all_defaults() {
        let draft = parse_chapter_response("");

        assert_eq!(draft.chapter_title, DEFAULT_TITLE);
        assert_eq!(draft.story, "");
        assert_eq!(draft.image_prompt, DEFAULT_IMAGE_PROMPT);
    }

    #[test]
    fn test_title_and_image_are_trimmed() {
        let draft = parse_chapter_response("Title:   Spaced Out   \nBody\n[Image:   wide sky  ]");

        assert_eq!(draft.chapter_title, "Spaced Out");
        assert_eq!(draft.image_prompt, "wide sky");
        assert_eq!(draft.story, "Body");
    }

    #[test]
    fn test_only_first_markers_are_used() {
        let draft = parse_chapter_response(
            "Title: First\nBody one.\nTitle: Second\n[Image: one] and [Image: two]",
        );

        assert_eq!(draft.chapter_title, "First");
        assert_eq!(draft.image_prompt, "one");
        assert!(draft.story.contains("Title: Second"));
        assert!(draft.story.contains("[Image: two]"));
        assert!(!draft.story.contains("[Image: one]"));
    }

    #[test]
    fn test_image_marker_does_not_span_lines() {
        let draft = parse_chapter_response("Title: T\nBody [Image: broken\nmarker]");

        assert_eq!(draft.image_prompt, DEFAULT_IMAGE_PROMPT);
        assert_eq!(draft.story, "Body [Image: broken\nmarker]");
    }

    #[test]
    fn test_title_line_in_middle_is_removed() {
        let draft = parse_chapter_response("Preamble.\nTitle: Middle\nAfterword.");

        assert_eq!(draft.chapter_title, "Middle");
        assert_eq!(draft.story, "Preamble.\n\nAfterword.");
    }
}
