//! Prompt construction for chapter generation.

use crate::journal::{CharacterProfile, StoryChapter};

/// Storyteller persona and the three-part output contract.
pub const SYSTEM_INSTRUCTION: &str = include_str!("prompts/storyteller.txt");

/// Context used when the hero has no chapters yet.
pub const FIRST_CHAPTER_CONTEXT: &str =
    "This is the very first chapter. The adventure is just beginning.";

/// How many of the most recent chapters are carried into the prompt.
pub const CONTEXT_CHAPTERS: usize = 5;

const CHAPTER_SEPARATOR: &str = "\n\n---\n\n";

/// Build the continuity block from prior chapters.
///
/// Only the last [`CONTEXT_CHAPTERS`] chapters are included, oldest first.
pub fn build_story_context(chapters: &[StoryChapter]) -> String {
    if chapters.is_empty() {
        return FIRST_CHAPTER_CONTEXT.to_string();
    }

    let start = chapters.len().saturating_sub(CONTEXT_CHAPTERS);
    chapters[start..]
        .iter()
        .map(|c| format!("Chapter: {}\n{}", c.chapter_title, c.story))
        .collect::<Vec<_>>()
        .join(CHAPTER_SEPARATOR)
}

/// Build the user prompt for the next chapter.
pub fn build_chapter_prompt(
    profile: &CharacterProfile,
    chapters: &[StoryChapter],
    entry_text: &str,
) -> String {
    let story_context = build_story_context(chapters);

    format!(
        r#"
Character Name: {name}
Setting: The {setting}

--- PREVIOUS STORY (Most Recent Chapters) ---
{story_context}
--- END PREVIOUS STORY ---

--- LATEST JOURNAL ENTRY (Reflect this in the story) ---
{entry_text}
--- END LATEST JOURNAL ENTRY ---

Now, write the next chapter of the story, following the required format.
"#,
        name = profile.name,
        setting = profile.setting.name(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::Realm;

    fn chapter(n: usize) -> StoryChapter {
        StoryChapter::new(
            format!("journal-{n}"),
            format!("Title {n}"),
            format!("Story body {n}"),
            "https://example.com/img.jpg",
        )
    }

    fn profile() -> CharacterProfile {
        CharacterProfile::new("Kaelen", Realm::DragonsToothMountains).unwrap()
    }

    #[test]
    fn test_empty_history_uses_first_chapter_context() {
        assert_eq!(build_story_context(&[]), FIRST_CHAPTER_CONTEXT);
    }

    #[test]
    fn test_context_keeps_only_last_five_in_order() {
        let chapters: Vec<_> = (1..=7).map(chapter).collect();
        let context = build_story_context(&chapters);

        assert!(!context.contains("Title 1\n"));
        assert!(!context.contains("Title 2\n"));

        let positions: Vec<usize> = (3..=7)
            .map(|n| {
                context
                    .find(&format!("Chapter: Title {n}\nStory body {n}"))
                    .unwrap_or_else(|| panic!("chapter {n} missing from context"))
            })
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(context.matches("\n\n---\n\n").count(), 4);
    }

    #[test]
    fn test_context_with_fewer_than_five_chapters() {
        let chapters: Vec<_> = (1..=2).map(chapter).collect();
        assert_eq!(
            build_story_context(&chapters),
            "Chapter: Title 1\nStory body 1\n\n---\n\nChapter: Title 2\nStory body 2"
        );
    }

    #[test]
    fn test_prompt_embeds_profile_context_and_entry() {
        let prompt = build_chapter_prompt(&profile(), &[], "I found a strange key.");

        assert!(prompt.contains("Character Name: Kaelen\n"));
        assert!(prompt.contains("Setting: The Dragon's Tooth Mountains\n"));
        assert!(prompt.contains(&format!(
            "--- PREVIOUS STORY (Most Recent Chapters) ---\n{FIRST_CHAPTER_CONTEXT}\n--- END PREVIOUS STORY ---"
        )));
        assert!(prompt.contains(
            "--- LATEST JOURNAL ENTRY (Reflect this in the story) ---\nI found a strange key.\n--- END LATEST JOURNAL ENTRY ---"
        ));
    }

    #[test]
    fn test_system_instruction_states_output_contract() {
        assert!(SYSTEM_INSTRUCTION.starts_with("You are 'Fantasify'"));
        assert!(SYSTEM_INSTRUCTION.contains("Title: "));
        assert!(SYSTEM_INSTRUCTION.contains("[Image: a description]"));
    }
}
