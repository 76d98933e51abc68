//! Headless mode for the journal.
//!
//! A line-oriented interface for running without a TUI, for scripting and
//! automated testing:
//! - Lines starting with `#` are commands (status, chapters, reset, quit)
//! - Any other non-empty line is a journal entry
//! - Output lines are tagged (`[CHAPTER]`, `[ERROR]`, ...) for easy parsing

use fantasify_core::session::{LOAD_WARNING, SAVE_WARNING};
use fantasify_core::{CharacterProfile, JournalSession, Realm, StoryChapter};
use std::io::{self, BufRead, Write};

/// Default hero name when none is given and none is saved.
const DEFAULT_NAME: &str = "Adventurer";

/// What the user asked for on one line of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadlessLine<'a> {
    Empty,
    Entry(&'a str),
    Command(Command<'a>),
}

/// A `#` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Quit,
    Status,
    Chapters,
    Reset,
    Begin(&'a str),
    Help,
    Unknown(&'a str),
}

/// Classify a line of input.
pub fn parse_line(line: &str) -> HeadlessLine<'_> {
    let line = line.trim();
    if line.is_empty() {
        return HeadlessLine::Empty;
    }

    let Some(rest) = line.strip_prefix('#') else {
        return HeadlessLine::Entry(line);
    };

    let (word, arg) = match rest.split_once(char::is_whitespace) {
        Some((word, arg)) => (word, arg.trim()),
        None => (rest, ""),
    };

    let command = match word {
        "quit" | "exit" => Command::Quit,
        "status" => Command::Status,
        "chapters" => Command::Chapters,
        "reset" => Command::Reset,
        "begin" => Command::Begin(arg),
        "help" => Command::Help,
        other => Command::Unknown(other),
    };
    HeadlessLine::Command(command)
}

/// Parse a realm given by 1-based number or by name.
pub fn parse_realm(s: &str) -> Option<Realm> {
    let s = s.trim();
    if let Ok(n) = s.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| Realm::all().get(i)).copied();
    }
    Realm::from_name(s)
}

/// The hero to start a new adventure with, or `None` to resume the saved one.
fn new_hero(
    saved: Option<&CharacterProfile>,
    name: Option<String>,
    realm: Option<Realm>,
) -> Option<(String, Realm)> {
    if name.is_none() && realm.is_none() && saved.is_some() {
        return None;
    }
    let name = name
        .or_else(|| saved.map(|p| p.name.clone()))
        .unwrap_or_else(|| DEFAULT_NAME.to_string());
    let realm = realm
        .or_else(|| saved.map(|p| p.setting))
        .unwrap_or_default();
    Some((name, realm))
}

/// Run the journal in headless mode.
///
/// With `name` or `realm` a new adventure starts, replacing any saved one.
/// A flag left out keeps the saved hero's value. Otherwise the saved adventure
/// is resumed, or a default hero is created.
pub async fn run_headless(
    mut session: JournalSession,
    name: Option<String>,
    realm: Option<Realm>,
) -> io::Result<()> {
    if session.restore().await.is_some() {
        println!("[WARNING] {LOAD_WARNING}");
    }

    if let Some((name, realm)) = new_hero(session.profile(), name, realm) {
        match session.begin(&name, realm).await {
            Ok(warning) => {
                if warning.is_some() {
                    println!("[WARNING] {SAVE_WARNING}");
                }
            }
            Err(e) => println!("[ERROR] {e}"),
        }
    }

    println!("=== Fantasify Headless Mode ===");
    print_status(&session);
    if !session.can_generate() {
        println!("[WARNING] Gemini API key is missing. Story generation will not work.");
    }
    if !session.has_image_search() {
        println!("[WARNING] Unsplash access key is missing. Using basic random images.");
    }
    println!();
    print_help();
    println!();
    println!("Write your journal entries (one per line):");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        };

        match parse_line(&line) {
            HeadlessLine::Empty => continue,
            HeadlessLine::Command(Command::Quit) => {
                println!("Farewell, traveler!");
                break;
            }
            HeadlessLine::Command(Command::Status) => print_status(&session),
            HeadlessLine::Command(Command::Chapters) => {
                if session.chapters().is_empty() {
                    println!("[CHAPTERS] none yet");
                }
                for chapter in session.feed() {
                    print_chapter(chapter);
                }
            }
            HeadlessLine::Command(Command::Reset) => {
                if session.reset().await.is_some() {
                    println!("[WARNING] {SAVE_WARNING}");
                }
                println!("[RESET] The chronicle is closed. Use #begin <name> to start anew.");
            }
            HeadlessLine::Command(Command::Begin(name)) => {
                match session.begin(name, realm.unwrap_or_default()).await {
                    Ok(warning) => {
                        if warning.is_some() {
                            println!("[WARNING] {SAVE_WARNING}");
                        }
                        print_status(&session);
                    }
                    Err(e) => println!("[ERROR] {e}"),
                }
            }
            HeadlessLine::Command(Command::Help) => print_help(),
            HeadlessLine::Command(Command::Unknown(word)) => {
                println!("[ERROR] Unknown command #{word}. Type #help for help.");
            }
            HeadlessLine::Entry(text) => {
                print!("[CONJURING]");
                stdout.flush()?;

                let result = session.submit_entry(text).await;
                print!("\r            \r");
                stdout.flush()?;

                match result {
                    Ok(submission) => {
                        print_chapter(&submission.chapter);
                        if submission.persist_warning.is_some() {
                            println!("[WARNING] {SAVE_WARNING}");
                        }
                    }
                    Err(e) => {
                        println!("[ERROR] {e}");
                        if e.persist_warning().is_some() {
                            println!("[WARNING] {SAVE_WARNING}");
                        }
                    }
                }
            }
        }
        stdout.flush()?;
    }

    Ok(())
}

fn print_status(session: &JournalSession) {
    println!("[STATUS]");
    match session.profile() {
        Some(profile) => {
            println!("  Hero: {}", profile.name);
            println!("  Realm: {}", profile.setting);
        }
        None => println!("  Hero: none"),
    }
    println!("  Entries: {}", session.entries().len());
    println!("  Chapters: {}", session.chapters().len());
}

fn print_chapter(chapter: &StoryChapter) {
    println!("[CHAPTER] {}", chapter.chapter_title);
    println!("[DATE] {}", chapter.display_date());
    println!("[IMAGE] {}", chapter.image_url);
    for para in chapter.story.split("\n\n") {
        println!("{para}");
    }
    println!();
}

fn print_help() {
    println!("Commands:");
    println!("  #status        - Show the hero and chronicle size");
    println!("  #chapters      - List chapters, newest first");
    println!("  #reset         - Forget the hero and all chapters");
    println!("  #begin <name>  - Start a new adventure");
    println!("  #help          - Show this help");
    println!("  #quit          - Exit");
    println!("  (anything else is a journal entry)");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entries_and_blanks() {
        assert_eq!(parse_line("   "), HeadlessLine::Empty);
        assert_eq!(
            parse_line("  I found a strange key. "),
            HeadlessLine::Entry("I found a strange key.")
        );
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_line("#quit"), HeadlessLine::Command(Command::Quit));
        assert_eq!(parse_line("#exit"), HeadlessLine::Command(Command::Quit));
        assert_eq!(parse_line("#status"), HeadlessLine::Command(Command::Status));
        assert_eq!(
            parse_line("#chapters"),
            HeadlessLine::Command(Command::Chapters)
        );
        assert_eq!(parse_line("#reset"), HeadlessLine::Command(Command::Reset));
        assert_eq!(
            parse_line("#begin  Mira Stormborn "),
            HeadlessLine::Command(Command::Begin("Mira Stormborn"))
        );
        assert_eq!(
            parse_line("#dance"),
            HeadlessLine::Command(Command::Unknown("dance"))
        );
    }

    #[test]
    fn test_parse_realm_by_number_and_name() {
        assert_eq!(parse_realm("1"), Some(Realm::WhisperingShadowfen));
        assert_eq!(parse_realm("5"), Some(Realm::CelestialIslesOfAethelgard));
        assert_eq!(parse_realm("0"), None);
        assert_eq!(parse_realm("6"), None);
        assert_eq!(
            parse_realm("sunken city of aeridor"),
            Some(Realm::SunkenCityOfAeridor)
        );
        assert_eq!(parse_realm("Atlantis"), None);
    }

    #[test]
    fn test_new_hero_resumes_without_flags() {
        let saved = CharacterProfile::new("Kaelen", Realm::SunkenCityOfAeridor).unwrap();
        assert_eq!(new_hero(Some(&saved), None, None), None);
    }

    #[test]
    fn test_new_hero_realm_alone_keeps_saved_name() {
        let saved = CharacterProfile::new("Kaelen", Realm::SunkenCityOfAeridor).unwrap();
        assert_eq!(
            new_hero(Some(&saved), None, Some(Realm::DragonsToothMountains)),
            Some(("Kaelen".to_string(), Realm::DragonsToothMountains))
        );
        assert_eq!(
            new_hero(Some(&saved), Some("Mira".to_string()), None),
            Some(("Mira".to_string(), Realm::SunkenCityOfAeridor))
        );
    }

    #[test]
    fn test_new_hero_defaults_without_saved_profile() {
        assert_eq!(
            new_hero(None, None, None),
            Some((DEFAULT_NAME.to_string(), Realm::default()))
        );
        assert_eq!(
            new_hero(None, None, Some(Realm::CelestialIslesOfAethelgard)),
            Some((DEFAULT_NAME.to_string(), Realm::CelestialIslesOfAethelgard))
        );
    }
}
