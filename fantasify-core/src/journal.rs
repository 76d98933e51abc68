//! Journal data model: the hero's profile, raw diary entries, and the
//! chapters generated from them.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

/// The realms a hero can adventure in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Realm {
    #[default]
    WhisperingShadowfen,
    DragonsToothMountains,
    SunkenCityOfAeridor,
    ClockworkMetropolisOfCogsworth,
    CelestialIslesOfAethelgard,
}

impl Realm {
    /// All realms, in the order the setup screen lists them.
    pub fn all() -> &'static [Realm] {
        &[
            Realm::WhisperingShadowfen,
            Realm::DragonsToothMountains,
            Realm::SunkenCityOfAeridor,
            Realm::ClockworkMetropolisOfCogsworth,
            Realm::CelestialIslesOfAethelgard,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Realm::WhisperingShadowfen => "Whispering Shadowfen",
            Realm::DragonsToothMountains => "Dragon's Tooth Mountains",
            Realm::SunkenCityOfAeridor => "Sunken City of Aeridor",
            Realm::ClockworkMetropolisOfCogsworth => "Clockwork Metropolis of Cogsworth",
            Realm::CelestialIslesOfAethelgard => "Celestial Isles of Aethelgard",
        }
    }

    /// Look up a realm by its display name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Realm> {
        let name = name.trim();
        Realm::all()
            .iter()
            .copied()
            .find(|r| r.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Realm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Realm {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Realm {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Realm::from_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown realm: {name}")))
    }
}

/// Longest hero name the setup screen accepts, in characters.
pub const MAX_NAME_LEN: usize = 30;

/// The hero chosen at setup. Fixed for the rest of the adventure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterProfile {
    pub name: String,
    pub setting: Realm,
}

impl CharacterProfile {
    /// Create a profile, trimming the name. Returns `None` for a blank name.
    pub fn new(name: &str, setting: Realm) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            setting,
        })
    }
}

/// One raw diary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub text: String,
    pub timestamp: String,
}

impl JournalEntry {
    pub fn new(text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: format!("journal-{}", next_id_millis(now)),
            text: text.into(),
            timestamp: iso_timestamp(now),
        }
    }
}

/// A generated chapter, tied to the journal entry that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryChapter {
    pub id: String,
    pub journal_entry_id: String,
    pub chapter_title: String,
    pub story: String,
    pub image_url: String,
    pub timestamp: String,
}

impl StoryChapter {
    pub fn new(
        journal_entry_id: impl Into<String>,
        chapter_title: impl Into<String>,
        story: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: format!("chapter-{}", next_id_millis(now)),
            journal_entry_id: journal_entry_id.into(),
            chapter_title: chapter_title.into(),
            story: story.into(),
            image_url: image_url.into(),
            timestamp: iso_timestamp(now),
        }
    }

    /// Long-form date for display, e.g. "October 19, 2026".
    ///
    /// Falls back to the raw timestamp if it doesn't parse.
    pub fn display_date(&self) -> String {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .map(|dt| dt.format("%B %-d, %Y").to_string())
            .unwrap_or_else(|_| self.timestamp.clone())
    }
}

/// Last millisecond value handed out as an id suffix.
static LAST_ID_MILLIS: AtomicI64 = AtomicI64::new(0);

/// The id suffix for a record created at `now`.
///
/// Normally the creation millisecond; records created within the same
/// millisecond get the next unused one, so ids never repeat in a process.
fn next_id_millis(now: DateTime<Utc>) -> i64 {
    let now = now.timestamp_millis();
    let prev = LAST_ID_MILLIS
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or_else(|last| last);
    now.max(prev + 1)
}

/// ISO-8601 UTC with millisecond precision and a `Z` suffix.
fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
