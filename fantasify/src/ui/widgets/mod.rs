//! TUI widgets for the journal

pub mod chapters;
pub mod input;

pub use chapters::ChapterFeedWidget;
pub use input::InputWidget;
