//! UI module for the journal TUI

pub mod render;
pub mod theme;
pub mod widgets;

pub use render::Overlay;
