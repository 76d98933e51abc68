use clap::Parser;
use std::path::PathBuf;

/// Turn your diary into the chapters of a fantasy saga.
#[derive(Debug, Parser)]
#[command(name = "fantasify", version, about)]
pub struct Cli {
    /// Run in headless mode (line-oriented, no TUI)
    #[arg(long)]
    pub headless: bool,

    /// Hero name for a new adventure (headless only)
    #[arg(long, requires = "headless")]
    pub name: Option<String>,

    /// Realm for a new adventure, by number (1-5) or name (headless only)
    #[arg(long, requires = "headless")]
    pub realm: Option<String>,

    /// Directory holding the saved journal
    #[arg(long, env = "FANTASIFY_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Gemini model to write chapters with
    #[arg(long, env = "FANTASIFY_MODEL")]
    pub model: Option<String>,
}
