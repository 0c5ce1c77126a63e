//! CLI command implementations.
//!
//! Each command takes the vault (and a detector where needed) so `main`
//! decides which backends are used.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `add` | Store a prompt from an argument or stdin |
//! | `list` | Table of recent prompts, filterable by tag and rating |
//! | `show` | One prompt with metadata, outcome, and traits |
//! | `search` | Full-text search over content and outcomes |
//! | `rate` | Rate 1-5 with optional outcome notes |
//! | `analyze` | Detect traits for every unanalyzed prompt |
//! | `traits` | Present and missing traits for one prompt |
//! | `insights` | Trait patterns in good and bad prompts, with suggestions |
//! | `tags` | All tags |
//! | `stats` | Vault totals |
//! | `open` | Banner and a short summary |
//!
//! # Example Usage
//!
//! ```bash
//! fridgprompt add -m claude-4 -t bugfix --tags "auth,react" "Fix the login bug"
//! fridgprompt rate 1 5 -o "Worked first try"
//! fridgprompt analyze --simple
//! fridgprompt insights
//! ```

mod analyze;
pub mod format;
mod insights;
mod prompts;

pub use analyze::{AnalyzeSummary, cmd_analyze, cmd_traits, render_traits};
pub use insights::{
    StatsSummary, cmd_insights, cmd_open, cmd_stats, print_welcome, render_insights, render_open,
    render_stats,
};
pub use prompts::{
    AddArgs, cmd_add, cmd_list, cmd_rate, cmd_search, cmd_show, cmd_tags, render_detail,
    render_search, render_table,
};
