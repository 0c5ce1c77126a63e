//! Prompt vault backends.
//!
//! The vault is a single `SQLite` database (default
//! `~/.fridgprompt/prompts.db`):
//!
//! | Table | Contents |
//! |-------|----------|
//! | `prompts` | One row per prompt, rating constrained to 1..=5 |
//! | `tags` / `prompt_tags` | Tag names and ordered prompt membership |
//! | `traits` | Detected trait values per prompt |
//! | `prompts_fts` | FTS5 index over content and outcome, kept in sync by triggers |

mod row;
mod sqlite;
mod traits;

pub use sqlite::SqliteRecordStore;
pub use traits::RecordStore;
