//! Row conversion utilities for the `SQLite` vault.

use crate::models::{PromptRecord, Rating, TraitMap};
use crate::{Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, Row, params};

/// Columns selected for a prompt row, in [`PromptRow::from_row`] order.
pub const PROMPT_COLUMNS: &str =
    "p.id, p.content, p.outcome, p.rating, p.model, p.task_type, p.created_at, p.updated_at";

/// Internal representation of a `prompts` row.
///
/// Fields keep their primitive database types; [`PromptRow::into_record`]
/// validates and converts them.
#[derive(Debug)]
pub struct PromptRow {
    /// Row identifier.
    pub id: i64,
    /// Prompt text.
    pub content: String,
    /// Outcome notes.
    pub outcome: Option<String>,
    /// Raw rating.
    pub rating: Option<i64>,
    /// Model label.
    pub model: Option<String>,
    /// Task type label.
    pub task_type: Option<String>,
    /// RFC 3339 creation time.
    pub created_at: String,
    /// RFC 3339 update time.
    pub updated_at: String,
}

impl PromptRow {
    /// Reads a row selected with [`PROMPT_COLUMNS`].
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            content: row.get(1)?,
            outcome: row.get(2)?,
            rating: row.get(3)?,
            model: row.get(4)?,
            task_type: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }

    /// Converts to a record, attaching tags and traits.
    ///
    /// # Errors
    ///
    /// Returns an error for a stored rating outside 1..=5 or an unparseable
    /// timestamp.
    pub fn into_record(self, tags: Vec<String>, traits: TraitMap) -> Result<PromptRecord> {
        let rating = self.rating.map(Rating::try_from).transpose()?;
        Ok(PromptRecord {
            id: self.id,
            content: self.content,
            outcome: self.outcome,
            rating,
            model: self.model,
            task_type: self.task_type,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
            tags,
            traits,
        })
    }

    /// Loads tags and traits for this row and converts it.
    ///
    /// # Errors
    ///
    /// Returns an error if the related rows cannot be read or conversion fails.
    pub fn hydrate(self, conn: &Connection) -> Result<PromptRecord> {
        let tags = load_tags(conn, self.id)?;
        let traits = load_traits(conn, self.id)?;
        self.into_record(tags, traits)
    }
}

/// Formats a timestamp for storage. Fixed-width UTC so text order is time order.
#[must_use]
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parses a stored timestamp.
///
/// # Errors
///
/// Returns an error if the text is not RFC 3339.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| Error::OperationFailed {
            operation: "parse_timestamp".to_string(),
            cause: format!("{s}: {e}"),
        })
}

/// Tags for a prompt in insertion order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn load_tags(conn: &Connection, prompt_id: i64) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT t.name FROM tags t
             JOIN prompt_tags pt ON t.id = pt.tag_id
             WHERE pt.prompt_id = ?1
             ORDER BY pt.position",
        )
        .map_err(|e| db_error("prepare_load_tags", e))?;

    let rows = stmt
        .query_map(params![prompt_id], |row| row.get::<_, String>(0))
        .map_err(|e| db_error("load_tags", e))?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| db_error("read_tag_row", e))
}

/// Stored traits for a prompt.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn load_traits(conn: &Connection, prompt_id: i64) -> Result<TraitMap> {
    let mut stmt = conn
        .prepare_cached("SELECT trait_name, detected FROM traits WHERE prompt_id = ?1")
        .map_err(|e| db_error("prepare_load_traits", e))?;

    let rows = stmt
        .query_map(params![prompt_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, bool>(1)?))
        })
        .map_err(|e| db_error("load_traits", e))?;

    rows.collect::<rusqlite::Result<TraitMap>>()
        .map_err(|e| db_error("read_trait_row", e))
}

/// Wraps a database error with the operation that failed.
pub fn db_error(operation: &str, e: impl std::fmt::Display) -> Error {
    Error::OperationFailed {
        operation: operation.to_string(),
        cause: e.to_string(),
    }
}
