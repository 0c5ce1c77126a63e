//! SQLite-based prompt vault.
//!
//! Stores prompts in `~/.fridgprompt/prompts.db` unless configured otherwise.

use super::RecordStore;
use super::row::{PROMPT_COLUMNS, PromptRow, db_error, format_timestamp};
use crate::models::{
    ListFilter, NewPrompt, PromptRecord, Rating, TraitMap, TraitStatistics, normalize_tags,
};
use crate::{Error, Result};
use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

const SCHEMA: &str = "
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS prompts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        content TEXT NOT NULL,
        outcome TEXT,
        rating INTEGER CHECK (rating BETWEEN 1 AND 5),
        model TEXT,
        task_type TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS tags (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    );

    CREATE TABLE IF NOT EXISTS prompt_tags (
        prompt_id INTEGER NOT NULL REFERENCES prompts(id) ON DELETE CASCADE,
        tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
        position INTEGER NOT NULL DEFAULT 0,
        PRIMARY KEY (prompt_id, tag_id)
    );

    CREATE TABLE IF NOT EXISTS traits (
        prompt_id INTEGER NOT NULL REFERENCES prompts(id) ON DELETE CASCADE,
        trait_name TEXT NOT NULL,
        detected INTEGER NOT NULL,
        PRIMARY KEY (prompt_id, trait_name)
    );

    CREATE INDEX IF NOT EXISTS idx_prompts_rating ON prompts(rating);
    CREATE INDEX IF NOT EXISTS idx_prompts_created ON prompts(created_at);
    CREATE INDEX IF NOT EXISTS idx_traits_name ON traits(trait_name);

    CREATE VIRTUAL TABLE IF NOT EXISTS prompts_fts USING fts5(
        content,
        outcome,
        content='prompts',
        content_rowid='id'
    );

    CREATE TRIGGER IF NOT EXISTS prompts_ai AFTER INSERT ON prompts BEGIN
        INSERT INTO prompts_fts(rowid, content, outcome)
        VALUES (new.id, new.content, new.outcome);
    END;

    CREATE TRIGGER IF NOT EXISTS prompts_ad AFTER DELETE ON prompts BEGIN
        INSERT INTO prompts_fts(prompts_fts, rowid, content, outcome)
        VALUES ('delete', old.id, old.content, old.outcome);
    END;

    CREATE TRIGGER IF NOT EXISTS prompts_au AFTER UPDATE ON prompts BEGIN
        INSERT INTO prompts_fts(prompts_fts, rowid, content, outcome)
        VALUES ('delete', old.id, old.content, old.outcome);
        INSERT INTO prompts_fts(rowid, content, outcome)
        VALUES (new.id, new.content, new.outcome);
    END;
";

/// `SQLite`-backed [`RecordStore`].
pub struct SqliteRecordStore {
    /// Connection to the `SQLite` database.
    conn: Mutex<Connection>,
    /// Path to the `SQLite` database.
    db_path: PathBuf,
}

impl SqliteRecordStore {
    /// Opens or creates a vault at `db_path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| db_error("create_vault_dir", e))?;
        }

        let conn = Connection::open(&db_path).map_err(|e| db_error("open_vault", e))?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path,
        };
        store.initialize()?;
        tracing::debug!(path = %store.db_path.display(), "Opened prompt vault");
        Ok(store)
    }

    /// Creates an in-memory vault (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| db_error("open_vault_memory", e))?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path: PathBuf::from(":memory:"),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Returns the database path.
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn initialize(&self) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| db_error("initialize_vault", e))
    }

    /// Locks the connection and returns a guard.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| db_error("lock_vault", e))
    }

    fn query_records(
        conn: &Connection,
        sql: &str,
        args: &[Value],
        operation: &str,
    ) -> Result<Vec<PromptRecord>> {
        let mut stmt = conn.prepare(sql).map_err(|e| db_error(operation, e))?;
        let rows = stmt
            .query_map(params_from_iter(args.iter()), PromptRow::from_row)
            .map_err(|e| db_error(operation, e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| db_error(operation, e))?;

        rows.into_iter().map(|row| row.hydrate(conn)).collect()
    }

    fn trait_rates(conn: &Connection, rating_clause: &str) -> Result<BTreeMap<String, f64>> {
        let sql = format!(
            "SELECT t.trait_name, SUM(t.detected) * 100.0 / COUNT(*)
             FROM traits t JOIN prompts p ON t.prompt_id = p.id
             WHERE {rating_clause}
             GROUP BY t.trait_name"
        );
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| db_error("prepare_trait_rates", e))?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?)))
            .map_err(|e| db_error("trait_rates", e))?;

        rows.collect::<rusqlite::Result<BTreeMap<_, _>>>()
            .map_err(|e| db_error("read_trait_rate", e))
    }
}

/// Quotes every whitespace-separated term so user text never reaches the
/// FTS5 query parser as syntax.
fn fts_query(query: &str) -> Option<String> {
    let terms: Vec<String> = query
        .split_whitespace()
        .map(|term| format!("\"{}\"", term.replace('"', "\"\"")))
        .collect();
    (!terms.is_empty()).then(|| terms.join(" "))
}

fn to_sql_int(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl RecordStore for SqliteRecordStore {
    fn add(&self, prompt: &NewPrompt) -> Result<i64> {
        prompt.validate()?;
        let tags = normalize_tags(&prompt.tags);
        let now = format_timestamp(Utc::now());

        let mut conn = self.lock_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| db_error("begin_add_prompt", e))?;

        tx.execute(
            "INSERT INTO prompts (content, model, task_type, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![prompt.content, prompt.model, prompt.task_type, now],
        )
        .map_err(|e| db_error("insert_prompt", e))?;
        let id = tx.last_insert_rowid();

        for (position, tag) in tags.iter().enumerate() {
            tx.execute("INSERT OR IGNORE INTO tags (name) VALUES (?1)", params![tag])
                .map_err(|e| db_error("insert_tag", e))?;
            tx.execute(
                "INSERT OR IGNORE INTO prompt_tags (prompt_id, tag_id, position)
                 SELECT ?1, id, ?2 FROM tags WHERE name = ?3",
                params![id, to_sql_int(position), tag],
            )
            .map_err(|e| db_error("link_tag", e))?;
        }

        tx.commit().map_err(|e| db_error("commit_add_prompt", e))?;
        tracing::debug!(prompt_id = id, tags = tags.len(), "Stored prompt");
        Ok(id)
    }

    fn get(&self, id: i64) -> Result<Option<PromptRecord>> {
        let conn = self.lock_conn()?;
        let row = conn
            .query_row(
                &format!("SELECT {PROMPT_COLUMNS} FROM prompts p WHERE p.id = ?1"),
                params![id],
                PromptRow::from_row,
            )
            .optional()
            .map_err(|e| db_error("get_prompt", e))?;

        row.map(|row| row.hydrate(&conn)).transpose()
    }

    fn list(&self, filter: &ListFilter) -> Result<Vec<PromptRecord>> {
        let mut sql = format!("SELECT {PROMPT_COLUMNS} FROM prompts p WHERE 1 = 1");
        let mut args: Vec<Value> = Vec::new();

        if let Some(tag) = &filter.tag {
            sql.push_str(
                " AND p.id IN (SELECT pt.prompt_id FROM prompt_tags pt
                   JOIN tags t ON t.id = pt.tag_id WHERE t.name = ?)",
            );
            args.push(Value::Text(tag.trim().to_string()));
        }
        if let Some(rating) = filter.rating {
            sql.push_str(" AND p.rating = ?");
            args.push(Value::Integer(i64::from(rating.get())));
        }
        sql.push_str(" ORDER BY p.created_at DESC, p.id DESC LIMIT ? OFFSET ?");
        args.push(Value::Integer(to_sql_int(filter.limit)));
        args.push(Value::Integer(to_sql_int(filter.offset)));

        let conn = self.lock_conn()?;
        Self::query_records(&conn, &sql, &args, "list_prompts")
    }

    fn search(&self, query: &str, limit: usize) -> Result<Vec<PromptRecord>> {
        let Some(match_expr) = fts_query(query) else {
            return Ok(Vec::new());
        };

        let sql = format!(
            "SELECT {PROMPT_COLUMNS} FROM prompts_fts
             JOIN prompts p ON p.id = prompts_fts.rowid
             WHERE prompts_fts MATCH ?
             ORDER BY prompts_fts.rank
             LIMIT ?"
        );
        let args = [Value::Text(match_expr), Value::Integer(to_sql_int(limit))];

        let conn = self.lock_conn()?;
        let results = Self::query_records(&conn, &sql, &args, "search_prompts")?;
        tracing::debug!(query, hits = results.len(), "Searched prompts");
        Ok(results)
    }

    fn rate(&self, id: i64, rating: Rating, outcome: Option<&str>) -> Result<bool> {
        let outcome = outcome.filter(|o| !o.trim().is_empty());
        let now = format_timestamp(Utc::now());
        let conn = self.lock_conn()?;
        let updated = conn
            .execute(
                "UPDATE prompts
                 SET rating = ?1, outcome = COALESCE(?2, outcome), updated_at = ?3
                 WHERE id = ?4",
                params![rating.get(), outcome, now, id],
            )
            .map_err(|e| db_error("rate_prompt", e))?;

        Ok(updated > 0)
    }

    fn save_traits(&self, id: i64, traits: &TraitMap) -> Result<()> {
        let mut conn = self.lock_conn()?;
        let exists = conn
            .query_row("SELECT 1 FROM prompts WHERE id = ?1", params![id], |_| Ok(()))
            .optional()
            .map_err(|e| db_error("check_prompt", e))?
            .is_some();
        if !exists {
            return Err(Error::NotFound(format!("prompt #{id}")));
        }

        let tx = conn
            .transaction()
            .map_err(|e| db_error("begin_save_traits", e))?;
        for (name, detected) in traits {
            tx.execute(
                "INSERT OR REPLACE INTO traits (prompt_id, trait_name, detected)
                 VALUES (?1, ?2, ?3)",
                params![id, name, detected],
            )
            .map_err(|e| db_error("save_trait", e))?;
        }
        tx.commit().map_err(|e| db_error("commit_save_traits", e))
    }

    fn unanalyzed(&self) -> Result<Vec<PromptRecord>> {
        let sql = format!(
            "SELECT {PROMPT_COLUMNS} FROM prompts p
             WHERE NOT EXISTS (SELECT 1 FROM traits t WHERE t.prompt_id = p.id)
             ORDER BY p.id"
        );
        let conn = self.lock_conn()?;
        Self::query_records(&conn, &sql, &[], "unanalyzed_prompts")
    }

    fn trait_statistics(&self) -> Result<TraitStatistics> {
        let conn = self.lock_conn()?;

        let (total, rated, avg): (i64, i64, Option<f64>) = conn
            .query_row(
                "SELECT COUNT(*), COUNT(rating), AVG(rating) FROM prompts",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .map_err(|e| db_error("count_prompts", e))?;

        Ok(TraitStatistics {
            total_prompts: u64::try_from(total).unwrap_or_default(),
            rated_prompts: u64::try_from(rated).unwrap_or_default(),
            avg_rating: avg.unwrap_or(0.0),
            high_rated_traits: Self::trait_rates(
                &conn,
                &format!("p.rating >= {}", Rating::HIGH_FLOOR),
            )?,
            low_rated_traits: Self::trait_rates(
                &conn,
                &format!("p.rating <= {}", Rating::LOW_CEILING),
            )?,
        })
    }

    fn all_tags(&self) -> Result<Vec<String>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn
            .prepare("SELECT name FROM tags ORDER BY name")
            .map_err(|e| db_error("prepare_all_tags", e))?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| db_error("all_tags", e))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| db_error("read_tag", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PromptTrait;
    use tempfile::TempDir;

    fn store() -> SqliteRecordStore {
        SqliteRecordStore::in_memory().unwrap()
    }

    fn rating(value: u8) -> Rating {
        Rating::new(value).unwrap()
    }

    fn traits(pairs: &[(PromptTrait, bool)]) -> TraitMap {
        pairs
            .iter()
            .map(|(t, v)| (t.as_str().to_string(), *v))
            .collect()
    }

    #[test]
    fn test_add_and_get() {
        let store = store();
        let id = store
            .add(
                &NewPrompt::new("Fix the login bug in auth.py")
                    .with_model("claude-4")
                    .with_task_type("bugfix")
                    .with_tags(vec!["auth".to_string(), " login ".to_string(), "auth".to_string()]),
            )
            .unwrap();

        let record = store.get(id).unwrap().unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.content, "Fix the login bug in auth.py");
        assert_eq!(record.model.as_deref(), Some("claude-4"));
        assert_eq!(record.task_type.as_deref(), Some("bugfix"));
        assert_eq!(record.tags, vec!["auth", "login"]);
        assert!(record.rating.is_none());
        assert!(record.outcome.is_none());
        assert!(!record.is_analyzed());
    }

    #[test]
    fn test_add_rejects_blank_content() {
        let store = store();
        let result = store.add(&NewPrompt::new("   \n"));
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_get_missing() {
        assert!(store().get(42).unwrap().is_none());
    }

    #[test]
    fn test_ids_increase() {
        let store = store();
        let first = store.add(&NewPrompt::new("one")).unwrap();
        let second = store.add(&NewPrompt::new("two")).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_list_newest_first_with_limit() {
        let store = store();
        let ids: Vec<i64> = (0..5)
            .map(|i| store.add(&NewPrompt::new(format!("prompt {i}"))).unwrap())
            .collect();

        let listed = store.list(&ListFilter::new().with_limit(3)).unwrap();
        let listed_ids: Vec<i64> = listed.iter().map(|r| r.id).collect();
        assert_eq!(listed_ids, vec![ids[4], ids[3], ids[2]]);

        let page = store
            .list(&ListFilter::new().with_limit(3).with_offset(3))
            .unwrap();
        assert_eq!(page.iter().map(|r| r.id).collect::<Vec<_>>(), vec![ids[1], ids[0]]);
    }

    #[test]
    fn test_list_filters_by_tag_and_rating() {
        let store = store();
        let a = store
            .add(&NewPrompt::new("a").with_tags(vec!["ui".to_string()]))
            .unwrap();
        let b = store
            .add(&NewPrompt::new("b").with_tags(vec!["api".to_string()]))
            .unwrap();
        let c = store
            .add(&NewPrompt::new("c").with_tags(vec!["ui".to_string()]))
            .unwrap();
        store.rate(a, rating(5), None).unwrap();
        store.rate(b, rating(5), None).unwrap();
        store.rate(c, rating(2), None).unwrap();

        let ui = store.list(&ListFilter::new().with_tag("ui")).unwrap();
        assert_eq!(ui.len(), 2);

        let ui_five = store
            .list(&ListFilter::new().with_tag("ui").with_rating(rating(5)))
            .unwrap();
        assert_eq!(ui_five.len(), 1);
        assert_eq!(ui_five[0].id, a);

        assert!(store.list(&ListFilter::new().with_tag("nope")).unwrap().is_empty());
    }

    #[test]
    fn test_rate_keeps_outcome_when_absent() {
        let store = store();
        let id = store.add(&NewPrompt::new("Build a todo app")).unwrap();

        assert!(store.rate(id, rating(4), Some("worked first try")).unwrap());
        assert!(store.rate(id, rating(3), None).unwrap());

        let record = store.get(id).unwrap().unwrap();
        assert_eq!(record.rating, Some(rating(3)));
        assert_eq!(record.outcome.as_deref(), Some("worked first try"));
        assert!(record.updated_at >= record.created_at);
    }

    #[test]
    fn test_rate_blank_outcome_keeps_previous() {
        let store = store();
        let id = store.add(&NewPrompt::new("Build a todo app")).unwrap();

        assert!(store.rate(id, rating(5), Some("great")).unwrap());
        assert!(store.rate(id, rating(2), Some("")).unwrap());
        assert!(store.rate(id, rating(2), Some("   ")).unwrap());

        let record = store.get(id).unwrap().unwrap();
        assert_eq!(record.rating, Some(rating(2)));
        assert_eq!(record.outcome.as_deref(), Some("great"));
    }

    #[test]
    fn test_rate_missing_prompt() {
        assert!(!store().rate(7, rating(4), None).unwrap());
    }

    #[test]
    fn test_search_content_and_outcome() {
        let store = store();
        let login = store.add(&NewPrompt::new("Fix the login form")).unwrap();
        let other = store.add(&NewPrompt::new("Add dark mode")).unwrap();
        store.rate(other, rating(4), Some("login page looked odd")).unwrap();

        let hits = store.search("login", 10).unwrap();
        let ids: Vec<i64> = hits.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&login));
        assert!(ids.contains(&other));

        assert!(store.search("payments", 10).unwrap().is_empty());
        assert_eq!(store.search("login", 1).unwrap().len(), 1);
    }

    #[test]
    fn test_search_treats_syntax_as_text() {
        let store = store();
        store.add(&NewPrompt::new("Handle \"quoted\" AND stuff")).unwrap();

        assert!(store.search("\"quoted", 10).is_ok());
        assert!(store.search("AND OR NOT (", 10).is_ok());
        assert!(store.search("   ", 10).unwrap().is_empty());
    }

    #[test]
    fn test_save_traits_and_unanalyzed() {
        let store = store();
        let first = store.add(&NewPrompt::new("first")).unwrap();
        let second = store.add(&NewPrompt::new("second")).unwrap();

        let map = traits(&[(PromptTrait::ClearGoal, true), (PromptTrait::ShowsError, false)]);
        store.save_traits(first, &map).unwrap();

        let record = store.get(first).unwrap().unwrap();
        assert_eq!(record.traits, map);

        let pending: Vec<i64> = store.unanalyzed().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(pending, vec![second]);

        let update = traits(&[(PromptTrait::ClearGoal, false)]);
        store.save_traits(first, &update).unwrap();
        let record = store.get(first).unwrap().unwrap();
        assert_eq!(record.traits.get("clear_goal"), Some(&false));
        assert_eq!(record.traits.get("shows_error"), Some(&false));
    }

    #[test]
    fn test_save_traits_missing_prompt() {
        let result = store().save_traits(99, &traits(&[(PromptTrait::ClearGoal, true)]));
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_trait_statistics() {
        let store = store();
        let good = [true, true, false];
        for detected in good {
            let id = store.add(&NewPrompt::new("good")).unwrap();
            store.rate(id, rating(5), None).unwrap();
            store
                .save_traits(id, &traits(&[(PromptTrait::ClearGoal, detected)]))
                .unwrap();
        }
        let bad = store.add(&NewPrompt::new("bad")).unwrap();
        store.rate(bad, rating(1), None).unwrap();
        store
            .save_traits(bad, &traits(&[(PromptTrait::ClearGoal, false)]))
            .unwrap();
        store.add(&NewPrompt::new("unrated")).unwrap();

        let stats = store.trait_statistics().unwrap();
        assert_eq!(stats.total_prompts, 5);
        assert_eq!(stats.rated_prompts, 4);
        assert!((stats.avg_rating - 4.0).abs() < 1e-9);
        let high = stats.high_rate(PromptTrait::ClearGoal);
        assert!((high - 200.0 / 3.0).abs() < 1e-9);
        assert!(stats.low_rate(PromptTrait::ClearGoal).abs() < f64::EPSILON);
        assert!(stats.high_rate(PromptTrait::ShowsError).abs() < f64::EPSILON);
    }

    #[test]
    fn test_trait_statistics_empty() {
        let stats = store().trait_statistics().unwrap();
        assert_eq!(stats.total_prompts, 0);
        assert_eq!(stats.rated_prompts, 0);
        assert!(stats.avg_rating.abs() < f64::EPSILON);
        assert!(stats.high_rated_traits.is_empty());
    }

    #[test]
    fn test_all_tags_sorted() {
        let store = store();
        store
            .add(&NewPrompt::new("a").with_tags(vec!["zeta".to_string(), "alpha".to_string()]))
            .unwrap();
        store
            .add(&NewPrompt::new("b").with_tags(vec!["alpha".to_string(), "mid".to_string()]))
            .unwrap();

        assert_eq!(store.all_tags().unwrap(), vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_tag_order_preserved_per_prompt() {
        let store = store();
        let id = store
            .add(&NewPrompt::new("a").with_tags(vec!["zeta".to_string(), "alpha".to_string()]))
            .unwrap();
        assert_eq!(store.get(id).unwrap().unwrap().tags, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_file_backed_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("prompts.db");

        let id = {
            let store = SqliteRecordStore::new(&path).unwrap();
            assert_eq!(store.db_path(), path.as_path());
            store.add(&NewPrompt::new("persist me")).unwrap()
        };

        let reopened = SqliteRecordStore::new(&path).unwrap();
        let record = reopened.get(id).unwrap().unwrap();
        assert_eq!(record.content, "persist me");
        assert_eq!(reopened.search("persist", 5).unwrap().len(), 1);
    }

    #[test]
    fn test_fts_query_quoting() {
        assert_eq!(fts_query("login form").as_deref(), Some("\"login\" \"form\""));
        assert_eq!(fts_query("say\"hi").as_deref(), Some("\"say\"\"hi\""));
        assert!(fts_query(" \t ").is_none());
    }
}
