//! Persisted match-state store. Celý cache se čte a zapisuje najednou.

use chrono::Utc;
use rusqlite::{params, Connection};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

use crate::record::{MatchCache, MatchRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Whole-cache persistence. Single writer; implementations do no cross-process locking.
pub trait MatchStore: Send + Sync {
    fn load(&self) -> Result<MatchCache, StoreError>;

    fn save(&self, cache: &MatchCache) -> Result<(), StoreError>;

    fn describe(&self) -> String;
}

// ── JSON file (cache.json) ───────────────────────────────────────────────────

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MatchStore for JsonFileStore {
    fn load(&self) -> Result<MatchCache, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No cache at {:?}, starting empty", self.path);
                return Ok(MatchCache::new());
            }
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(MatchCache::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, cache: &MatchCache) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        // zápis přes dočasný soubor, ať po pádu nezůstane půlka JSONu
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec(cache)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }
}

// ── SQLite ───────────────────────────────────────────────────────────────────

pub struct SqliteStore {
    path: PathBuf,
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL").ok();
        conn.pragma_update(None, "synchronous", "NORMAL").ok();
        init_schema(&conn)?;

        Ok(Self { path, conn: Mutex::new(conn) })
    }
}

fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS match_cache (
            match_id TEXT PRIMARY KEY,
            watermark TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            payload_json TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

impl MatchStore for SqliteStore {
    fn load(&self) -> Result<MatchCache, StoreError> {
        let conn = self.conn.lock().unwrap_or_else(|p| p.into_inner());
        let mut stmt = conn.prepare("SELECT payload_json FROM match_cache ORDER BY match_id")?;
        let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;

        let mut cache = MatchCache::new();
        for payload in rows {
            let record: MatchRecord = serde_json::from_str(&payload?)?;
            cache.insert_if_absent(record);
        }
        Ok(cache)
    }

    fn save(&self, cache: &MatchCache) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().unwrap_or_else(|p| p.into_inner());
        let tx = conn.transaction()?;
        let now = Utc::now().to_rfc3339();
        for record in cache.iter() {
            tx.execute(
                r#"
                INSERT INTO match_cache(match_id, watermark, updated_at, payload_json)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(match_id) DO UPDATE SET
                    watermark=excluded.watermark,
                    updated_at=excluded.updated_at,
                    payload_json=excluded.payload_json
                "#,
                params![
                    record.id,
                    record.watermark.to_rfc3339(),
                    now,
                    serde_json::to_string(record)?,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }
}
