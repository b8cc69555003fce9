//! SQLite-backed store
//!
//! Every entity is kept as a JSON document next to the columns that are
//! filtered, sorted or constrained on. UNIQUE indexes back the natural keys
//! (registration, serial number, work order number, employee id, email,
//! transaction hash).
//!
//! All reads and writes go through [`Tx`]. [`Store::write`] runs its closure in
//! a `BEGIN IMMEDIATE` transaction, so multi-entity updates either all land or
//! none do, and concurrent writers on the same file are serialized by SQLite.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OpenFlags, OptionalExtension, Params, TransactionBehavior};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, info};

use crate::error::{Result, StoreError};
use crate::ledger::{self, LedgerHealth};
use crate::query::{Page, PageRequest, Where};

/// How long a writer waits on a locked database before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS aircraft (
    id TEXT PRIMARY KEY,
    registration TEXT NOT NULL UNIQUE,
    model TEXT NOT NULL,
    manufacturer TEXT NOT NULL,
    status TEXT NOT NULL,
    next_maintenance INTEGER NOT NULL,
    created_at INTEGER NOT NULL,
    doc TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_aircraft_status ON aircraft(status);

CREATE TABLE IF NOT EXISTS parts (
    id TEXT PRIMARY KEY,
    aircraft_id TEXT NOT NULL,
    part_number TEXT NOT NULL,
    name TEXT NOT NULL,
    manufacturer TEXT NOT NULL,
    serial_number TEXT NOT NULL UNIQUE,
    blockchain_hash TEXT NOT NULL UNIQUE,
    qr_code TEXT,
    status TEXT NOT NULL,
    install_date INTEGER NOT NULL,
    created_at INTEGER NOT NULL,
    doc TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_parts_aircraft ON parts(aircraft_id);
CREATE INDEX IF NOT EXISTS idx_parts_status ON parts(status);
CREATE INDEX IF NOT EXISTS idx_parts_qr ON parts(qr_code);

CREATE TABLE IF NOT EXISTS maintenance (
    id TEXT PRIMARY KEY,
    work_order TEXT NOT NULL UNIQUE,
    wo_year INTEGER NOT NULL,
    wo_seq INTEGER NOT NULL,
    aircraft_id TEXT NOT NULL,
    assigned_to TEXT NOT NULL,
    status TEXT NOT NULL,
    priority TEXT NOT NULL,
    scheduled_date INTEGER NOT NULL,
    due_date INTEGER NOT NULL,
    completed_date INTEGER,
    created_at INTEGER NOT NULL,
    doc TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_maintenance_aircraft ON maintenance(aircraft_id);
CREATE INDEX IF NOT EXISTS idx_maintenance_assigned ON maintenance(assigned_to);
CREATE INDEX IF NOT EXISTS idx_maintenance_status ON maintenance(status);
CREATE INDEX IF NOT EXISTS idx_maintenance_year_seq ON maintenance(wo_year, wo_seq);

CREATE TABLE IF NOT EXISTS mechanics (
    id TEXT PRIMARY KEY,
    employee_id TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    wallet_address TEXT NOT NULL UNIQUE,
    is_active INTEGER NOT NULL,
    availability TEXT NOT NULL,
    credential_hash TEXT NOT NULL,
    private_key TEXT NOT NULL,
    doc TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_mechanics_availability ON mechanics(availability);

CREATE TABLE IF NOT EXISTS ledger_transactions (
    seq_no INTEGER PRIMARY KEY AUTOINCREMENT,
    transaction_hash TEXT NOT NULL UNIQUE,
    kind TEXT NOT NULL,
    status TEXT NOT NULL,
    entity_type TEXT NOT NULL,
    entity_id TEXT NOT NULL,
    timestamp INTEGER NOT NULL,
    record_hash TEXT NOT NULL,
    prev_hash TEXT NOT NULL,
    doc TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_ledger_entity ON ledger_transactions(entity_type, entity_id);
CREATE INDEX IF NOT EXISTS idx_ledger_timestamp ON ledger_transactions(timestamp);
"#;

/// Handle to the fleet database
pub struct Store {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
    ledger_health: Mutex<LedgerHealth>,
}

impl Store {
    /// Create or open a store at `path`.
    ///
    /// A broken ledger chain does not prevent opening; it is reported through
    /// [`Store::ledger_health`] and further ledger appends are refused.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Opening fleet store");

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        Self::init(conn, Some(path.to_path_buf()))
    }

    /// Private in-memory store, mainly for tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;

        let health = ledger::continuity_check(&conn)?;
        match &health {
            LedgerHealth::Ok => info!("Ledger continuity check passed"),
            LedgerHealth::Corrupted {
                first_bad_seq_no,
                error_type,
                ..
            } => error!(
                first_bad_seq_no,
                error_type = %error_type,
                "Ledger corruption detected, appends disabled"
            ),
        }

        Ok(Self {
            conn: Mutex::new(conn),
            path,
            ledger_health: Mutex::new(health),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn ledger_health(&self) -> LedgerHealth {
        self.ledger_health
            .lock()
            .map(|h| h.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Re-run the ledger continuity check and update the cached health
    pub fn recheck_ledger(&self) -> Result<LedgerHealth> {
        let health = {
            let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
            ledger::continuity_check(&conn)?
        };
        *self.ledger_health.lock().map_err(|_| StoreError::Poisoned)? = health.clone();
        Ok(health)
    }

    /// Cheap liveness probe
    pub fn ping(&self) -> Result<()> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    /// Run `f` outside an explicit transaction
    pub fn read<T, E>(&self, f: impl FnOnce(&Tx<'_>) -> std::result::Result<T, E>) -> std::result::Result<T, E>
    where
        E: From<StoreError>,
    {
        let ledger_ok = self.ledger_health().is_ok();
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        f(&Tx {
            conn: &conn,
            ledger_ok,
        })
    }

    /// Run `f` inside a `BEGIN IMMEDIATE` transaction; commit on `Ok`, roll
    /// back on `Err`
    pub fn write<T, E>(&self, f: impl FnOnce(&Tx<'_>) -> std::result::Result<T, E>) -> std::result::Result<T, E>
    where
        E: From<StoreError>,
    {
        let ledger_ok = self.ledger_health().is_ok();
        let mut conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StoreError::from)?;
        let out = f(&Tx {
            conn: &tx,
            ledger_ok,
        })?;
        tx.commit().map_err(StoreError::from)?;
        Ok(out)
    }

    /// Execute raw SQL, bypassing every invariant. Test use only.
    #[doc(hidden)]
    pub fn __test_execute_raw_sql(&self, sql: &str) -> Result<usize> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(conn.execute(sql, [])?)
    }
}

/// Typed access to the database inside a [`Store::read`] or [`Store::write`]
pub struct Tx<'c> {
    pub(crate) conn: &'c Connection,
    pub(crate) ledger_ok: bool,
}

pub(crate) fn to_doc<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

impl Tx<'_> {
    pub(crate) fn load_one<T: DeserializeOwned>(&self, sql: &str, params: impl Params) -> Result<Option<T>> {
        let doc: Option<String> = self
            .conn
            .query_row(sql, params, |row| row.get(0))
            .optional()?;
        doc.map(|d| serde_json::from_str(&d))
            .transpose()
            .map_err(StoreError::from)
    }

    pub(crate) fn load_many<T: DeserializeOwned>(&self, sql: &str, params: impl Params) -> Result<Vec<T>> {
        let mut stmt = self.conn.prepare(sql)?;
        let docs = stmt
            .query_map(params, |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        docs.iter()
            .map(|d| serde_json::from_str(d).map_err(StoreError::from))
            .collect()
    }

    pub(crate) fn load_page<T: DeserializeOwned>(
        &self,
        table: &str,
        filter: &Where,
        order_by: &str,
        request: PageRequest,
    ) -> Result<Page<T>> {
        let where_sql = filter.sql();
        let total: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}{}", table, where_sql),
            params_from_iter(filter.values.iter()),
            |row| row.get(0),
        )?;

        let n = filter.values.len();
        let sql = format!(
            "SELECT doc FROM {}{} ORDER BY {} LIMIT ?{} OFFSET ?{}",
            table,
            where_sql,
            order_by,
            n + 1,
            n + 2
        );
        let mut values = filter.values.clone();
        values.push(Value::Integer(request.limit as i64));
        values.push(Value::Integer(request.offset()));

        let items = self.load_many(&sql, params_from_iter(values.iter()))?;
        Ok(Page::new(items, total.max(0) as u64, request))
    }

    pub(crate) fn count(&self, table: &str) -> Result<u64> {
        let total: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
        Ok(total.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_creation_on_disk() {
        let temp_dir = std::env::temp_dir();
        let db_path = temp_dir.join(format!("test_store_{}.db", uuid::Uuid::new_v4()));

        let store = Store::open(&db_path).unwrap();
        assert!(store.ledger_health().is_ok());
        assert_eq!(store.path(), Some(db_path.as_path()));
        store.ping().unwrap();

        drop(store);
        std::fs::remove_file(&db_path).ok();
    }

    #[test]
    fn test_write_rolls_back_on_error() {
        let store = Store::open_in_memory().unwrap();

        let result: Result<()> = store.write(|tx| {
            tx.conn.execute(
                "INSERT INTO aircraft (id, registration, model, manufacturer, status, next_maintenance, created_at, doc)
                 VALUES ('a', 'N1', 'm', 'x', 'compliant', 0, 0, '{}')",
                [],
            )?;
            Err(StoreError::not_found("Aircraft", "forced"))
        });
        assert!(result.is_err());

        let count = store.read(|tx| tx.count("aircraft")).unwrap();
        assert_eq!(count, 0);
    }
}
