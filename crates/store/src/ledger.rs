//! Chained transaction ledger
//!
//! Each [`LedgerTransaction`] is appended with:
//! - seq_no: monotonically increasing row number
//! - record_hash: content token (BLAKE3) of the record
//! - prev_hash: record_hash of the previous row, [`GENESIS_HASH`] for the first
//!
//! Rows are never updated or deleted. The continuity check at open recomputes
//! every record hash and walks the chain; a mismatch marks the ledger corrupted.

use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use skychain_chain::content_token;
use skychain_domain::{EntityType, LedgerTransaction, TransactionStatus, TransactionType};
use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::query::{Page, PageRequest, Where};
use crate::store::{to_doc, Tx};

/// `prev_hash` of the first row
pub const GENESIS_HASH: &str = "0x0000000000000000000000000000000000000000000000000000000000000000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum LedgerHealth {
    Ok,
    #[serde(rename_all = "camelCase")]
    Corrupted {
        last_good_seq_no: Option<u64>,
        first_bad_seq_no: u64,
        error_type: String,
    },
}

impl LedgerHealth {
    pub fn is_ok(&self) -> bool {
        matches!(self, LedgerHealth::Ok)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub kind: Option<TransactionType>,
    pub status: Option<TransactionStatus>,
}

/// Walk the whole chain from the first row
pub(crate) fn continuity_check(conn: &Connection) -> Result<LedgerHealth> {
    let mut stmt = conn.prepare(
        "SELECT seq_no, record_hash, prev_hash, doc FROM ledger_transactions ORDER BY seq_no ASC",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)? as u64,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut prev_hash = GENESIS_HASH.to_string();
    let mut last_good: Option<u64> = None;

    for (seq_no, record_hash, stored_prev, doc) in rows {
        let corrupted = |error_type: String| LedgerHealth::Corrupted {
            last_good_seq_no: last_good,
            first_bad_seq_no: seq_no,
            error_type,
        };

        if stored_prev != prev_hash {
            return Ok(corrupted(format!(
                "Hash mismatch at seq_no {}: expected prev_hash {}, got {}",
                seq_no, prev_hash, stored_prev
            )));
        }

        let record: LedgerTransaction = match serde_json::from_str(&doc) {
            Ok(record) => record,
            Err(e) => return Ok(corrupted(format!("Unreadable record at seq_no {}: {}", seq_no, e))),
        };
        let recomputed = content_token(&record)?;
        if recomputed != record_hash {
            return Ok(corrupted(format!(
                "Record hash mismatch at seq_no {}",
                seq_no
            )));
        }

        prev_hash = record_hash;
        last_good = Some(seq_no);
    }

    Ok(LedgerHealth::Ok)
}

impl Tx<'_> {
    /// Append `record` to the chain, returning its seq_no
    pub fn append_transaction(&self, record: &LedgerTransaction) -> Result<u64> {
        if !self.ledger_ok {
            warn!(
                transaction_hash = %record.transaction_hash,
                "Attempted to append to corrupted ledger"
            );
            return Err(StoreError::LedgerCorrupted(
                "Cannot append to corrupted ledger".to_string(),
            ));
        }

        let prev_hash: String = self
            .conn
            .query_row(
                "SELECT record_hash FROM ledger_transactions ORDER BY seq_no DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?
            .unwrap_or_else(|| GENESIS_HASH.to_string());
        let record_hash = content_token(record)?;

        self.conn.execute(
            r#"
            INSERT INTO ledger_transactions (
                transaction_hash, kind, status, entity_type, entity_id,
                timestamp, record_hash, prev_hash, doc
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                record.transaction_hash,
                record.kind.as_str(),
                record.status.as_str(),
                record.related_entity.entity_type.as_str(),
                record.related_entity.entity_id,
                record.timestamp.timestamp_millis(),
                record_hash,
                prev_hash,
                to_doc(record)?,
            ],
        )?;
        let seq_no = self.conn.last_insert_rowid() as u64;

        debug!(
            seq_no,
            transaction_hash = %record.transaction_hash,
            kind = record.kind.as_str(),
            "Transaction appended to ledger"
        );
        Ok(seq_no)
    }

    pub fn get_transaction(&self, transaction_hash: &str) -> Result<Option<LedgerTransaction>> {
        self.load_one(
            "SELECT doc FROM ledger_transactions WHERE transaction_hash = ?1",
            params![transaction_hash],
        )
    }

    /// Newest first
    pub fn list_transactions(
        &self,
        filter: &TransactionFilter,
        request: PageRequest,
    ) -> Result<Page<LedgerTransaction>> {
        let mut w = Where::new();
        w.eq("kind", filter.kind.map(|k| k.as_str().to_string()))
            .eq("status", filter.status.map(|s| s.as_str().to_string()));
        self.load_page("ledger_transactions", &w, "timestamp DESC, seq_no DESC", request)
    }

    pub fn recent_transactions(&self, limit: usize) -> Result<Vec<LedgerTransaction>> {
        self.load_many(
            "SELECT doc FROM ledger_transactions ORDER BY timestamp DESC, seq_no DESC LIMIT ?1",
            params![limit as i64],
        )
    }

    pub fn entity_transactions(
        &self,
        entity_type: EntityType,
        entity_id: &str,
    ) -> Result<Vec<LedgerTransaction>> {
        self.load_many(
            "SELECT doc FROM ledger_transactions
             WHERE entity_type = ?1 AND entity_id = ?2
             ORDER BY timestamp DESC, seq_no DESC",
            params![entity_type.as_str(), entity_id],
        )
    }

    pub fn all_transactions(&self) -> Result<Vec<LedgerTransaction>> {
        self.load_many("SELECT doc FROM ledger_transactions ORDER BY seq_no ASC", [])
    }

    pub fn transaction_count(&self) -> Result<u64> {
        self.count("ledger_transactions")
    }
}
