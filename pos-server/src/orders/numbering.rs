//! Order numbering service
//!
//! Issues the human-facing ticket number printed on every order. Numbers
//! restart at 1 on the first order of each business day and otherwise
//! increase by one per order.
//!
//! The counter lives in a redb file and the increment-or-reset happens
//! inside a single write transaction, so concurrent callers and process
//! restarts cannot observe a torn read-then-write. When the durable store
//! cannot be opened (or a transaction fails mid-flight) the service
//! degrades to a process-local counter instead of failing order creation;
//! numbers may then repeat after a restart, which is the documented
//! trade-off of availability over strict uniqueness.

use chrono::NaiveDate;
use redb::{Database, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;

/// Table holding the sequence state: "date" (yyyymmdd) and "counter"
const SEQUENCE_TABLE: TableDefinition<&str, u64> = TableDefinition::new("order_sequence");

const DATE_KEY: &str = "date";
const COUNTER_KEY: &str = "counter";

/// Sequence storage errors
#[derive(Debug, Error)]
pub enum SequenceError {
    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),
}

/// Daily order-number sequence
///
/// Constructed once at startup and shared behind an `Arc`. The calendar
/// date is passed in by the caller (computed in the business timezone),
/// which keeps the day-boundary logic clock-free and testable.
pub struct OrderSequence {
    db: Option<Database>,
    /// Mirror of the last issued (date, counter); the fallback path
    /// continues from here when the durable store misbehaves
    mem: Mutex<(u64, u64)>,
}

impl OrderSequence {
    /// Open (or create) the durable sequence at `path`
    ///
    /// Falls back to in-memory numbering when the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Self {
        match Database::create(path.as_ref()) {
            Ok(db) => Self {
                db: Some(db),
                mem: Mutex::new((0, 0)),
            },
            Err(e) => {
                tracing::warn!(
                    path = %path.as_ref().display(),
                    error = %e,
                    "Order sequence store unavailable, numbering is in-memory only"
                );
                Self::in_memory()
            }
        }
    }

    /// A sequence with no durable backing (tests, degraded mode)
    pub fn in_memory() -> Self {
        Self {
            db: None,
            mem: Mutex::new((0, 0)),
        }
    }

    /// Whether the durable store is in use
    pub fn is_durable(&self) -> bool {
        self.db.is_some()
    }

    /// Issue the next order number for `today`
    ///
    /// Returns 1 on the first call of a new date, the previous number
    /// plus one otherwise.
    pub fn next(&self, today: NaiveDate) -> u64 {
        let date_key = date_key(today);

        if let Some(db) = &self.db {
            match next_durable(db, date_key) {
                Ok(number) => {
                    let mut mem = self.mem.lock().unwrap_or_else(|e| e.into_inner());
                    *mem = (date_key, number);
                    return number;
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Order sequence write failed, using in-memory counter"
                    );
                }
            }
        }

        self.next_in_memory(date_key)
    }

    fn next_in_memory(&self, date_key: u64) -> u64 {
        let mut mem = self.mem.lock().unwrap_or_else(|e| e.into_inner());
        let (stored_date, counter) = *mem;
        let next = if stored_date != date_key { 1 } else { counter + 1 };
        *mem = (date_key, next);
        next
    }
}

/// Increment-or-reset inside one write transaction
fn next_durable(db: &Database, date_key: u64) -> Result<u64, SequenceError> {
    let txn = db.begin_write()?;
    let number = {
        let mut table = txn.open_table(SEQUENCE_TABLE)?;

        let stored_date = table.get(DATE_KEY)?.map(|g| g.value()).unwrap_or(0);
        let next = if stored_date != date_key {
            1
        } else {
            table.get(COUNTER_KEY)?.map(|g| g.value()).unwrap_or(0) + 1
        };

        table.insert(DATE_KEY, date_key)?;
        table.insert(COUNTER_KEY, next)?;
        next
    };
    txn.commit()?;
    Ok(number)
}

/// yyyymmdd as a u64, e.g. 2026-08-06 -> 20260806
fn date_key(date: NaiveDate) -> u64 {
    date.format("%Y%m%d")
        .to_string()
        .parse()
        .unwrap_or_default()
}
