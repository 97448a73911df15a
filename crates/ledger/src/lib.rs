//! Persistence of expenses.
//!
//! The [`Ledger`] trait is the only thing the HTTP layer knows about: it is
//! handed an implementation at startup and never looks behind it.
//! [`SqliteLedger`] is the implementation used in production.
use async_trait::async_trait;
use serde_json::Value;

pub use api_types::expense::Expense;
pub use error::LedgerError;
pub use expense::InvalidExpense;
pub use sea_orm::DbErr;
pub use sqlite::{SqliteLedger, SqliteLedgerBuilder};

mod error;
mod expense;
mod sqlite;

pub type ResultLedger<T> = Result<T, LedgerError>;

/// Outcome of [`Ledger::record`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordResult {
    /// The expense was stored under `expense_id`.
    Recorded { expense_id: i64 },
    /// The expense was refused and nothing was stored.
    Rejected { error_message: String },
}

impl RecordResult {
    pub fn recorded(expense_id: i64) -> Self {
        Self::Recorded { expense_id }
    }

    pub fn rejected(error_message: impl Into<String>) -> Self {
        Self::Rejected {
            error_message: error_message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Recorded { .. })
    }

    pub fn expense_id(&self) -> Option<i64> {
        match self {
            Self::Recorded { expense_id } => Some(*expense_id),
            Self::Rejected { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Recorded { .. } => None,
            Self::Rejected { error_message } => Some(error_message),
        }
    }
}

/// Storage of expenses, shared by every request of the server.
///
/// Implementations take care of their own synchronization.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Validate and store `expense`.
    ///
    /// A refused expense is `Ok(RecordResult::Rejected { .. })`; `Err` is
    /// reserved for failures of the storage.
    async fn record(&self, expense: Expense) -> ResultLedger<RecordResult>;

    /// Return every expense stored under the `date` key, `[]` if none.
    async fn expenses_on(&self, date: &str) -> ResultLedger<Vec<Value>>;
}
