//! The module contains the errors a ledger can throw.
//!
//! Rejected expenses are not errors: they are reported through
//! [`RecordResult::Rejected`]. [`LedgerError`] only covers failures of the
//! storage itself.
//!
//!  [`RecordResult::Rejected`]: super::RecordResult::Rejected
use sea_orm::DbErr;
use thiserror::Error;

/// Ledger custom errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
        }
    }
}
