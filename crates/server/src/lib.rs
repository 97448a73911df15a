use api_types::ErrorBody;
use axum::{Json, http::StatusCode, response::IntoResponse};
use ledger::LedgerError;

pub use server::{router, run_with_listener};

mod expenses;
mod server;

#[derive(Debug)]
pub enum ServerError {
    Ledger(LedgerError),
    /// The ledger refused the expense.
    Rejected(String),
    Generic(String),
}

fn message_for_ledger_error(err: LedgerError) -> String {
    match err {
        LedgerError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Ledger(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_for_ledger_error(err),
            ),
            ServerError::Rejected(err) => (StatusCode::UNPROCESSABLE_ENTITY, err),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}

impl From<LedgerError> for ServerError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value)
    }
}
