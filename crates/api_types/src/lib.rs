use serde::{Deserialize, Serialize};

pub mod expense {
    use super::*;

    /// An expense as submitted by a client.
    ///
    /// The API does not impose a schema: any JSON object is accepted and
    /// forwarded to the ledger, which decides what is valid.
    pub type Expense = serde_json::Map<String, serde_json::Value>;

    /// Body returned when an expense has been recorded.
    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ExpenseCreated {
        pub expense_id: i64,
    }
}

/// Body of every error response.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
