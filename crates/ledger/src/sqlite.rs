//! SQLite backed [`Ledger`].
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue, DatabaseConnection, QueryFilter, QueryOrder, prelude::*,
};
use serde_json::Value;

use crate::{Expense, Ledger, RecordResult, ResultLedger, expense};

/// Ledger storing expenses in the `expenses` table.
///
/// The connection pool is the only shared state, so the ledger can be used
/// from every request concurrently.
#[derive(Debug)]
pub struct SqliteLedger {
    database: DatabaseConnection,
}

impl SqliteLedger {
    /// Return a builder for `SqliteLedger`.
    pub fn builder() -> SqliteLedgerBuilder {
        SqliteLedgerBuilder::default()
    }
}

#[async_trait]
impl Ledger for SqliteLedger {
    async fn record(&self, expense: Expense) -> ResultLedger<RecordResult> {
        let valid = match expense::validate(&expense) {
            Ok(valid) => valid,
            Err(err) => {
                tracing::debug!("expense rejected: {err}");
                return Ok(RecordResult::rejected(err.to_string()));
            }
        };

        let model = expense::ActiveModel {
            id: ActiveValue::NotSet,
            payee: ActiveValue::Set(valid.payee),
            amount: ActiveValue::Set(valid.amount.to_string()),
            date: ActiveValue::Set(valid.date),
        }
        .insert(&self.database)
        .await?;

        tracing::debug!("expense {} recorded on {}", model.id, model.date);
        Ok(RecordResult::recorded(model.id))
    }

    async fn expenses_on(&self, date: &str) -> ResultLedger<Vec<Value>> {
        let expenses = expense::Entity::find()
            .filter(expense::Column::Date.eq(date))
            .order_by_asc(expense::Column::Id)
            .all(&self.database)
            .await?;

        Ok(expenses.into_iter().map(Value::from).collect())
    }
}

#[derive(Default)]
pub struct SqliteLedgerBuilder {
    database: DatabaseConnection,
}

impl SqliteLedgerBuilder {
    /// Pass the required database. It must already be migrated.
    pub fn database(mut self, db: DatabaseConnection) -> SqliteLedgerBuilder {
        self.database = db;
        self
    }

    /// Construct `SqliteLedger`
    pub fn build(self) -> SqliteLedger {
        SqliteLedger {
            database: self.database,
        }
    }
}
