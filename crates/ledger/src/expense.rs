//! The module contains the stored representation of an expense and the rules
//! an expense must satisfy to be recorded.
use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde_json::{Number, Value, json};
use thiserror::Error;

use crate::Expense;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reason an expense is refused by [`SqliteLedger`].
///
///  [`SqliteLedger`]: super::SqliteLedger
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InvalidExpense {
    #[error("Invalid expense: `{0}` is required")]
    Missing(&'static str),
    #[error("Invalid expense: `payee` must be a non-blank string")]
    Payee,
    #[error("Invalid expense: `amount` must be a number")]
    Amount,
    #[error("Invalid expense: `date` must be a YYYY-MM-DD date")]
    Date,
}

/// An expense that passed validation, ready to be inserted.
#[derive(Debug, PartialEq)]
pub(crate) struct ValidExpense {
    pub payee: String,
    pub amount: Number,
    pub date: String,
}

/// Check `expense` against the required fields. Extra fields are ignored.
pub(crate) fn validate(expense: &Expense) -> Result<ValidExpense, InvalidExpense> {
    for field in ["payee", "amount", "date"] {
        if !expense.contains_key(field) {
            return Err(InvalidExpense::Missing(field));
        }
    }

    let payee = match expense.get("payee") {
        Some(Value::String(payee)) if !payee.trim().is_empty() => payee.clone(),
        _ => return Err(InvalidExpense::Payee),
    };

    let amount = match expense.get("amount") {
        Some(Value::Number(amount)) => amount.clone(),
        _ => return Err(InvalidExpense::Amount),
    };

    let date = expense
        .get("date")
        .and_then(Value::as_str)
        .filter(|date| is_calendar_date(date))
        .ok_or(InvalidExpense::Date)?;

    Ok(ValidExpense {
        payee,
        amount,
        date: date.to_string(),
    })
}

/// `date` is a real day written exactly as `YYYY-MM-DD`.
///
/// The parsed date must format back to the same text: `%Y` alone also takes
/// signed or short years such as `+017`.
fn is_calendar_date(date: &str) -> bool {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .is_ok_and(|parsed| parsed.format(DATE_FORMAT).to_string() == date)
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub payee: String,
    /// The submitted JSON number, kept as text so it reads back unchanged.
    pub amount: String,
    pub date: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn amount_value(amount: String) -> Value {
    match amount.parse::<Number>() {
        Ok(number) => Value::Number(number),
        Err(_) => Value::String(amount),
    }
}

impl From<Model> for Value {
    fn from(expense: Model) -> Self {
        json!({
            "id": expense.id,
            "payee": expense.payee,
            "amount": amount_value(expense.amount),
            "date": expense.date,
        })
    }
}
