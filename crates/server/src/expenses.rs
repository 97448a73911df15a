//! Expenses API endpoints
use api_types::expense::{Expense, ExpenseCreated};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
};
use ledger::RecordResult;
use serde_json::Value;

use crate::{ServerError, server::ServerState};

/// Handle requests listing the expenses recorded on `date`.
///
/// `date` is handed to the ledger untouched.
pub async fn expenses_on(
    State(state): State<ServerState>,
    Path(date): Path<String>,
) -> Result<Json<Vec<Value>>, ServerError> {
    let expenses = state.ledger.expenses_on(&date).await?;
    tracing::debug!("{} expenses found on {date}", expenses.len());

    Ok(Json(expenses))
}

/// Handle requests for recording a new expense.
///
/// The body is parsed whatever the `Content-Type` and must be a JSON object.
pub async fn record(
    State(state): State<ServerState>,
    body: Bytes,
) -> Result<Json<ExpenseCreated>, ServerError> {
    let expense: Expense = serde_json::from_slice(&body)
        .map_err(|err| ServerError::Generic(format!("invalid expense: {err}")))?;

    match state.ledger.record(expense).await? {
        RecordResult::Recorded { expense_id } => Ok(Json(ExpenseCreated { expense_id })),
        RecordResult::Rejected { error_message } => Err(ServerError::Rejected(error_message)),
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use http_body_util::BodyExt;
    use ledger::{Ledger, ResultLedger, SqliteLedger};
    use migration::MigratorTrait;
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;

    /// Ledger returning canned answers and remembering what it was asked.
    #[derive(Default)]
    struct StubLedger {
        expenses: HashMap<String, Vec<Value>>,
        record_result: Option<RecordResult>,
        recorded: Mutex<Vec<Expense>>,
        queried: Mutex<Vec<String>>,
    }

    impl StubLedger {
        fn with_expenses(date: &str, expenses: Vec<Value>) -> Self {
            Self {
                expenses: HashMap::from([(date.to_string(), expenses)]),
                ..Self::default()
            }
        }

        fn recording(result: RecordResult) -> Self {
            Self {
                record_result: Some(result),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl Ledger for StubLedger {
        async fn record(&self, expense: Expense) -> ResultLedger<RecordResult> {
            self.recorded.lock().unwrap().push(expense);
            Ok(self
                .record_result
                .clone()
                .expect("record called on a stub without a result"))
        }

        async fn expenses_on(&self, date: &str) -> ResultLedger<Vec<Value>> {
            self.queried.lock().unwrap().push(date.to_string());
            Ok(self.expenses.get(date).cloned().unwrap_or_default())
        }
    }

    struct FailingLedger;

    #[async_trait]
    impl Ledger for FailingLedger {
        async fn record(&self, _: Expense) -> ResultLedger<RecordResult> {
            Err(ledger::DbErr::Custom("connection lost".to_string()).into())
        }

        async fn expenses_on(&self, _: &str) -> ResultLedger<Vec<Value>> {
            Err(ledger::DbErr::Custom("connection lost".to_string()).into())
        }
    }

    async fn get(ledger: Arc<dyn Ledger>, uri: &str) -> Response {
        crate::router(ledger)
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    // No content type on purpose: the body is read as JSON regardless.
    async fn post(ledger: Arc<dyn Ledger>, body: impl Into<Body>) -> Response {
        crate::router(ledger)
            .oneshot(Request::post("/expenses").body(body.into()).unwrap())
            .await
            .unwrap()
    }

    async fn parsed(res: Response) -> Value {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn get_returns_expenses_as_json() {
        let stub = Arc::new(StubLedger::with_expenses(
            "2017-06-12",
            vec![json!("expense_1"), json!("expense_2")],
        ));

        let res = get(stub.clone(), "/expenses/2017-06-12").await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(parsed(res).await, json!(["expense_1", "expense_2"]));
        assert_eq!(*stub.queried.lock().unwrap(), vec!["2017-06-12".to_string()]);
    }

    #[tokio::test]
    async fn get_without_expenses_returns_empty_array() {
        let stub = Arc::new(StubLedger::with_expenses("2017-06-12", vec![]));

        let res = get(stub, "/expenses/2017-06-12").await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(parsed(res).await, json!([]));
    }

    #[tokio::test]
    async fn get_passes_date_through_unchecked() {
        let stub = Arc::new(StubLedger::default());

        let res = get(stub.clone(), "/expenses/last-tuesday").await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(parsed(res).await, json!([]));
        assert_eq!(*stub.queried.lock().unwrap(), vec!["last-tuesday".to_string()]);
    }

    #[tokio::test]
    async fn get_keeps_ledger_order_and_is_repeatable() {
        let expenses = vec![json!({"id": 2}), json!({"id": 1}), json!({"id": 3})];
        let stub = Arc::new(StubLedger::with_expenses("2017-06-10", expenses.clone()));

        let first = parsed(get(stub.clone(), "/expenses/2017-06-10").await).await;
        let second = parsed(get(stub, "/expenses/2017-06-10").await).await;

        assert_eq!(first, Value::Array(expenses));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn post_returns_expense_id_when_recorded() {
        let stub = Arc::new(StubLedger::recording(RecordResult::recorded(417)));

        let res = post(stub.clone(), r#"{"some":"data"}"#).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(parsed(res).await["expense_id"], json!(417));
        let recorded = stub.recorded.lock().unwrap();
        assert_eq!(recorded.len(), 1);
        assert_eq!(Value::Object(recorded[0].clone()), json!({"some": "data"}));
    }

    #[tokio::test]
    async fn post_returns_422_when_rejected() {
        let stub = Arc::new(StubLedger::recording(RecordResult::rejected(
            "Expense incomplete",
        )));

        let res = post(stub, r#"{"some":"data"}"#).await;

        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(parsed(res).await["error"], json!("Expense incomplete"));
    }

    #[tokio::test]
    async fn post_rejects_malformed_json_without_calling_ledger() {
        let stub = Arc::new(StubLedger::default());

        let res = post(stub.clone(), "{not json").await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(parsed(res).await["error"].is_string());
        assert!(stub.recorded.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn post_rejects_non_object_body() {
        let stub = Arc::new(StubLedger::default());

        let res = post(stub.clone(), r#"["some","data"]"#).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(stub.recorded.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn ledger_failures_map_to_500() {
        let res = get(Arc::new(FailingLedger), "/expenses/2017-06-12").await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let res = post(Arc::new(FailingLedger), r#"{"some":"data"}"#).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(parsed(res).await["error"], json!("internal server error"));
    }

    #[tokio::test]
    async fn unknown_route_or_method_is_refused() {
        let res = get(Arc::new(StubLedger::default()), "/expenses").await;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

        let res = get(Arc::new(StubLedger::default()), "/income/2017-06-12").await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn posted_expense_is_listed_on_its_date() {
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let ledger: Arc<dyn Ledger> = Arc::new(SqliteLedger::builder().database(db).build());

        let res = post(
            ledger.clone(),
            r#"{"payee":"Starbucks","amount":5.75,"date":"2017-06-10"}"#,
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let expense_id = parsed(res).await["expense_id"].clone();

        let res = post(ledger.clone(), r#"{"payee":"Zoo","amount":15}"#).await;
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            parsed(res).await["error"],
            json!("Invalid expense: `date` is required")
        );

        let res = get(ledger.clone(), "/expenses/2017-06-10").await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            parsed(res).await,
            json!([{"id": expense_id, "payee": "Starbucks", "amount": 5.75, "date": "2017-06-10"}])
        );

        let res = get(ledger, "/expenses/2017-06-11").await;
        assert_eq!(parsed(res).await, json!([]));
    }
}
