use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};

use std::{sync::Arc, time::Instant};

use crate::expenses;
use ledger::Ledger;

#[derive(Clone)]
pub struct ServerState {
    pub ledger: Arc<dyn Ledger>,
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        "{method} {path} -> {} ({} ms)",
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}

/// Build the API router on top of `ledger`.
pub fn router(ledger: Arc<dyn Ledger>) -> Router {
    let state = ServerState { ledger };

    Router::new()
        .route("/expenses", post(expenses::record))
        .route("/expenses/{date}", get(expenses::expenses_on))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

pub async fn run_with_listener(
    ledger: Arc<dyn Ledger>,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(ledger))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down server");
}
