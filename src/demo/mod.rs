//! Demo target server.
//!
//! # Routes
//! ```text
//! GET    /movies              canned movie list after a fixed delay
//! GET    /error               500
//! GET    /500-error           500
//! GET    /504-error           504
//! GET    /api/tutorials       list
//! POST   /api/tutorials       create → { id, title, description, published }
//! GET    /api/tutorials/{id}  fetch
//! PUT    /api/tutorials/{id}  update
//! DELETE /api/tutorials/{id}  delete
//! ```
//!
//! # Design Decisions
//! - State is in-memory; restarting the server forgets every tutorial
//! - Ids are sequential integers, as the create→update→delete flow expects

pub mod handlers;
pub mod store;

use axum::{
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::DemoConfig;
use self::handlers::*;
use self::store::TutorialStore;

#[derive(Clone)]
pub struct DemoState {
    pub store: Arc<TutorialStore>,
    pub movies_delay: Duration,
}

impl DemoState {
    pub fn new(config: &DemoConfig) -> Self {
        Self {
            store: Arc::new(TutorialStore::new()),
            movies_delay: Duration::from_millis(config.movies_delay_ms),
        }
    }
}

/// Build the demo router with request tracing.
#[allow(deprecated)]
pub fn router(state: DemoState) -> Router {
    Router::new()
        .route("/movies", get(get_movies))
        .route("/error", get(get_error))
        .route("/500-error", get(get_500))
        .route("/504-error", get(get_504))
        .route("/api/tutorials", get(list_tutorials).post(create_tutorial))
        .route(
            "/api/tutorials/{id}",
            get(get_tutorial).put(update_tutorial).delete(delete_tutorial),
        )
        .with_state(state)
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(TraceLayer::new_for_http())
}

/// Serve the demo router until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: DemoState, shutdown: F) -> Result<(), std::io::Error>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "Demo target listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Demo target stopped");
    Ok(())
}
