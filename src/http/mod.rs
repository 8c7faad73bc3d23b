//! HTTP surface -- axum router, shared state, and the serve entrypoint.

mod error;
pub mod handlers;

use crate::agents::Composer;
use crate::storage::SessionStore;
use anyhow::Result;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::sync::oneshot;

#[derive(Clone)]
pub struct AppState {
    pub composer: Arc<Composer>,
    pub store: Arc<dyn SessionStore>,
}

impl AppState {
    pub fn new(composer: Composer, store: Arc<dyn SessionStore>) -> Self {
        Self {
            composer: Arc::new(composer),
            store,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(handlers::chat))
        .route(
            "/memory",
            post(handlers::store_memory).get(handlers::list_memory),
        )
        .route(
            "/memory/{key}",
            get(handlers::get_memory).delete(handlers::delete_memory),
        )
        .route("/tools", get(handlers::list_tools))
        .route("/resources", get(handlers::list_resources))
        .route("/pay", post(handlers::pay))
        .route("/health", get(handlers::health))
        .with_state(state)
}

/// Holds the bound port and the shutdown trigger for a running server.
pub struct ServeHandle {
    pub port: u16,
    shutdown_tx: Option<oneshot::Sender<()>>,
    join: Option<tokio::task::JoinHandle<Result<(), std::io::Error>>>,
}

impl ServeHandle {
    /// Trigger graceful shutdown and wait for the server to stop.
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(join) = self.join.take() {
            join.await??;
        }
        Ok(())
    }
}

/// Bind `bind` and serve the router in a spawned task.
pub async fn serve(state: AppState, bind: &str) -> Result<ServeHandle> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    let port = listener.local_addr()?.port();
    tracing::info!("switchyard listening on {bind} (port {port})");

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let join = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                tracing::info!("received shutdown signal");
            })
            .await
    });

    Ok(ServeHandle {
        port,
        shutdown_tx: Some(shutdown_tx),
        join: Some(join),
    })
}
