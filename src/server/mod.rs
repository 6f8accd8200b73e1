//! HTTP API for the wheel.
//!
//! axum router over a shared [`AppState`]. Every route answers JSON except
//! `/api/wheel/svg`, and every failure is a [`WheelError`](crate::error::WheelError)
//! rendered as `{"error": "..."}`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub mod routes;
pub mod state;

pub use state::AppState;

use routes::{
    custom_create_handler, custom_list_handler, popular_handler, spin_handler, svg_handler,
    user_handler, wheel_add_handler, wheel_list_handler, wheel_remove_handler,
};

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/user", get(user_handler))
        .route("/api/recipes/popular", get(popular_handler))
        .route(
            "/api/recipes/custom",
            get(custom_list_handler).post(custom_create_handler),
        )
        .route(
            "/api/wheel",
            get(wheel_list_handler)
                .post(wheel_add_handler)
                .delete(wheel_remove_handler),
        )
        .route("/api/wheel/spin", post(spin_handler))
        .route("/api/wheel/svg", get(svg_handler))
        .layer(cors)
        .with_state(state)
}

/// Bind `host:port` and serve until Ctrl+C or SIGTERM.
pub async fn serve(state: Arc<AppState>, host: &str, port: u16) -> anyhow::Result<()> {
    let address = format!("{host}:{port}");
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    let local: SocketAddr = listener.local_addr()?;
    info!("Server running on http://{local}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
        } else {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
