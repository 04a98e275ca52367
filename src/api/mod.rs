//! HTTP surface for the live twin.
//!
//! - `GET /` serves the dashboard page
//! - `GET /api/status` returns one row per monitored asset
//! - `POST /api/trigger_fault` injects a timed fault
//! - `GET /api/faults` lists live faults

mod handlers;
pub mod types;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use axum::routing::{get, post};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::info;

use crate::sim::engine::Engine;

/// State shared by the request handlers and the tick task.
///
/// Engine time is seconds since `started`, so fault windows follow the
/// wall clock.
pub struct AppState {
    pub engine: RwLock<Engine>,
    started: Instant,
}

impl AppState {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: RwLock::new(engine),
            started: Instant::now(),
        }
    }

    /// Seconds elapsed since the state was created.
    pub fn now_s(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

/// Builds the axum router with all routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/api/status", get(handlers::get_status))
        .route("/api/trigger_fault", post(handlers::trigger_fault))
        .route("/api/faults", get(handlers::get_faults))
        .with_state(state)
}

/// Ticks the engine every `period` until the task is aborted.
pub fn spawn_ticker(state: Arc<AppState>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let now = state.now_s();
            state.engine.write().await.step(now);
        }
    })
}

/// Binds to `addr` and serves until Ctrl-C or SIGTERM.
///
/// The engine ticks every `tick` in the background for as long as the
/// server runs.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr, tick: Duration) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let ticker = spawn_ticker(Arc::clone(&state), tick);
    info!(%addr, tick_ms = tick.as_millis() as u64, "grid twin listening");

    let result = axum::serve(listener, router(state))
        .with_graceful_shutdown(crate::logging::shutdown_signal())
        .await;

    ticker.abort();
    info!("server stopped");
    result
}
