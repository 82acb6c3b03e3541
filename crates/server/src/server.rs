use axum::{
    Router,
    routing::{get, post, put},
};

use std::sync::Arc;

use crate::{counts, items, locations, reports, sessions};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/items", get(items::list).post(items::create))
        .route(
            "/items/{item_id}",
            axum::routing::patch(items::update).delete(items::remove),
        )
        .route("/locations", get(locations::list).post(locations::create))
        .route(
            "/locations/{location_id}",
            axum::routing::patch(locations::update).delete(locations::remove),
        )
        .route("/locations/{location_id}/items", get(locations::list_items))
        .route(
            "/locations/{location_id}/items/{item_id}",
            post(locations::assign).delete(locations::unassign),
        )
        .route(
            "/sessions",
            post(sessions::start).get(sessions::list_finalized),
        )
        .route("/sessions/current", get(sessions::current))
        .route(
            "/sessions/{session_id}",
            get(sessions::get).delete(sessions::remove),
        )
        .route("/sessions/{session_id}/finalize", post(sessions::finalize))
        .route("/sessions/{session_id}/review", get(sessions::review))
        .route(
            "/sessions/{session_id}/locations/{location_id}/counts",
            put(counts::save).get(counts::read),
        )
        .route(
            "/sessions/{session_id}/locations/{location_id}/completion",
            get(counts::completion),
        )
        .route("/reports/usage", get(reports::usage))
        .with_state(state)
}

pub async fn run(engine: Engine) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
