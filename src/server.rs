//! HTTP face of the move service.
//!
//! A single `POST /move` endpoint: given the position after the human's
//! move, reply with the engine's counter-move, or with `game_over: true`
//! and a result string when the position is already terminal. Engine
//! failures come back as HTTP 500 with an `error` body.

use crate::engine::CounterMoveEngine;
use crate::game::Game;
use crate::remote::{MoveRequest, MoveResponse};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use shakmaty::CastlingMode;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Error body for failed requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReply {
    /// Failure description.
    pub error: String,
}

/// Shared server state: the engine behind the endpoint.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<dyn CounterMoveEngine>,
}

/// Builds the move-server router.
pub fn router(engine: Arc<dyn CounterMoveEngine>) -> Router {
    Router::new()
        .route("/move", post(handle_move))
        .with_state(AppState { engine })
}

/// Binds to `addr` and serves the move endpoint until shutdown.
#[instrument(skip(engine))]
pub async fn serve(
    addr: std::net::SocketAddr,
    engine: Arc<dyn CounterMoveEngine>,
) -> anyhow::Result<()> {
    info!(%addr, engine = engine.name(), "Starting move server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(engine)).await?;
    Ok(())
}

#[instrument(skip(state, request), fields(san = %request.san))]
async fn handle_move(
    State(state): State<AppState>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<MoveResponse>, (StatusCode, Json<ErrorReply>)> {
    let game = Game::from_fen(&request.fen).map_err(|err| {
        warn!(fen = %request.fen, "Rejecting unparseable position");
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorReply {
                error: err.to_string(),
            }),
        )
    })?;

    if game.is_game_over() {
        info!(result = game.result(), "Position already terminal");
        return Ok(Json(MoveResponse {
            ai_move: None,
            game_over: true,
            result: Some(game.result().to_string()),
        }));
    }

    let m = state
        .engine
        .counter_move(game.position())
        .await
        .map_err(|err| {
            error!(error = %err, "Engine failed to produce a move");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorReply {
                    error: err.to_string(),
                }),
            )
        })?;

    let uci = m.to_uci(CastlingMode::Standard).to_string();
    info!(ai_move = %uci, "Returning counter-move");

    Ok(Json(MoveResponse {
        ai_move: Some(uci),
        game_over: false,
        result: None,
    }))
}
