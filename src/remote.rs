//! Remote move protocol client.
//!
//! One request per committed human move: `POST /move` with the current
//! position and the move just played, answered by the engine's counter-move.
//! No retries and no idempotence assumption; the controller's state machine
//! guarantees at most one outstanding request.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Body of a `POST /move` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Position after the human's move, as FEN.
    pub fen: String,
    /// SAN of the move the human just played.
    #[serde(rename = "move")]
    pub san: String,
}

/// Body of a `POST /move` reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveResponse {
    /// Engine's counter-move, absent when the game is already over.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_move: Option<String>,
    /// True when the posted position was already terminal.
    #[serde(default)]
    pub game_over: bool,
    /// Result string ("1-0", "0-1", "1/2-1/2") on a terminal position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

/// Failure of a remote move exchange.
#[derive(Debug, Display, Error)]
pub enum RemoteError {
    /// Request never completed or came back non-2xx.
    #[display("Error connecting to engine: {message}")]
    Transport {
        /// Underlying failure description.
        message: String,
    },
    /// Reply arrived but could not be decoded.
    #[display("Malformed engine reply: {message}")]
    Protocol {
        /// Underlying decode failure description.
        message: String,
    },
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RemoteError::Protocol {
                message: err.to_string(),
            }
        } else {
            RemoteError::Transport {
                message: err.to_string(),
            }
        }
    }
}

/// Capability to produce a counter-move for a committed human move.
#[async_trait::async_trait]
pub trait MoveService: Send + Sync {
    /// Requests the engine's reply to the human's last move.
    async fn request_counter_move(&self, request: MoveRequest) -> Result<MoveResponse, RemoteError>;
}

/// HTTP implementation of [`MoveService`] against the move server.
#[derive(Debug, Clone)]
pub struct HttpMoveService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpMoveService {
    /// Creates a client for the server at `base_url`, e.g.
    /// `http://127.0.0.1:5000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl MoveService for HttpMoveService {
    #[instrument(skip(self, request), fields(san = %request.san))]
    async fn request_counter_move(&self, request: MoveRequest) -> Result<MoveResponse, RemoteError> {
        info!("Requesting counter-move");

        let response = self
            .client
            .post(format!("{}/move", self.base_url))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Transport {
                message: format!("engine answered HTTP {}", status),
            });
        }

        let reply: MoveResponse = response.json().await?;
        debug!(ai_move = ?reply.ai_move, game_over = reply.game_over, "Got counter-move reply");
        Ok(reply)
    }
}
