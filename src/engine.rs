//! Counter-move engine seam for the move server.
//!
//! Move selection strength is out of scope for this crate; a real engine
//! (UCI binary, neural net) plugs in behind [`CounterMoveEngine`]. The
//! bundled [`RandomEngine`] exists so the server runs end to end.

use derive_more::{Display, Error};
use rand::seq::SliceRandom;
use shakmaty::{Chess, Move, Position};
use tracing::{debug, instrument};

/// Engine failure, surfaced by the server as HTTP 500.
#[derive(Debug, Clone, Display, Error)]
#[display("Engine error: {message}")]
pub struct EngineError {
    /// What went wrong.
    pub message: String,
}

impl EngineError {
    /// Creates a new engine error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Capability to pick a counter-move for a position.
#[async_trait::async_trait]
pub trait CounterMoveEngine: Send + Sync {
    /// Engine's display name.
    fn name(&self) -> &str;

    /// Picks a move for the side to move. The position is guaranteed
    /// non-terminal by the caller.
    async fn counter_move(&self, position: &Chess) -> Result<Move, EngineError>;
}

/// Uniformly random legal mover.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomEngine;

#[async_trait::async_trait]
impl CounterMoveEngine for RandomEngine {
    fn name(&self) -> &str {
        "random"
    }

    #[instrument(skip(self, position))]
    async fn counter_move(&self, position: &Chess) -> Result<Move, EngineError> {
        let legal = position.legal_moves();
        let m = legal
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| EngineError::new("no legal moves in position"))?;
        debug!(chosen = ?m, "Picked random legal move");
        Ok(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn random_engine_returns_a_legal_move() {
        let position = Chess::default();
        let m = RandomEngine.counter_move(&position).await.unwrap();
        assert!(position.legal_moves().contains(&m));
    }
}
