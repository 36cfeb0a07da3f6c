//! Move session controller.
//!
//! Owns the turn cycle for one browser session: validate the human's drag,
//! commit the move locally, fetch the engine's counter-move, commit that,
//! and keep the board and status display in sync. All errors stop here;
//! the view and the game only ever see their own documented return values.

use crate::board::{BoardView, DragVerdict, DropVerdict};
use crate::game::{Game, GameError};
use crate::remote::{MoveRequest, MoveService};
use crate::status::SessionStatus;
use shakmaty::{Color, Role, Square};
use tracing::{debug, info, instrument, warn};

/// Where the controller is in the turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the human to pick up a piece.
    Idle,
    /// A piece is in the air; nothing committed yet.
    LocalMovePending,
    /// The human's move is committed and a counter-move request is in
    /// flight. The board is inert in this phase.
    AwaitingRemote,
    /// The remote exchange failed; surfaced and immediately resolved back
    /// to [`Phase::Idle`].
    Error,
}

/// Session controller for one game against the remote engine.
///
/// Single-threaded by construction: every transition happens inside a
/// `&mut self` callback, and the only suspension point is the awaited
/// counter-move request, so at most one request is ever outstanding.
pub struct SessionController {
    game: Game,
    view: Box<dyn BoardView>,
    service: Box<dyn MoveService>,
    phase: Phase,
    status: SessionStatus,
}

impl SessionController {
    /// Creates a controller at the standard initial position.
    #[instrument(skip(view, service))]
    pub fn new(view: Box<dyn BoardView>, service: Box<dyn MoveService>) -> Self {
        info!("Creating game session");
        let game = Game::new();
        let status = SessionStatus::derive(&game);
        Self {
            game,
            view,
            service,
            phase: Phase::Idle,
            status,
        }
    }

    /// Drag-start hook: may the human pick up a piece of `piece` color?
    ///
    /// Pure allow/deny; nothing is mutated on deny. A fresh grab while a
    /// previous drag was never dropped simply supersedes it.
    #[instrument(skip(self), fields(piece = ?piece, phase = ?self.phase))]
    pub fn on_drag_start(&mut self, piece: Color) -> DragVerdict {
        if self.phase == Phase::AwaitingRemote {
            debug!("Drag denied: request in flight");
            return DragVerdict::Deny;
        }
        if self.game.is_game_over() {
            debug!("Drag denied: game is over");
            return DragVerdict::Deny;
        }
        if piece != self.game.turn() {
            debug!("Drag denied: not this side's turn");
            return DragVerdict::Deny;
        }

        self.phase = Phase::LocalMovePending;
        DragVerdict::Allow
    }

    /// Drop hook: commit the human's move and run the remote round.
    ///
    /// Promotion is always forced to queen. Returns
    /// [`DropVerdict::Snapback`] when the move is illegal or no drag is in
    /// progress; the game is untouched in both cases.
    #[instrument(skip(self), fields(from = %from, to = %to, phase = ?self.phase))]
    pub async fn on_drop(&mut self, from: Square, to: Square) -> DropVerdict {
        if self.phase != Phase::LocalMovePending {
            debug!("Drop refused outside an active drag");
            return DropVerdict::Snapback;
        }

        match self.game.try_move(from, to, Some(Role::Queen)) {
            Ok(record) => {
                info!(san = %record.san, "Human move committed");
            }
            Err(_) => {
                debug!("Illegal move, returning piece to origin");
                self.phase = Phase::Idle;
                return DropVerdict::Snapback;
            }
        }

        self.status = SessionStatus::derive(&self.game);

        if self.game.is_game_over() {
            info!(status = %self.status.line, "Game over on the human's move");
            self.phase = Phase::Idle;
            return DropVerdict::Accept;
        }

        self.request_counter_move().await;
        DropVerdict::Accept
    }

    /// Snap-end hook: repositions the board after the drop animation.
    pub fn on_snap_end(&mut self) {
        self.view.render(&self.game.fen());
    }

    /// Runs one remote exchange for the move just committed.
    async fn request_counter_move(&mut self) {
        // Must exist: a move was just committed. Guarded anyway so a
        // protocol bug degrades to a logged anomaly instead of a panic.
        let san = match self.game.last_move() {
            Ok(record) => record.san.clone(),
            Err(GameError::EmptyHistory) => {
                warn!("Counter-move requested with no move on record");
                self.phase = Phase::Idle;
                return;
            }
            Err(err) => {
                warn!(error = %err, "Could not read last move");
                self.phase = Phase::Idle;
                return;
            }
        };

        let request = MoveRequest {
            fen: self.game.fen(),
            san,
        };

        self.status.line = "Thinking...".to_string();
        self.phase = Phase::AwaitingRemote;

        match self.service.request_counter_move(request).await {
            Ok(reply) if reply.game_over => {
                info!(result = ?reply.result, "Engine reports game over");
                self.status.line = match reply.result {
                    Some(result) => format!("Game over, {}", result),
                    None => "Game over".to_string(),
                };
                self.phase = Phase::Idle;
            }
            Ok(reply) => match reply.ai_move.as_deref() {
                Some(notation) => self.apply_counter_move(notation),
                None => {
                    warn!("Engine reply carried no move");
                    self.status.line = "Engine sent an unplayable move".to_string();
                    self.phase = Phase::Idle;
                }
            },
            Err(err) => {
                // The human's move stays committed; nothing to roll back.
                warn!(error = %err, "Counter-move request failed");
                self.phase = Phase::Error;
                self.status.line = "Error connecting to engine".to_string();
                self.phase = Phase::Idle;
            }
        }
    }

    /// Applies the engine's reply and re-renders board and status.
    fn apply_counter_move(&mut self, notation: &str) {
        match self.game.apply_notation(notation) {
            Ok(record) => {
                info!(san = %record.san, "Engine move committed");
                self.view.render(&self.game.fen());
                self.status = SessionStatus::derive(&self.game);
            }
            Err(_) => {
                // A trusted server sent an illegal move; recoverable, the
                // human's committed move is kept.
                warn!(notation, "Engine reply is not a legal move");
                self.status.line = "Engine sent an unplayable move".to_string();
            }
        }
        self.phase = Phase::Idle;
    }

    /// Current phase of the turn cycle.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current display status.
    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    /// Read access to the game state.
    pub fn game(&self) -> &Game {
        &self.game
    }
}
