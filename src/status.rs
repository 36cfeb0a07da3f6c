//! Derives the human-readable session status from the game state.

use crate::game::Game;
use shakmaty::Color;

/// Display strings for the current session, recomputed after every
/// committed move. Never stored as state of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    /// One-line status, e.g. "White to move".
    pub line: String,
    /// Full movetext transcript, e.g. "1. e4 e5".
    pub transcript: String,
}

impl SessionStatus {
    /// Derives the status for the given game. Pure; no side effects.
    pub fn derive(game: &Game) -> Self {
        let color = color_name(game.turn());

        let line = if game.is_checkmate() {
            // The side to move is the side that has just been mated.
            format!("Game over, {} is in checkmate.", color)
        } else if game.is_draw() {
            "Game over, drawn position".to_string()
        } else if game.is_in_check() {
            format!("{} to move, {} is in check", color, color)
        } else {
            format!("{} to move", color)
        };

        Self {
            line,
            transcript: game.movetext(),
        }
    }
}

/// Display name for a side.
pub fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}
