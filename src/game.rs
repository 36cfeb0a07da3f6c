//! Rules engine adapter owning the session's game state.
//!
//! Wraps a `shakmaty` position plus the ordered move history. The
//! controller only queries this type and submits candidate moves; nothing
//! else in the crate mutates the position.

use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, File, Move, Position, Role, Square};
use tracing::{debug, instrument, warn};

/// A move that has been applied to the game, in drag terms: the square the
/// piece left and the square it landed on. Castling is recorded as the king
/// hop (e1 -> g1), matching how a board UI presents it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayedMove {
    /// Square the piece was picked up from.
    pub from: Square,
    /// Square the piece was dropped on.
    pub to: Square,
    /// Promotion role, if the move promoted a pawn.
    pub promotion: Option<Role>,
    /// Standard algebraic notation, resolved at apply time.
    pub san: String,
}

/// Errors from game operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Candidate move is not legal in the current position.
    IllegalMove,
    /// No move has been recorded yet.
    EmptyHistory,
    /// The remote engine's move text matched no legal move.
    UnplayableReply,
    /// A position encoding could not be parsed.
    InvalidPosition,
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::IllegalMove => write!(f, "Move is not legal in this position"),
            GameError::EmptyHistory => write!(f, "No moves have been played"),
            GameError::UnplayableReply => write!(f, "Engine reply matched no legal move"),
            GameError::InvalidPosition => write!(f, "Invalid position encoding"),
        }
    }
}

impl std::error::Error for GameError {}

/// One chess game: position plus history, created at the standard initial
/// position and never reset for the life of the session.
#[derive(Debug, Clone)]
pub struct Game {
    position: Chess,
    history: Vec<PlayedMove>,
}

impl Game {
    /// Creates a game at the standard initial position.
    #[instrument]
    pub fn new() -> Self {
        Self {
            position: Chess::default(),
            history: Vec::new(),
        }
    }

    /// Creates a game from a FEN string with an empty history.
    ///
    /// Used by the move server, which receives bare positions and never
    /// needs the transcript.
    #[instrument(skip(fen))]
    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        let parsed: Fen = fen.parse().map_err(|_| GameError::InvalidPosition)?;
        let position = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|_| GameError::InvalidPosition)?;
        Ok(Self {
            position,
            history: Vec::new(),
        })
    }

    /// Returns the side to move.
    pub fn turn(&self) -> Color {
        self.position.turn()
    }

    /// True if the side to move is checkmated.
    pub fn is_checkmate(&self) -> bool {
        self.position.is_checkmate()
    }

    /// True if the position is drawn: stalemate, insufficient material, or
    /// the fifty-move rule. Threefold repetition is not tracked.
    pub fn is_draw(&self) -> bool {
        self.position.is_stalemate()
            || self.position.is_insufficient_material()
            || self.position.halfmoves() >= 100
    }

    /// True if no further moves can be played.
    pub fn is_game_over(&self) -> bool {
        self.is_checkmate() || self.is_draw()
    }

    /// True if the side to move is in check.
    pub fn is_in_check(&self) -> bool {
        self.position.is_check()
    }

    /// Attempts a candidate move given in drag terms.
    ///
    /// On success the move is applied and the resolved record returned. On
    /// an illegal candidate the game is left untouched and
    /// [`GameError::IllegalMove`] returned; illegality is an expected
    /// outcome, not a fault.
    #[instrument(skip(self), fields(from = %from, to = %to))]
    pub fn try_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Role>,
    ) -> Result<PlayedMove, GameError> {
        for m in &self.position.legal_moves() {
            let (mv_from, mv_to) = match drag_squares(m) {
                Some(squares) => squares,
                None => continue,
            };

            if mv_from != from || mv_to != to {
                continue;
            }

            // Promotion candidates appear once per role; pick the requested one.
            if let Move::Normal {
                promotion: Some(role),
                ..
            } = m
            {
                if Some(*role) != promotion {
                    continue;
                }
            }

            let record = self.commit(m.clone());
            debug!(san = %record.san, "Move applied");
            return Ok(record);
        }

        debug!("Candidate matched no legal move");
        Err(GameError::IllegalMove)
    }

    /// Applies a move given as engine notation, accepting UCI ("e7e5") or
    /// SAN ("e5"). The text is resolved against the legal-move set before
    /// anything is applied, so an illegal reply leaves the game untouched.
    #[instrument(skip(self), fields(notation = %text))]
    pub fn apply_notation(&mut self, text: &str) -> Result<PlayedMove, GameError> {
        let m = UciMove::from_ascii(text.as_bytes())
            .ok()
            .and_then(|uci| uci.to_move(&self.position).ok())
            .or_else(|| {
                San::from_ascii(text.as_bytes())
                    .ok()
                    .and_then(|san| san.to_move(&self.position).ok())
            });

        match m {
            Some(m) => Ok(self.commit(m)),
            None => {
                warn!("Engine notation matched no legal move");
                Err(GameError::UnplayableReply)
            }
        }
    }

    /// Read access to the underlying position.
    pub fn position(&self) -> &Chess {
        &self.position
    }

    /// Returns the most recent move.
    pub fn last_move(&self) -> Result<&PlayedMove, GameError> {
        self.history.last().ok_or(GameError::EmptyHistory)
    }

    /// Returns the full move history in order.
    pub fn history(&self) -> &[PlayedMove] {
        &self.history
    }

    /// Returns the position as a FEN string.
    pub fn fen(&self) -> String {
        Fen::from_position(self.position.clone(), EnPassantMode::Legal).to_string()
    }

    /// Renders the history as standard movetext, e.g. "1. e4 e5 2. Nf3".
    pub fn movetext(&self) -> String {
        self.history
            .chunks(2)
            .enumerate()
            .map(|(i, pair)| {
                let white = pair.first().map(|m| m.san.as_str()).unwrap_or_default();
                match pair.get(1) {
                    Some(black) => format!("{}. {} {}", i + 1, white, black.san),
                    None => format!("{}. {}", i + 1, white),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Game result string: "1-0", "0-1", "1/2-1/2", or "*" while ongoing.
    pub fn result(&self) -> &'static str {
        if self.is_checkmate() {
            match self.position.turn() {
                Color::White => "0-1",
                Color::Black => "1-0",
            }
        } else if self.is_draw() {
            "1/2-1/2"
        } else {
            "*"
        }
    }

    /// Applies a move known to be legal and records it.
    fn commit(&mut self, m: Move) -> PlayedMove {
        let san = San::from_move(&self.position, &m).to_string();
        let (from, to) = drag_squares(&m).unwrap_or_else(|| {
            // Put moves never occur in standard chess.
            unreachable!("legal chess move always has drag squares")
        });
        let promotion = match &m {
            Move::Normal { promotion, .. } => *promotion,
            _ => None,
        };

        self.position.play_unchecked(&m);

        let record = PlayedMove {
            from,
            to,
            promotion,
            san,
        };
        self.history.push(record.clone());
        record
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps a legal move to the (from, to) squares a drag gesture would use.
/// Castling is the king moving two files toward the rook.
fn drag_squares(m: &Move) -> Option<(Square, Square)> {
    match m {
        Move::Normal { from, to, .. } => Some((*from, *to)),
        Move::EnPassant { from, to, .. } => Some((*from, *to)),
        Move::Castle { king, rook } => {
            let king_dest = if rook.file() == File::H {
                Square::from_coords(File::G, rook.rank())
            } else {
                Square::from_coords(File::C, rook.rank())
            };
            Some((*king, king_dest))
        }
        Move::Put { .. } => None,
    }
}
