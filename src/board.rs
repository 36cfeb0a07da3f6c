//! Board view seam.
//!
//! The controller drives the board through this trait and never the other
//! way around; drag gestures reach the controller as plain method calls.

/// Answer to a drag-start gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragVerdict {
    /// Piece may be picked up.
    Allow,
    /// Piece stays put (game over, wrong side, or a request in flight).
    Deny,
}

/// Answer to a drop gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropVerdict {
    /// Move committed; the piece stays on the target square.
    Accept,
    /// Move refused; the view returns the piece to its origin square.
    Snapback,
}

/// Rendering surface for the board position.
pub trait BoardView: Send {
    /// Repositions the board to match the given FEN.
    fn render(&mut self, fen: &str);
}
