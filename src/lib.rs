//! Chess session library - client-side controller for play against a
//! remote engine.
//!
//! # Architecture
//!
//! - **Controller**: state machine for the turn cycle (drag, drop,
//!   counter-move request, re-render)
//! - **Game**: rules engine adapter over `shakmaty`, sole owner of the
//!   position and history
//! - **Status**: derives the display status and movetext transcript
//! - **Remote**: `POST /move` protocol client
//! - **Server/Engine**: HTTP face of the move service with a pluggable
//!   counter-move engine
//!
//! # Example
//!
//! ```no_run
//! use chess_session::{BoardView, HttpMoveService, SessionController};
//!
//! struct Headless;
//!
//! impl BoardView for Headless {
//!     fn render(&mut self, _fen: &str) {}
//! }
//!
//! # async fn example() {
//! let service = HttpMoveService::new("http://127.0.0.1:5000");
//! let session = SessionController::new(Box::new(Headless), Box::new(service));
//! # drop(session);
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod board;
mod controller;
mod engine;
mod game;
mod remote;
mod server;
mod status;

// Crate-level exports - Board view seam
pub use board::{BoardView, DragVerdict, DropVerdict};

// Crate-level exports - Session controller
pub use controller::{Phase, SessionController};

// Crate-level exports - Counter-move engines
pub use engine::{CounterMoveEngine, EngineError, RandomEngine};

// Crate-level exports - Game state
pub use game::{Game, GameError, PlayedMove};

// Crate-level exports - Remote move protocol
pub use remote::{HttpMoveService, MoveRequest, MoveResponse, MoveService, RemoteError};

// Crate-level exports - Move server
pub use server::{router, serve, ErrorReply};

// Crate-level exports - Status presenter
pub use status::{color_name, SessionStatus};
