//! Tests for the session controller state machine.

use chess_session::{
    BoardView, DragVerdict, DropVerdict, MoveRequest, MoveResponse, MoveService, Phase,
    RemoteError, SessionController,
};
use shakmaty::{Color, Square};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Board view that records every rendered FEN.
#[derive(Clone, Default)]
struct RecordingView {
    renders: Arc<Mutex<Vec<String>>>,
}

impl BoardView for RecordingView {
    fn render(&mut self, fen: &str) {
        self.renders.lock().unwrap().push(fen.to_string());
    }
}

impl RecordingView {
    fn rendered(&self) -> Vec<String> {
        self.renders.lock().unwrap().clone()
    }
}

/// Move service that replays scripted replies and records requests.
#[derive(Clone, Default)]
struct ScriptedService {
    replies: Arc<Mutex<VecDeque<Result<MoveResponse, RemoteError>>>>,
    requests: Arc<Mutex<Vec<MoveRequest>>>,
}

impl ScriptedService {
    fn push_move(&self, notation: &str) {
        self.replies.lock().unwrap().push_back(Ok(MoveResponse {
            ai_move: Some(notation.to_string()),
            game_over: false,
            result: None,
        }));
    }

    fn push_game_over(&self, result: Option<&str>) {
        self.replies.lock().unwrap().push_back(Ok(MoveResponse {
            ai_move: None,
            game_over: true,
            result: result.map(str::to_string),
        }));
    }

    fn push_failure(&self) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(RemoteError::Transport {
                message: "connection refused".to_string(),
            }));
    }

    fn requests(&self) -> Vec<MoveRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl MoveService for ScriptedService {
    async fn request_counter_move(
        &self,
        request: MoveRequest,
    ) -> Result<MoveResponse, RemoteError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted service ran out of replies")
    }
}

fn session(
    view: &RecordingView,
    service: &ScriptedService,
) -> SessionController {
    SessionController::new(Box::new(view.clone()), Box::new(service.clone()))
}

/// Plays one human move through the drag hooks, panicking on a snapback.
async fn play(controller: &mut SessionController, from: Square, to: Square) {
    assert_eq!(
        controller.on_drag_start(controller.game().turn()),
        DragVerdict::Allow
    );
    assert_eq!(controller.on_drop(from, to).await, DropVerdict::Accept);
}

#[tokio::test]
async fn opening_move_sends_request_and_applies_reply() {
    let view = RecordingView::default();
    let service = ScriptedService::default();
    service.push_move("e7e5");
    let mut controller = session(&view, &service);

    play(&mut controller, Square::E2, Square::E4).await;

    // Request carries the post-e4 position and the SAN just played.
    let requests = service.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].san, "e4");
    assert!(requests[0]
        .fen
        .starts_with("rnbqkbnr/pppppppp/8/8/4P3/8/PPPPPPPP/RNBQKBNR b"));

    // The engine's e7-e5 was applied and rendered.
    assert_eq!(controller.status().line, "White to move");
    assert_eq!(controller.status().transcript, "1. e4 e5");
    assert_eq!(controller.game().turn(), Color::White);
    assert_eq!(controller.phase(), Phase::Idle);

    let rendered = view.rendered();
    assert_eq!(rendered.len(), 1);
    assert!(rendered[0].starts_with("rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPPPPPP/RNBQKBNR w"));
}

#[tokio::test]
async fn status_after_human_move_awaits_the_engine() {
    let view = RecordingView::default();
    let service = ScriptedService::default();
    service.push_move("a7a6");
    let mut controller = session(&view, &service);

    play(&mut controller, Square::E2, Square::E4).await;

    // Once the scripted reply lands the status reflects Black's reply.
    assert_eq!(controller.status().line, "White to move");
}

#[tokio::test]
async fn drag_denied_for_the_side_not_on_turn() {
    let view = RecordingView::default();
    let service = ScriptedService::default();
    let mut controller = session(&view, &service);

    assert_eq!(controller.on_drag_start(Color::Black), DragVerdict::Deny);
    assert_eq!(controller.phase(), Phase::Idle);
}

#[tokio::test]
async fn illegal_drop_snaps_back_without_mutation() {
    let view = RecordingView::default();
    let service = ScriptedService::default();
    let mut controller = session(&view, &service);
    let before = controller.game().fen();

    assert_eq!(controller.on_drag_start(Color::White), DragVerdict::Allow);
    assert_eq!(
        controller.on_drop(Square::E2, Square::E5).await,
        DropVerdict::Snapback
    );

    assert_eq!(controller.game().fen(), before);
    assert_eq!(controller.game().turn(), Color::White);
    assert_eq!(controller.phase(), Phase::Idle);
    assert!(service.requests().is_empty());
}

#[tokio::test]
async fn drop_without_a_drag_in_progress_is_refused() {
    let view = RecordingView::default();
    let service = ScriptedService::default();
    let mut controller = session(&view, &service);
    let before = controller.game().fen();

    assert_eq!(
        controller.on_drop(Square::E2, Square::E4).await,
        DropVerdict::Snapback
    );

    assert_eq!(controller.game().fen(), before);
    assert!(service.requests().is_empty());
}

#[tokio::test]
async fn transport_failure_keeps_the_committed_move() {
    let view = RecordingView::default();
    let service = ScriptedService::default();
    service.push_failure();
    let mut controller = session(&view, &service);

    play(&mut controller, Square::E2, Square::E4).await;

    assert_eq!(controller.status().line, "Error connecting to engine");
    // No rollback: the human's move stands and Black is to move.
    assert_eq!(controller.game().turn(), Color::Black);
    assert_eq!(controller.game().history().len(), 1);
    assert_eq!(controller.phase(), Phase::Idle);
}

#[tokio::test]
async fn engine_game_over_reply_ends_the_round() {
    let view = RecordingView::default();
    let service = ScriptedService::default();
    service.push_game_over(Some("1/2-1/2"));
    let mut controller = session(&view, &service);

    play(&mut controller, Square::E2, Square::E4).await;

    assert_eq!(controller.status().line, "Game over, 1/2-1/2");
    // No further move was applied; the board stays at the human's position.
    assert_eq!(controller.game().history().len(), 1);
    assert_eq!(controller.phase(), Phase::Idle);
    assert!(view.rendered().is_empty());
}

#[tokio::test]
async fn unplayable_engine_reply_is_recoverable() {
    let view = RecordingView::default();
    let service = ScriptedService::default();
    service.push_move("e9e9");
    let mut controller = session(&view, &service);

    play(&mut controller, Square::E2, Square::E4).await;

    assert_eq!(controller.status().line, "Engine sent an unplayable move");
    assert_eq!(controller.game().turn(), Color::Black);
    assert_eq!(controller.game().history().len(), 1);
    assert_eq!(controller.phase(), Phase::Idle);
}

#[tokio::test]
async fn permissive_parsing_accepts_san_replies() {
    let view = RecordingView::default();
    let service = ScriptedService::default();
    service.push_move("Nf6");
    let mut controller = session(&view, &service);

    play(&mut controller, Square::E2, Square::E4).await;

    assert_eq!(controller.status().transcript, "1. e4 Nf6");
    assert_eq!(controller.game().turn(), Color::White);
}

#[tokio::test]
async fn human_checkmate_issues_no_request() {
    let view = RecordingView::default();
    let service = ScriptedService::default();
    service.push_move("e7e5");
    service.push_move("b8c6");
    service.push_move("g8f6");
    let mut controller = session(&view, &service);

    // Scholar's mate: the final Qxf7 must not go out to the engine.
    play(&mut controller, Square::E2, Square::E4).await;
    play(&mut controller, Square::F1, Square::C4).await;
    play(&mut controller, Square::D1, Square::H5).await;
    play(&mut controller, Square::H5, Square::F7).await;

    assert_eq!(service.requests().len(), 3);
    assert_eq!(controller.status().line, "Game over, Black is in checkmate.");
    assert_eq!(controller.game().turn(), Color::Black);
    assert_eq!(controller.phase(), Phase::Idle);

    // And the board is no longer draggable.
    assert_eq!(controller.on_drag_start(Color::Black), DragVerdict::Deny);
}

#[tokio::test]
async fn snap_end_renders_the_current_position() {
    let view = RecordingView::default();
    let service = ScriptedService::default();
    let mut controller = session(&view, &service);

    controller.on_snap_end();

    let rendered = view.rendered();
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0], controller.game().fen());
}

#[tokio::test]
async fn side_to_move_alternates_with_history_length() {
    let view = RecordingView::default();
    let service = ScriptedService::default();
    service.push_move("e7e5");
    service.push_move("g8f6");
    let mut controller = session(&view, &service);

    play(&mut controller, Square::E2, Square::E4).await;
    play(&mut controller, Square::B1, Square::C3).await;

    // Even history length means White to move.
    assert_eq!(controller.game().history().len() % 2, 0);
    assert_eq!(controller.game().turn(), Color::White);
}
