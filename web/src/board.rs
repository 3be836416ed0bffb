use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use wasm_bindgen_futures::spawn_local;

use memorama_core::protocol::{Position, RevealResult};
use memorama_core::{BoardConfig, BoardController, FlipBack, RevealError, RevealTicket, RevealUpdate};

use crate::dom::DomBoard;
use crate::service::RevealService;

struct BoardState {
    controller: BoardController,
    view: DomBoard,
    /// Dropping the timeout cancels it.
    flip_back: Option<Timeout>,
}

type SharedState = Rc<RefCell<BoardState>>;

/// A bound board. Dropping it (or calling [`BoardHandle::dispose`]) detaches
/// every click listener, cancels a pending flip-back and makes in-flight
/// responses no-ops.
pub struct BoardHandle {
    state: SharedState,
    listeners: Vec<EventListener>,
}

impl BoardHandle {
    pub fn card_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn dispose(self) {}
}

impl Drop for BoardHandle {
    fn drop(&mut self) {
        self.listeners.clear();
        match self.state.try_borrow_mut() {
            Ok(mut board) => {
                board.flip_back = None;
                board.controller.dispose();
            }
            Err(_) => log::error!("board disposed while rendering"),
        }
        log::debug!("board disposed");
    }
}

/// Binds a click listener to every card of `view`.
pub fn init_board(view: DomBoard, service: Rc<dyn RevealService>, config: BoardConfig) -> BoardHandle {
    let cards = view.cards().clone();
    let state = Rc::new(RefCell::new(BoardState {
        controller: BoardController::new(config),
        view,
        flip_back: None,
    }));

    let listeners: Vec<_> = cards
        .iter()
        .map(|(position, element)| {
            let state = Rc::clone(&state);
            let service = Rc::clone(&service);
            EventListener::new(element, "click", move |_| {
                on_card_click(&state, service.as_ref(), position)
            })
        })
        .collect();
    log::info!("board bound to {} cards", listeners.len());

    BoardHandle { state, listeners }
}

fn on_card_click(state: &SharedState, service: &dyn RevealService, position: Position) {
    let ticket = {
        let mut board = state.borrow_mut();
        board.flip_back = None;
        board.controller.begin_reveal(position)
    };
    log::debug!("reveal {} ({:?})", position, ticket.generation());

    let request = service.reveal(position);
    let state = Rc::clone(state);
    spawn_local(async move {
        let response = request.await;
        apply_response(&state, ticket, response);
    });
}

fn apply_response(state: &SharedState, ticket: RevealTicket, response: Result<RevealResult, RevealError>) {
    if let Ok(result) = &response {
        log::debug!("server response for {}: {:?}", ticket.position(), result);
    }

    let mut board = state.borrow_mut();
    match board.controller.complete_reveal(ticket, response) {
        Ok(RevealUpdate::Render { plan, flip_back }) => {
            board.view.apply(&plan);
            board.flip_back = flip_back.map(|flip_back| schedule_flip_back(state, flip_back));
        }
        Ok(RevealUpdate::Discarded(reason)) => {
            log::debug!("response for {} discarded: {:?}", ticket.position(), reason);
        }
        Ok(RevealUpdate::Ignored { message }) => {
            log::debug!("reveal of {} ignored: {}", ticket.position(), message.as_deref().unwrap_or("-"));
        }
        Err(err) => log::error!("reveal of {} failed: {}", ticket.position(), err),
    }
}

fn schedule_flip_back(state: &SharedState, flip_back: FlipBack) -> Timeout {
    // weak, the state owns this timeout
    let state = Rc::downgrade(state);
    Timeout::new(flip_back.delay_ms, move || {
        let Some(state) = state.upgrade() else {
            return;
        };
        let mut board = state.borrow_mut();
        if let Some(plan) = board.controller.take_flip_back(flip_back.token) {
            log::debug!("flip back");
            board.view.apply(&plan);
        }
    })
}
