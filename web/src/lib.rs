use std::cell::RefCell;
use std::rc::Rc;

use clap::Parser;
use gloo::events::EventListener;
use gloo::utils::{document, window};
use wasm_bindgen::prelude::*;

use memorama_core::BoardConfig;

pub use board::*;
pub use dom::*;
pub use service::*;

mod board;
mod dom;
mod service;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Reveal endpoint prefix, the card position and a trailing slash are appended
    #[arg(long, default_value = HttpRevealService::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Delay before a mismatched pair is turned back down
    #[arg(long, default_value_t = BoardConfig::DEFAULT_FLIP_BACK_MS)]
    flip_back_ms: u32,

    /// Selector for the card elements
    #[arg(long, default_value = DomBoard::DEFAULT_CARD_SELECTOR)]
    card_selector: String,
}

impl Args {
    /// Parses `#-v&--flip-back-ms=600` style arguments out of the location hash.
    fn from_location() -> (Self, Option<clap::Error>) {
        let location_hash = window().location().hash().unwrap_or_default();
        match Self::try_parse_from(location_hash.split(['#', '&'])) {
            Ok(args) => (args, None),
            Err(err) => (Self::parse_from([""]), Some(err)),
        }
    }

    fn board_config(&self) -> BoardConfig {
        BoardConfig {
            flip_back_ms: self.flip_back_ms,
        }
    }
}

struct App {
    args: Args,
    board: Option<BoardHandle>,
}

impl App {
    fn mount(&mut self) {
        // dispose the previous board before binding the fresh one
        self.board = None;

        let Some(root) = document().document_element() else {
            log::error!("document has no root element");
            return;
        };
        let view = match DomBoard::query(root, &self.args.card_selector) {
            Ok(view) => view,
            Err(err) => {
                log::error!("invalid card selector {:?}: {:?}", self.args.card_selector, err);
                return;
            }
        };
        if view.cards().is_empty() {
            log::warn!("no cards match {:?}", self.args.card_selector);
        }

        let service = Rc::new(HttpRevealService::new(&self.args.endpoint));
        self.board = Some(init_board(view, service, self.args.board_config()));
    }
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

fn mount() {
    APP.with_borrow_mut(|app| match app {
        Some(app) => app.mount(),
        None => log::error!("app not started"),
    });
}

/// Rebinds the board to the cards currently in the page, e.g. after a new
/// level was rendered.
#[wasm_bindgen]
pub fn reset_board() {
    log::debug!("reset board");
    mount();
}

#[wasm_bindgen(start)]
pub fn run_app() {
    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let (args, args_err) = Args::from_location();
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level).expect("Error initializing logger");
    }
    if let Some(err) = args_err {
        log::warn!("ignoring location hash arguments: {}", err);
    }
    log::debug!("{:?}", args);

    APP.with_borrow_mut(|app| {
        *app = Some(App { args, board: None });
    });

    let document = document();
    if document.ready_state() == "loading" {
        EventListener::once(&document, "DOMContentLoaded", |_| mount()).forget();
    } else {
        mount();
    }
    log::info!("Application started");
}
