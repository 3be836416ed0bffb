use std::rc::Rc;

use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestCredentials, RequestInit, Response};

use memorama_core::RevealError;
use memorama_core::protocol::{Position, RevealResult};

/// Where a board sends its reveal requests.
pub trait RevealService {
    fn reveal(&self, position: Position) -> LocalBoxFuture<'static, Result<RevealResult, RevealError>>;
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{0}")]
    Js(String),
    #[error("Response body is not text")]
    NotText,
}

impl From<JsValue> for FetchError {
    fn from(value: JsValue) -> Self {
        let message = match value.dyn_ref::<js_sys::Error>() {
            Some(error) => String::from(error.message()),
            None => format!("{:?}", value),
        };
        Self::Js(message)
    }
}

impl From<FetchError> for RevealError {
    fn from(err: FetchError) -> Self {
        RevealError::Transport(err.to_string())
    }
}

/// `GET {endpoint}/{position}/` against the page's origin.
#[derive(Clone, Debug)]
pub struct HttpRevealService {
    endpoint: Rc<str>,
}

impl HttpRevealService {
    pub const DEFAULT_ENDPOINT: &'static str = "/game/reveal";

    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').into(),
        }
    }

    pub fn url_for(&self, position: Position) -> String {
        format!("{}/{}/", self.endpoint, position)
    }
}

impl Default for HttpRevealService {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ENDPOINT)
    }
}

impl RevealService for HttpRevealService {
    fn reveal(&self, position: Position) -> LocalBoxFuture<'static, Result<RevealResult, RevealError>> {
        let url = self.url_for(position);
        async move {
            let body = fetch_text(&url).await?;
            Ok::<_, RevealError>(RevealResult::decode(&body)?)
        }
        .boxed_local()
    }
}

async fn fetch_text(url: &str) -> Result<String, FetchError> {
    let init = RequestInit::new();
    init.set_method("GET");
    // the session cookie carries the game
    init.set_credentials(RequestCredentials::SameOrigin);
    let request = Request::new_with_str_and_init(url, &init)?;
    request.headers().set("Accept", "application/json")?;

    let response: Response = JsFuture::from(gloo::utils::window().fetch_with_request(&request))
        .await?
        .dyn_into()?;
    if !response.ok() {
        log::warn!("{} answered {} {}", url, response.status(), response.status_text());
    }

    JsFuture::from(response.text()?)
        .await?
        .as_string()
        .ok_or(FetchError::NotText)
}
