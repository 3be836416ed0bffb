use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Response body is not a valid reveal result: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, ProtocolError>;
