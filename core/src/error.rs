use memorama_protocol::ProtocolError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RevealError {
    #[error("Reveal request failed: {0}")]
    Transport(String),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("Server rejected the reveal: {0}")]
    Server(String),
    #[error("Response carries no game state")]
    MissingGameState,
}

pub type Result<T> = core::result::Result<T, RevealError>;
