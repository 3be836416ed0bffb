pub use board::*;
pub use error::*;
pub use face::*;
pub use plan::*;

pub use memorama_protocol as protocol;

mod board;
mod error;
mod face;
mod plan;
