//! Client library for the on-chain checkers game: typed decoding of
//! contract state, pure UI projections over it, and the
//! submit-then-refetch lifecycle for state-changing actions.

pub mod board;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod projection;
pub mod services;
pub mod session;

pub use error::{ClientError, Result};
pub use session::{Action, Session};
