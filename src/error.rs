use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Identity unavailable: {0}")]
    IdentityUnavailable(String),

    #[error("Ledger RPC error: {0}")]
    Rpc(String),

    #[error("Transaction rejected: {0}")]
    WriteRejected(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Malformed ledger data: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
