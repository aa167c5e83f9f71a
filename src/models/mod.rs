// src/models/mod.rs
pub mod game;
pub mod player;

// Re-export commonly used types so other modules can use `crate::models::X`
pub use game::{Game, Move, MoveDraft};
pub use player::Player;

use starknet_core::types::Felt;

use crate::error::{ClientError, Result};
use crate::services::onchain;

pub(crate) fn felt_to_u128(value: &Felt, field: &str) -> Result<u128> {
    onchain::felt_to_u128(value).map_err(|_| {
        ClientError::Decode(format!(
            "Invalid numeric word for {} in ledger response",
            field
        ))
    })
}

pub(crate) fn felt_to_u64(value: &Felt, field: &str) -> Result<u64> {
    let raw = felt_to_u128(value, field)?;
    u64::try_from(raw).map_err(|_| {
        ClientError::Decode(format!(
            "Ledger value out of range for {} (expected u64)",
            field
        ))
    })
}

pub(crate) fn felt_to_u8(value: &Felt, field: &str) -> Result<u8> {
    let raw = felt_to_u128(value, field)?;
    u8::try_from(raw).map_err(|_| {
        ClientError::Decode(format!(
            "Ledger value out of range for {} (expected u8)",
            field
        ))
    })
}
