use serde::Serialize;
use starknet_core::types::Felt;

use super::felt_to_u64;
use crate::constants::PLAYER_RECORD_WORDS;
use crate::error::{ClientError, Result};

/// A player record as stored by the game contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    pub address: Felt,
    pub registered: bool,
    pub rank: u64,
    pub wins: u64,
    pub losses: u64,
}

impl Player {
    /// Decode a 5-word record `[address, registered, rank, wins, losses]`.
    pub fn decode(words: &[Felt]) -> Result<Self> {
        if words.len() < PLAYER_RECORD_WORDS {
            return Err(ClientError::Decode(format!(
                "Player record too short: got {} words",
                words.len()
            )));
        }

        Ok(Self {
            address: words[0],
            registered: words[1] != Felt::ZERO,
            rank: felt_to_u64(&words[2], "rank")?,
            wins: felt_to_u64(&words[3], "wins")?,
            losses: felt_to_u64(&words[4], "losses")?,
        })
    }

    /// An unfilled participant slot is all zeros on the wire.
    pub fn is_sentinel(&self) -> bool {
        self.address == Felt::ZERO
    }
}
