//! Pure predicates over a game record and the locally selected account.
//!
//! Nothing here touches the ledger or mutates state; every function is a
//! read-only derivation, so the rendering layer can call them per frame.

use serde::Serialize;
use starknet_core::types::Felt;

use crate::board::Side;
use crate::models::{Game, Player};

/// How many participant slots are filled (0, 1 or 2).
pub fn player_count(game: &Game) -> u8 {
    if game.players[0].is_sentinel() {
        0
    } else if game.players[1].is_sentinel() {
        1
    } else {
        2
    }
}

/// The viewer created this game and is still waiting for an opponent.
pub fn is_waiting(game: &Game, viewer: Option<Felt>) -> bool {
    if game.started {
        return false;
    }
    viewer.is_some_and(|account| game.players[0].address == account)
}

/// Anyone but the creator may join an unstarted game. Permissive toward
/// unauthenticated reads; submission is gated on identity, not projection.
pub fn can_join(game: &Game, viewer: Option<Felt>) -> bool {
    if game.started {
        return false;
    }
    viewer.is_none_or(|account| game.players[0].address != account)
}

/// The viewer occupies a slot in a started game.
pub fn can_play(game: &Game, viewer: Option<Felt>) -> bool {
    if !game.started {
        return false;
    }
    viewer.is_some_and(|account| {
        game.players[0].address == account || game.players[1].address == account
    })
}

/// The game the user is actively viewing.
pub fn is_open(game: &Game, open_game_id: Option<u64>) -> bool {
    open_game_id == Some(game.id)
}

/// Side assignment is positional: the creator (slot 0) plays white.
pub fn is_white_side(game: &Game, viewer: Option<Felt>) -> bool {
    viewer.is_some_and(|account| game.players[0].address == account)
}

pub fn viewer_side(game: &Game, viewer: Option<Felt>) -> Side {
    if is_white_side(game, viewer) {
        Side::White
    } else {
        Side::Black
    }
}

/// The turn indicator selects a slot; the viewer holds the turn when that
/// slot's address is theirs.
pub fn is_my_turn(game: &Game, viewer: Option<Felt>) -> bool {
    let slot = if game.turn == 0 { 0 } else { 1 };
    viewer.is_some_and(|account| game.players[slot].address == account)
}

pub fn has_ended(game: &Game) -> bool {
    game.ended
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameOutcome {
    Won,
    Lost,
}

/// Outcome for the viewer, only once the game has ended. The contract
/// leaves the winner in the turn slot at the terminal state.
pub fn outcome(game: &Game, viewer: Option<Felt>) -> Option<GameOutcome> {
    if !game.ended {
        return None;
    }
    Some(if is_my_turn(game, viewer) {
        GameOutcome::Won
    } else {
        GameOutcome::Lost
    })
}

/// The fetched player is the contract administrator.
pub fn is_admin(player: Option<&Player>, admin_account: Option<Felt>) -> bool {
    match (player, admin_account) {
        (Some(player), Some(admin)) => player.address == admin,
        _ => false,
    }
}
