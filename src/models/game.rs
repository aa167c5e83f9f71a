use serde::Serialize;
use starknet_core::types::Felt;

use super::player::Player;
use super::{felt_to_u128, felt_to_u64, felt_to_u8};
use crate::constants::{BOARD_SIZE, GAME_RECORD_WORDS, PLAYER_RECORD_WORDS};
use crate::error::{ClientError, Result};

/// A game record as stored by the game contract.
///
/// Slot 0 of `players` is the creator/first joiner, slot 1 the second
/// joiner; an unfilled slot decodes to the zero-address sentinel. `turn`
/// is 0 while slot 0 is to move and 1 while slot 1 is to move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Game {
    pub id: u64,
    pub created: bool,
    pub started: bool,
    pub ended: bool,
    pub stake: u128,
    pub players: [Player; 2],
    pub turn: u8,
    pub board: [[u8; BOARD_SIZE]; BOARD_SIZE],
}

impl Game {
    /// Decode one game record:
    /// `[id, created, started, ended, stake, slot0, slot1, turn, board..]`.
    pub fn decode(words: &[Felt]) -> Result<Self> {
        if words.len() < GAME_RECORD_WORDS {
            return Err(ClientError::Decode(format!(
                "Game record too short: got {} words, expected {}",
                words.len(),
                GAME_RECORD_WORDS
            )));
        }

        let id = felt_to_u64(&words[0], "id")?;
        let created = words[1] != Felt::ZERO;
        let started = words[2] != Felt::ZERO;
        let ended = words[3] != Felt::ZERO;
        let stake = felt_to_u128(&words[4], "stake")?;

        let slot0 = Player::decode(&words[5..5 + PLAYER_RECORD_WORDS])?;
        let slot1 = Player::decode(&words[5 + PLAYER_RECORD_WORDS..5 + 2 * PLAYER_RECORD_WORDS])?;

        let turn_offset = 5 + 2 * PLAYER_RECORD_WORDS;
        let turn = felt_to_u8(&words[turn_offset], "turn")?;

        let mut board = [[0u8; BOARD_SIZE]; BOARD_SIZE];
        for (i, word) in words[turn_offset + 1..GAME_RECORD_WORDS].iter().enumerate() {
            board[i / BOARD_SIZE][i % BOARD_SIZE] = felt_to_u8(word, "board cell")?;
        }

        Ok(Self {
            id,
            created,
            started,
            ended,
            stake,
            players: [slot0, slot1],
            turn,
            board,
        })
    }

    /// Decode a length-prefixed array of game records.
    pub fn decode_list(words: &[Felt]) -> Result<Vec<Self>> {
        let Some((count, mut rest)) = words.split_first() else {
            return Err(ClientError::Decode(
                "Game list is missing its length prefix".to_string(),
            ));
        };
        let count = felt_to_u64(count, "game count")?;

        let mut games = Vec::new();
        for _ in 0..count {
            if rest.len() < GAME_RECORD_WORDS {
                return Err(ClientError::Decode(
                    "Game list shorter than its length prefix".to_string(),
                ));
            }
            games.push(Self::decode(&rest[..GAME_RECORD_WORDS])?);
            rest = &rest[GAME_RECORD_WORDS..];
        }
        Ok(games)
    }
}

/// A move ready for submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Move {
    pub game_id: u64,
    pub from_x: u8,
    pub from_y: u8,
    pub to_x: u8,
    pub to_y: u8,
}

/// The pending-move input buffer. Coordinates stay unset until provided;
/// `finalize` refuses drafts with holes, so nothing incomplete reaches the
/// ledger.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct MoveDraft {
    pub from_x: Option<u8>,
    pub from_y: Option<u8>,
    pub to_x: Option<u8>,
    pub to_y: Option<u8>,
}

impl MoveDraft {
    pub fn finalize(&self, game_id: u64) -> Result<Move> {
        Ok(Move {
            game_id,
            from_x: require_coord(self.from_x, "from_x")?,
            from_y: require_coord(self.from_y, "from_y")?,
            to_x: require_coord(self.to_x, "to_x")?,
            to_y: require_coord(self.to_y, "to_y")?,
        })
    }
}

fn require_coord(value: Option<u8>, field: &str) -> Result<u8> {
    let value =
        value.ok_or_else(|| ClientError::Validation(format!("{} is required", field)))?;
    if (value as usize) >= BOARD_SIZE {
        return Err(ClientError::Validation(format!(
            "Cell out of bounds: {} = {}",
            field, value
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_words(address: u64) -> Vec<Felt> {
        vec![
            Felt::from(address),
            if address == 0 { Felt::ZERO } else { Felt::ONE },
            Felt::ZERO,
            Felt::ZERO,
            Felt::ZERO,
        ]
    }

    fn game_words(id: u64, started: bool, slot0: u64, slot1: u64, turn: u64) -> Vec<Felt> {
        let mut words = vec![
            Felt::from(id),
            Felt::ONE,
            if started { Felt::ONE } else { Felt::ZERO },
            Felt::ZERO,
            Felt::from(1_000_u64),
        ];
        words.extend(player_words(slot0));
        words.extend(player_words(slot1));
        words.push(Felt::from(turn));
        words.extend(std::iter::repeat(Felt::ZERO).take(BOARD_SIZE * BOARD_SIZE));
        words
    }

    #[test]
    fn decodes_a_full_record() {
        let mut words = game_words(9, true, 0xaa, 0xbb, 1);
        // drop a white pawn on (2, 0) and a black king on (3, 7)
        let turn_offset = 5 + 2 * PLAYER_RECORD_WORDS;
        words[turn_offset + 1 + 2] = Felt::from(1_u64);
        words[turn_offset + 1 + 7 * BOARD_SIZE + 3] = Felt::from(4_u64);

        let game = Game::decode(&words).unwrap();
        assert_eq!(game.id, 9);
        assert!(game.created);
        assert!(game.started);
        assert!(!game.ended);
        assert_eq!(game.stake, 1_000);
        assert_eq!(game.players[0].address, Felt::from(0xaa_u64));
        assert_eq!(game.players[1].address, Felt::from(0xbb_u64));
        assert_eq!(game.turn, 1);
        assert_eq!(game.board[0][2], 1);
        assert_eq!(game.board[7][3], 4);
    }

    #[test]
    fn truncated_record_is_rejected() {
        let mut words = game_words(1, false, 0xaa, 0, 0);
        words.truncate(GAME_RECORD_WORDS - 1);
        match Game::decode(&words) {
            Err(ClientError::Decode(msg)) => assert!(msg.contains("too short")),
            other => panic!("expected Decode error, got {other:?}"),
        }
    }

    #[test]
    fn decodes_a_length_prefixed_list() {
        let mut words = vec![Felt::from(2_u64)];
        words.extend(game_words(1, false, 0xaa, 0, 0));
        words.extend(game_words(2, true, 0xaa, 0xbb, 0));

        let games = Game::decode_list(&words).unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].id, 1);
        assert_eq!(games[1].id, 2);
        assert!(games[1].started);
    }

    #[test]
    fn list_shorter_than_prefix_is_rejected() {
        let mut words = vec![Felt::from(2_u64)];
        words.extend(game_words(1, false, 0xaa, 0, 0));
        match Game::decode_list(&words) {
            Err(ClientError::Decode(msg)) => assert!(msg.contains("length prefix")),
            other => panic!("expected Decode error, got {other:?}"),
        }
    }

    #[test]
    fn empty_list_decodes_to_no_games() {
        let games = Game::decode_list(&[Felt::ZERO]).unwrap();
        assert!(games.is_empty());
    }

    #[test]
    fn draft_with_a_hole_fails_validation() {
        let draft = MoveDraft {
            from_x: None,
            from_y: Some(2),
            to_x: Some(3),
            to_y: Some(3),
        };
        match draft.finalize(1) {
            Err(ClientError::Validation(msg)) => assert!(msg.contains("from_x")),
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn draft_with_out_of_range_coordinate_fails_validation() {
        let draft = MoveDraft {
            from_x: Some(2),
            from_y: Some(2),
            to_x: Some(8),
            to_y: Some(3),
        };
        match draft.finalize(1) {
            Err(ClientError::Validation(msg)) => assert!(msg.contains("to_x")),
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn complete_draft_finalizes() {
        let draft = MoveDraft {
            from_x: Some(2),
            from_y: Some(5),
            to_x: Some(3),
            to_y: Some(4),
        };
        let mv = draft.finalize(42).unwrap();
        assert_eq!(mv.game_id, 42);
        assert_eq!(mv.from_x, 2);
        assert_eq!(mv.to_y, 4);
    }
}
