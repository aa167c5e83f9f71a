/// Application constants

// Board geometry (ledger-defined)
pub const BOARD_SIZE: usize = 8;

// Cell codes stored per board position
pub const CELL_EMPTY: u8 = 0;
pub const CELL_WHITE_PAWN: u8 = 1;
pub const CELL_WHITE_KING: u8 = 2;
pub const CELL_BLACK_PAWN: u8 = 3;
pub const CELL_BLACK_KING: u8 = 4;

// Wire layout of the word arrays returned by the game contract
pub const PLAYER_RECORD_WORDS: usize = 5;
pub const GAME_RECORD_WORDS: usize = 5 + 2 * PLAYER_RECORD_WORDS + 1 + BOARD_SIZE * BOARD_SIZE;

// Fixed payment attached to `register`, in stake-token base units
pub const REGISTRATION_FEE: u128 = 2_000_000_000_000_000_000;

// Entrypoints the configured game contract class must expose
pub const REQUIRED_ENTRYPOINTS: [&str; 7] = [
    "get_admin_address",
    "get_player",
    "get_sender_games",
    "register",
    "create_game",
    "join_game",
    "make_move",
];

pub const ABI_CACHE_TTL_SECS: u64 = 300;
pub const RECEIPT_POLL_INTERVAL_MS: u64 = 2_000;
