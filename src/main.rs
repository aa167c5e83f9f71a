use std::io::Write as _;

use starknet_core::types::Felt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use checkers_client::board::{decode_board, CellView};
use checkers_client::config::Config;
use checkers_client::error::{ClientError, Result};
use checkers_client::models::{Game, MoveDraft};
use checkers_client::projection::{self, GameOutcome};
use checkers_client::services::identity::WalletIdentity;
use checkers_client::services::onchain::CheckersContract;
use checkers_client::session::{Action, Session};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "checkers_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!("Starting checkers client");
    tracing::info!("Environment: {}", config.environment);
    if config.is_testnet() {
        tracing::info!("Running against a test network");
    }

    let contract = CheckersContract::from_config(&config)?;
    if let Err(e) = contract.ensure_abi().await {
        tracing::warn!("Contract entrypoint check failed: {}", e);
    }
    let identity = WalletIdentity::from_config(&config)?;

    let mut session = Session::new();
    session.fetch_admin(&contract).await;
    if let Err(e) = session.refresh(&identity, &contract).await {
        tracing::warn!("Initial refresh failed: {}", e);
    }

    render_account(&session);
    render_player(&session);
    run_shell(&mut session, &identity, &contract).await
}

async fn run_shell(
    session: &mut Session,
    identity: &WalletIdentity,
    contract: &CheckersContract,
) -> anyhow::Result<()> {
    println!("Type `help` for the command list.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = lines.next_line().await? else {
            return Ok(());
        };
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = parts.split_first() else {
            continue;
        };

        let outcome = match command {
            "help" => {
                print_help();
                Ok(())
            }
            "quit" | "exit" => return Ok(()),
            "refresh" => session.refresh(identity, contract).await,
            "player" => {
                render_account(session);
                render_player(session);
                Ok(())
            }
            "games" => {
                render_games(session);
                Ok(())
            }
            "open" => open_game(session, args),
            "board" => {
                render_open_game(session);
                Ok(())
            }
            "from" => set_coords(&mut session.pending_move, args, true),
            "to" => set_coords(&mut session.pending_move, args, false),
            "move" => submit_move(session, identity, contract).await,
            "register" => session.submit(identity, contract, Action::Register).await,
            "create" => create_game(session, identity, contract, args).await,
            "join" => join_game(session, identity, contract, args).await,
            "dump" => {
                dump_session(session);
                Ok(())
            }
            _ => {
                println!("Unknown command: {command}");
                Ok(())
            }
        };

        if let Err(e) = outcome {
            println!("{e}");
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  refresh             re-fetch account, player and games");
    println!("  player              show the selected account and player stats");
    println!("  games               list your games");
    println!("  open <id>           open a game for playing");
    println!("  board               render the opened game's board");
    println!("  from <x> <y>        set the source cell of the next move");
    println!("  to <x> <y>          set the target cell of the next move");
    println!("  move                submit the drafted move");
    println!("  register            register the selected account");
    println!("  create <stake>      create a game with the given stake");
    println!("  join <id>           join a game, paying its stake");
    println!("  dump                print the session state as JSON");
    println!("  quit                exit");
}

fn render_account(session: &Session) {
    match session.selected_account {
        Some(account) => println!("Currently selected account: {account:#x}"),
        None => println!("Currently selected account: (none)"),
    }
}

fn render_player(session: &Session) {
    let Some(player) = &session.player else {
        println!("No player record fetched yet.");
        return;
    };
    if !player.registered {
        println!("User not registered: run `register`.");
        return;
    }
    println!(
        "Player rank: {}  wins: {}  losses: {}",
        player.rank, player.wins, player.losses
    );
    if projection::is_admin(session.player.as_ref(), session.admin_account) {
        println!("You administer the game contract: `create <stake>` is available.");
    }
}

fn render_games(session: &Session) {
    if session.games.is_empty() {
        println!("No games fetched.");
        return;
    }
    let viewer = session.selected_account;
    for game in &session.games {
        let mut notes: Vec<&str> = Vec::new();
        if projection::is_waiting(game, viewer) {
            notes.push("waiting for an opponent");
        }
        if projection::can_join(game, viewer) {
            notes.push("joinable");
        }
        if projection::can_play(game, viewer) {
            notes.push("playable");
        }
        if projection::has_ended(game) {
            notes.push("ended");
        }
        if projection::is_open(game, session.open_game_id) {
            notes.push("open");
        }
        println!(
            "Game {} | stake {} | players {}/2 | {}",
            game.id,
            game.stake,
            projection::player_count(game),
            notes.join(", ")
        );
    }
}

fn render_open_game(session: &Session) {
    let Some(game) = session.open_game() else {
        println!("No game opened; use `open <id>`.");
        return;
    };
    render_board(game, session.selected_account);
}

fn render_board(game: &Game, viewer: Option<Felt>) {
    let side = projection::viewer_side(game, viewer);
    let view = decode_board(&game.board, side);

    println!("    0 1 2 3 4 5 6 7");
    for (y, row) in view.iter().enumerate() {
        let cells: Vec<&str> = row.iter().map(|cell| cell_glyph(*cell)).collect();
        println!("  {} {}", y, cells.join(" "));
    }

    if projection::has_ended(game) {
        match projection::outcome(game, viewer) {
            Some(GameOutcome::Won) => println!("You won!"),
            _ => println!("You lost!"),
        }
    } else if projection::is_my_turn(game, viewer) {
        println!("Turn: you");
    } else {
        println!("Turn: enemy");
    }
}

// Four highlight classes: own pieces green, enemy pieces red, kings bright.
fn cell_glyph(cell: CellView) -> &'static str {
    match cell {
        CellView::Empty => "\u{00b7}",
        CellView::OwnPawn => "\x1b[32mo\x1b[0m",
        CellView::OwnKing => "\x1b[92mO\x1b[0m",
        CellView::EnemyPawn => "\x1b[31mx\x1b[0m",
        CellView::EnemyKing => "\x1b[91mX\x1b[0m",
    }
}

fn open_game(session: &mut Session, args: &[&str]) -> Result<()> {
    let game_id = parse_arg::<u64>(args.first(), "game id")?;
    if session.game(game_id).is_none() {
        return Err(ClientError::Validation(format!(
            "Unknown game id {}",
            game_id
        )));
    }
    session.open_game_id = Some(game_id);
    Ok(())
}

fn set_coords(draft: &mut MoveDraft, args: &[&str], from: bool) -> Result<()> {
    let x = parse_arg::<u8>(args.first(), "x")?;
    let y = parse_arg::<u8>(args.get(1), "y")?;
    if from {
        draft.from_x = Some(x);
        draft.from_y = Some(y);
    } else {
        draft.to_x = Some(x);
        draft.to_y = Some(y);
    }
    Ok(())
}

async fn submit_move(
    session: &mut Session,
    identity: &WalletIdentity,
    contract: &CheckersContract,
) -> Result<()> {
    let game_id = session.open_game_id.ok_or_else(|| {
        ClientError::Validation("No game opened; use `open <id>`".to_string())
    })?;
    session
        .submit(identity, contract, Action::MakeMove { game_id })
        .await
}

async fn create_game(
    session: &mut Session,
    identity: &WalletIdentity,
    contract: &CheckersContract,
    args: &[&str],
) -> Result<()> {
    let stake = parse_arg::<u128>(args.first(), "stake")?;
    session
        .submit(identity, contract, Action::CreateGame { stake })
        .await
}

async fn join_game(
    session: &mut Session,
    identity: &WalletIdentity,
    contract: &CheckersContract,
    args: &[&str],
) -> Result<()> {
    let game_id = parse_arg::<u64>(args.first(), "game id")?;
    session
        .submit(identity, contract, Action::JoinGame { game_id })
        .await
}

fn dump_session(session: &Session) {
    match serde_json::to_string_pretty(session) {
        Ok(json) => println!("{json}"),
        Err(e) => println!("Could not serialize session: {e}"),
    }
}

fn parse_arg<T: std::str::FromStr>(value: Option<&&str>, field: &str) -> Result<T> {
    value
        .ok_or_else(|| ClientError::Validation(format!("{} is required", field)))?
        .parse::<T>()
        .map_err(|_| ClientError::Validation(format!("Invalid {}", field)))
}
