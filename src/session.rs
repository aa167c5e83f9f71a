//! Session state and the two entry points the rendering layer drives:
//! `refresh` (the fetch pipeline) and `submit` (the write coordinator).
//!
//! The session holds the last successfully fetched ledger snapshots plus
//! the locally held UI inputs. It is the only mutable state in the client,
//! and only the functions here write to it; projections and the board
//! decoder read borrowed views.

use serde::Serialize;
use starknet_core::types::Felt;

use crate::error::{ClientError, Result};
use crate::models::{Game, MoveDraft, Player};
use crate::services::identity::IdentityProvider;
use crate::services::onchain::LedgerGateway;

#[derive(Debug, Default, Serialize)]
pub struct Session {
    pub selected_account: Option<Felt>,
    pub admin_account: Option<Felt>,
    pub player: Option<Player>,
    pub games: Vec<Game>,
    pub open_game_id: Option<u64>,
    pub pending_move: MoveDraft,
}

/// A state-changing action against the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Register,
    CreateGame { stake: u128 },
    JoinGame { game_id: u64 },
    MakeMove { game_id: u64 },
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn game(&self, game_id: u64) -> Option<&Game> {
        self.games.iter().find(|game| game.id == game_id)
    }

    pub fn open_game(&self) -> Option<&Game> {
        self.open_game_id.and_then(|id| self.game(id))
    }

    /// Re-read everything the ledger holds for the selected identity.
    ///
    /// Identity resolution failure aborts the whole refresh. The player and
    /// game-list fetches are isolated from each other: whichever succeeds
    /// updates the session, whichever fails leaves its previous snapshot in
    /// place and is logged as a diagnostic.
    pub async fn refresh<I, G>(&mut self, identity: &I, gateway: &G) -> Result<()>
    where
        I: IdentityProvider + ?Sized,
        G: LedgerGateway + ?Sized,
    {
        let account = match identity.selected_address().await {
            Ok(account) => account,
            Err(e) => {
                tracing::warn!("Error when fetching the selected account: {}", e);
                return Err(e);
            }
        };
        self.selected_account = Some(account);

        match gateway.player(account).await {
            Ok(player) => self.player = Some(player),
            Err(e) => tracing::warn!("Error when fetching player: {}", e),
        }

        match gateway.sender_games(account).await {
            Ok(games) => self.games = games,
            Err(e) => tracing::warn!("Error when fetching games: {}", e),
        }

        Ok(())
    }

    /// One-shot read of the contract administrator, done at startup.
    pub async fn fetch_admin<G>(&mut self, gateway: &G)
    where
        G: LedgerGateway + ?Sized,
    {
        match gateway.admin_address().await {
            Ok(admin) => self.admin_account = Some(admin),
            Err(e) => tracing::warn!("Error when fetching admin account: {}", e),
        }
    }

    /// Validate locally, submit the write, then re-run the fetch pipeline.
    ///
    /// The refetch after settlement is the sole convergence mechanism;
    /// nothing is mutated optimistically, so a rejected write needs no
    /// rollback. The action is abandoned and the last fetched state keeps
    /// rendering.
    pub async fn submit<I, G>(&mut self, identity: &I, gateway: &G, action: Action) -> Result<()>
    where
        I: IdentityProvider + ?Sized,
        G: LedgerGateway + ?Sized,
    {
        if self.selected_account.is_none() {
            return Err(ClientError::Validation(
                "No account selected; refresh first".to_string(),
            ));
        }

        let result = match action {
            Action::Register => gateway.register().await,
            Action::CreateGame { stake } => gateway.create_game(stake).await,
            Action::JoinGame { game_id } => {
                let stake = self
                    .game(game_id)
                    .ok_or_else(|| {
                        ClientError::Validation(format!("Unknown game id {}", game_id))
                    })?
                    .stake;
                gateway.join_game(game_id, stake).await
            }
            Action::MakeMove { game_id } => {
                let mv = self.pending_move.finalize(game_id)?;
                gateway.make_move(mv).await
            }
        };

        if let Err(e) = result {
            tracing::error!("Error while submitting {:?}: {}", action, e);
            return Err(e);
        }

        self.refresh(identity, gateway).await
    }
}
