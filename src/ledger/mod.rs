//! The resource ledger: exclusive owner of every player's holdings.
//!
//! All mutation goes through validated entry points — duel transfers,
//! card spends, atomic trade settlement, and settlement buyouts. The
//! ledger also runs the status state machine: after resources move,
//! `refresh_status` re-evaluates the affected players and
//! `refresh_all` sweeps the whole table at round end.
//!
//! Rejected operations never leave partial state behind; both sides of
//! a trade commit in one step or not at all.

pub mod bundle;
pub mod inventory;

pub use bundle::{Bundle, ResourceKind};
pub use inventory::{Inventory, Shortfall};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::{GameConfig, GameError, PlayerId, PlayerMap, PlayerStatus};
use crate::duel::Card;
use crate::trade::{self, RejectReason, Transaction};

/// One player's ledger entry: display name, holdings, lifecycle status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerAccount {
    name: String,
    inventory: Inventory,
    status: PlayerStatus,
}

impl PlayerAccount {
    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current holdings.
    #[must_use]
    pub const fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Current lifecycle status.
    #[must_use]
    pub const fn status(&self) -> PlayerStatus {
        self.status
    }
}

/// The ledger for one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    accounts: PlayerMap<PlayerAccount>,
    safe_star_threshold: u32,
}

impl Ledger {
    /// Create a ledger with every player at the configured endowment.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        let inventory = Inventory::new(
            config.starting_stars,
            config.starting_coins,
            config.starting_cards_per_kind,
        );
        let accounts = PlayerMap::new(config.player_count, |p| PlayerAccount {
            name: config.name(p).to_string(),
            inventory,
            status: PlayerStatus::Active,
        });
        Self {
            accounts,
            safe_star_threshold: config.safe_star_threshold,
        }
    }

    /// Number of players on the ledger.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.accounts.player_count()
    }

    /// A player's full account.
    #[must_use]
    pub fn account(&self, player: PlayerId) -> &PlayerAccount {
        &self.accounts[player]
    }

    /// A player's holdings.
    #[must_use]
    pub fn inventory(&self, player: PlayerId) -> &Inventory {
        &self.accounts[player].inventory
    }

    /// A player's status.
    #[must_use]
    pub fn status(&self, player: PlayerId) -> PlayerStatus {
        self.accounts[player].status
    }

    /// Iterate over all accounts.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &PlayerAccount)> {
        self.accounts.iter()
    }

    /// Players currently in the given status, in ID order.
    #[must_use]
    pub fn players_with_status(&self, status: PlayerStatus) -> Vec<PlayerId> {
        self.accounts
            .iter()
            .filter(|(_, acc)| acc.status == status)
            .map(|(p, _)| p)
            .collect()
    }

    /// Players still in the duel/negotiation loop.
    #[must_use]
    pub fn active_players(&self) -> Vec<PlayerId> {
        self.players_with_status(PlayerStatus::Active)
    }

    /// Players who have reached safety.
    #[must_use]
    pub fn safe_players(&self) -> Vec<PlayerId> {
        self.players_with_status(PlayerStatus::Safe)
    }

    /// Total stars across all accounts, eliminated players included.
    #[must_use]
    pub fn total_stars(&self) -> u32 {
        self.accounts.iter().map(|(_, a)| a.inventory.stars()).sum()
    }

    /// Total coins across all accounts.
    #[must_use]
    pub fn total_coins(&self) -> u32 {
        self.accounts.iter().map(|(_, a)| a.inventory.coins()).sum()
    }

    /// Total cards across all accounts.
    #[must_use]
    pub fn total_cards(&self) -> u32 {
        self.accounts
            .iter()
            .map(|(_, a)| a.inventory.total_cards())
            .sum()
    }

    // === Mutation entry points ===

    /// Move exactly one star from `loser` to `winner`.
    ///
    /// # Errors
    ///
    /// `GameError::InsufficientResource` if the loser holds no stars;
    /// callers route that to elimination rather than propagating it out
    /// of the round.
    pub fn duel_transfer(&mut self, winner: PlayerId, loser: PlayerId) -> Result<(), GameError> {
        let (winner_acc, loser_acc) = self.accounts.get_pair_mut(winner, loser);
        loser_acc
            .inventory
            .remove_star()
            .map_err(|_| GameError::InsufficientResource { player: loser })?;
        winner_acc.inventory.add_star();
        debug!(target: "game.ledger", %winner, %loser, "star transferred");
        Ok(())
    }

    /// Consume one card of the given kind from a player's hand.
    ///
    /// # Errors
    ///
    /// `GameError::NoCardsAvailable` if the player holds none of that
    /// kind.
    pub fn spend_card(&mut self, player: PlayerId, card: Card) -> Result<(), GameError> {
        self.accounts[player]
            .inventory
            .remove_card(card)
            .map_err(|_| GameError::NoCardsAvailable(player))
    }

    /// Validate and atomically settle a transaction.
    ///
    /// On rejection the ledger is untouched and the proposal is treated
    /// as never made.
    pub fn apply_transaction(&mut self, tx: &Transaction) -> Result<(), RejectReason> {
        trade::validate(tx, self)?;

        let (proposer, responder) = self.accounts.get_pair_mut(tx.proposer, tx.responder);
        let mut proposer_inv = proposer.inventory;
        let mut responder_inv = responder.inventory;

        proposer_inv
            .debit(&tx.proposer_gives)
            .map_err(|shortfall| RejectReason::Insufficient {
                player: tx.proposer,
                shortfall,
            })?;
        responder_inv
            .debit(&tx.responder_gives)
            .map_err(|shortfall| RejectReason::Insufficient {
                player: tx.responder,
                shortfall,
            })?;
        proposer_inv.credit(&tx.responder_gives);
        responder_inv.credit(&tx.proposer_gives);

        proposer.inventory = proposer_inv;
        responder.inventory = responder_inv;
        debug!(target: "game.ledger", proposer = %tx.proposer, responder = %tx.responder, "trade settled");
        Ok(())
    }

    /// Settle a buyout: `stars` move seller -> buyer, coins move
    /// buyer -> seller at `coins_per_star`. Returns the coins paid.
    ///
    /// The seller must be Safe and may sell down to zero stars (Safe is
    /// terminal); the buyer must be Active and able to afford the
    /// purchase. Atomic per purchase.
    pub fn apply_buyout(
        &mut self,
        buyer: PlayerId,
        seller: PlayerId,
        stars: u32,
        coins_per_star: u32,
    ) -> Result<u32, RejectReason> {
        if buyer == seller {
            return Err(RejectReason::SamePlayer);
        }
        if stars == 0 {
            return Err(RejectReason::NothingPurchased);
        }
        if self.status(seller) != PlayerStatus::Safe {
            return Err(RejectReason::SellerNotSafe(seller));
        }
        if self.status(buyer) != PlayerStatus::Active {
            return Err(RejectReason::PartyNotActive(buyer));
        }

        let price = stars * coins_per_star;
        let (buyer_acc, seller_acc) = self.accounts.get_pair_mut(buyer, seller);
        let mut buyer_inv = buyer_acc.inventory;
        let mut seller_inv = seller_acc.inventory;

        seller_inv
            .debit(&Bundle::of_stars(stars))
            .map_err(|shortfall| RejectReason::Insufficient {
                player: seller,
                shortfall,
            })?;
        buyer_inv
            .debit(&Bundle::of_coins(price))
            .map_err(|shortfall| RejectReason::Insufficient {
                player: buyer,
                shortfall,
            })?;
        buyer_inv.credit(&Bundle::of_stars(stars));
        seller_inv.credit(&Bundle::of_coins(price));

        buyer_acc.inventory = buyer_inv;
        seller_acc.inventory = seller_inv;
        info!(target: "game.settlement", %buyer, %seller, stars, price, "buyout settled");
        Ok(price)
    }

    /// Force a player out of the game regardless of holdings.
    ///
    /// Used by settlement rule 1 (cards left at end of game) and by the
    /// zero-star duel edge case. No effect on terminal statuses.
    pub fn eliminate(&mut self, player: PlayerId) {
        let account = &mut self.accounts[player];
        if !account.status.is_terminal() {
            account.status = PlayerStatus::Eliminated;
            info!(target: "game.status", %player, "eliminated");
        }
    }

    /// Mark a player Safe regardless of the card/star evaluation.
    ///
    /// Used by settlement rule 3 once a buyer reaches the threshold.
    /// No effect on terminal statuses.
    pub fn mark_safe(&mut self, player: PlayerId) {
        let account = &mut self.accounts[player];
        if !account.status.is_terminal() {
            account.status = PlayerStatus::Safe;
            info!(target: "game.status", %player, "safe");
        }
    }

    // === Status state machine ===

    /// Re-evaluate one player's status after a resource mutation.
    ///
    /// Transitions: Active -> Eliminated on zero stars; Active -> Safe
    /// on card exhaustion with stars at or above the threshold. A
    /// player out of cards but short of the threshold stays Active
    /// until settlement resolves them. Terminal statuses never change.
    ///
    /// Returns the new status if a transition fired.
    pub fn refresh_status(&mut self, player: PlayerId) -> Option<PlayerStatus> {
        let threshold = self.safe_star_threshold;
        let account = &mut self.accounts[player];
        if account.status.is_terminal() {
            return None;
        }

        let new_status = if account.inventory.stars() == 0 {
            PlayerStatus::Eliminated
        } else if account.inventory.total_cards() == 0 && account.inventory.stars() >= threshold {
            PlayerStatus::Safe
        } else {
            return None;
        };

        account.status = new_status;
        info!(target: "game.status", %player, status = %new_status, "transition");
        Some(new_status)
    }

    /// Re-evaluate every player; the round-end state-machine pass.
    ///
    /// Returns the transitions that fired, in ID order.
    pub fn refresh_all(&mut self) -> Vec<(PlayerId, PlayerStatus)> {
        let players: Vec<PlayerId> = self.accounts.player_ids().collect();
        players
            .into_iter()
            .filter_map(|p| self.refresh_status(p).map(|s| (p, s)))
            .collect()
    }

    /// Check the global invariants that must hold between rounds
    /// (after a `refresh_all` pass).
    ///
    /// - Active players hold at least one star.
    /// - Safe players hold no cards.
    #[must_use]
    pub fn check_invariants(&self) -> bool {
        self.accounts.iter().all(|(_, acc)| match acc.status {
            PlayerStatus::Active => acc.inventory.stars() >= 1,
            PlayerStatus::Safe => acc.inventory.total_cards() == 0,
            PlayerStatus::Eliminated => true,
        })
    }
}
