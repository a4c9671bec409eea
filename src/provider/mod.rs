//! The decision-provider seam: where choices come from.
//!
//! The engine never decides anything on a player's behalf; every trade
//! proposal, card declaration, and buyout purchase is requested from a
//! [`DecisionProvider`]. Any backend satisfies the trait — the scripted
//! and heuristic backends in this module, a human frontend, or a
//! model-backed generator producing the JSON decision schema.
//!
//! Backends see a split view: their own full [`Inventory`] plus the
//! [`PublicPlayer`] projection of everyone else (stars, remaining card
//! total, status — coins and the card-type split stay private).
//!
//! A backend failure is never fatal. Timeouts, malformed output, and
//! backend errors all degrade to the conservative default for the
//! decision point — pass, first held card, decline — and the round
//! moves on.

mod heuristic;
mod scripted;

pub use heuristic::HeuristicProvider;
pub use scripted::ScriptedProvider;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{PlayerId, PlayerStatus};
use crate::duel::Card;
use crate::ledger::{Bundle, Inventory, Ledger};
use crate::trade::Transaction;

/// Why a decision could not be obtained.
///
/// Every variant is recovered locally by substituting the default
/// action; none of them aborts a round.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The backend did not answer in time.
    #[error("decision backend timed out")]
    Timeout,

    /// The backend answered outside the decision schema.
    #[error("malformed decision: {0}")]
    Malformed(String),

    /// The backend failed outright.
    #[error("decision backend failed: {0}")]
    Backend(String),
}

/// Decode a structured decision from its JSON schema representation.
///
/// The schema is the serde form of the decision types in this module:
/// flat objects with integer resource fields (see [`Bundle`]) and
/// externally tagged variants. Schema violations become
/// [`ProviderError::Malformed`].
pub fn decode_decision<T: DeserializeOwned>(json: &str) -> Result<T, ProviderError> {
    serde_json::from_str(json).map_err(|err| ProviderError::Malformed(err.to_string()))
}

/// The publicly observable projection of a player.
///
/// Coins and the per-kind card split are deliberately absent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicPlayer {
    /// Who this is.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Stars held.
    pub stars: u32,
    /// Total cards left in hand.
    pub cards_remaining: u32,
    /// Lifecycle status.
    pub status: PlayerStatus,
}

impl PublicPlayer {
    /// Project a player's account onto its public surface.
    #[must_use]
    pub fn of(ledger: &Ledger, player: PlayerId) -> Self {
        let account = ledger.account(player);
        Self {
            id: player,
            name: account.name().to_string(),
            stars: account.inventory().stars(),
            cards_remaining: account.inventory().total_cards(),
            status: account.status(),
        }
    }
}

/// What a player sees when asked for a negotiation turn.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NegotiationView {
    /// Current round number (1-based).
    pub round: u32,
    /// Turn index within this negotiation session (0-based).
    pub turn: u32,
    /// Turns left in the session, this one included.
    pub turns_remaining: u32,
    /// The player being asked.
    pub you: PlayerId,
    /// That player's full holdings.
    pub inventory: Inventory,
    /// The paired opponent, public surface only.
    pub opponent: PublicPlayer,
    /// The opponent's outstanding proposal, if any.
    pub standing_offer: Option<Transaction>,
}

/// What a player sees when asked to declare a card.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CardView {
    /// Current round number (1-based).
    pub round: u32,
    /// The player being asked.
    pub you: PlayerId,
    /// That player's full holdings.
    pub inventory: Inventory,
    /// The paired opponent, public surface only.
    pub opponent: PublicPlayer,
}

/// What a settling buyer sees when asked for a buyout decision.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuyoutView {
    /// The player being asked.
    pub you: PlayerId,
    /// That player's full holdings.
    pub inventory: Inventory,
    /// Stars still missing to reach the safety threshold.
    pub stars_needed: u32,
    /// Coins charged per star.
    pub coins_per_star: u32,
    /// Safe players with stars in stock, public surface only.
    pub sellers: Vec<PublicPlayer>,
    /// Buyout decisions left, this one included.
    pub attempts_remaining: u32,
}

/// One side's offer in a negotiation turn, from the acting player's
/// perspective.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOffer {
    /// What the acting player gives.
    pub give: Bundle,
    /// What the acting player asks for.
    pub take: Bundle,
}

impl TradeOffer {
    /// Materialize the offer as a transaction from `proposer` to
    /// `responder`.
    #[must_use]
    pub const fn into_transaction(self, proposer: PlayerId, responder: PlayerId) -> Transaction {
        Transaction::new(proposer, responder, self.give, self.take)
    }
}

/// A negotiation-turn decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegotiationDecision {
    /// Put a new offer on the table, replacing any standing one.
    Propose(TradeOffer),
    /// Take the opponent's standing offer.
    Accept,
    /// Do nothing this turn.
    Pass,
}

/// A settlement buyout decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuyoutDecision {
    /// Purchase `stars` from `seller` at the configured rate.
    Buy {
        /// The Safe player to buy from.
        seller: PlayerId,
        /// Stars to purchase.
        stars: u32,
    },
    /// Stop purchasing (and accept elimination if still short).
    Decline,
}

/// The source of every choice a player makes.
///
/// Implementations must not mutate game state; they see views and
/// return structured decisions, which the engine validates before
/// applying. Errors are recovered with defaults, so a flaky backend
/// degrades a player's play rather than the simulation.
pub trait DecisionProvider {
    /// Decide a negotiation turn.
    fn negotiation_turn(
        &mut self,
        view: &NegotiationView,
    ) -> Result<NegotiationDecision, ProviderError>;

    /// Declare a card to play. Constrained to cards held; out-of-stock
    /// choices are corrected to the fallback card.
    fn choose_card(&mut self, view: &CardView) -> Result<Card, ProviderError>;

    /// Decide a settlement buyout step.
    fn buyout(&mut self, view: &BuyoutView) -> Result<BuyoutDecision, ProviderError>;
}

/// The default card: the first held kind in Rock, Paper, Scissors
/// order. `None` when the hand is empty.
#[must_use]
pub fn fallback_card(inventory: &Inventory) -> Option<Card> {
    Card::ALL.into_iter().find(|&c| inventory.card_count(c) > 0)
}
