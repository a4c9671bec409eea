//! Endgame settlement and final ranking.
//!
//! Settlement runs exactly once, after the last round. In order:
//!
//! 1. Any Active player still holding cards is eliminated.
//! 2. Each remaining Active player (out of cards, short of the safety
//!    threshold) may buy stars from Safe sellers at the configured
//!    rate, one validated purchase at a time, until safe, declined, or
//!    out of options.
//! 3. Buyers at or above the threshold become Safe; the rest are
//!    eliminated.
//!
//! Buyers are processed in ID order and every purchase is atomic, so
//! settlement is deterministic given the decision sequence. It never
//! re-runs duels or negotiation.
//!
//! Ranking orders Safe players by coins descending; ties break by
//! player ID ascending so output is reproducible.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::{GameConfig, PlayerId, PlayerMap};
use crate::ledger::Ledger;
use crate::provider::{BuyoutDecision, BuyoutView, DecisionProvider, PublicPlayer};

/// One settled buyout purchase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyoutRecord {
    /// The Active player purchasing stars.
    pub buyer: PlayerId,
    /// The Safe player selling them.
    pub seller: PlayerId,
    /// Stars transferred.
    pub stars: u32,
    /// Coins paid.
    pub coins: u32,
}

/// Everything settlement did, for the transcript.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRecord {
    /// Rule 1: eliminated for holding cards at the end of the game.
    pub forced_eliminations: Vec<PlayerId>,
    /// Rule 2: settled purchases in order.
    pub purchases: Vec<BuyoutRecord>,
    /// Rule 3: buyers who reached the threshold.
    pub saved: Vec<PlayerId>,
    /// Rule 3: buyers who could not.
    pub eliminated: Vec<PlayerId>,
    /// Stars sold per seller, aggregated over all purchases.
    pub stars_sold: FxHashMap<PlayerId, u32>,
}

/// Run the one-shot settlement pass.
pub fn settle(
    ledger: &mut Ledger,
    providers: &mut PlayerMap<Box<dyn DecisionProvider>>,
    config: &GameConfig,
) -> SettlementRecord {
    let mut record = SettlementRecord::default();

    // Normalize statuses before judging anyone.
    ledger.refresh_all();

    // Rule 1: cards left at the end of the game.
    for player in ledger.active_players() {
        if ledger.inventory(player).total_cards() > 0 {
            ledger.eliminate(player);
            record.forced_eliminations.push(player);
        }
    }

    // Rule 2: coin-funded star purchases, buyers in ID order.
    let buyers = ledger.active_players();
    for buyer in buyers {
        let mut attempts = config.buyout_attempts;
        while attempts > 0 {
            let needed = config
                .safe_star_threshold
                .saturating_sub(ledger.inventory(buyer).stars());
            if needed == 0 {
                break;
            }

            let sellers: Vec<PublicPlayer> = ledger
                .safe_players()
                .into_iter()
                .filter(|&s| ledger.inventory(s).stars() > 0)
                .map(|s| PublicPlayer::of(ledger, s))
                .collect();
            if sellers.is_empty() {
                break;
            }

            let view = BuyoutView {
                you: buyer,
                inventory: *ledger.inventory(buyer),
                stars_needed: needed,
                coins_per_star: config.coins_per_star,
                sellers,
                attempts_remaining: attempts,
            };

            let decision = match providers[buyer].buyout(&view) {
                Ok(decision) => decision,
                Err(err) => {
                    warn!(target: "game.provider", player = %buyer, %err, "buyout fallback to decline");
                    BuyoutDecision::Decline
                }
            };

            match decision {
                BuyoutDecision::Decline => break,
                BuyoutDecision::Buy { seller, stars } => {
                    attempts -= 1;
                    match ledger.apply_buyout(buyer, seller, stars, config.coins_per_star) {
                        Ok(coins) => {
                            record.purchases.push(BuyoutRecord {
                                buyer,
                                seller,
                                stars,
                                coins,
                            });
                            *record.stars_sold.entry(seller).or_default() += stars;
                        }
                        Err(reason) => {
                            warn!(target: "game.settlement", %buyer, %seller, %reason, "buyout rejected");
                        }
                    }
                }
            }
        }

        // Rule 3: the buyer either made it or is out.
        if ledger.inventory(buyer).stars() >= config.safe_star_threshold {
            ledger.mark_safe(buyer);
            record.saved.push(buyer);
        } else {
            ledger.eliminate(buyer);
            record.eliminated.push(buyer);
        }
    }

    info!(
        target: "game.settlement",
        forced = record.forced_eliminations.len(),
        purchases = record.purchases.len(),
        saved = record.saved.len(),
        eliminated = record.eliminated.len(),
        "settlement complete"
    );
    record
}

/// A Safe player's final placing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    /// Who placed.
    pub player: PlayerId,
    /// Display name.
    pub name: String,
    /// Final coin balance — the ranking key.
    pub coins: u32,
    /// Final star balance, for the record.
    pub stars: u32,
}

/// Rank the Safe players: coins descending, ties by ID ascending.
///
/// Eliminated players do not appear at all.
#[must_use]
pub fn rank(ledger: &Ledger) -> Vec<Standing> {
    let mut standings: Vec<Standing> = ledger
        .safe_players()
        .into_iter()
        .map(|player| {
            let account = ledger.account(player);
            Standing {
                player,
                name: account.name().to_string(),
                coins: account.inventory().coins(),
                stars: account.inventory().stars(),
            }
        })
        .collect();
    standings.sort_by_key(|s| (std::cmp::Reverse(s.coins), s.player));
    standings
}
