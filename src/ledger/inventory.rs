//! Per-player resource holdings with checked mutation.
//!
//! An `Inventory` can only change through `credit`, `debit`, and the
//! single-card helpers, all of which refuse to underflow. The shortfall
//! reported on a failed debit names the first lacking resource, the
//! quantity held, and the quantity requested.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::bundle::{Bundle, ResourceKind};
use crate::duel::Card;

/// A debit was attempted against insufficient holdings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("cannot take out {requested} {kind} while holding {held}")]
pub struct Shortfall {
    /// The lacking resource.
    pub kind: ResourceKind,
    /// Quantity held at the time of the debit.
    pub held: u32,
    /// Quantity the debit asked for.
    pub requested: u32,
}

/// A player's current holdings.
///
/// Mutated only through checked operations; quantities are unsigned, so
/// no reachable state holds a negative balance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    stars: u32,
    coins: u32,
    rock: u32,
    paper: u32,
    scissors: u32,
}

impl Inventory {
    /// Create an inventory with the given star/coin balance and the same
    /// count of each card kind.
    #[must_use]
    pub const fn new(stars: u32, coins: u32, cards_per_kind: u32) -> Self {
        Self {
            stars,
            coins,
            rock: cards_per_kind,
            paper: cards_per_kind,
            scissors: cards_per_kind,
        }
    }

    /// Stars held.
    #[must_use]
    pub const fn stars(&self) -> u32 {
        self.stars
    }

    /// Coins held.
    #[must_use]
    pub const fn coins(&self) -> u32 {
        self.coins
    }

    /// Count of one card kind.
    #[must_use]
    pub const fn card_count(&self, card: Card) -> u32 {
        match card {
            Card::Rock => self.rock,
            Card::Paper => self.paper,
            Card::Scissors => self.scissors,
        }
    }

    /// Total cards across all three kinds.
    #[must_use]
    pub const fn total_cards(&self) -> u32 {
        self.rock + self.paper + self.scissors
    }

    /// The whole inventory as a bundle (for settlement accounting).
    #[must_use]
    pub const fn as_bundle(&self) -> Bundle {
        Bundle {
            stars: self.stars,
            coins: self.coins,
            rock: self.rock,
            paper: self.paper,
            scissors: self.scissors,
        }
    }

    /// The first resource the inventory cannot cover, if any.
    ///
    /// Checked in a fixed order (stars, coins, rock, paper, scissors) so
    /// rejection messages are deterministic.
    #[must_use]
    pub fn shortfall(&self, bundle: &Bundle) -> Option<Shortfall> {
        let checks = [
            (ResourceKind::Stars, self.stars, bundle.stars),
            (ResourceKind::Coins, self.coins, bundle.coins),
            (ResourceKind::Rock, self.rock, bundle.rock),
            (ResourceKind::Paper, self.paper, bundle.paper),
            (ResourceKind::Scissors, self.scissors, bundle.scissors),
        ];
        checks
            .into_iter()
            .find(|&(_, held, requested)| held < requested)
            .map(|(kind, held, requested)| Shortfall { kind, held, requested })
    }

    /// Check whether the inventory can cover a bundle.
    #[must_use]
    pub fn covers(&self, bundle: &Bundle) -> bool {
        self.shortfall(bundle).is_none()
    }

    /// Remove a bundle from the inventory, or fail without mutating.
    pub fn debit(&mut self, bundle: &Bundle) -> Result<(), Shortfall> {
        if let Some(shortfall) = self.shortfall(bundle) {
            return Err(shortfall);
        }
        self.stars -= bundle.stars;
        self.coins -= bundle.coins;
        self.rock -= bundle.rock;
        self.paper -= bundle.paper;
        self.scissors -= bundle.scissors;
        Ok(())
    }

    /// Add a bundle to the inventory.
    pub fn credit(&mut self, bundle: &Bundle) {
        self.stars += bundle.stars;
        self.coins += bundle.coins;
        self.rock += bundle.rock;
        self.paper += bundle.paper;
        self.scissors += bundle.scissors;
    }

    /// Remove a single card of the given kind.
    pub fn remove_card(&mut self, card: Card) -> Result<(), Shortfall> {
        self.debit(&Bundle::default().with_cards(card, 1))
    }

    /// Remove a single star.
    pub fn remove_star(&mut self) -> Result<(), Shortfall> {
        self.debit(&Bundle::of_stars(1))
    }

    /// Add a single star.
    pub fn add_star(&mut self) {
        self.stars += 1;
    }
}
