//! Resource bundles: the unit of transfer between players.
//!
//! A `Bundle` is a non-negative quintuple of stars, coins, and the three
//! card kinds. Trades move one bundle in each direction; buyouts move a
//! stars-only bundle against a coins-only bundle. Because quantities are
//! unsigned and debits are checked, no operation can drive a balance
//! negative.
//!
//! The serde representation is a flat object of integer fields, the
//! schema decision backends are expected to produce. Missing fields
//! default to zero.

use serde::{Deserialize, Serialize};

use crate::duel::Card;

/// One of the five tracked resource kinds, for shortfall reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Stars,
    Coins,
    Rock,
    Paper,
    Scissors,
}

impl ResourceKind {
    /// The resource kind backing a card.
    #[must_use]
    pub const fn of_card(card: Card) -> Self {
        match card {
            Card::Rock => ResourceKind::Rock,
            Card::Paper => ResourceKind::Paper,
            Card::Scissors => ResourceKind::Scissors,
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Stars => write!(f, "stars"),
            ResourceKind::Coins => write!(f, "coins"),
            ResourceKind::Rock => write!(f, "rock cards"),
            ResourceKind::Paper => write!(f, "paper cards"),
            ResourceKind::Scissors => write!(f, "scissors cards"),
        }
    }
}

/// A non-negative quantity of each resource, offered or received as one
/// atomic unit.
///
/// ```
/// use star_gambit::ledger::Bundle;
///
/// let offer = Bundle::default().with_stars(1).with_coins(3);
/// assert_eq!(offer.stars, 1);
/// assert_eq!(offer.coins, 3);
/// assert!(!offer.is_empty());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bundle {
    /// Stars offered.
    #[serde(default)]
    pub stars: u32,
    /// Coins offered.
    #[serde(default)]
    pub coins: u32,
    /// Rock cards offered.
    #[serde(default)]
    pub rock: u32,
    /// Paper cards offered.
    #[serde(default)]
    pub paper: u32,
    /// Scissors cards offered.
    #[serde(default)]
    pub scissors: u32,
}

impl Bundle {
    /// A bundle of stars only.
    #[must_use]
    pub const fn of_stars(stars: u32) -> Self {
        Self { stars, coins: 0, rock: 0, paper: 0, scissors: 0 }
    }

    /// A bundle of coins only.
    #[must_use]
    pub const fn of_coins(coins: u32) -> Self {
        Self { stars: 0, coins, rock: 0, paper: 0, scissors: 0 }
    }

    /// Set the star quantity.
    #[must_use]
    pub const fn with_stars(mut self, stars: u32) -> Self {
        self.stars = stars;
        self
    }

    /// Set the coin quantity.
    #[must_use]
    pub const fn with_coins(mut self, coins: u32) -> Self {
        self.coins = coins;
        self
    }

    /// Set the quantity of one card kind.
    #[must_use]
    pub const fn with_cards(mut self, card: Card, count: u32) -> Self {
        match card {
            Card::Rock => self.rock = count,
            Card::Paper => self.paper = count,
            Card::Scissors => self.scissors = count,
        }
        self
    }

    /// Quantity of one card kind.
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

    /// Check whether every quantity is zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.stars == 0 && self.coins == 0 && self.total_cards() == 0
    }

    /// Quantity of a resource kind.
    #[must_use]
    pub const fn amount(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Stars => self.stars,
            ResourceKind::Coins => self.coins,
            ResourceKind::Rock => self.rock,
            ResourceKind::Paper => self.paper,
            ResourceKind::Scissors => self.scissors,
        }
    }
}

impl std::ops::Add for Bundle {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            stars: self.stars + rhs.stars,
            coins: self.coins + rhs.coins,
            rock: self.rock + rhs.rock,
            paper: self.paper + rhs.paper,
            scissors: self.scissors + rhs.scissors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let b = Bundle::default()
            .with_stars(2)
            .with_coins(5)
            .with_cards(Card::Paper, 1);

        assert_eq!(b.stars, 2);
        assert_eq!(b.coins, 5);
        assert_eq!(b.card_count(Card::Paper), 1);
        assert_eq!(b.card_count(Card::Rock), 0);
        assert_eq!(b.total_cards(), 1);
    }

    #[test]
    fn test_is_empty() {
        assert!(Bundle::default().is_empty());
        assert!(!Bundle::of_stars(1).is_empty());
        assert!(!Bundle::of_coins(1).is_empty());
        assert!(!Bundle::default().with_cards(Card::Rock, 1).is_empty());
    }

    #[test]
    fn test_add() {
        let a = Bundle::of_stars(1).with_coins(2);
        let b = Bundle::of_coins(3).with_cards(Card::Scissors, 1);
        let sum = a + b;

        assert_eq!(sum.stars, 1);
        assert_eq!(sum.coins, 5);
        assert_eq!(sum.scissors, 1);
    }

    #[test]
    fn test_amount_by_kind() {
        let b = Bundle::of_stars(4).with_cards(Card::Rock, 2);
        assert_eq!(b.amount(ResourceKind::Stars), 4);
        assert_eq!(b.amount(ResourceKind::Rock), 2);
        assert_eq!(b.amount(ResourceKind::Coins), 0);
    }

    #[test]
    fn test_missing_json_fields_default_to_zero() {
        let b: Bundle = serde_json::from_str(r#"{"stars": 1, "coins": 2}"#).unwrap();
        assert_eq!(b.stars, 1);
        assert_eq!(b.coins, 2);
        assert_eq!(b.total_cards(), 0);
    }

    #[test]
    fn test_serde_round_trip() {
        let b = Bundle::of_stars(1).with_coins(7).with_cards(Card::Paper, 2);
        let json = serde_json::to_string(&b).unwrap();
        let back: Bundle = serde_json::from_str(&json).unwrap();
        assert_eq!(b, back);
    }
}
