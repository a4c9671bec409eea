//! Duel resolution: one rock-paper-scissors exchange between a pair.
//!
//! Resolution is a pure function over the two declared cards. The star
//! transfer and card consumption that follow a decisive result are the
//! ledger's business; this module only says who won.

use serde::{Deserialize, Serialize};

/// A playable card. Consumed once per duel, win, lose, or draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Card {
    Rock,
    Paper,
    Scissors,
}

impl Card {
    /// All card kinds, in the canonical Rock, Paper, Scissors order.
    ///
    /// The order doubles as the fallback preference when a decision
    /// backend names a card the player does not hold.
    pub const ALL: [Card; 3] = [Card::Rock, Card::Paper, Card::Scissors];

    /// Check whether this card defeats `other`.
    ///
    /// Rock beats scissors, scissors beats paper, paper beats rock.
    #[must_use]
    pub const fn beats(self, other: Card) -> bool {
        matches!(
            (self, other),
            (Card::Rock, Card::Scissors)
                | (Card::Scissors, Card::Paper)
                | (Card::Paper, Card::Rock)
        )
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Card::Rock => write!(f, "rock"),
            Card::Paper => write!(f, "paper"),
            Card::Scissors => write!(f, "scissors"),
        }
    }
}

/// Outcome of comparing two played cards.
///
/// `First`/`Second` name the winning side by play order within the pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DuelResult {
    /// The first-listed player wins; one star moves second -> first.
    First,
    /// The second-listed player wins; one star moves first -> second.
    Second,
    /// Equal cards; no star moves, both cards are still consumed.
    Draw,
}

impl DuelResult {
    /// Check whether the duel was decisive.
    #[must_use]
    pub const fn is_decisive(self) -> bool {
        !matches!(self, DuelResult::Draw)
    }
}

/// Resolve a duel between two declared cards.
///
/// ```
/// use star_gambit::duel::{resolve, Card, DuelResult};
///
/// assert_eq!(resolve(Card::Rock, Card::Scissors), DuelResult::First);
/// assert_eq!(resolve(Card::Paper, Card::Scissors), DuelResult::Second);
/// assert_eq!(resolve(Card::Rock, Card::Rock), DuelResult::Draw);
/// ```
#[must_use]
pub const fn resolve(first: Card, second: Card) -> DuelResult {
    if first.beats(second) {
        DuelResult::First
    } else if second.beats(first) {
        DuelResult::Second
    } else {
        DuelResult::Draw
    }
}
