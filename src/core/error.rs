//! Engine error taxonomy.
//!
//! Only configuration problems are fatal, and only before the first
//! round. Everything else is recovered where it happens: a rejected
//! transaction is dropped and the proposer may retry, a star transfer
//! against an empty balance routes to elimination, and a card request
//! against an empty hand routes to the safety evaluation. Decision
//! backend failures never surface here at all; the protocol degrades
//! them to a default action (see `provider`).

use thiserror::Error;

use super::config::ConfigError;
use super::player::PlayerId;
use crate::trade::RejectReason;

/// Errors produced by engine operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    /// A proposed transaction failed validation. Recoverable: the
    /// proposal is treated as never made.
    #[error("invalid transaction: {0}")]
    InvalidTransaction(#[from] RejectReason),

    /// A star transfer was requested from a player holding none.
    /// Recoverable: the caller routes to elimination instead.
    #[error("{player} has no star to transfer")]
    InsufficientResource {
        /// The player whose balance came up empty.
        player: PlayerId,
    },

    /// A card play was requested from a player holding no cards.
    /// Recoverable: the caller routes to the safety evaluation.
    #[error("{0} holds no cards to play")]
    NoCardsAvailable(PlayerId),

    /// The game was configured unplayably. Fatal at startup.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = GameError::InsufficientResource {
            player: PlayerId::new(3),
        };
        assert_eq!(format!("{err}"), "Player 3 has no star to transfer");

        let err = GameError::NoCardsAvailable(PlayerId::new(1));
        assert_eq!(format!("{err}"), "Player 1 holds no cards to play");
    }

    #[test]
    fn test_from_reject_reason() {
        let err: GameError = RejectReason::SamePlayer.into();
        assert_eq!(
            format!("{err}"),
            "invalid transaction: a player cannot trade with itself"
        );
    }

    #[test]
    fn test_from_config_error() {
        let err: GameError = ConfigError::ZeroRounds.into();
        assert!(matches!(err, GameError::Config(_)));
    }
}
