//! Game configuration.
//!
//! A game is configured once at startup: player count, round cap,
//! starting endowment, buyout exchange rate, and the negotiation turn
//! bound. Configuration problems are fatal before any round runs;
//! everything after `build()` can rely on the parameters being sane.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A configuration the engine refuses to start with.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Fewer than two players cannot be paired.
    #[error("at least 2 players are required, got {0}")]
    TooFewPlayers(usize),

    /// Player IDs are a u8.
    #[error("at most 255 players are supported, got {0}")]
    TooManyPlayers(usize),

    /// The round cap must allow at least one round.
    #[error("max_rounds must be at least 1")]
    ZeroRounds,

    /// The negotiation protocol needs at least one turn.
    #[error("negotiation_turns must be at least 1")]
    ZeroNegotiationTurns,

    /// A zero exchange rate would make stars free at settlement.
    #[error("coins_per_star must be at least 1")]
    ZeroBuyoutRate,

    /// Everyone would be eliminated before the first duel.
    #[error("starting_stars must be at least 1")]
    ZeroStartingStars,

    /// Everyone would be cardless before the first duel.
    #[error("starting_cards_per_kind must be at least 1")]
    ZeroStartingCards,

    /// The safety threshold must be reachable.
    #[error("safe_star_threshold must be at least 1")]
    ZeroSafeThreshold,

    /// Custom names must cover every player exactly.
    #[error("expected {expected} player names, got {got}")]
    NameCountMismatch {
        /// Configured player count.
        expected: usize,
        /// Names supplied.
        got: usize,
    },

    /// One decision backend per player, no more, no less.
    #[error("expected {expected} decision providers, got {got}")]
    ProviderCountMismatch {
        /// Configured player count.
        expected: usize,
        /// Providers supplied.
        got: usize,
    },
}

/// Complete, validated game configuration.
///
/// Construct through [`GameConfig::builder`]; a successfully built
/// config is immutable and internally consistent.
///
/// ```
/// use star_gambit::core::GameConfig;
///
/// let config = GameConfig::builder(6).max_rounds(12).build().unwrap();
/// assert_eq!(config.player_count, 6);
/// assert_eq!(config.max_rounds, 12);
/// assert_eq!(config.starting_stars, 3);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of players (2-255).
    pub player_count: usize,

    /// Rounds played before forced settlement.
    pub max_rounds: u32,

    /// Stars each player starts with.
    pub starting_stars: u32,

    /// Coins each player starts with.
    pub starting_coins: u32,

    /// Copies of each card kind dealt to each player.
    pub starting_cards_per_kind: u32,

    /// Coins paid per star in the settlement buyout.
    pub coins_per_star: u32,

    /// Turn bound for one negotiation session.
    pub negotiation_turns: u32,

    /// Stars required to become Safe on card exhaustion.
    pub safe_star_threshold: u32,

    /// Buyout decisions a single buyer may take at settlement.
    pub buyout_attempts: u32,

    /// Display names, one per player.
    pub player_names: Vec<String>,
}

impl GameConfig {
    /// Start building a configuration for `player_count` players with
    /// the standard endowment (3 stars, 10 coins, 4 of each card,
    /// 16 rounds).
    #[must_use]
    pub fn builder(player_count: usize) -> GameConfigBuilder {
        GameConfigBuilder {
            player_count,
            max_rounds: 16,
            starting_stars: 3,
            starting_coins: 10,
            starting_cards_per_kind: 4,
            coins_per_star: 1,
            negotiation_turns: 6,
            safe_star_threshold: 3,
            buyout_attempts: 4,
            player_names: None,
        }
    }

    /// Display name of a player.
    #[must_use]
    pub fn name(&self, player: super::PlayerId) -> &str {
        &self.player_names[player.index()]
    }
}

/// Builder for [`GameConfig`].
#[derive(Clone, Debug)]
pub struct GameConfigBuilder {
    player_count: usize,
    max_rounds: u32,
    starting_stars: u32,
    starting_coins: u32,
    starting_cards_per_kind: u32,
    coins_per_star: u32,
    negotiation_turns: u32,
    safe_star_threshold: u32,
    buyout_attempts: u32,
    player_names: Option<Vec<String>>,
}

impl GameConfigBuilder {
    /// Set the round cap.
    #[must_use]
    pub fn max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = rounds;
        self
    }

    /// Set the starting star count.
    #[must_use]
    pub fn starting_stars(mut self, stars: u32) -> Self {
        self.starting_stars = stars;
        self
    }

    /// Set the starting coin count.
    #[must_use]
    pub fn starting_coins(mut self, coins: u32) -> Self {
        self.starting_coins = coins;
        self
    }

    /// Set the copies of each card kind dealt per player.
    #[must_use]
    pub fn starting_cards_per_kind(mut self, cards: u32) -> Self {
        self.starting_cards_per_kind = cards;
        self
    }

    /// Set the settlement exchange rate (coins paid per star).
    #[must_use]
    pub fn coins_per_star(mut self, rate: u32) -> Self {
        self.coins_per_star = rate;
        self
    }

    /// Set the negotiation turn bound.
    #[must_use]
    pub fn negotiation_turns(mut self, turns: u32) -> Self {
        self.negotiation_turns = turns;
        self
    }

    /// Set the stars required to become Safe on card exhaustion.
    #[must_use]
    pub fn safe_star_threshold(mut self, stars: u32) -> Self {
        self.safe_star_threshold = stars;
        self
    }

    /// Set the buyout decision budget per settling buyer.
    #[must_use]
    pub fn buyout_attempts(mut self, attempts: u32) -> Self {
        self.buyout_attempts = attempts;
        self
    }

    /// Set custom display names, one per player.
    #[must_use]
    pub fn player_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.player_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Validate and produce the configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first violated constraint.
    /// Nothing in the engine runs before this succeeds.
    pub fn build(self) -> Result<GameConfig, ConfigError> {
        if self.player_count < 2 {
            return Err(ConfigError::TooFewPlayers(self.player_count));
        }
        if self.player_count > 255 {
            return Err(ConfigError::TooManyPlayers(self.player_count));
        }
        if self.max_rounds == 0 {
            return Err(ConfigError::ZeroRounds);
        }
        if self.negotiation_turns == 0 {
            return Err(ConfigError::ZeroNegotiationTurns);
        }
        if self.coins_per_star == 0 {
            return Err(ConfigError::ZeroBuyoutRate);
        }
        if self.starting_stars == 0 {
            return Err(ConfigError::ZeroStartingStars);
        }
        if self.starting_cards_per_kind == 0 {
            return Err(ConfigError::ZeroStartingCards);
        }
        if self.safe_star_threshold == 0 {
            return Err(ConfigError::ZeroSafeThreshold);
        }

        let player_names = match self.player_names {
            Some(names) => {
                if names.len() != self.player_count {
                    return Err(ConfigError::NameCountMismatch {
                        expected: self.player_count,
                        got: names.len(),
                    });
                }
                names
            }
            None => (0..self.player_count)
                .map(|i| format!("Player {i}"))
                .collect(),
        };

        Ok(GameConfig {
            player_count: self.player_count,
            max_rounds: self.max_rounds,
            starting_stars: self.starting_stars,
            starting_coins: self.starting_coins,
            starting_cards_per_kind: self.starting_cards_per_kind,
            coins_per_star: self.coins_per_star,
            negotiation_turns: self.negotiation_turns,
            safe_star_threshold: self.safe_star_threshold,
            buyout_attempts: self.buyout_attempts,
            player_names,
        })
    }
}
