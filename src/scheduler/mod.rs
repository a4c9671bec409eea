//! The round scheduler: the single owner of game state.
//!
//! A [`Game`] owns the ledger, the RNG, the decision backends, and the
//! append-only round log. Rounds run strictly in sequence — pairing for
//! round N+1 depends on the statuses settled at the end of round N.
//! Within a round each disjoint pair runs negotiation, card
//! declaration, and its duel; the round closes with a full
//! state-machine pass and a [`RoundRecord`] append.
//!
//! When the round cap is reached, or no Active players remain, the
//! endgame settlement runs once and the final ranking is computed.

pub mod pairing;
pub mod record;
pub mod snapshot;

pub use record::{
    DuelRecord, JsonLinesSink, MemorySink, NullSink, PairRecord, RoundRecord, TranscriptSink,
};
pub use snapshot::{Snapshot, SnapshotError};

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::{
    ConfigError, GameConfig, GameError, GameRng, PlayerId, PlayerStatus,
    PlayerMap,
};
use crate::duel::{resolve, Card, DuelResult};
use crate::endgame::{self, SettlementRecord, Standing};
use crate::ledger::Ledger;
use crate::negotiation::negotiate;
use crate::provider::{fallback_card, CardView, DecisionProvider, PublicPlayer};

/// The terminal output of a completed game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalStanding {
    /// Safe players ranked by coins descending, ties by ID.
    pub standings: Vec<Standing>,
    /// What the settlement pass did.
    pub settlement: SettlementRecord,
    /// The full round log.
    pub log: Vector<RoundRecord>,
}

/// One game from configuration to ranking.
pub struct Game {
    config: GameConfig,
    ledger: Ledger,
    rng: GameRng,
    round: u32,
    providers: PlayerMap<Box<dyn DecisionProvider>>,
    log: Vector<RoundRecord>,
}

impl Game {
    /// Create a game from a validated configuration, one decision
    /// backend per player, and a seed.
    ///
    /// # Errors
    ///
    /// `GameError::Config` if the provider count does not match the
    /// configured player count. Nothing runs before this succeeds.
    pub fn new(
        config: GameConfig,
        providers: Vec<Box<dyn DecisionProvider>>,
        seed: u64,
    ) -> Result<Self, GameError> {
        if providers.len() != config.player_count {
            return Err(GameError::Config(ConfigError::ProviderCountMismatch {
                expected: config.player_count,
                got: providers.len(),
            }));
        }
        Ok(Self {
            ledger: Ledger::new(&config),
            rng: GameRng::new(seed),
            round: 0,
            providers: PlayerMap::from_vec(providers),
            log: Vector::new(),
            config,
        })
    }

    /// Resume a game from a snapshot, supplying fresh backends.
    ///
    /// # Errors
    ///
    /// `GameError::Config` on a provider count mismatch.
    pub fn from_snapshot(
        config: GameConfig,
        providers: Vec<Box<dyn DecisionProvider>>,
        snapshot: Snapshot,
    ) -> Result<Self, GameError> {
        if providers.len() != config.player_count {
            return Err(GameError::Config(ConfigError::ProviderCountMismatch {
                expected: config.player_count,
                got: providers.len(),
            }));
        }
        Ok(Self {
            ledger: snapshot.ledger,
            rng: GameRng::from_state(&snapshot.rng),
            round: snapshot.round,
            providers: PlayerMap::from_vec(providers),
            log: Vector::new(),
            config,
        })
    }

    /// The configuration this game runs under.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The current ledger.
    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Rounds completed so far.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// The append-only round log.
    #[must_use]
    pub fn log(&self) -> &Vector<RoundRecord> {
        &self.log
    }

    /// Capture a round-boundary checkpoint.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            round: self.round,
            ledger: self.ledger.clone(),
            rng: self.rng.state(),
        }
    }

    /// Check whether the round loop has finished.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.round >= self.config.max_rounds || self.ledger.active_players().is_empty()
    }

    /// Play the next round, if the round loop is still open.
    ///
    /// The returned record has already been appended to the log.
    pub fn play_round(&mut self) -> Option<RoundRecord> {
        if self.is_over() {
            return None;
        }
        self.round += 1;
        let round = self.round;

        let pool = self.ledger.active_players();
        info!(target: "game.round", round, active = pool.len(), "round started");
        let (pairs, bye) = pairing::draw_pairs(&pool, &mut self.rng);

        let mut transitions: Vec<(PlayerId, PlayerStatus)> = Vec::new();
        let mut pair_records = Vec::with_capacity(pairs.len());
        for (first, second) in pairs {
            let negotiation = negotiate(
                round,
                (first, second),
                &mut self.ledger,
                &mut self.providers,
                self.config.negotiation_turns,
            );
            let duel = self.run_duel(round, first, second, &mut transitions);
            pair_records.push(PairRecord {
                first,
                second,
                negotiation,
                duel,
            });
        }

        // Round-end state-machine pass over every player.
        transitions.extend(self.ledger.refresh_all());
        debug_assert!(self.ledger.check_invariants());

        let record = RoundRecord {
            round,
            bye,
            pairs: pair_records,
            transitions,
        };
        self.log.push_back(record.clone());
        Some(record)
    }

    /// Play all remaining rounds, settle, and rank.
    ///
    /// Every round record is mirrored to `sink` as it completes.
    pub fn run(&mut self, sink: &mut dyn TranscriptSink) -> FinalStanding {
        while let Some(record) = self.play_round() {
            sink.append(&record);
        }

        let settlement = endgame::settle(&mut self.ledger, &mut self.providers, &self.config);
        debug_assert!(self.ledger.check_invariants());
        let standings = endgame::rank(&self.ledger);
        info!(
            target: "game.round",
            rounds = self.round,
            survivors = standings.len(),
            "game complete"
        );

        FinalStanding {
            standings,
            settlement,
            log: self.log.clone(),
        }
    }

    /// Play to completion without a transcript sink.
    pub fn run_to_completion(&mut self) -> FinalStanding {
        self.run(&mut NullSink)
    }

    /// Card declaration and duel for one pair.
    ///
    /// A party with an empty hand routes to the safety evaluation and
    /// the duel is skipped without consuming anything. Otherwise both
    /// declared cards are consumed, win, lose, or draw, and a decisive
    /// result moves one star.
    fn run_duel(
        &mut self,
        round: u32,
        first: PlayerId,
        second: PlayerId,
        transitions: &mut Vec<(PlayerId, PlayerStatus)>,
    ) -> DuelRecord {
        let mut cardless = Vec::new();
        for player in [first, second] {
            if self.ledger.inventory(player).total_cards() == 0 {
                cardless.push(player);
                if let Some(status) = self.ledger.refresh_status(player) {
                    transitions.push((player, status));
                }
            }
        }
        if !cardless.is_empty() {
            return DuelRecord::Skipped { cardless };
        }

        let first_card = self.declare_card(round, first, second);
        let second_card = self.declare_card(round, second, first);

        // Cards are consumed regardless of the outcome.
        self.ledger
            .spend_card(first, first_card)
            .expect("declared card is held");
        self.ledger
            .spend_card(second, second_card)
            .expect("declared card is held");

        let result = resolve(first_card, second_card);
        let transfer = match result {
            DuelResult::First => self.transfer_star(first, second, transitions),
            DuelResult::Second => self.transfer_star(second, first, transitions),
            DuelResult::Draw => None,
        };

        for player in [first, second] {
            if let Some(status) = self.ledger.refresh_status(player) {
                transitions.push((player, status));
            }
        }

        DuelRecord::Fought {
            first_card,
            second_card,
            result,
            transfer,
        }
    }

    /// Move the duel star, or eliminate a loser who has none to give.
    fn transfer_star(
        &mut self,
        winner: PlayerId,
        loser: PlayerId,
        transitions: &mut Vec<(PlayerId, PlayerStatus)>,
    ) -> Option<(PlayerId, PlayerId)> {
        match self.ledger.duel_transfer(winner, loser) {
            Ok(()) => Some((winner, loser)),
            Err(_) => {
                self.ledger.eliminate(loser);
                transitions.push((loser, PlayerStatus::Eliminated));
                None
            }
        }
    }

    /// Ask a player's backend for a card, corrected to a held kind.
    fn declare_card(&mut self, round: u32, you: PlayerId, opponent: PlayerId) -> Card {
        let view = CardView {
            round,
            you,
            inventory: *self.ledger.inventory(you),
            opponent: PublicPlayer::of(&self.ledger, opponent),
        };

        match self.providers[you].choose_card(&view) {
            Ok(card) if view.inventory.card_count(card) > 0 => card,
            Ok(card) => {
                warn!(target: "game.provider", player = %you, %card, "declared card not held, using fallback");
                fallback_card(&view.inventory).expect("declaration requires a non-empty hand")
            }
            Err(err) => {
                warn!(target: "game.provider", player = %you, %err, "card choice fallback");
                fallback_card(&view.inventory).expect("declaration requires a non-empty hand")
            }
        }
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("round", &self.round)
            .field("ledger", &self.ledger)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{HeuristicProvider, ScriptedProvider};

    fn p(i: u8) -> PlayerId {
        PlayerId::new(i)
    }

    fn heuristic_providers(n: usize) -> Vec<Box<dyn DecisionProvider>> {
        (0..n)
            .map(|_| Box::new(HeuristicProvider::new()) as Box<dyn DecisionProvider>)
            .collect()
    }

    fn scripted_providers(scripts: Vec<ScriptedProvider>) -> Vec<Box<dyn DecisionProvider>> {
        scripts
            .into_iter()
            .map(|s| Box::new(s) as Box<dyn DecisionProvider>)
            .collect()
    }

    #[test]
    fn test_provider_count_mismatch_is_fatal() {
        let config = GameConfig::builder(4).build().unwrap();
        let err = Game::new(config, heuristic_providers(3), 42).unwrap_err();
        assert_eq!(
            err,
            GameError::Config(ConfigError::ProviderCountMismatch {
                expected: 4,
                got: 3
            })
        );
    }

    #[test]
    fn test_round_consumes_cards() {
        let config = GameConfig::builder(2).build().unwrap();
        let mut game = Game::new(config, heuristic_providers(2), 42).unwrap();

        let record = game.play_round().unwrap();
        assert_eq!(record.round, 1);
        assert_eq!(record.pairs.len(), 1);
        assert!(record.bye.is_none());

        // Exactly one card gone from each hand.
        assert_eq!(game.ledger().inventory(p(0)).total_cards(), 11);
        assert_eq!(game.ledger().inventory(p(1)).total_cards(), 11);
        // Stars conserved by the duel.
        assert_eq!(game.ledger().total_stars(), 6);
    }

    #[test]
    fn test_odd_pool_gets_a_bye() {
        let config = GameConfig::builder(5).build().unwrap();
        let mut game = Game::new(config, heuristic_providers(5), 42).unwrap();

        let record = game.play_round().unwrap();
        assert_eq!(record.pairs.len(), 2);
        let bye = record.bye.expect("five players leave one bye");
        // The bye player was in no pair.
        assert!(record
            .pairs
            .iter()
            .all(|pr| pr.first != bye && pr.second != bye));
        // And kept all cards.
        assert_eq!(game.ledger().inventory(bye).total_cards(), 12);
    }

    #[test]
    fn test_full_game_terminates() {
        let config = GameConfig::builder(6).build().unwrap();
        let mut game = Game::new(config, heuristic_providers(6), 7).unwrap();

        let outcome = game.run_to_completion();

        assert!(game.is_over());
        assert!(game.round() <= 16);
        // Every player ended in a terminal status.
        assert!(game.ledger().active_players().is_empty());
        // Standings only contain Safe players, sorted by coins.
        for window in outcome.standings.windows(2) {
            assert!(window[0].coins >= window[1].coins);
        }
        assert_eq!(outcome.log.len(), game.round() as usize);
    }

    #[test]
    fn test_same_seed_same_game() {
        let run = |seed: u64| {
            let config = GameConfig::builder(4).build().unwrap();
            let mut game = Game::new(config, heuristic_providers(4), seed).unwrap();
            game.run_to_completion()
        };

        assert_eq!(run(99), run(99));
        // Different seeds pair differently, so logs diverge.
        assert_ne!(run(1).log, run(2).log);
    }

    #[test]
    fn test_transcript_sink_sees_every_round() {
        let config = GameConfig::builder(4).build().unwrap();
        let mut game = Game::new(config, heuristic_providers(4), 42).unwrap();
        let mut sink = MemorySink::new();

        game.run(&mut sink);

        assert_eq!(sink.records().len(), game.round() as usize);
        assert_eq!(sink.records(), game.log().iter().cloned().collect::<Vec<_>>());
    }

    #[test]
    fn test_snapshot_resume_matches_original() {
        let config = GameConfig::builder(4).build().unwrap();

        // Play three rounds, snapshot, then finish.
        let mut original = Game::new(config.clone(), heuristic_providers(4), 5).unwrap();
        for _ in 0..3 {
            original.play_round();
        }
        let snapshot = original.snapshot();
        let original_outcome = original.run_to_completion();

        // Resume from the snapshot with fresh (stateless) backends.
        let mut resumed = Game::from_snapshot(config, heuristic_providers(4), snapshot).unwrap();
        let resumed_outcome = resumed.run_to_completion();

        assert_eq!(original_outcome.standings, resumed_outcome.standings);
        assert_eq!(original_outcome.settlement, resumed_outcome.settlement);
    }

    #[test]
    fn test_scripted_trade_lands_in_record() {
        use crate::ledger::Bundle;
        use crate::provider::{NegotiationDecision, TradeOffer};

        let config = GameConfig::builder(2).build().unwrap();
        let providers = scripted_providers(vec![
            ScriptedProvider::new().with_negotiation([NegotiationDecision::Propose(TradeOffer {
                give: Bundle::of_coins(2),
                take: Bundle::of_coins(1),
            })]),
            ScriptedProvider::new().with_negotiation([NegotiationDecision::Accept]),
        ]);
        let mut game = Game::new(config, providers, 42).unwrap();

        let record = game.play_round().unwrap();
        let pair = &record.pairs[0];
        // Pairing order for 2 players is seed-dependent; the trade may
        // be proposed by either listed side depending on who is first.
        if pair.first == p(0) {
            assert!(pair.negotiation.settled.is_some());
        } else {
            // Player 1 went first and passed; player 0 proposed second,
            // then player 1's script was exhausted and passed, ending
            // the session without a settle.
            assert!(pair.negotiation.settled.is_none());
        }
    }
}
