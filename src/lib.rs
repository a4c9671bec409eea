//! # star-gambit
//!
//! A multi-round elimination economy game engine: limited
//! rock-paper-scissors played for stars, with free trade, a coin
//! economy, and an endgame buyout market.
//!
//! ## Design Principles
//!
//! 1. **The engine decides nothing**: every trade proposal, card
//!    declaration, and buyout purchase comes from a `DecisionProvider`.
//!    Scripted, heuristic, human, or model-backed — the engine only
//!    validates and applies.
//!
//! 2. **Validated mutation only**: player resources are owned by the
//!    `Ledger` and move through narrow, atomic entry points. Rejected
//!    operations leave no trace.
//!
//! 3. **Reproducible by construction**: the only randomness is the
//!    injected seeded RNG used for pairing. Same seed, same decisions,
//!    same ranking.
//!
//! 4. **No mid-game failure is fatal**: backend errors degrade to safe
//!    default actions, invalid proposals are dropped, and the game
//!    always reaches a terminal ranking.
//!
//! ## Modules
//!
//! - `core`: player IDs and storage, RNG, configuration, errors
//! - `duel`: cards and pure rock-paper-scissors resolution
//! - `ledger`: inventories, validated transfers, the status machine
//! - `trade`: bilateral transactions and the pure validator
//! - `provider`: the decision seam and bundled backends
//! - `negotiation`: the bounded pre-duel bargaining protocol
//! - `scheduler`: the round loop, pairing, records, snapshots
//! - `endgame`: one-shot settlement and final ranking
//!
//! ## A complete game
//!
//! ```
//! use star_gambit::core::GameConfig;
//! use star_gambit::provider::{DecisionProvider, HeuristicProvider};
//! use star_gambit::scheduler::Game;
//!
//! let config = GameConfig::builder(6).build().unwrap();
//! let providers: Vec<Box<dyn DecisionProvider>> = (0..6)
//!     .map(|_| Box::new(HeuristicProvider::new()) as Box<dyn DecisionProvider>)
//!     .collect();
//!
//! let mut game = Game::new(config, providers, 42).unwrap();
//! let outcome = game.run_to_completion();
//!
//! // Every surviving player is ranked by coins, richest first.
//! for window in outcome.standings.windows(2) {
//!     assert!(window[0].coins >= window[1].coins);
//! }
//! ```

pub mod core;
pub mod duel;
pub mod endgame;
pub mod ledger;
pub mod negotiation;
pub mod provider;
pub mod scheduler;
pub mod trade;

// Re-export commonly used types
pub use crate::core::{
    ConfigError, GameConfig, GameConfigBuilder, GameError, GameRng, GameRngState, PlayerId,
    PlayerMap, PlayerStatus,
};

pub use crate::duel::{resolve, Card, DuelResult};

pub use crate::ledger::{Bundle, Inventory, Ledger, PlayerAccount, ResourceKind, Shortfall};

pub use crate::trade::{validate, RejectReason, Transaction};

pub use crate::provider::{
    BuyoutDecision, BuyoutView, CardView, DecisionProvider, HeuristicProvider,
    NegotiationDecision, NegotiationView, ProviderError, PublicPlayer, ScriptedProvider,
    TradeOffer,
};

pub use crate::negotiation::{negotiate, NegotiationReport, NegotiationTurn, TurnAction};

pub use crate::scheduler::{
    DuelRecord, FinalStanding, Game, JsonLinesSink, MemorySink, NullSink, PairRecord, RoundRecord,
    Snapshot, TranscriptSink,
};

pub use crate::endgame::{rank, settle, BuyoutRecord, SettlementRecord, Standing};
