//! The negotiation protocol: a bounded exchange before each duel.
//!
//! Two paired players alternate turns, at most the configured bound.
//! On a turn a player may put an offer on the table, accept the
//! opponent's standing offer, or pass. The session ends when an offer
//! is accepted (and settled through the ledger), when both players pass
//! back to back, or when the turn bound runs out.
//!
//! An invalid proposal is treated as if it were never made: the
//! standing offer survives, the pass streak is not interrupted, and the
//! proposer is free to retry on a later turn. Decision backend failures
//! degrade to a pass. Nothing in here can abort a round.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::core::{PlayerId, PlayerMap};
use crate::ledger::Ledger;
use crate::provider::{DecisionProvider, NegotiationDecision, NegotiationView, PublicPlayer};
use crate::trade::{validate, RejectReason, Transaction};

/// What happened on a single negotiation turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnAction {
    /// A valid offer was put on the table.
    Proposed(Transaction),
    /// An offer failed validation and was discarded.
    Rejected {
        /// The discarded offer.
        proposed: Transaction,
        /// Why it was discarded.
        reason: RejectReason,
    },
    /// The standing offer was accepted and settled.
    Accepted(Transaction),
    /// The player did nothing (chosen, or a degraded backend failure).
    Passed,
}

/// One turn of a negotiation session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationTurn {
    /// Who acted.
    pub player: PlayerId,
    /// What they did.
    pub action: TurnAction,
}

/// The outcome of one negotiation session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationReport {
    /// Turn-by-turn record, in order.
    pub turns: SmallVec<[NegotiationTurn; 8]>,
    /// The settled transaction, if the session produced one.
    pub settled: Option<Transaction>,
}

/// Run one negotiation session between a pair.
///
/// `pair.0` takes the first turn. The accepted transaction, if any, is
/// already applied to the ledger when this returns.
pub fn negotiate(
    round: u32,
    pair: (PlayerId, PlayerId),
    ledger: &mut Ledger,
    providers: &mut PlayerMap<Box<dyn DecisionProvider>>,
    turn_limit: u32,
) -> NegotiationReport {
    let mut report = NegotiationReport::default();
    let mut standing: Option<Transaction> = None;
    let mut pass_streak = 0u32;

    for turn in 0..turn_limit {
        let (actor, other) = if turn % 2 == 0 {
            (pair.0, pair.1)
        } else {
            (pair.1, pair.0)
        };

        let view = NegotiationView {
            round,
            turn,
            turns_remaining: turn_limit - turn,
            you: actor,
            inventory: *ledger.inventory(actor),
            opponent: PublicPlayer::of(ledger, other),
            standing_offer: standing,
        };

        let decision = match providers[actor].negotiation_turn(&view) {
            Ok(decision) => decision,
            Err(err) => {
                warn!(target: "game.provider", player = %actor, %err, "negotiation fallback to pass");
                NegotiationDecision::Pass
            }
        };

        let action = match decision {
            NegotiationDecision::Propose(offer) => {
                let tx = offer.into_transaction(actor, other);
                match validate(&tx, ledger) {
                    Ok(()) => {
                        standing = Some(tx);
                        pass_streak = 0;
                        TurnAction::Proposed(tx)
                    }
                    Err(reason) => {
                        debug!(target: "game.trade", player = %actor, %reason, "proposal rejected");
                        TurnAction::Rejected {
                            proposed: tx,
                            reason,
                        }
                    }
                }
            }
            NegotiationDecision::Accept => match standing {
                // Only the counterparty's offer can be accepted.
                Some(tx) if tx.proposer == other => match ledger.apply_transaction(&tx) {
                    Ok(()) => {
                        report.turns.push(NegotiationTurn {
                            player: actor,
                            action: TurnAction::Accepted(tx),
                        });
                        report.settled = Some(tx);
                        debug!(target: "game.trade", round, proposer = %tx.proposer, responder = %tx.responder, "trade accepted");
                        return report;
                    }
                    Err(reason) => {
                        debug!(target: "game.trade", player = %actor, %reason, "acceptance failed");
                        standing = None;
                        pass_streak += 1;
                        TurnAction::Passed
                    }
                },
                _ => {
                    pass_streak += 1;
                    TurnAction::Passed
                }
            },
            NegotiationDecision::Pass => {
                pass_streak += 1;
                TurnAction::Passed
            }
        };

        report.turns.push(NegotiationTurn {
            player: actor,
            action,
        });

        if pass_streak >= 2 {
            break;
        }
    }

    report
}
