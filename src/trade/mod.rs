//! Bilateral transactions and their validation.
//!
//! A `Transaction` is an immutable proposal: each party names a bundle
//! to give. Validation is a pure function over the transaction and the
//! current ledger; application is the ledger's job and is all-or-nothing.
//! Conservation holds by construction, since the same two bundles are
//! debited from one side and credited to the other.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{PlayerId, PlayerStatus};
use crate::ledger::{Bundle, Ledger, Shortfall};

/// Why a proposed transaction was rejected.
///
/// A rejection has no side effect; the proposer may retry with a
/// corrected offer within the negotiation turn bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RejectReason {
    /// Both parties are the same player.
    #[error("a player cannot trade with itself")]
    SamePlayer,

    /// A party is not in the Active status required for trading.
    #[error("{0} is not active and cannot trade")]
    PartyNotActive(PlayerId),

    /// Neither side offers anything.
    #[error("both sides of the trade are empty")]
    EmptyTrade,

    /// A side offered more of a resource than it holds.
    #[error("{player}: {shortfall}")]
    Insufficient {
        /// The over-committing party.
        player: PlayerId,
        /// What was missing.
        shortfall: Shortfall,
    },

    /// A party would end below the one-star floor.
    #[error("{player} would be left with {resulting} star(s), below the floor of 1")]
    StarsBelowFloor {
        /// The party left short.
        player: PlayerId,
        /// Stars that party would hold after the trade.
        resulting: u32,
    },

    /// Buyout: the named seller is not a Safe player.
    #[error("{0} is not safe and cannot sell stars at settlement")]
    SellerNotSafe(PlayerId),

    /// Buyout: zero stars requested.
    #[error("a buyout must purchase at least one star")]
    NothingPurchased,
}

/// An immutable bilateral transfer proposal.
///
/// `proposer_gives` flows proposer -> responder and `responder_gives`
/// flows responder -> proposer when the transaction is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// The player who made the offer.
    pub proposer: PlayerId,
    /// The player the offer is addressed to.
    pub responder: PlayerId,
    /// What the proposer hands over.
    pub proposer_gives: Bundle,
    /// What the responder hands over.
    pub responder_gives: Bundle,
}

impl Transaction {
    /// Create a transaction between two players.
    #[must_use]
    pub const fn new(
        proposer: PlayerId,
        responder: PlayerId,
        proposer_gives: Bundle,
        responder_gives: Bundle,
    ) -> Self {
        Self {
            proposer,
            responder,
            proposer_gives,
            responder_gives,
        }
    }

    /// Check whether a player is one of the two parties.
    #[must_use]
    pub fn involves(&self, player: PlayerId) -> bool {
        self.proposer == player || self.responder == player
    }

    /// The bundle a party gives, if it is a party at all.
    #[must_use]
    pub fn gives(&self, player: PlayerId) -> Option<&Bundle> {
        if player == self.proposer {
            Some(&self.proposer_gives)
        } else if player == self.responder {
            Some(&self.responder_gives)
        } else {
            None
        }
    }

    /// The bundle a party receives, if it is a party at all.
    #[must_use]
    pub fn receives(&self, player: PlayerId) -> Option<&Bundle> {
        if player == self.proposer {
            Some(&self.responder_gives)
        } else if player == self.responder {
            Some(&self.proposer_gives)
        } else {
            None
        }
    }
}

/// Validate a transaction against the current ledger.
///
/// Pure: no mutation, and calling it twice on the same state yields the
/// same result. Checks, in order: distinct parties, both Active, a
/// non-empty trade, each side able to cover its bundle, and the
/// one-star floor for both parties after the exchange.
pub fn validate(tx: &Transaction, ledger: &Ledger) -> Result<(), RejectReason> {
    if tx.proposer == tx.responder {
        return Err(RejectReason::SamePlayer);
    }

    for party in [tx.proposer, tx.responder] {
        if ledger.status(party) != PlayerStatus::Active {
            return Err(RejectReason::PartyNotActive(party));
        }
    }

    if tx.proposer_gives.is_empty() && tx.responder_gives.is_empty() {
        return Err(RejectReason::EmptyTrade);
    }

    for party in [tx.proposer, tx.responder] {
        let gives = tx.gives(party).expect("party is part of the transaction");
        let inventory = ledger.inventory(party);
        if let Some(shortfall) = inventory.shortfall(gives) {
            return Err(RejectReason::Insufficient {
                player: party,
                shortfall,
            });
        }

        // Coverage holds, so the subtraction cannot underflow.
        let receives = tx.receives(party).expect("party is part of the transaction");
        let resulting = inventory.stars() - gives.stars + receives.stars;
        if resulting < 1 {
            return Err(RejectReason::StarsBelowFloor { player: party, resulting });
        }
    }

    Ok(())
}
