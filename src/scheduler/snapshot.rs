//! Round-boundary checkpoints.
//!
//! A snapshot captures everything needed to resume a game except the
//! decision backends, which are not serializable: the round counter,
//! the full ledger, and the O(1) RNG state. Encoding is bincode.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::GameRngState;
use crate::ledger::Ledger;

/// Snapshot encode/decode failure.
#[derive(Debug, Error)]
#[error("snapshot codec failed: {0}")]
pub struct SnapshotError(#[from] bincode::Error);

/// A resumable checkpoint of a game between rounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Rounds completed so far.
    pub round: u32,
    /// The full ledger at the checkpoint.
    pub ledger: Ledger,
    /// RNG state; restoring it replays the remaining pairings.
    pub rng: GameRngState,
}

impl Snapshot {
    /// Encode to bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] on malformed input.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, GameRng};

    #[test]
    fn test_snapshot_round_trip() {
        let mut rng = GameRng::new(42);
        rng.gen_range(0..100);

        let snapshot = Snapshot {
            round: 7,
            ledger: Ledger::new(&GameConfig::builder(4).build().unwrap()),
            rng: rng.state(),
        };

        let bytes = snapshot.to_bytes().unwrap();
        let back = Snapshot::from_bytes(&bytes).unwrap();
        assert_eq!(snapshot, back);

        // The restored RNG continues the original sequence
        let mut restored = GameRng::from_state(&back.rng);
        assert_eq!(rng.gen_range(0..100), restored.gen_range(0..100));
    }

    #[test]
    fn test_garbage_bytes_fail_cleanly() {
        assert!(Snapshot::from_bytes(&[0xde, 0xad, 0xbe, 0xef]).is_err());
    }
}
