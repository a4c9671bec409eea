//! Round records and the transcript sink.
//!
//! The scheduler appends one record per round to its own log and mirrors
//! it to a [`TranscriptSink`]. How records are persisted — one file per
//! round, a database, nothing at all — is the sink implementor's
//! concern; the engine only appends.

use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, PlayerStatus};
use crate::duel::{Card, DuelResult};
use crate::negotiation::NegotiationReport;

/// The duel portion of a pair's round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuelRecord {
    /// Both parties declared a card and the cards were compared.
    Fought {
        /// Card declared by the first-listed player.
        first_card: Card,
        /// Card declared by the second-listed player.
        second_card: Card,
        /// Who won.
        result: DuelResult,
        /// The star move (winner, loser), when the result was decisive
        /// and the loser had a star to give.
        transfer: Option<(PlayerId, PlayerId)>,
    },
    /// A party held no card at declaration time. No duel took place and
    /// no cards were consumed.
    Skipped {
        /// The cardless party (or both).
        cardless: Vec<PlayerId>,
    },
}

/// Everything that happened to one pair in one round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairRecord {
    /// First-listed player (took the first negotiation turn).
    pub first: PlayerId,
    /// Second-listed player.
    pub second: PlayerId,
    /// The negotiation session, turn by turn.
    pub negotiation: NegotiationReport,
    /// The duel, or why it was skipped.
    pub duel: DuelRecord,
}

/// One round of the game, as appended to the log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Round number (1-based).
    pub round: u32,
    /// The unpaired player, when the pool was odd.
    pub bye: Option<PlayerId>,
    /// Per-pair records in pairing order.
    pub pairs: Vec<PairRecord>,
    /// Status transitions that fired this round, in firing order.
    pub transitions: Vec<(PlayerId, PlayerStatus)>,
}

/// Where round records go.
///
/// Implementations must not fail the round; a sink that can error
/// internally should swallow and report through its own channel.
pub trait TranscriptSink {
    /// Append one completed round.
    fn append(&mut self, record: &RoundRecord);
}

/// Discards every record.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl TranscriptSink for NullSink {
    fn append(&mut self, _record: &RoundRecord) {}
}

/// Keeps every record in memory, for inspection after a run.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    records: Vec<RoundRecord>,
}

impl MemorySink {
    /// An empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The records appended so far.
    #[must_use]
    pub fn records(&self) -> &[RoundRecord] {
        &self.records
    }
}

impl TranscriptSink for MemorySink {
    fn append(&mut self, record: &RoundRecord) {
        self.records.push(record.clone());
    }
}

/// Writes each record as one JSON line.
#[derive(Debug)]
pub struct JsonLinesSink<W: std::io::Write> {
    writer: W,
}

impl<W: std::io::Write> JsonLinesSink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Take the writer back.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: std::io::Write> TranscriptSink for JsonLinesSink<W> {
    fn append(&mut self, record: &RoundRecord) {
        // A broken sink must not take the round down with it.
        if let Ok(json) = serde_json::to_string(record) {
            let _ = writeln!(self.writer, "{json}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(round: u32) -> RoundRecord {
        RoundRecord {
            round,
            bye: None,
            pairs: vec![],
            transitions: vec![(PlayerId::new(1), PlayerStatus::Eliminated)],
        }
    }

    #[test]
    fn test_memory_sink_collects() {
        let mut sink = MemorySink::new();
        sink.append(&record(1));
        sink.append(&record(2));

        assert_eq!(sink.records().len(), 2);
        assert_eq!(sink.records()[0].round, 1);
        assert_eq!(sink.records()[1].round, 2);
    }

    #[test]
    fn test_json_lines_sink() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.append(&record(1));
        sink.append(&record(2));

        let written = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 2);

        let back: RoundRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(back, record(1));
    }

    #[test]
    fn test_round_record_serde() {
        let rec = record(3);
        let json = serde_json::to_string(&rec).unwrap();
        let back: RoundRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(rec, back);
    }
}
