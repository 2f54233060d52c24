//! Decision archival.
//!
//! Stores (position, evaluated value) pairs as append-only JSONL, keyed
//! by the canonical position tuple (board, p0, p1, side to move).
//! Duplicate keys are rejected, never merged. The archive sits strictly
//! outside the decision path: callers log failures and move on.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::board::{GameState, PlayerId};
use crate::protocol::ifen::encode_rows;

/// One archived decision: the position identity plus the value the
/// search assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    /// The IFEN row section of the board.
    pub board: String,
    /// Player 0's square.
    pub p0: String,
    /// Player 1's square.
    pub p1: String,
    /// The side to move, 0 or 1.
    pub side_to_move: u8,
    /// The searched value of the position.
    pub value: f64,
}

impl DecisionRecord {
    /// Builds a record for a searched position and its root value.
    pub fn of(state: &GameState, value: f64) -> DecisionRecord {
        DecisionRecord {
            board: encode_rows(state.board()),
            p0: state.loc(PlayerId::P0).square(),
            p1: state.loc(PlayerId::P1).square(),
            side_to_move: state.side_to_move().digit(),
            value,
        }
    }

    /// The composite primary key; the value is not part of it.
    pub fn key(&self) -> String {
        format!("{}/{}/{}/{}", self.board, self.p0, self.p1, self.side_to_move)
    }
}

/// Errors that can occur while archiving.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("non-finite value is not archivable")]
    NonFiniteValue,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Encode(#[from] serde_json::Error),
}

/// An append-only JSONL decision store with an in-memory key index.
pub struct Archive {
    file: File,
    seen: HashSet<String>,
}

impl Archive {
    /// Opens (or creates) the archive at `path`, indexing the keys of any
    /// existing records so later duplicates are rejected.
    pub fn open(path: &Path) -> Result<Archive, ArchiveError> {
        let mut seen = HashSet::new();
        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            for line in reader.lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let record: DecisionRecord = serde_json::from_str(&line)?;
                seen.insert(record.key());
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Archive { file, seen })
    }

    /// Appends a record. Returns `DuplicateKey` if the position is
    /// already archived and `NonFiniteValue` for proven-win/loss scores,
    /// which JSON cannot carry.
    pub fn record(&mut self, record: &DecisionRecord) -> Result<(), ArchiveError> {
        if !record.value.is_finite() {
            return Err(ArchiveError::NonFiniteValue);
        }
        let key = record.key();
        if self.seen.contains(&key) {
            return Err(ArchiveError::DuplicateKey(key));
        }
        let line = serde_json::to_string(record)?;
        writeln!(self.file, "{}", line)?;
        self.file.flush()?;
        self.seen.insert(key);
        Ok(())
    }

    /// Number of archived records.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// True when no records have been archived.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
