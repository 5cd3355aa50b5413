//! XP ledger entry.

use serde::{Deserialize, Serialize};

/// One signed XP adjustment in a profile's append-only ledger.
///
/// Entries are never mutated in place; the ledger only grows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XpEntry {
    /// Signed XP delta.
    pub xp: f64,
    /// Human-readable reason, e.g. "Task delivered on time: ...".
    pub details: String,
    /// Epoch milliseconds at append time.
    pub timestamp_ms: i64,
}

impl XpEntry {
    /// Entry timestamp normalized to Unix seconds.
    pub fn timestamp_secs(&self) -> i64 {
        self.timestamp_ms / 1000
    }
}
