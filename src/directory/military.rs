//! Conscription and orgnabor event queues with deferred returns
//!
//! Queued intents are consumed exactly once; the return queue (an explicit
//! min-ordered schedule keyed by absolute tick) is the only mechanism by
//! which drafted or borrowed workers come back.

use serde::{Deserialize, Serialize};

use crate::core::types::Tick;

/// A queued conscription intent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConscriptionEvent {
    pub id: u64,
    pub target_count: u32,
    /// Wartime permanent drafts return only survivors, much later
    pub permanent: bool,
    pub announcement: String,
    /// Rejection zeroes the target and marks the event responded; the
    /// event is still consumed normally
    #[serde(default)]
    pub responded: bool,
}

/// A queued orgnabor (labor borrowing) intent with an explicit return time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrgnaborEvent {
    pub id: u64,
    pub borrowed_count: u32,
    pub return_duration: u64,
    pub announcement: String,
}

/// One scheduled batch of returning workers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnEntry {
    pub return_tick: Tick,
    pub count: u32,
}

/// Min-ordered schedule of worker returns, keyed by absolute tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReturnQueue {
    entries: Vec<ReturnEntry>,
}

impl ReturnQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `count` workers to return at `return_tick`
    pub fn schedule(&mut self, return_tick: Tick, count: u32) {
        if count == 0 {
            return;
        }
        let idx = self
            .entries
            .partition_point(|e| e.return_tick <= return_tick);
        self.entries.insert(idx, ReturnEntry { return_tick, count });
    }

    /// Release every batch whose scheduled tick has arrived
    pub fn resolve(&mut self, now: Tick) -> u32 {
        let arrived = self.entries.partition_point(|e| e.return_tick <= now);
        let released: u32 = self.entries.drain(..arrived).map(|e| e.count).sum();
        released
    }

    /// Workers still out on conscription or orgnabor
    pub fn outstanding(&self) -> u32 {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[ReturnEntry] {
        &self.entries
    }
}
