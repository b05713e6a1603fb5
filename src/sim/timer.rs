//! One-shot timers owned by a level
//!
//! Delayed effects (a rain shower ending, the train leaving early) are
//! scheduled against the level's simulation clock. The level owns the queue,
//! so dropping or restarting the level drops every pending timer with it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    /// Rain shower ends
    RainStop,
    /// The metro train leaves without the player
    TrainDeparture,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PendingTimer {
    kind: TimerKind,
    due_ms: f64,
}

/// Pending timers, fired in due order (ties in schedule order)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timers {
    pending: Vec<PendingTimer>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, kind: TimerKind, due_ms: f64) {
        self.pending.push(PendingTimer { kind, due_ms });
    }

    pub fn cancel_all(&mut self) {
        if !self.is_empty() {
            log::debug!("Cancelling {} pending timers", self.pending.len());
        }
        self.pending.clear();
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.pending.iter().any(|t| t.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return every timer due at or before `now_ms`
    pub fn take_due(&mut self, now_ms: f64) -> Vec<TimerKind> {
        let mut due: Vec<PendingTimer> = Vec::new();
        self.pending.retain(|t| {
            if t.due_ms <= now_ms {
                due.push(t.clone());
                false
            } else {
                true
            }
        });
        // Stable sort keeps schedule order for equal deadlines
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms));
        due.into_iter().map(|t| t.kind).collect()
    }
}
