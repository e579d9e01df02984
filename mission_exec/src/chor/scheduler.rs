//! # Choreography scheduler
//!
//! Holds actions which must be performed at a later time, and hands them back once they are due.
//!
//! Every action is tagged with the [`Epoch`] it was scheduled in. The epoch advances whenever the
//! owner changes state, and an action is only ever returned if it is still valid in the current
//! epoch. Stale actions are dropped both when the epoch advances and when they are popped, so an
//! action which was already due at the moment its epoch was superseded can never run.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::debug;
use serde::Serialize;
use std::{
    cmp::Reverse,
    collections::{BinaryHeap, HashMap},
    fmt,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Generation counter identifying the mission and state an action was scheduled in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Epoch {
    /// Incremented every time a new mission starts.
    pub mission: u32,

    /// Incremented on every state change.
    pub state: u32,
}

/// An action waiting to be performed.
#[derive(Debug, Clone)]
pub struct ScheduledAction<A> {
    pub fire_at_ms: u64,
    pub epoch: Epoch,
    pub scope: Scope,
    pub action: A,
}

/// Timed action queue.
#[derive(Debug)]
pub struct Scheduler<A> {
    current: Epoch,

    /// Ordering of pending actions by fire time, then by the order they were scheduled in.
    ///
    /// Keys whose action has been removed from `pending` are skipped when popped.
    queue: BinaryHeap<Reverse<(u64, u64)>>,

    pending: HashMap<u64, ScheduledAction<A>>,

    next_seq: u64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// How long a scheduled action stays valid for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum Scope {
    /// Valid until the next state change.
    State,

    /// Valid until the next mission starts, surviving state changes within the mission.
    Mission,
}

/// Which part of the epoch to advance.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Advance {
    State,
    Mission,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}.s{}", self.mission, self.state)
    }
}

impl<A> ScheduledAction<A> {
    /// Returns true if this action may still be performed in the `current` epoch.
    pub fn is_valid(&self, current: Epoch) -> bool {
        match self.scope {
            Scope::State => self.epoch == current,
            Scope::Mission => self.epoch.mission == current.mission,
        }
    }
}

impl<A: fmt::Debug> Scheduler<A> {
    pub fn new() -> Self {
        Self {
            current: Epoch::default(),
            queue: BinaryHeap::new(),
            pending: HashMap::new(),
            next_seq: 0,
        }
    }

    pub fn current_epoch(&self) -> Epoch {
        self.current
    }

    /// Move into a new epoch, dropping every pending action that is no longer valid.
    ///
    /// A mission advance also advances the state.
    pub fn advance(&mut self, advance: Advance) -> Epoch {
        if advance == Advance::Mission {
            self.current.mission = self.current.mission.wrapping_add(1);
        }
        self.current.state = self.current.state.wrapping_add(1);

        let current = self.current;
        let before = self.pending.len();
        self.pending.retain(|_, a| a.is_valid(current));

        let dropped = before - self.pending.len();
        if dropped > 0 {
            debug!(
                "Epoch advanced to {}, {} stale action(s) cancelled",
                current, dropped
            );
        }

        self.compact();

        current
    }

    /// Schedule `action` to fire `offset_ms` after `now_ms`, tagged with the current epoch.
    pub fn schedule(&mut self, now_ms: u64, offset_ms: u64, scope: Scope, action: A) {
        let fire_at_ms = now_ms.saturating_add(offset_ms);
        let seq = self.next_seq;
        self.next_seq += 1;

        self.queue.push(Reverse((fire_at_ms, seq)));
        self.pending.insert(
            seq,
            ScheduledAction {
                fire_at_ms,
                epoch: self.current,
                scope,
                action,
            },
        );
    }

    /// Remove all pending actions tagged with `epoch`, returning the number removed.
    pub fn cancel_epoch(&mut self, epoch: Epoch) -> usize {
        let before = self.pending.len();
        self.pending.retain(|_, a| a.epoch != epoch);
        self.compact();

        before - self.pending.len()
    }

    /// Pop the next action due at or before `now_ms`.
    ///
    /// Actions which are no longer valid in the current epoch are discarded rather than
    /// returned. Actions due at the same time are returned in the order they were scheduled.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<A> {
        while let Some(Reverse((fire_at_ms, seq))) = self.queue.peek().copied() {
            if fire_at_ms > now_ms {
                return None;
            }

            self.queue.pop();

            let scheduled = match self.pending.remove(&seq) {
                Some(s) => s,
                None => continue,
            };

            if scheduled.is_valid(self.current) {
                return Some(scheduled.action);
            }

            debug!(
                "Dropping stale action {:?} from epoch {} (current {})",
                scheduled.action, scheduled.epoch, self.current
            );
        }

        None
    }

    /// Time at which the next pending action is due, if any.
    pub fn next_fire_ms(&self) -> Option<u64> {
        self.pending.values().map(|a| a.fire_at_ms).min()
    }

    /// Number of pending actions.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Iterate over the pending actions in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ScheduledAction<A>> {
        self.pending.values()
    }

    /// Rebuild the heap once it is mostly made of removed keys.
    fn compact(&mut self) {
        if self.queue.len() > 2 * self.pending.len() + 16 {
            let pending = &self.pending;
            let keys: Vec<_> = self
                .queue
                .drain()
                .filter(|Reverse((_, seq))| pending.contains_key(seq))
                .collect();
            self.queue = keys.into_iter().collect();
        }
    }
}

impl<A: fmt::Debug> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}
