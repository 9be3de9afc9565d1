use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{trace, warn};

use crate::command::Command;

/// Default number of pending commands kept before the oldest is discarded.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// What `enqueue` does when the consumer has fallen behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Grow without limit. `QueueStats::high_water` is the only signal of a stall.
    Unbounded,
    /// Keep at most `capacity` pending commands; discard the oldest on overflow.
    DropOldest { capacity: usize },
}

impl Default for OverflowPolicy {
    fn default() -> Self {
        Self::DropOldest {
            capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// Counters describing queue traffic since creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub enqueued: u64,
    pub drained: u64,
    pub dropped: u64,
    /// Largest number of commands pending at once.
    pub high_water: usize,
}

struct Inner {
    pending: VecDeque<Command>,
    stats: QueueStats,
    /// Set while an overflow burst is in progress so it is reported once.
    overflowing: bool,
}

/// FIFO of pending commands shared between the vehicle-I/O thread and the
/// UI thread.
///
/// `enqueue` and `drain` are the only mutating operations. The lock is held
/// for the append or the move-out only, never while a command is applied.
/// Multiple producers are fine; there must be a single consumer.
pub struct CommandQueue {
    inner: Mutex<Inner>,
    policy: OverflowPolicy,
}

impl CommandQueue {
    pub fn new(policy: OverflowPolicy) -> Self {
        let initial = match policy {
            OverflowPolicy::Unbounded => 64,
            OverflowPolicy::DropOldest { capacity } => capacity.min(64),
        };
        Self {
            inner: Mutex::new(Inner {
                pending: VecDeque::with_capacity(initial),
                stats: QueueStats::default(),
                overflowing: false,
            }),
            policy,
        }
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    /// Append `cmd` to the tail.
    pub fn enqueue(&self, cmd: Command) {
        let mut inner = self.lock();

        if let OverflowPolicy::DropOldest { capacity } = self.policy {
            if inner.pending.len() >= capacity.max(1) {
                if let Some(oldest) = inner.pending.pop_front() {
                    inner.stats.dropped += 1;
                    if !inner.overflowing {
                        inner.overflowing = true;
                        warn!(
                            "command queue full ({capacity} pending), dropping oldest: {oldest}"
                        );
                    }
                }
            }
        }

        trace!("enqueue {cmd}");
        inner.pending.push_back(cmd);
        inner.stats.enqueued += 1;
        inner.stats.high_water = inner.stats.high_water.max(inner.pending.len());
    }

    /// Remove and return every pending command, oldest first.
    ///
    /// The whole backing buffer is moved out in one step, so a command
    /// enqueued while the caller processes the result shows up in the next
    /// drain only.
    pub fn drain(&self) -> Vec<Command> {
        let taken = {
            let mut inner = self.lock();
            let taken = std::mem::take(&mut inner.pending);
            inner.stats.drained += taken.len() as u64;
            inner.overflowing = false;
            taken
        };
        Vec::from(taken)
    }

    /// Number of commands waiting for the next drain.
    pub fn len(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> QueueStats {
        self.lock().stats
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic elsewhere cannot leave the deque half-updated, so keep going.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new(OverflowPolicy::default())
    }
}
