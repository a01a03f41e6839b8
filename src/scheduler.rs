use blackjack::{GamePhase, HandSlot};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

/// A deferred round step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    DealInitialCard,
    Peek,
    SplitCard(HandSlot),
    DealerDraw,
    ResolveOutcome,
    ResetRound,
}

impl Task {
    /// Phase the round must still be in when the task fires.
    pub fn expected_phase(&self) -> GamePhase {
        match self {
            Task::DealInitialCard | Task::Peek => GamePhase::Dealing,
            Task::SplitCard(_) => GamePhase::PlayerTurn,
            Task::DealerDraw | Task::ResolveOutcome => GamePhase::DealerTurn,
            Task::ResetRound => GamePhase::GameOver,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Continuation {
    pub due: Duration,
    /// Round the task was scheduled for.
    pub epoch: u64,
    pub task: Task,
    seq: u64,
}

impl Ord for Continuation {
    // Reversed: BinaryHeap is a max-heap, earliest due (then earliest scheduled) first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Continuation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Continuations ordered on a virtual clock. The clock only moves when the
/// owner pops work or advances it.
#[derive(Debug, Default)]
pub struct Scheduler {
    clock: Duration,
    next_seq: u64,
    queue: BinaryHeap<Continuation>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn schedule(&mut self, delay: Duration, epoch: u64, task: Task) {
        let continuation = Continuation {
            due: self.clock + delay,
            epoch,
            task,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.queue.push(continuation);
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.peek().map(|c| c.due)
    }

    pub fn peek_task(&self) -> Option<Task> {
        self.queue.peek().map(|c| c.task)
    }

    /// Pop the earliest continuation due at or before `until`, moving the
    /// clock to its due time.
    pub fn pop_due(&mut self, until: Duration) -> Option<Continuation> {
        if self.next_deadline()? > until {
            return None;
        }
        self.pop_next()
    }

    /// Pop the earliest continuation regardless of its due time.
    pub fn pop_next(&mut self) -> Option<Continuation> {
        let continuation = self.queue.pop()?;
        self.clock = self.clock.max(continuation.due);
        Some(continuation)
    }

    pub fn advance_clock_to(&mut self, at: Duration) {
        self.clock = self.clock.max(at);
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
