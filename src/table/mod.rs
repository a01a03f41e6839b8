pub mod execute;
pub mod query;

use crate::config::{Pacing, TableConfig};
use crate::error::ConfigError;
use crate::msg::{Seat, TableEvent};
use crate::scenario::Scenario;
use crate::scheduler::{Continuation, Scheduler, Task};
use blackjack::{GamePhase, HandSlot, Round, RoundError, Shoe, SplitPrompt, Step};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Owns the shoe and the live round, runs paced steps off a virtual clock
/// and publishes what changed to subscribers.
pub struct Table {
    config: TableConfig,
    pacing: Pacing,
    shoe: Shoe,
    round: Round,
    /// Bumped whenever the round is replaced; continuations from older
    /// epochs are dropped.
    epoch: u64,
    scheduler: Scheduler,
    scenario: Option<Scenario>,
    subscribers: Vec<UnboundedSender<TableEvent>>,
}

/// What the observers saw before a mutation.
#[derive(Debug, Clone, Copy)]
struct Marker {
    epoch: u64,
    phase: GamePhase,
    dealer_cards: usize,
    main_cards: usize,
    split_cards: usize,
    split_performed: bool,
    active: HandSlot,
    peeking: bool,
    hole_revealed: bool,
    prompt: SplitPrompt,
    resolved: bool,
    reshuffles: u32,
}

impl Table {
    pub fn new(config: TableConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let shoe = fresh_shoe(&config);
        Ok(Self::with_shoe(config, shoe))
    }

    /// Table dealing from a caller-supplied shoe.
    pub fn with_shoe(config: TableConfig, shoe: Shoe) -> Self {
        Self {
            pacing: config.pacing(),
            round: Round::new(config.rules),
            config,
            shoe,
            epoch: 0,
            scheduler: Scheduler::new(),
            scenario: None,
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self) -> UnboundedReceiver<TableEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    pub fn scenario(&self) -> Option<Scenario> {
        self.scenario
    }

    pub fn clock(&self) -> Duration {
        self.scheduler.clock()
    }

    /// Absolute virtual time of the next scheduled step.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    pub fn pending(&self) -> usize {
        self.scheduler.len()
    }

    /// Move the clock forward by `elapsed`, running every step that falls
    /// due on the way (including steps they schedule). Returns how many ran.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        let target = self.scheduler.clock() + elapsed;
        let mut fired = 0;
        while let Some(continuation) = self.scheduler.pop_due(target) {
            self.fire(continuation);
            fired += 1;
        }
        self.scheduler.advance_clock_to(target);
        fired
    }

    /// Jump to the next scheduled step and run it.
    pub fn step(&mut self) -> Option<Task> {
        let continuation = self.scheduler.pop_next()?;
        self.fire(continuation);
        Some(continuation.task)
    }

    /// Run scheduled steps until the table waits on the player, or until
    /// only the post-round reset is left. Returns how many ran.
    pub fn settle(&mut self) -> usize {
        let mut fired = 0;
        while let Some(task) = self.scheduler.peek_task() {
            if task == Task::ResetRound {
                break;
            }
            self.step();
            fired += 1;
        }
        fired
    }

    fn fire(&mut self, continuation: Continuation) {
        let (epoch, task) = (continuation.epoch, continuation.task);
        if epoch != self.epoch {
            log::debug!("Dropping {task:?} from round {epoch}, table is on round {}", self.epoch);
            return;
        }
        if self.round.phase != task.expected_phase() {
            log::debug!(
                "Dropping {task:?}: expected {:?}, round is in {:?}",
                task.expected_phase(),
                self.round.phase
            );
            return;
        }

        log::debug!("Running {task:?} at {:?}", self.clock());
        self.observe(|table| {
            let result = match task {
                Task::DealInitialCard => table.round.deal_initial_card(&mut table.shoe),
                Task::Peek => table.round.peek(),
                Task::SplitCard(_) => table.round.deal_split_card(&mut table.shoe),
                Task::DealerDraw => table.round.dealer_draw(&mut table.shoe),
                Task::ResolveOutcome => table.round.settle(),
                Task::ResetRound => {
                    table.reset_round();
                    return;
                }
            };
            match result {
                Ok(step) => table.apply_step(step),
                Err(err) => table.abort_round(err),
            }
        });
    }

    /// Schedule whatever the round says is due next.
    fn apply_step(&mut self, step: Step) {
        let pacing = self.pacing;
        match step {
            Step::DealInitial => self.schedule(pacing.card_delay(), Task::DealInitialCard),
            Step::Peek => self.schedule(pacing.peek_delay(), Task::Peek),
            Step::AwaitPlayer => {}
            Step::SplitCard(slot) => self.schedule(pacing.card_delay(), Task::SplitCard(slot)),
            Step::DealerDraw => self.schedule(pacing.dealer_draw_delay(), Task::DealerDraw),
            Step::Settle => self.schedule(pacing.outcome_delay(), Task::ResolveOutcome),
            Step::Resolved(outcome) => {
                log::info!(
                    "Round resolved: {outcome} (player {}, dealer {})",
                    self.round.player_hand.value(),
                    self.round.dealer_value()
                );
                self.schedule(pacing.reset_delay(), Task::ResetRound);
            }
        }
    }

    fn schedule(&mut self, delay: Duration, task: Task) {
        self.scheduler.schedule(delay, self.epoch, task);
    }

    /// Replace the round with a fresh idle one and cancel anything pending.
    fn reset_round(&mut self) {
        self.scheduler.clear();
        self.round = Round::new(self.config.rules);
        self.epoch += 1;
        self.emit(TableEvent::RoundReset);
    }

    fn abort_round(&mut self, err: RoundError) {
        log::error!("Round aborted in {:?}: {err}", self.round.phase);
        self.emit(TableEvent::RoundAborted {
            reason: err.to_string(),
        });
        self.reset_round();
    }

    fn marker(&self) -> Marker {
        let round = &self.round;
        Marker {
            epoch: self.epoch,
            phase: round.phase,
            dealer_cards: round.dealer_hand.len(),
            main_cards: round.player_hand.len(),
            split_cards: round.split_hand.as_ref().map_or(0, |h| h.len()),
            split_performed: round.split_performed,
            active: round.active_hand,
            peeking: round.dealer_peeking,
            hole_revealed: round.hole_card_revealed,
            prompt: round.split_prompt,
            resolved: round.outcome.is_some(),
            reshuffles: self.shoe.reshuffles(),
        }
    }

    /// Run `f` and publish the events implied by the state it changed.
    fn observe<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let before = self.marker();
        let out = f(self);
        let events = self.changes_since(&before);
        for event in events {
            self.emit(event);
        }
        out
    }

    fn changes_since(&self, before: &Marker) -> Vec<TableEvent> {
        let after = self.marker();
        let round = &self.round;
        let mut events = Vec::new();

        // A new round has nothing in common with the old one's hands.
        let same_round = after.epoch == before.epoch;
        if same_round {
            if after.reshuffles > before.reshuffles {
                events.push(TableEvent::ShoeReshuffled {
                    remaining: self.shoe.remaining(),
                });
            }
            let (mut main_from, mut split_from) = (before.main_cards, before.split_cards);
            if after.split_performed && !before.split_performed {
                events.push(TableEvent::HandSplit);
                // The moved card is not a deal
                main_from = 1;
                split_from = 1;
            }
            for card in round.player_hand.cards.iter().skip(main_from) {
                events.push(TableEvent::CardDealt {
                    seat: Seat::Player,
                    card: Some(*card),
                });
            }
            if let Some(split) = &round.split_hand {
                for card in split.cards.iter().skip(split_from) {
                    events.push(TableEvent::CardDealt {
                        seat: Seat::Split,
                        card: Some(*card),
                    });
                }
            }
            for (index, card) in round.dealer_hand.cards.iter().enumerate().skip(before.dealer_cards) {
                let face_up = index != 1 || round.hole_card_revealed;
                events.push(TableEvent::CardDealt {
                    seat: Seat::Dealer,
                    card: face_up.then_some(*card),
                });
            }

            if after.peeking && !before.peeking {
                events.push(TableEvent::PeekStarted);
            }
            if before.peeking && !after.peeking {
                events.push(TableEvent::PeekFinished {
                    dealer_blackjack: round.dealer_has_blackjack(),
                });
            }
            if after.hole_revealed && !before.hole_revealed {
                if let Some(card) = round.dealer_hand.cards.get(1) {
                    events.push(TableEvent::HoleCardRevealed { card: *card });
                }
            }
            if after.prompt == SplitPrompt::Offered && before.prompt != SplitPrompt::Offered {
                events.push(TableEvent::SplitOffered);
            }
            if after.active != before.active {
                events.push(TableEvent::ActiveHandChanged {
                    index: after.active.index(),
                });
            }
        }

        if after.phase != before.phase || !same_round {
            events.push(TableEvent::PhaseChanged { phase: after.phase });
        }
        if after.resolved && (!before.resolved || !same_round) {
            if let Some(outcome) = round.outcome {
                events.push(TableEvent::RoundResolved { outcome });
            }
        }
        events
    }

    fn emit(&mut self, event: TableEvent) {
        log::debug!("Event: {event:?}");
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

fn fresh_shoe(config: &TableConfig) -> Shoe {
    match config.seed {
        Some(seed) => Shoe::seeded(config.rules.num_decks, seed),
        None => Shoe::new(config.rules.num_decks),
    }
}

#[cfg(test)]
mod tests;
