use super::{fresh_shoe, Table};
use crate::error::TableError;
use crate::msg::{Command, TableEvent};
use crate::scenario::Scenario;
use blackjack::{GamePhase, Round, RoundError, INITIAL_DEAL_CARDS};

impl Table {
    /// Dispatches a serialized command to its handler.
    pub fn execute(&mut self, command: Command) -> Result<(), TableError> {
        let result = match &command {
            Command::Deal {} => self.deal(),
            Command::Hit {} => self.hit(),
            Command::Stand {} => self.stand(),
            Command::Split {} => self.split(),
            Command::AcceptSplitPrompt { accept } => self.accept_split_prompt(*accept),
            Command::SelectScenario { id } => self.select_scenario(id),
        };
        if let Err(err) = &result {
            log::debug!("Rejected {command:?}: {err}");
        }
        result
    }

    /// Player commands wait until every scheduled step has run.
    fn ensure_ready(&self) -> Result<(), TableError> {
        let pending = self.scheduler.len();
        if pending > 0 {
            return Err(TableError::Busy { pending });
        }
        Ok(())
    }

    /// Idle -> Dealing. The four initial cards follow as paced steps.
    pub fn deal(&mut self) -> Result<(), TableError> {
        self.ensure_ready()?;
        if self.round.phase != GamePhase::Idle {
            return Err(RoundError::WrongPhase {
                expected: GamePhase::Idle,
                actual: self.round.phase,
            }
            .into());
        }
        if self.shoe.is_scripted() && self.shoe.remaining() < INITIAL_DEAL_CARDS {
            log::info!(
                "Scripted shoe has {} card(s) left, replaying it from the top",
                self.shoe.remaining()
            );
            self.shoe.reset();
        }

        self.observe(|table| -> Result<(), TableError> {
            let step = table.round.start()?;
            table.apply_step(step);
            Ok(())
        })
    }

    pub fn hit(&mut self) -> Result<(), TableError> {
        self.ensure_ready()?;
        self.observe(|table| -> Result<(), TableError> {
            let step = table.round.hit(&mut table.shoe)?;
            table.apply_step(step);
            Ok(())
        })
    }

    pub fn stand(&mut self) -> Result<(), TableError> {
        self.ensure_ready()?;
        self.observe(|table| -> Result<(), TableError> {
            let step = table.round.stand()?;
            table.apply_step(step);
            Ok(())
        })
    }

    /// Split a pair once the prompt has been accepted. Replacement cards
    /// follow as paced steps.
    pub fn split(&mut self) -> Result<(), TableError> {
        self.ensure_ready()?;
        self.observe(|table| -> Result<(), TableError> {
            let step = table.round.split()?;
            table.apply_step(step);
            Ok(())
        })
    }

    pub fn accept_split_prompt(&mut self, accept: bool) -> Result<(), TableError> {
        self.ensure_ready()?;
        self.observe(|table| -> Result<(), TableError> {
            table.round.answer_split_prompt(accept)?;
            Ok(())
        })
    }

    /// Switch to a named scripted shoe and deal it. An unknown id falls back
    /// to a shuffled shoe and leaves the table idle.
    pub fn select_scenario(&mut self, id: &str) -> Result<(), TableError> {
        match id.parse::<Scenario>() {
            Ok(scenario) => self.select(Some(scenario)),
            Err(err) => {
                log::warn!("{err}, using a shuffled shoe");
                self.select(None)
            }
        }
    }

    /// Cancel the live round and install `scenario`'s shoe, or the default
    /// shoe for `None`. A scenario is dealt straight away.
    pub fn select(&mut self, scenario: Option<Scenario>) -> Result<(), TableError> {
        self.observe(|table| {
            table.scheduler.clear();
            table.round = Round::new(table.config.rules);
            table.epoch += 1;
            table.shoe = match scenario {
                Some(scenario) => scenario.shoe(),
                None => fresh_shoe(&table.config),
            };
            table.scenario = scenario;
        });
        match scenario {
            Some(scenario) => log::info!("Scenario selected: {} ({})", scenario.label(), scenario.id()),
            None => log::info!("Scenario cleared, {}-deck shoe", self.config.rules.num_decks),
        }
        self.emit(TableEvent::ScenarioSelected { scenario });

        match scenario {
            Some(_) => self.deal(),
            None => Ok(()),
        }
    }
}
