use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_DECKS: u8 = 8;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    #[error("Number of decks must be between 1 and {MAX_DECKS}, got {0}")]
    InvalidDeckCount(u8),
    #[error("Dealer stand value must be between 12 and 21, got {0}")]
    InvalidStandValue(u8),
}

/// Configurable blackjack table rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableRules {
    /// Number of decks in the shoe
    pub num_decks: u8,

    /// Dealer draws while below this total
    pub dealer_stands_on: u8,

    /// Dealer hits soft 17
    pub dealer_hits_soft_17: bool,

    /// Dealer peeks for blackjack with Ace or 10 up
    pub dealer_peeks: bool,
}

impl Default for TableRules {
    fn default() -> Self {
        Self {
            num_decks: 6,
            dealer_stands_on: 17,
            dealer_hits_soft_17: false,
            dealer_peeks: true,
        }
    }
}

impl TableRules {
    /// Single deck, dealer hits soft 17
    pub fn single_deck() -> Self {
        Self {
            num_decks: 1,
            dealer_hits_soft_17: true,
            ..Self::default()
        }
    }

    /// European no-hole-card style: dealer never peeks
    pub fn european() -> Self {
        Self {
            dealer_peeks: false,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        if self.num_decks == 0 || self.num_decks > MAX_DECKS {
            return Err(RulesError::InvalidDeckCount(self.num_decks));
        }
        if !(12..=21).contains(&self.dealer_stands_on) {
            return Err(RulesError::InvalidStandValue(self.dealer_stands_on));
        }
        Ok(())
    }
}
