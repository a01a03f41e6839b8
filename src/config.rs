use crate::error::ConfigError;
use blackjack::TableRules;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Pacing presets, as offered by the developer menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Speed {
    Slow,
    #[default]
    Medium,
    Fast,
    Instant,
}

impl Speed {
    pub fn base_delay_ms(&self) -> u64 {
        match self {
            Speed::Slow => 600,
            Speed::Medium => 300,
            Speed::Fast => 150,
            Speed::Instant => 0,
        }
    }
}

impl FromStr for Speed {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "slow" => Ok(Speed::Slow),
            "medium" => Ok(Speed::Medium),
            "fast" => Ok(Speed::Fast),
            "instant" => Ok(Speed::Instant),
            _ => Err(ConfigError::UnknownSpeed(s.to_string())),
        }
    }
}

/// Delays between scheduled steps, in milliseconds. Only affects when steps
/// run, never what they do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pacing {
    pub card_delay_ms: u64,
    pub peek_delay_ms: u64,
    pub dealer_draw_delay_ms: u64,
    pub outcome_delay_ms: u64,
    pub reset_delay_ms: u64,
}

impl Pacing {
    pub fn from_speed(speed: Speed) -> Self {
        let base = speed.base_delay_ms();
        if base == 0 {
            return Self::instant();
        }
        Self {
            card_delay_ms: base,
            peek_delay_ms: base,
            dealer_draw_delay_ms: base,
            outcome_delay_ms: base + 500,
            reset_delay_ms: base + 3_000,
        }
    }

    pub fn instant() -> Self {
        Self {
            card_delay_ms: 0,
            peek_delay_ms: 0,
            dealer_draw_delay_ms: 0,
            outcome_delay_ms: 0,
            reset_delay_ms: 0,
        }
    }

    pub fn card_delay(&self) -> Duration {
        Duration::from_millis(self.card_delay_ms)
    }

    pub fn peek_delay(&self) -> Duration {
        Duration::from_millis(self.peek_delay_ms)
    }

    pub fn dealer_draw_delay(&self) -> Duration {
        Duration::from_millis(self.dealer_draw_delay_ms)
    }

    pub fn outcome_delay(&self) -> Duration {
        Duration::from_millis(self.outcome_delay_ms)
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::from_speed(Speed::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub rules: TableRules,
    pub speed: Speed,
    /// Explicit delays; when absent they follow `speed`.
    pub pacing: Option<Pacing>,
    /// Fixed shuffle seed for reproducible shoes.
    pub seed: Option<u64>,
}

impl TableConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: TableConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rules.validate()?;
        Ok(())
    }

    pub fn pacing(&self) -> Pacing {
        self.pacing.unwrap_or_else(|| Pacing::from_speed(self.speed))
    }
}
