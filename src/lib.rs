pub mod config;
pub mod error;
pub mod msg;
pub mod scenario;
pub mod scheduler;
pub mod table;

pub use crate::config::{Pacing, Speed, TableConfig};
pub use crate::error::{ConfigError, TableError};
pub use crate::msg::{CardView, Command, HandView, QueryMsg, ScenarioInfo, Seat, TableEvent, TableSnapshot};
pub use crate::scenario::{Scenario, UnknownScenario};
pub use crate::scheduler::Task;
pub use crate::table::Table;
