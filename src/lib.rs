pub mod config;
pub mod consts;
pub mod error;
pub mod machine;
pub mod scorer;
pub mod search;
pub mod util;

pub use crate::config::{CrackConfig, MachineConfig};
pub use crate::error::{RfResult, RotorForgeError};
pub use crate::machine::Machine;
pub use crate::scorer::NgramScorer;
pub use crate::search::{search, BestSettings, SearchEngine, SearchOptions};
