pub mod agent;
pub mod config;
pub mod counsel;
pub mod error;
pub mod evidence;
pub mod generation;
pub mod judge;
pub mod prompt;
pub mod report;
pub mod statute;
pub mod trial;
pub mod types;
pub mod verdict;

pub use error::CourtError;
pub use types::*;
