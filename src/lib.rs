//! Survey model for wiki-embedded polls: ballots, per-user completion and
//! weighted-average scoring.

pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod voting;

pub use error::SurveyError;
pub use models::{Ballot, Choice, Survey};
