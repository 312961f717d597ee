mod survey;

pub use survey::Survey;

use crate::error::SurveyError;
use log::{info, warn};
use serde::{Deserialize, Serialize};

pub const DEFAULT_START_BOUND: i32 = 1;
pub const DEFAULT_ITERATE_STEP: i32 = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub description: String,
    #[serde(default)]
    pub voters: Vec<String>,
}

impl Choice {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            voters: Vec::new(),
        }
    }

    pub fn vote_count(&self) -> usize {
        self.voters.len()
    }

    pub fn has_voted(&self, user: &str) -> bool {
        self.voters.iter().any(|voter| voter == user)
    }

    // Ignores users already recorded on this choice
    pub fn add_voter(&mut self, user: impl Into<String>) {
        let user = user.into();
        if !self.has_voted(&user) {
            self.voters.push(user);
        }
    }

    pub fn remove_voter(&mut self, user: &str) -> bool {
        let before = self.voters.len();
        self.voters.retain(|voter| voter != user);
        self.voters.len() != before
    }
}

/// A single question of a survey. Choices are stored highest-value first,
/// which is what the weighted average relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub changeable_votes: bool,
    #[serde(default)]
    pub visible_voters: bool,
    #[serde(default = "default_start_bound")]
    pub start_bound: i32,
    #[serde(default = "default_iterate_step")]
    pub iterate_step: i32,
}

fn default_start_bound() -> i32 {
    DEFAULT_START_BOUND
}

fn default_iterate_step() -> i32 {
    DEFAULT_ITERATE_STEP
}

impl Ballot {
    pub fn new(title: impl Into<String>, choices: Vec<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            choices: choices.into_iter().map(Choice::new).collect(),
            changeable_votes: false,
            visible_voters: false,
            start_bound: DEFAULT_START_BOUND,
            iterate_step: DEFAULT_ITERATE_STEP,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn has_voted(&self, user: &str) -> bool {
        self.choices.iter().any(|choice| choice.has_voted(user))
    }

    pub fn total_vote_count(&self) -> usize {
        self.choices.iter().map(Choice::vote_count).sum()
    }

    pub fn vote_counts(&self) -> Vec<usize> {
        self.choices.iter().map(Choice::vote_count).collect()
    }

    pub fn choice(&self, description: &str) -> Option<&Choice> {
        self.choices
            .iter()
            .find(|choice| choice.description == description)
    }

    pub fn voted_choice(&self, user: &str) -> Option<&Choice> {
        self.choices.iter().find(|choice| choice.has_voted(user))
    }

    /// Records `user` against the choice named `choice`.
    ///
    /// A user holds at most one vote per ballot. When votes are changeable
    /// the previous vote moves to the new choice; otherwise a second vote is
    /// rejected with [`SurveyError::VoteLocked`].
    pub fn cast_vote(&mut self, user: &str, choice: &str) -> Result<(), SurveyError> {
        let target = self
            .choices
            .iter()
            .position(|c| c.description == choice)
            .ok_or_else(|| SurveyError::UnknownChoice {
                ballot: self.title.clone(),
                choice: choice.to_string(),
            })?;

        if self.choices[target].has_voted(user) {
            return Ok(()); // Same choice again, nothing to do
        }

        if self.has_voted(user) {
            if !self.changeable_votes {
                warn!("Rejected second vote by {} on ballot {}", user, self.title);
                return Err(self.locked(user));
            }
            for c in &mut self.choices {
                c.remove_voter(user);
            }
        }

        self.choices[target].add_voter(user);
        info!("{} voted {:?} on ballot {}", user, choice, self.title);
        Ok(())
    }

    /// Withdraws the vote of `user`. Returns whether a vote was removed.
    pub fn retract_vote(&mut self, user: &str) -> Result<bool, SurveyError> {
        if !self.has_voted(user) {
            return Ok(false);
        }
        if !self.changeable_votes {
            warn!("Rejected vote retraction by {} on ballot {}", user, self.title);
            return Err(self.locked(user));
        }

        let mut removed = false;
        for choice in &mut self.choices {
            removed |= choice.remove_voter(user);
        }
        info!("{} retracted their vote on ballot {}", user, self.title);
        Ok(removed)
    }

    fn locked(&self, user: &str) -> SurveyError {
        SurveyError::VoteLocked {
            ballot: self.title.clone(),
            user: user.to_string(),
        }
    }
}
