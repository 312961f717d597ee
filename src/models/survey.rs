use super::Ballot;
use crate::error::SurveyError;
use crate::format::DecimalPattern;
use crate::voting::average::weighted_average;
use log::debug;
use serde::{Deserialize, Serialize};

/// A titled collection of ballots sharing display and voting settings.
///
/// The survey does not enforce its settings itself; it copies them onto its
/// ballots, which do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SurveySnapshot")]
pub struct Survey {
    title: Option<String>,
    ballots: Vec<Ballot>,
    changeable_votes: bool,
    visible_voters: bool,
    summary_display: bool,
}

// Wire shape of a survey; ballots are re-added so they pick up the survey settings
#[derive(Deserialize)]
struct SurveySnapshot {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    ballots: Vec<Ballot>,
    #[serde(default)]
    changeable_votes: bool,
    #[serde(default)]
    visible_voters: bool,
    #[serde(default = "default_summary_display")]
    summary_display: bool,
}

impl From<SurveySnapshot> for Survey {
    fn from(snapshot: SurveySnapshot) -> Self {
        let mut survey = Survey {
            title: snapshot.title,
            ballots: Vec::with_capacity(snapshot.ballots.len()),
            changeable_votes: snapshot.changeable_votes,
            visible_voters: snapshot.visible_voters,
            summary_display: snapshot.summary_display,
        };
        for ballot in snapshot.ballots {
            survey.add_ballot(ballot);
        }
        survey
    }
}

fn default_summary_display() -> bool {
    true
}

impl Default for Survey {
    fn default() -> Self {
        Self {
            title: None,
            ballots: Vec::new(),
            changeable_votes: false,
            visible_voters: false,
            summary_display: true,
        }
    }
}

impl Survey {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Appends `ballot`, copying the survey's vote and voter settings onto it.
    pub fn add_ballot(&mut self, mut ballot: Ballot) {
        ballot.changeable_votes = self.changeable_votes;
        ballot.visible_voters = self.visible_voters;
        self.ballots.push(ballot);
    }

    // First match wins; titles are not required to be unique
    pub fn ballot(&self, title: &str) -> Option<&Ballot> {
        self.ballots.iter().find(|ballot| ballot.title == title)
    }

    pub fn ballot_mut(&mut self, title: &str) -> Option<&mut Ballot> {
        self.ballots.iter_mut().find(|ballot| ballot.title == title)
    }

    pub fn ballots(&self) -> &[Ballot] {
        &self.ballots
    }

    pub fn ballots_mut(&mut self) -> &mut Vec<Ballot> {
        &mut self.ballots
    }

    /// Replaces every ballot. The survey settings are not re-applied.
    pub fn set_ballots(&mut self, ballots: Vec<Ballot>) {
        self.ballots = ballots;
    }

    /// True when `user` has voted on every ballot (vacuously so without ballots).
    pub fn is_survey_complete(&self, user: &str) -> bool {
        self.ballots.iter().all(|ballot| ballot.has_voted(user))
    }

    pub fn changeable_votes(&self) -> bool {
        self.changeable_votes
    }

    pub fn set_changeable_votes(&mut self, changeable_votes: bool) {
        self.changeable_votes = changeable_votes;
        for ballot in &mut self.ballots {
            ballot.changeable_votes = changeable_votes;
        }
        debug!(
            "changeable_votes={} applied to {} ballot(s)",
            changeable_votes,
            self.ballots.len()
        );
    }

    pub fn visible_voters(&self) -> bool {
        self.visible_voters
    }

    pub fn set_visible_voters(&mut self, visible_voters: bool) {
        self.visible_voters = visible_voters;
        for ballot in &mut self.ballots {
            ballot.visible_voters = visible_voters;
        }
        debug!(
            "visible_voters={} applied to {} ballot(s)",
            visible_voters,
            self.ballots.len()
        );
    }

    /// Sets the weighting scheme of every current ballot. Ballots added later
    /// keep their own values.
    pub fn set_start_bound_and_iterate_step(&mut self, start_bound: i32, iterate_step: i32) {
        for ballot in &mut self.ballots {
            ballot.start_bound = start_bound;
            ballot.iterate_step = iterate_step;
        }
        debug!(
            "start_bound={} iterate_step={} applied to {} ballot(s)",
            start_bound,
            iterate_step,
            self.ballots.len()
        );
    }

    pub fn summary_display(&self) -> bool {
        self.summary_display
    }

    pub fn set_summary_display(&mut self, summary_display: bool) {
        self.summary_display = summary_display;
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// The title lower-cased with spaces removed, usable as a link anchor.
    pub fn title_no_space(&self) -> Result<String, SurveyError> {
        let title = self.title.as_deref().ok_or(SurveyError::MissingTitle)?;
        Ok(title.replace(' ', "").to_lowercase())
    }

    /// One `"<ballot>.<choice>"` key per choice, in display order.
    pub fn ballot_titles_with_choice_names(&self) -> Vec<String> {
        self.ballots
            .iter()
            .flat_map(|ballot| {
                ballot
                    .choices
                    .iter()
                    .map(move |choice| format!("{}.{}", ballot.title, choice.description))
            })
            .collect()
    }

    pub fn compute_average(ballot: &Ballot) -> f32 {
        weighted_average(ballot.start_bound, ballot.iterate_step, &ballot.vote_counts())
    }

    /// [`Survey::compute_average`] rendered through a decimal pattern such as `"0.##"`.
    pub fn compute_formatted_average(ballot: &Ballot, pattern: &str) -> Result<String, SurveyError> {
        let pattern = DecimalPattern::parse(pattern)?;
        Ok(pattern.format(f64::from(Self::compute_average(ballot))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yes_no(title: &str) -> Ballot {
        Ballot::new(title, vec!["Yes".to_string(), "No".to_string()])
    }

    #[test]
    fn defaults() {
        let survey = Survey::new();
        assert!(!survey.changeable_votes());
        assert!(!survey.visible_voters());
        assert!(survey.summary_display());
        assert!(survey.title().is_none());
        assert!(survey.ballots().is_empty());
    }

    #[test]
    fn add_ballot_copies_settings() {
        let mut survey = Survey::new();
        survey.set_changeable_votes(true);
        survey.set_visible_voters(true);

        let mut ballot = yes_no("Q1");
        ballot.changeable_votes = false;
        survey.add_ballot(ballot);

        let added = survey.ballot("Q1").unwrap();
        assert!(added.changeable_votes);
        assert!(added.visible_voters);
    }

    #[test]
    fn setters_propagate_to_current_ballots() {
        let mut survey = Survey::new();
        survey.add_ballot(yes_no("Q1"));
        survey.add_ballot(yes_no("Q2"));

        survey.set_changeable_votes(true);
        survey.set_visible_voters(true);
        assert!(survey.ballots().iter().all(|b| b.changeable_votes && b.visible_voters));

        survey.set_changeable_votes(false);
        assert!(survey.ballots().iter().all(|b| !b.changeable_votes && b.visible_voters));
    }

    #[test]
    fn set_ballots_keeps_ballot_settings() {
        let mut survey = Survey::new();
        survey.set_changeable_votes(true);
        survey.set_ballots(vec![yes_no("Q1")]);

        assert!(!survey.ballots()[0].changeable_votes);
    }

    #[test]
    fn ballot_lookup_returns_first_match() {
        let mut survey = Survey::new();
        survey.add_ballot(yes_no("Q1").with_description("first"));
        survey.add_ballot(yes_no("Q1").with_description("second"));

        assert_eq!(
            survey.ballot("Q1").unwrap().description.as_deref(),
            Some("first")
        );
        assert!(survey.ballot("q1").is_none());
        assert!(survey.ballot("X").is_none());
    }

    #[test]
    fn survey_complete_only_when_every_ballot_voted() {
        let mut survey = Survey::new();
        assert!(survey.is_survey_complete("alice"));

        survey.add_ballot(yes_no("Q1"));
        survey.add_ballot(yes_no("Q2"));
        survey.ballot_mut("Q1").unwrap().cast_vote("alice", "Yes").unwrap();
        assert!(!survey.is_survey_complete("alice"));

        survey.ballot_mut("Q2").unwrap().cast_vote("alice", "No").unwrap();
        assert!(survey.is_survey_complete("alice"));
        assert!(!survey.is_survey_complete("bob"));
    }

    #[test]
    fn weighting_applies_to_current_ballots_only() {
        let mut survey = Survey::new();
        survey.add_ballot(yes_no("Q1"));
        survey.set_start_bound_and_iterate_step(0, 2);
        survey.add_ballot(yes_no("Q2"));

        let q1 = survey.ballot("Q1").unwrap();
        assert_eq!((q1.start_bound, q1.iterate_step), (0, 2));
        let q2 = survey.ballot("Q2").unwrap();
        assert_eq!((q2.start_bound, q2.iterate_step), (1, 1));
    }

    #[test]
    fn title_no_space() {
        let mut survey = Survey::new();
        assert_eq!(survey.title_no_space(), Err(SurveyError::MissingTitle));

        survey.set_title("My Survey");
        assert_eq!(survey.title(), Some("My Survey"));
        assert_eq!(survey.title_no_space().unwrap(), "mysurvey");

        survey.set_title(" Team  Offsite 2024 ");
        assert_eq!(survey.title_no_space().unwrap(), "teamoffsite2024");
    }

    #[test]
    fn ballot_titles_with_choice_names_in_order() {
        let mut survey = Survey::new();
        survey.add_ballot(yes_no("Q1"));
        survey.add_ballot(Ballot::new("Q2", vec!["Maybe".to_string()]));

        assert_eq!(
            survey.ballot_titles_with_choice_names(),
            vec!["Q1.Yes", "Q1.No", "Q2.Maybe"]
        );
    }

    #[test]
    fn formatted_average() {
        let mut ballot = Ballot::new(
            "Q1",
            vec!["A".to_string(), "B".to_string(), "C".to_string()],
        );
        ballot.cast_vote("u1", "A").unwrap();
        ballot.cast_vote("u2", "B").unwrap();
        ballot.cast_vote("u3", "B").unwrap();

        // (3 + 2 + 2) / 3
        assert_eq!(Survey::compute_formatted_average(&ballot, "0.##").unwrap(), "2.33");
        assert_eq!(Survey::compute_formatted_average(&ballot, "0.0000").unwrap(), "2.3333");
        assert!(Survey::compute_formatted_average(&ballot, "").is_err());
    }

    #[test]
    fn snapshot_uses_defaults_for_missing_fields() {
        let survey: Survey = serde_json::from_str(r#"{"title":"Offsite"}"#).unwrap();
        assert!(survey.summary_display());
        assert!(!survey.changeable_votes());
        assert_eq!(survey.title(), Some("Offsite"));
    }

    #[test]
    fn snapshot_settings_reach_every_ballot() {
        let mut survey: Survey = serde_json::from_str(
            r#"{
                "changeable_votes": true,
                "visible_voters": true,
                "ballots": [
                    {"title": "Q", "choices": [
                        {"description": "Yes", "voters": ["alice"]},
                        {"description": "No"}
                    ]},
                    {"title": "R", "choices": [{"description": "Yes"}], "changeable_votes": false}
                ]
            }"#,
        )
        .unwrap();

        assert!(survey.ballots().iter().all(|b| b.changeable_votes && b.visible_voters));

        let q = survey.ballot_mut("Q").unwrap();
        q.cast_vote("alice", "No").unwrap();
        assert_eq!(q.vote_counts(), vec![0, 1]);
    }

    #[test]
    fn snapshot_without_flags_locks_ballots() {
        let survey: Survey = serde_json::from_str(
            r#"{"ballots": [{"title": "Q", "choices": [{"description": "Yes"}], "changeable_votes": true, "visible_voters": true}]}"#,
        )
        .unwrap();

        let q = survey.ballot("Q").unwrap();
        assert!(!q.changeable_votes);
        assert!(!q.visible_voters);
    }
}
