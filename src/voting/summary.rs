use crate::error::SurveyError;
use crate::format::DecimalPattern;
use crate::models::{Ballot, Survey};
use crate::voting::average::{weight_for, weighted_average};
use crate::voting::{BallotResults, ChoiceTally};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SurveySummary {
    pub title: Option<String>,
    pub ballots: Vec<BallotResults>,
}

/// Builds the result summary of `survey`, formatting averages with `pattern`.
///
/// Returns `Ok(None)` when the survey has its summary turned off.
pub fn summarize(survey: &Survey, pattern: &str) -> Result<Option<SurveySummary>, SurveyError> {
    if !survey.summary_display() {
        return Ok(None);
    }

    let pattern = DecimalPattern::parse(pattern)?;
    let ballots = survey
        .ballots()
        .iter()
        .map(|ballot| ballot_results(ballot, &pattern))
        .collect();

    Ok(Some(SurveySummary {
        title: survey.title().map(str::to_string),
        ballots,
    }))
}

pub fn ballot_results(ballot: &Ballot, pattern: &DecimalPattern) -> BallotResults {
    let counts = ballot.vote_counts();
    let total_votes: usize = counts.iter().sum();
    let average = weighted_average(ballot.start_bound, ballot.iterate_step, &counts);
    let len = ballot.choices.len();

    let choices = ballot
        .choices
        .iter()
        .enumerate()
        .map(|(position, choice)| {
            let votes = choice.vote_count();
            let percentage = if total_votes > 0 {
                votes as f64 * 100.0 / total_votes as f64
            } else {
                0.0
            };
            ChoiceTally {
                description: choice.description.clone(),
                votes,
                percentage,
                // position is always below len here
                weight: weight_for(position, len, ballot.start_bound, ballot.iterate_step)
                    .unwrap_or_default(),
                voters: ballot.visible_voters.then(|| choice.voters.clone()),
            }
        })
        .collect();

    BallotResults {
        title: ballot.title.clone(),
        total_votes,
        average,
        formatted_average: pattern.format(f64::from(average)),
        choices,
    }
}

impl SurveySummary {
    pub fn render(&self) -> String {
        let mut summary = String::new();

        if let Some(title) = &self.title {
            summary.push_str(&format!("**{}**\n\n", title));
        }

        for ballot in &self.ballots {
            summary.push_str(&format!("**{}**\n", ballot.title));
            for choice in &ballot.choices {
                summary.push_str(&format!(
                    "• {}: {} votes ({:.1}%)",
                    choice.description, choice.votes, choice.percentage
                ));
                if let Some(voters) = &choice.voters {
                    if !voters.is_empty() {
                        summary.push_str(&format!(" [{}]", voters.join(", ")));
                    }
                }
                summary.push('\n');
            }
            summary.push_str(&format!(
                "Average: {} from {} votes\n\n",
                ballot.formatted_average, ballot.total_votes
            ));
        }

        summary.trim_end().to_string()
    }

    pub fn raw_results(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.ballots)
    }
}
