pub mod average;
pub mod summary;

use serde::Serialize;

// Results for a single ballot
#[derive(Debug, Clone, Serialize)]
pub struct BallotResults {
    pub title: String,
    pub total_votes: usize,
    pub average: f32,
    pub formatted_average: String,
    pub choices: Vec<ChoiceTally>,
}

// Tally for one choice of a ballot
#[derive(Debug, Clone, Serialize)]
pub struct ChoiceTally {
    pub description: String,
    pub votes: usize,
    pub percentage: f64,
    pub weight: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voters: Option<Vec<String>>, // Only filled when voters are visible
}
