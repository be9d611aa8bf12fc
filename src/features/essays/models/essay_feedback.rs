use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// UK undergraduate classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum GradeEstimate {
    First,
    #[serde(rename = "2:1")]
    UpperSecond,
    #[serde(rename = "2:2")]
    LowerSecond,
    Third,
}

impl GradeEstimate {
    pub fn as_str(&self) -> &'static str {
        match self {
            GradeEstimate::First => "First",
            GradeEstimate::UpperSecond => "2:1",
            GradeEstimate::LowerSecond => "2:2",
            GradeEstimate::Third => "Third",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EssayFeedback {
    pub structure_analysis: String,
    pub argumentation_analysis: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub improvement_suggestions: Vec<String>,
    pub grade_estimate: GradeEstimate,
    pub overall_feedback: String,
}
