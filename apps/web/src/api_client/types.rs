//! Wire shapes of the CareerCompass API.

use serde::{Deserialize, Serialize};

use crate::models::career::CareerRecommendation;
use crate::models::mentor::Mentor;
use crate::models::survey::{AnswerSet, Question};

// ────────────────────────────────────────────────────────────────────────────
// Requests
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SessionAnswersRequest<'a> {
    pub session_id: Option<&'a str>,
    pub session_data: &'a AnswerSet,
}

#[derive(Debug, Serialize)]
pub struct RecommendRequest<'a> {
    pub session_data: &'a AnswerSet,
}

#[derive(Debug, Serialize)]
pub struct RoadmapRequest<'a> {
    pub career_data: &'a CareerRecommendation,
    pub user_profile: &'a AnswerSet,
}

#[derive(Debug, Serialize)]
pub struct MentorMatchRequest<'a> {
    pub selected_career: &'a CareerRecommendation,
    pub session_data: &'a AnswerSet,
}

#[derive(Debug, Serialize)]
pub struct TrendsRequest<'a> {
    pub career_field: &'a str,
    pub time_period: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SkillGapRequest<'a> {
    pub user_skills: &'a [String],
    pub career_skills: &'a [String],
}

// ────────────────────────────────────────────────────────────────────────────
// Responses
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct StartSessionResponse {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InitialAnswersResponse {
    #[serde(default)]
    pub adaptive_questions: Vec<Question>,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompleteSurveyResponse {
    pub recommendations: Vec<CareerRecommendation>,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<CareerRecommendation>,
}

/// `/mentors` has been seen returning `{mentors: [...]}`, a bare array, and
/// the wrapped form nested one level deeper. All three are accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MentorsPayload {
    Bare(Vec<Mentor>),
    Wrapped { mentors: Box<MentorsPayload> },
}

impl MentorsPayload {
    pub fn into_mentors(self) -> Vec<Mentor> {
        match self {
            MentorsPayload::Bare(mentors) => mentors,
            MentorsPayload::Wrapped { mentors } => mentors.into_mentors(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CareersResponse {
    pub careers: Vec<CareerRecommendation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CareerResponse {
    pub career: CareerRecommendation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGapReport {
    #[serde(default)]
    pub user_skills: Vec<String>,
    #[serde(default)]
    pub career_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub gap_percentage: f64,
}
