use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::career::CareerRecommendation;
use crate::models::string_or_number;
use crate::models::survey::AnswerSet;

/// A mentor listing. Read-only from the client's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mentor {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub expertise: Vec<String>,
    /// 0–5 stars.
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub availability: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    /// Present only on personalized matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
}

/// One-shot payload written by the recommendation view when the user asks
/// for mentors matching a career. The mentor view consumes and deletes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentorHandoff {
    pub selected_career: CareerRecommendation,
    pub session_data: AnswerSet,
    pub created_at: DateTime<Utc>,
}

/// The mentors most recently loaded for the directory view. Query filters
/// apply to this list; only a new handoff or an explicit refresh replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentorListing {
    pub mentors: Vec<Mentor>,
    /// Set when the list came from personalized matching.
    #[serde(default)]
    pub personalized_for: Option<CareerRecommendation>,
}
