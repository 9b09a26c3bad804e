//! Ranked career cards built from the stored survey result.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::api_client::CareerApi;
use crate::errors::AppError;
use crate::models::career::CareerRecommendation;
use crate::models::survey::SurveyResult;
use crate::normalize::normalize_text;
use crate::store::StateStore;

pub mod handlers;

#[derive(Debug, Clone, Serialize)]
pub struct CareerCard {
    /// 1-based position in the list the service returned.
    pub rank: usize,
    pub career_id: String,
    pub title: String,
    pub match_score: f64,
    pub match_label: String,
    pub demand_score: u32,
    pub avg_salary: String,
    pub entry_level_salary: String,
    pub growth: String,
    pub growth_explain: String,
    pub key_skills: Vec<String>,
    pub description: String,
    pub education_requirements: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl CareerCard {
    pub fn new(rank: usize, career: &CareerRecommendation) -> Self {
        Self {
            rank,
            career_id: career.career_id.clone(),
            title: career.title.clone(),
            match_score: career.match_score,
            match_label: format!("{:.0}% match", career.match_score),
            demand_score: career.demand_score,
            avg_salary: format_salary(career.avg_salary),
            entry_level_salary: format_salary(career.entry_level_salary),
            growth: format!("{:+.1}% over 5 years", career.growth_trend.five_year_growth_pct),
            growth_explain: normalize_text(&career.growth_trend.explain),
            key_skills: career.key_skills.clone(),
            description: normalize_text(&career.description),
            education_requirements: normalize_text(&career.education_requirements),
            explanation: career
                .explanation
                .as_deref()
                .map(normalize_text)
                .filter(|e| !e.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationsView {
    pub session_id: Option<String>,
    pub completed_at: DateTime<Utc>,
    pub count: usize,
    pub cards: Vec<CareerCard>,
}

/// Cards in service order. The list is never re-sorted.
pub fn career_cards(recommendations: &[CareerRecommendation]) -> Vec<CareerCard> {
    recommendations
        .iter()
        .enumerate()
        .map(|(i, career)| CareerCard::new(i + 1, career))
        .collect()
}

/// `$120,000`
pub fn format_salary(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("${grouped}")
}

/// The stored survey result, required by every downstream view.
pub async fn require_survey(store: &StateStore) -> Result<SurveyResult, AppError> {
    store.survey_result().await?.ok_or(AppError::MissingSurvey)
}

/// The stored result, topped up from the stateless recommendation endpoint
/// when the survey completed without any recommendations.
pub async fn load_recommendations(
    api: &dyn CareerApi,
    store: &StateStore,
) -> Result<SurveyResult, AppError> {
    let mut result = require_survey(store).await?;
    if result.recommendations.is_empty() && !result.merged_answers.is_empty() {
        let recommendations = api.recommend_careers(&result.merged_answers).await?;
        if !recommendations.is_empty() {
            info!("Fetched {} recommendations for the stored survey", recommendations.len());
            result.recommendations = recommendations;
            store.save_survey_result(&result).await?;
        }
    }
    Ok(result)
}

pub fn recommendations_view(result: &SurveyResult) -> RecommendationsView {
    RecommendationsView {
        session_id: result.session_id.clone(),
        completed_at: result.completed_at,
        count: result.recommendations.len(),
        cards: career_cards(&result.recommendations),
    }
}
