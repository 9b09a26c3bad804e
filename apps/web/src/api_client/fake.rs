//! Scripted `CareerApi` used by controller, view and router tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use super::types::{
    CompleteSurveyResponse, InitialAnswersResponse, SkillGapReport, StartSessionResponse,
};
use super::{ApiError, ApiResult, CareerApi};
use crate::models::career::{CareerRecommendation, GrowthTrend};
use crate::models::mentor::Mentor;
use crate::models::roadmap::{LearningPhase, LearningRoadmap, RoadmapBody};
use crate::models::survey::{AnswerSet, Question};
use crate::models::trends::IndustryTrends;

pub fn question(id: &str, required: bool) -> Question {
    Question {
        id: id.to_string(),
        question: format!("Question {id}?"),
        kind: "textarea".to_string(),
        options: None,
        required,
    }
}

pub fn choice_question(id: &str, options: &[&str]) -> Question {
    Question {
        id: id.to_string(),
        question: format!("Question {id}?"),
        kind: "radio".to_string(),
        options: Some(options.iter().map(|o| o.to_string()).collect()),
        required: true,
    }
}

pub fn career(id: &str, title: &str, match_score: f64) -> CareerRecommendation {
    CareerRecommendation {
        career_id: id.to_string(),
        title: title.to_string(),
        match_score,
        demand_score: 80,
        avg_salary: 120_000,
        entry_level_salary: 75_000,
        key_skills: vec!["Python".to_string(), "SQL".to_string()],
        description: format!("{title} description"),
        education_requirements: "Bachelor's Degree".to_string(),
        growth_trend: GrowthTrend {
            five_year_growth_pct: 22.5,
            explain: "Growing".to_string(),
        },
        explanation: None,
    }
}

pub fn mentor(id: &str, name: &str, expertise: &[&str], rating: f32, availability: &str) -> Mentor {
    Mentor {
        id: id.to_string(),
        name: name.to_string(),
        title: "Senior Engineer".to_string(),
        company: "Acme".to_string(),
        expertise: expertise.iter().map(|e| e.to_string()).collect(),
        rating,
        bio: format!("{name} has mentored for years."),
        availability: availability.to_string(),
        industry: None,
        match_score: None,
    }
}

/// Every operation records its name in `calls`. Operations listed in
/// `failing` return a 503 instead of their scripted reply.
#[derive(Default)]
pub struct FakeApi {
    pub questions: Vec<Question>,
    pub adaptive_questions: Vec<Question>,
    pub recommendations: Vec<CareerRecommendation>,
    pub mentors: Vec<Mentor>,
    pub matched_mentors: Vec<Mentor>,
    pub catalog: Vec<CareerRecommendation>,
    pub failing_roadmaps: HashSet<String>,
    failing: Mutex<HashSet<&'static str>>,
    calls: Mutex<Vec<String>>,
    completed_with: Mutex<Option<AnswerSet>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_questions(mut self, initial: usize, adaptive: usize) -> Self {
        self.questions = (1..=initial)
            .map(|i| question(&format!("q{i}"), true))
            .collect();
        self.adaptive_questions = (1..=adaptive)
            .map(|i| question(&format!("adaptive_{i}"), false))
            .collect();
        self
    }

    pub fn with_recommendations(mut self, count: usize) -> Self {
        self.recommendations = (1..=count)
            .map(|i| career(&format!("career_{i}"), &format!("Career {i}"), 95.0 - i as f64))
            .collect();
        self
    }

    pub fn with_mentors(mut self, mentors: Vec<Mentor>) -> Self {
        self.mentors = mentors;
        self
    }

    pub fn with_matched_mentors(mut self, mentors: Vec<Mentor>) -> Self {
        self.matched_mentors = mentors;
        self
    }

    pub fn with_failing_roadmap(mut self, career_id: &str) -> Self {
        self.failing_roadmaps.insert(career_id.to_string());
        self
    }

    pub fn set_failing(&self, operation: &'static str, failing: bool) {
        let mut set = self.failing.lock().unwrap();
        if failing {
            set.insert(operation);
        } else {
            set.remove(operation);
        }
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.as_str() == operation)
            .count()
    }

    /// The answer set most recently passed to `complete_survey`.
    pub fn completed_with(&self) -> Option<AnswerSet> {
        self.completed_with.lock().unwrap().clone()
    }

    fn enter(&self, operation: &'static str) -> ApiResult<()> {
        self.calls.lock().unwrap().push(operation.to_string());
        if self.failing.lock().unwrap().contains(operation) {
            return Err(unavailable(operation));
        }
        Ok(())
    }
}

fn unavailable(operation: &str) -> ApiError {
    ApiError::Status {
        status: 503,
        message: format!("{operation} unavailable"),
    }
}

fn roadmap_for(career_id: Option<&str>, title: &str) -> LearningRoadmap {
    LearningRoadmap {
        career_id: career_id.map(str::to_string),
        career_title: title.to_string(),
        generated_at: Some("2024-01-01T00:00:00Z".to_string()),
        roadmap: RoadmapBody {
            skill_gap_analysis: json!("**Focus** on statistics"),
            learning_phases: vec![LearningPhase {
                name: "Foundations".to_string(),
                description: json!("Core concepts"),
                duration: json!("3 months"),
            }]
            .into(),
            timeline: json!({"total_duration": "12 months"}),
            ..RoadmapBody::default()
        },
    }
}

#[async_trait]
impl CareerApi for FakeApi {
    async fn start_session(&self) -> ApiResult<StartSessionResponse> {
        self.enter("start_session")?;
        Ok(StartSessionResponse {
            session_id: Some("session-1".to_string()),
            questions: self.questions.clone(),
        })
    }

    async fn submit_initial_answers(
        &self,
        session_id: Option<&str>,
        _answers: &AnswerSet,
    ) -> ApiResult<InitialAnswersResponse> {
        self.enter("submit_initial_answers")?;
        Ok(InitialAnswersResponse {
            adaptive_questions: self.adaptive_questions.clone(),
            session_id: session_id.map(str::to_string),
        })
    }

    async fn complete_survey(
        &self,
        session_id: Option<&str>,
        answers: &AnswerSet,
    ) -> ApiResult<CompleteSurveyResponse> {
        self.enter("complete_survey")?;
        *self.completed_with.lock().unwrap() = Some(answers.clone());
        Ok(CompleteSurveyResponse {
            recommendations: self.recommendations.clone(),
            session_id: session_id.map(str::to_string),
        })
    }

    async fn recommend_careers(
        &self,
        _answers: &AnswerSet,
    ) -> ApiResult<Vec<CareerRecommendation>> {
        self.enter("recommend_careers")?;
        Ok(self.recommendations.clone())
    }

    async fn mentors(&self) -> ApiResult<Vec<Mentor>> {
        self.enter("mentors")?;
        Ok(self.mentors.clone())
    }

    async fn match_mentors(
        &self,
        _career: &CareerRecommendation,
        _answers: &AnswerSet,
    ) -> ApiResult<Vec<Mentor>> {
        self.enter("match_mentors")?;
        Ok(self.matched_mentors.clone())
    }

    async fn generate_roadmap(
        &self,
        career: &CareerRecommendation,
        _profile: &AnswerSet,
    ) -> ApiResult<LearningRoadmap> {
        self.enter("generate_roadmap")?;
        if self.failing_roadmaps.contains(&career.career_id) {
            return Err(unavailable("generate_roadmap"));
        }
        Ok(roadmap_for(None, &career.title))
    }

    async fn roadmap_for_career(&self, career_id: &str) -> ApiResult<LearningRoadmap> {
        self.enter("roadmap_for_career")?;
        Ok(roadmap_for(Some(career_id), &format!("Roadmap for {career_id}")))
    }

    async fn industry_trends(&self, field: &str, period: &str) -> ApiResult<IndustryTrends> {
        self.enter("industry_trends")?;
        let mut trends = Map::new();
        trends.insert("salary_trends".to_string(), json!("Rising"));
        trends.insert("emerging_technologies".to_string(), json!(["LLMs", "Edge AI"]));
        trends.insert("raw_content".to_string(), json!("{\"unparsed\": true}"));
        Ok(IndustryTrends {
            field: field.to_string(),
            period: period.to_string(),
            generated_at: Some("2024-01-01T00:00:00Z".to_string()),
            trends,
        })
    }

    async fn trends_for_field(&self, field: &str, period: &str) -> ApiResult<IndustryTrends> {
        self.enter("trends_for_field")?;
        let mut trends = Map::new();
        trends.insert("market_trends".to_string(), json!("Steady"));
        Ok(IndustryTrends {
            field: field.to_string(),
            period: period.to_string(),
            generated_at: None,
            trends,
        })
    }

    async fn health(&self) -> ApiResult<Value> {
        self.enter("health")?;
        Ok(json!({"status": "healthy", "model_loaded": true}))
    }

    async fn careers(&self) -> ApiResult<Vec<CareerRecommendation>> {
        self.enter("careers")?;
        Ok(self.catalog.clone())
    }

    async fn career(&self, career_id: &str) -> ApiResult<CareerRecommendation> {
        self.enter("career")?;
        self.catalog
            .iter()
            .find(|c| c.career_id == career_id)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 404,
                message: "Career not found".to_string(),
            })
    }

    async fn model_info(&self) -> ApiResult<Value> {
        self.enter("model_info")?;
        Ok(json!({"model_type": "hybrid", "careers": self.catalog.len()}))
    }

    async fn skill_gap(
        &self,
        user_skills: &[String],
        career_skills: &[String],
    ) -> ApiResult<SkillGapReport> {
        self.enter("skill_gap")?;
        let known: HashSet<String> = user_skills.iter().map(|s| s.to_lowercase()).collect();
        let missing: Vec<String> = career_skills
            .iter()
            .filter(|s| !known.contains(&s.to_lowercase()))
            .cloned()
            .collect();
        let gap_percentage = if career_skills.is_empty() {
            0.0
        } else {
            missing.len() as f64 / career_skills.len() as f64 * 100.0
        };
        Ok(SkillGapReport {
            user_skills: user_skills.to_vec(),
            career_skills: career_skills.to_vec(),
            missing_skills: missing,
            gap_percentage,
        })
    }
}
