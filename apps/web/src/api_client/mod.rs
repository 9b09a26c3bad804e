/// API Client: the single point of entry for all calls to the CareerCompass service.
///
/// No other module talks to the upstream directly. Views depend on the
/// `CareerApi` trait so tests can swap in a scripted implementation.
///
/// Each operation issues exactly one HTTP request. There are no retries.
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::career::CareerRecommendation;
use crate::models::mentor::Mentor;
use crate::models::roadmap::LearningRoadmap;
use crate::models::survey::AnswerSet;
use crate::models::trends::IndustryTrends;

#[cfg(test)]
pub mod fake;
pub mod types;

use types::{
    CareerResponse, CareersResponse, CompleteSurveyResponse, InitialAnswersResponse,
    MentorMatchRequest, MentorsPayload, RecommendRequest, RecommendationsResponse,
    RoadmapRequest, SessionAnswersRequest, SkillGapReport, SkillGapRequest,
    StartSessionResponse, TrendsRequest,
};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("could not reach the career service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("career service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response from the career service: {0}")]
    Malformed(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Remote capabilities of the CareerCompass service.
#[async_trait]
pub trait CareerApi: Send + Sync {
    async fn start_session(&self) -> ApiResult<StartSessionResponse>;

    async fn submit_initial_answers(
        &self,
        session_id: Option<&str>,
        answers: &AnswerSet,
    ) -> ApiResult<InitialAnswersResponse>;

    async fn complete_survey(
        &self,
        session_id: Option<&str>,
        answers: &AnswerSet,
    ) -> ApiResult<CompleteSurveyResponse>;

    /// Stateless recommendation from an answer set, without a session.
    async fn recommend_careers(&self, answers: &AnswerSet)
        -> ApiResult<Vec<CareerRecommendation>>;

    async fn mentors(&self) -> ApiResult<Vec<Mentor>>;

    async fn match_mentors(
        &self,
        career: &CareerRecommendation,
        answers: &AnswerSet,
    ) -> ApiResult<Vec<Mentor>>;

    async fn generate_roadmap(
        &self,
        career: &CareerRecommendation,
        profile: &AnswerSet,
    ) -> ApiResult<LearningRoadmap>;

    async fn roadmap_for_career(&self, career_id: &str) -> ApiResult<LearningRoadmap>;

    async fn industry_trends(&self, field: &str, period: &str) -> ApiResult<IndustryTrends>;

    async fn trends_for_field(&self, field: &str, period: &str) -> ApiResult<IndustryTrends>;

    async fn health(&self) -> ApiResult<Value>;

    async fn careers(&self) -> ApiResult<Vec<CareerRecommendation>>;

    async fn career(&self, career_id: &str) -> ApiResult<CareerRecommendation>;

    async fn model_info(&self) -> ApiResult<Value>;

    async fn skill_gap(
        &self,
        user_skills: &[String],
        career_skills: &[String],
    ) -> ApiResult<SkillGapReport>;
}

/// FastAPI error body. `detail` is a string for handled errors and a list of
/// validation failures for 422s.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Value,
}

/// HTTP implementation of `CareerApi`.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("'{base_url}' is not a valid API base URL"))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("'{base_url}' cannot be used as an API base URL");
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Joins path segments onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> ApiResult<T> {
        debug!("GET {url}");
        let response = self.client.get(url).send().await?;
        read_json(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> ApiResult<T> {
        debug!("POST {url}");
        let response = self.client.post(url).json(body).send().await?;
        read_json(response).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, url: Url) -> ApiResult<T> {
        debug!("POST {url}");
        let response = self.client.post(url).send().await?;
        read_json(response).await
    }
}

/// Maps a response to `T`, turning non-2xx statuses and undecodable bodies
/// into `ApiError`s.
async fn read_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();
    let url = response.url().clone();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        let body = String::from_utf8_lossy(&bytes);
        let message = serde_json::from_slice::<ErrorBody>(&bytes)
            .map(|e| detail_message(&e.detail))
            .unwrap_or_else(|_| body.trim().to_string());
        warn!("{url} returned {status}: {message}");
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_slice(&bytes).map_err(|e| {
        warn!("{url} returned an unreadable body: {e}");
        ApiError::Malformed(e.to_string())
    })
}

fn detail_message(detail: &Value) -> String {
    match detail {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item.get("msg").and_then(Value::as_str) {
                Some(msg) => msg.to_string(),
                None => item.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}

#[async_trait]
impl CareerApi for ApiClient {
    async fn start_session(&self) -> ApiResult<StartSessionResponse> {
        self.post_empty(self.endpoint(&["start-session"])).await
    }

    async fn submit_initial_answers(
        &self,
        session_id: Option<&str>,
        answers: &AnswerSet,
    ) -> ApiResult<InitialAnswersResponse> {
        let body = SessionAnswersRequest {
            session_id,
            session_data: answers,
        };
        self.post_json(self.endpoint(&["submit-initial-answers"]), &body)
            .await
    }

    async fn complete_survey(
        &self,
        session_id: Option<&str>,
        answers: &AnswerSet,
    ) -> ApiResult<CompleteSurveyResponse> {
        let body = SessionAnswersRequest {
            session_id,
            session_data: answers,
        };
        self.post_json(self.endpoint(&["complete-survey"]), &body)
            .await
    }

    async fn recommend_careers(
        &self,
        answers: &AnswerSet,
    ) -> ApiResult<Vec<CareerRecommendation>> {
        let body = RecommendRequest {
            session_data: answers,
        };
        let reply: RecommendationsResponse = self
            .post_json(self.endpoint(&["recommend-careers"]), &body)
            .await?;
        Ok(reply.recommendations)
    }

    async fn mentors(&self) -> ApiResult<Vec<Mentor>> {
        let payload: MentorsPayload = self.get_json(self.endpoint(&["mentors"])).await?;
        Ok(payload.into_mentors())
    }

    async fn match_mentors(
        &self,
        career: &CareerRecommendation,
        answers: &AnswerSet,
    ) -> ApiResult<Vec<Mentor>> {
        let body = MentorMatchRequest {
            selected_career: career,
            session_data: answers,
        };
        let payload: MentorsPayload = self
            .post_json(self.endpoint(&["match-mentors"]), &body)
            .await?;
        Ok(payload.into_mentors())
    }

    async fn generate_roadmap(
        &self,
        career: &CareerRecommendation,
        profile: &AnswerSet,
    ) -> ApiResult<LearningRoadmap> {
        let body = RoadmapRequest {
            career_data: career,
            user_profile: profile,
        };
        self.post_json(self.endpoint(&["generate-learning-roadmap"]), &body)
            .await
    }

    async fn roadmap_for_career(&self, career_id: &str) -> ApiResult<LearningRoadmap> {
        self.get_json(self.endpoint(&["learning-roadmap", career_id]))
            .await
    }

    async fn industry_trends(&self, field: &str, period: &str) -> ApiResult<IndustryTrends> {
        let body = TrendsRequest {
            career_field: field,
            time_period: period,
        };
        self.post_json(self.endpoint(&["get-industry-trends"]), &body)
            .await
    }

    async fn trends_for_field(&self, field: &str, period: &str) -> ApiResult<IndustryTrends> {
        let mut url = self.endpoint(&["industry-trends", field]);
        url.query_pairs_mut().append_pair("period", period);
        self.get_json(url).await
    }

    async fn health(&self) -> ApiResult<Value> {
        self.get_json(self.endpoint(&["health"])).await
    }

    async fn careers(&self) -> ApiResult<Vec<CareerRecommendation>> {
        let reply: CareersResponse = self.get_json(self.endpoint(&["careers"])).await?;
        Ok(reply.careers)
    }

    async fn career(&self, career_id: &str) -> ApiResult<CareerRecommendation> {
        let reply: CareerResponse = self
            .get_json(self.endpoint(&["careers", career_id]))
            .await?;
        Ok(reply.career)
    }

    async fn model_info(&self) -> ApiResult<Value> {
        self.get_json(self.endpoint(&["model-info"])).await
    }

    async fn skill_gap(
        &self,
        user_skills: &[String],
        career_skills: &[String],
    ) -> ApiResult<SkillGapReport> {
        let body = SkillGapRequest {
            user_skills,
            career_skills,
        };
        self.post_json(self.endpoint(&["skill-gap"]), &body).await
    }
}
