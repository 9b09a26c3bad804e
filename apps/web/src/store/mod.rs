//! Persistent client state: the completed survey, the roadmap cache and the
//! one-shot mentor handoff. Every view reads through `StateStore` rather than
//! touching storage keys directly.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{info, warn};

use crate::models::mentor::{MentorHandoff, MentorListing};
use crate::models::roadmap::{LearningRoadmap, RoadmapCache};
use crate::models::survey::SurveyResult;

pub mod backend;

use backend::{FileBackend, KvBackend, MemoryBackend};

pub const SURVEY_RESULT_KEY: &str = "career_compass.survey_result";
pub const ROADMAPS_KEY: &str = "career_compass.roadmaps";
pub const ROADMAPS_GENERATED_AT_KEY: &str = "career_compass.roadmaps_generated_at";
pub const MENTOR_HANDOFF_KEY: &str = "career_compass.mentor_handoff";
pub const MENTOR_LISTING_KEY: &str = "career_compass.mentor_listing";

/// Path value that selects the in-memory backend.
pub const MEMORY_PATH: &str = ":memory:";

#[derive(Clone)]
pub struct StateStore {
    backend: Arc<dyn KvBackend>,
}

impl StateStore {
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::default()))
    }

    /// Opens the JSON state file at `path`, or an in-memory store for `:memory:`.
    pub async fn open(path: &str) -> Result<Self> {
        if path == MEMORY_PATH {
            info!("Client state kept in memory only");
            return Ok(Self::in_memory());
        }
        let backend = FileBackend::open(path).await?;
        info!("Client state persisted to {path}");
        Ok(Self::new(Arc::new(backend)))
    }

    /// Reads and decodes `key`. Entries that no longer decode are logged,
    /// removed and reported as absent.
    async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.backend.get(key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("Discarding unreadable state entry {key}: {e}");
                self.backend.remove(key).await?;
                Ok(None)
            }
        }
    }

    async fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value).with_context(|| format!("Failed to encode {key}"))?;
        self.backend.set(key, raw).await
    }

    pub async fn survey_result(&self) -> Result<Option<SurveyResult>> {
        self.read(SURVEY_RESULT_KEY).await
    }

    /// Replaces the stored result without touching the roadmap cache.
    pub async fn save_survey_result(&self, result: &SurveyResult) -> Result<()> {
        self.write(SURVEY_RESULT_KEY, result).await
    }

    /// Stores a freshly completed survey, replacing any earlier result, and
    /// invalidates roadmaps and mentors loaded for the previous one.
    pub async fn record_completed_survey(&self, result: &SurveyResult) -> Result<()> {
        self.save_survey_result(result).await?;
        self.clear_roadmap_cache().await?;
        self.backend.remove(MENTOR_LISTING_KEY).await
    }

    /// The cached roadmaps with their timestamp. Absent unless both halves
    /// are present and readable.
    pub async fn roadmap_cache(&self) -> Result<Option<RoadmapCache>> {
        let roadmaps: Option<Vec<LearningRoadmap>> = self.read(ROADMAPS_KEY).await?;
        let generated_at: Option<DateTime<Utc>> = self.read(ROADMAPS_GENERATED_AT_KEY).await?;
        Ok(match (roadmaps, generated_at) {
            (Some(roadmaps), Some(generated_at)) => Some(RoadmapCache {
                roadmaps,
                generated_at,
            }),
            _ => None,
        })
    }

    pub async fn save_roadmap_cache(&self, cache: &RoadmapCache) -> Result<()> {
        self.write(ROADMAPS_KEY, &cache.roadmaps).await?;
        self.write(ROADMAPS_GENERATED_AT_KEY, &cache.generated_at)
            .await
    }

    pub async fn clear_roadmap_cache(&self) -> Result<()> {
        self.backend.remove(ROADMAPS_KEY).await?;
        self.backend.remove(ROADMAPS_GENERATED_AT_KEY).await
    }

    pub async fn set_mentor_handoff(&self, handoff: &MentorHandoff) -> Result<()> {
        self.write(MENTOR_HANDOFF_KEY, handoff).await
    }

    /// Consumes the handoff: it is deleted whether or not it decodes.
    pub async fn take_mentor_handoff(&self) -> Result<Option<MentorHandoff>> {
        let handoff = self.read(MENTOR_HANDOFF_KEY).await?;
        self.backend.remove(MENTOR_HANDOFF_KEY).await?;
        Ok(handoff)
    }

    pub async fn mentor_listing(&self) -> Result<Option<MentorListing>> {
        self.read(MENTOR_LISTING_KEY).await
    }

    pub async fn save_mentor_listing(&self, listing: &MentorListing) -> Result<()> {
        self.write(MENTOR_LISTING_KEY, listing).await
    }

    #[cfg(test)]
    pub(crate) async fn put_raw(&self, key: &str, raw: &str) {
        self.backend.set(key, raw.to_string()).await.unwrap();
    }

    #[cfg(test)]
    pub(crate) async fn get_raw(&self, key: &str) -> Option<String> {
        self.backend.get(key).await.unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::fake::career;
    use crate::models::survey::AnswerSet;
    use chrono::Duration;

    fn survey_result() -> SurveyResult {
        let mut answers = AnswerSet::new();
        answers.record("interests", "Tech");
        SurveyResult {
            session_id: Some("s".to_string()),
            merged_answers: answers,
            recommendations: vec![career("data_scientist", "Data Scientist", 92.0)],
            completed_at: Utc::now(),
        }
    }

    fn cache() -> RoadmapCache {
        RoadmapCache {
            roadmaps: vec![LearningRoadmap {
                career_id: Some("data_scientist".to_string()),
                career_title: "Data Scientist".to_string(),
                generated_at: None,
                roadmap: Default::default(),
            }],
            generated_at: Utc::now() - Duration::minutes(5),
        }
    }

    #[tokio::test]
    async fn test_completed_survey_clears_roadmaps() {
        let store = StateStore::in_memory();
        store.save_roadmap_cache(&cache()).await.unwrap();
        assert!(store.roadmap_cache().await.unwrap().is_some());

        let result = survey_result();
        store.record_completed_survey(&result).await.unwrap();

        assert_eq!(store.survey_result().await.unwrap(), Some(result));
        assert!(store.roadmap_cache().await.unwrap().is_none());
        assert!(store.get_raw(ROADMAPS_GENERATED_AT_KEY).await.is_none());
    }

    #[tokio::test]
    async fn test_completed_survey_drops_mentor_listing() {
        let store = StateStore::in_memory();
        let listing = MentorListing {
            mentors: Vec::new(),
            personalized_for: Some(career("ux_designer", "UX Designer", 88.0)),
        };
        store.save_mentor_listing(&listing).await.unwrap();
        assert_eq!(store.mentor_listing().await.unwrap(), Some(listing));

        store.record_completed_survey(&survey_result()).await.unwrap();
        assert!(store.mentor_listing().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_survey_result_is_discarded() {
        let store = StateStore::in_memory();
        store.put_raw(SURVEY_RESULT_KEY, "{\"recommendations\": 3").await;

        assert!(store.survey_result().await.unwrap().is_none());
        assert!(store.get_raw(SURVEY_RESULT_KEY).await.is_none());
    }

    #[tokio::test]
    async fn test_roadmap_cache_needs_timestamp() {
        let store = StateStore::in_memory();
        store.save_roadmap_cache(&cache()).await.unwrap();
        store.backend.remove(ROADMAPS_GENERATED_AT_KEY).await.unwrap();

        assert!(store.roadmap_cache().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_handoff_is_consumed_once() {
        let store = StateStore::in_memory();
        let handoff = MentorHandoff {
            selected_career: career("ux_designer", "UX Designer", 88.0),
            session_data: AnswerSet::new(),
            created_at: Utc::now(),
        };
        store.set_mentor_handoff(&handoff).await.unwrap();

        assert_eq!(store.take_mentor_handoff().await.unwrap(), Some(handoff));
        assert_eq!(store.take_mentor_handoff().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalid_handoff_is_cleared() {
        let store = StateStore::in_memory();
        store.put_raw(MENTOR_HANDOFF_KEY, "{\"selected_career\": null}").await;

        assert_eq!(store.take_mentor_handoff().await.unwrap(), None);
        assert!(store.get_raw(MENTOR_HANDOFF_KEY).await.is_none());
    }

    #[tokio::test]
    async fn test_file_store_round_trips_survey() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compass_state.json");
        let path = path.to_str().unwrap();
        let result = survey_result();

        StateStore::open(path)
            .await
            .unwrap()
            .record_completed_survey(&result)
            .await
            .unwrap();

        let reopened = StateStore::open(path).await.unwrap();
        assert_eq!(reopened.survey_result().await.unwrap(), Some(result));
    }
}
