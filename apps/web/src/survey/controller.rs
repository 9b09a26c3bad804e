use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::api_client::CareerApi;
use crate::errors::AppError;
use crate::store::StateStore;
use crate::survey::machine::{SurveyError, SurveySession, SurveyView, Transition};

/// Drives a `SurveySession` against the API and persists the result.
///
/// One controller serves the whole process; it sits behind a mutex in
/// `AppState` so transitions never interleave.
pub struct SurveyController {
    api: Arc<dyn CareerApi>,
    store: StateStore,
    session: Option<SurveySession>,
}

impl SurveyController {
    pub fn new(api: Arc<dyn CareerApi>, store: StateStore) -> Self {
        Self {
            api,
            store,
            session: None,
        }
    }

    /// Starts a new survey, discarding any unfinished one.
    pub async fn start(&mut self) -> Result<SurveyView, AppError> {
        let reply = self.api.start_session().await?;
        info!(
            "Survey session {} started with {} questions",
            reply.session_id.as_deref().unwrap_or("<none>"),
            reply.questions.len()
        );
        let session = SurveySession::new(reply.session_id, reply.questions);
        let view = session.view();
        self.session = Some(session);
        Ok(view)
    }

    fn session(&self) -> Result<&SurveySession, AppError> {
        self.session
            .as_ref()
            .ok_or(AppError::Survey(SurveyError::NotStarted))
    }

    fn session_mut(&mut self) -> Result<&mut SurveySession, AppError> {
        self.session
            .as_mut()
            .ok_or(AppError::Survey(SurveyError::NotStarted))
    }

    pub fn view(&self) -> Result<SurveyView, AppError> {
        Ok(self.session()?.view())
    }

    pub fn answer(&mut self, question_id: &str, value: &str) -> Result<SurveyView, AppError> {
        let session = self.session_mut()?;
        session.record_answer(question_id, value)?;
        Ok(session.view())
    }

    pub fn back(&mut self) -> Result<SurveyView, AppError> {
        let session = self.session_mut()?;
        session.back()?;
        Ok(session.view())
    }

    /// Advances the survey, performing whatever submissions the machine asks
    /// for. A failed submission is reported in the returned view, not as an
    /// error.
    pub async fn next(&mut self) -> Result<SurveyView, AppError> {
        let session = self
            .session
            .as_mut()
            .ok_or(AppError::Survey(SurveyError::NotStarted))?;
        let mut transition = session.next()?;

        loop {
            match transition {
                Transition::Moved => break,
                Transition::SubmitInitial(answers) => {
                    let reply = self
                        .api
                        .submit_initial_answers(session.session_id(), &answers)
                        .await;
                    match reply {
                        Ok(reply) => {
                            info!(
                                "Initial answers accepted, {} adaptive questions",
                                reply.adaptive_questions.len()
                            );
                            session.adopt_session_id(reply.session_id);
                            transition = session.initial_submitted(reply.adaptive_questions)?;
                        }
                        Err(e) => {
                            warn!("Submitting initial answers failed: {e}");
                            session.fail(format!("Could not submit your answers: {e}"));
                            break;
                        }
                    }
                }
                Transition::Complete(answers) => {
                    let reply = self
                        .api
                        .complete_survey(session.session_id(), &answers)
                        .await;
                    match reply {
                        Ok(reply) => {
                            session.adopt_session_id(reply.session_id);
                            let result = session.completion(reply.recommendations, Utc::now())?;
                            // Stays retryable until the result is stored.
                            if let Err(e) = self.store.record_completed_survey(&result).await {
                                warn!("Saving survey result failed: {e:#}");
                                session.fail(format!("Could not save your results: {e}"));
                                break;
                            }
                            info!(
                                "Survey complete with {} recommendations",
                                result.recommendations.len()
                            );
                            session.commit(result)?;
                            break;
                        }
                        Err(e) => {
                            warn!("Completing survey failed: {e}");
                            session.fail(format!("Could not complete the survey: {e}"));
                            break;
                        }
                    }
                }
            }
        }

        Ok(session.view())
    }
}
