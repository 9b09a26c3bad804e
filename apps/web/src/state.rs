use std::sync::Arc;

use tokio::sync::Mutex;

use crate::api_client::CareerApi;
use crate::config::Config;
use crate::store::StateStore;
use crate::survey::controller::SurveyController;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Upstream CareerCompass service. `ApiClient` in production.
    pub api: Arc<dyn CareerApi>,
    pub store: StateStore,
    /// Held for the whole of a survey request, including its upstream call.
    pub survey: Arc<Mutex<SurveyController>>,
    pub config: Config,
}

impl AppState {
    pub fn new(api: Arc<dyn CareerApi>, store: StateStore, config: Config) -> Self {
        let survey = SurveyController::new(api.clone(), store.clone());
        Self {
            api,
            store,
            survey: Arc::new(Mutex::new(survey)),
            config,
        }
    }
}
