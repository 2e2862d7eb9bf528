//! UI state machine driving the lookup flow: debounced suggestion fetches
//! on input, a guarded weather fetch on submit, and a write-through to the
//! history store on success.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::client::WeatherBackend;
use crate::history::{CityRecord, HistoryStore, Storage};
use crate::model::{CitySuggestion, WeatherBundle, compose_full_name};

/// Idle interval after the last keystroke before a suggestion fetch fires.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(300);

/// Queries shorter than this never reach the network.
pub const MIN_QUERY_LEN: usize = 2;

/// Validation message for an empty submit.
pub const EMPTY_CITY_MESSAGE: &str = "Please enter a city name";

/// Fixed label prefixed to weather fetch failures.
pub const WEATHER_ERROR_LABEL: &str = "Failed to fetch weather data";

/// Which UI region is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Suggesting,
    Loading,
    Result,
    Error,
}

/// The controller's ephemeral state, shared with the debounced fetch task.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub phase: Phase,
    pub suggestions: Vec<CitySuggestion>,
    pub error: Option<String>,
    pub result: Option<WeatherBundle>,
}

/// A single-shot delayed action with replace semantics: scheduling a new
/// action aborts the pending one, so at most one task is ever live.
#[derive(Debug)]
pub struct Debounce {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    /// Run `action` after the delay, replacing any pending action.
    pub fn schedule<F>(&mut self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action.await;
        }));
    }

    /// Abort the pending action, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for Debounce {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Owns the UI state and orchestrates the two backend calls.
#[derive(Debug)]
pub struct ViewController<S> {
    backend: Arc<dyn WeatherBackend>,
    history: HistoryStore<S>,
    state: Arc<Mutex<UiState>>,
    debounce: Debounce,
}

impl<S: Storage> ViewController<S> {
    pub fn new(backend: Arc<dyn WeatherBackend>, history: HistoryStore<S>) -> Self {
        Self {
            backend,
            history,
            state: Arc::new(Mutex::new(UiState::default())),
            debounce: Debounce::new(DEBOUNCE_DELAY),
        }
    }

    /// Snapshot of the current UI state.
    pub fn state(&self) -> UiState {
        lock(&self.state).clone()
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    /// Handle a keystroke in the city field. Short queries cancel any
    /// pending fetch and clear the dropdown immediately; longer ones
    /// restart the debounce timer.
    pub fn on_input(&mut self, raw: &str) {
        let query = raw.trim().to_string();

        if query.chars().count() < MIN_QUERY_LEN {
            self.debounce.cancel();
            let mut state = lock(&self.state);
            state.suggestions.clear();
            state.phase = Phase::Idle;
            return;
        }

        let backend = Arc::clone(&self.backend);
        let shared = Arc::clone(&self.state);
        self.debounce.schedule(async move {
            // Suggestion failures degrade to a hidden dropdown.
            let suggestions = backend.city_suggestions(&query).await.unwrap_or_default();

            let mut state = lock(&shared);
            if suggestions.is_empty() {
                state.suggestions.clear();
                state.phase = Phase::Idle;
            } else {
                state.suggestions = suggestions;
                state.phase = Phase::Suggesting;
            }
        });
    }

    /// Submit a weather lookup. An empty trimmed city is a validation
    /// error and never reaches the network; otherwise the controller
    /// transitions through Loading to Result or Error, recording the city
    /// in history only on success.
    pub async fn submit(&mut self, raw: &str) {
        let city = raw.trim().to_string();

        if city.is_empty() {
            let mut state = lock(&self.state);
            state.error = Some(EMPTY_CITY_MESSAGE.to_string());
            state.phase = Phase::Error;
            return;
        }

        {
            let mut state = lock(&self.state);
            state.phase = Phase::Loading;
            state.error = None;
            state.result = None;
            state.suggestions.clear();
        }

        match self.backend.weather(&city).await {
            Ok(bundle) => {
                let full_name = compose_full_name(
                    &bundle.location.name,
                    bundle.location.region.as_deref(),
                    bundle.location.country.as_deref(),
                );
                self.history.record_city(&CityRecord {
                    name: bundle.location.name.clone(),
                    region: bundle.location.region.clone(),
                    country: bundle.location.country.clone(),
                    full_name,
                });

                let mut state = lock(&self.state);
                state.result = Some(bundle);
                state.phase = Phase::Result;
            }
            Err(err) => {
                let mut state = lock(&self.state);
                state.error = Some(format!("{WEATHER_ERROR_LABEL}: {err}"));
                state.phase = Phase::Error;
            }
        }
    }
}

fn lock(state: &Mutex<UiState>) -> MutexGuard<'_, UiState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
