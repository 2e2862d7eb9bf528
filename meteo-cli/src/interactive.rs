//! Interactive lookup session: offers the last viewed city again, lets the
//! user pick from recent cities, and completes free-text input against the
//! city-suggestions endpoint.

use std::sync::Arc;

use anyhow::Result;
use inquire::autocompletion::{Autocomplete, Replacement};
use inquire::{Confirm, CustomUserError, Select, Text};
use meteo_core::{
    Config, FileStorage, HistoryStore, HttpBackend, ViewController, WeatherBackend, render, view,
};
use tokio::runtime::Handle;
use tokio::task;

pub async fn run() -> Result<()> {
    let config = Config::load()?;
    let backend = Arc::new(HttpBackend::new(config.endpoint_or_default()));
    let store = HistoryStore::new(FileStorage::open()?);

    // Offer the city from the previous session first.
    if let Some(last) = store.last_city() {
        let again =
            Confirm::new(&format!("View weather for {last} again?")).with_default(true).prompt()?;
        if again {
            return lookup(backend, store, &last).await;
        }
    }

    let history = store.history();
    let city = if history.is_empty() {
        prompt_city(Arc::clone(&backend))?
    } else {
        const NEW_SEARCH: &str = "Search for another city";

        let mut options: Vec<String> = history.iter().map(|c| c.full_name.clone()).collect();
        options.push(NEW_SEARCH.to_string());

        let picked = Select::new("Recent cities:", options).prompt()?;
        if picked == NEW_SEARCH { prompt_city(Arc::clone(&backend))? } else { picked }
    };

    lookup(backend, store, &city).await
}

async fn lookup(
    backend: Arc<HttpBackend>,
    store: HistoryStore<FileStorage>,
    city: &str,
) -> Result<()> {
    let backend: Arc<dyn WeatherBackend> = backend;
    let mut controller = ViewController::new(backend, store);

    println!("Fetching weather...");
    controller.submit(city).await;

    crate::cli::print_outcome(&controller.state())
}

fn prompt_city(backend: Arc<HttpBackend>) -> Result<String> {
    let city = Text::new("City:")
        .with_autocomplete(CityCompleter { backend, shown: Vec::new() })
        .with_help_message("Start typing to see matching cities")
        .prompt()?;

    Ok(city)
}

/// Completion source backed by the city-suggestions endpoint.
#[derive(Clone)]
struct CityCompleter {
    backend: Arc<HttpBackend>,
    shown: Vec<String>,
}

impl Autocomplete for CityCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, CustomUserError> {
        let query = input.trim().to_string();
        if query.chars().count() < view::MIN_QUERY_LEN {
            self.shown.clear();
            return Ok(Vec::new());
        }

        // The prompt blocks this runtime thread; hop back onto the runtime
        // for the fetch. Failures degrade to an empty dropdown.
        let backend = Arc::clone(&self.backend);
        let fetched =
            task::block_in_place(|| Handle::current().block_on(backend.city_suggestions(&query)))
                .unwrap_or_default();

        self.shown = fetched.iter().map(render::suggestion_display).collect();
        Ok(self.shown.clone())
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, CustomUserError> {
        Ok(match highlighted_suggestion {
            Some(city) => Replacement::Some(city),
            None => Replacement::None,
        })
    }
}
