use std::sync::Arc;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use meteo_core::{
    Config, FileStorage, HistoryStore, HttpBackend, Phase, UiState, ViewController,
    WeatherBackend, render, view,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about = "City weather lookup")]
pub struct Cli {
    /// Without a subcommand, starts an interactive lookup session.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the backend endpoint used for lookups.
    Configure,

    /// Show current, hourly and daily weather for a city.
    Show {
        /// City name, e.g. "Paris" or "Paris, Île-de-France, France".
        city: String,
    },

    /// List matching cities for a query.
    Suggest {
        /// Partial city name, at least 2 characters.
        query: String,
    },

    /// Print recently viewed cities.
    History,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Some(Command::Configure) => configure(),
            Some(Command::Show { city }) => show(&city).await,
            Some(Command::Suggest { query }) => suggest(&query).await,
            Some(Command::History) => history(),
            None => crate::interactive::run().await,
        }
    }
}

fn new_controller() -> Result<ViewController<FileStorage>> {
    let config = Config::load()?;
    let backend: Arc<dyn WeatherBackend> = Arc::new(HttpBackend::new(config.endpoint_or_default()));
    let history = HistoryStore::new(FileStorage::open()?);
    Ok(ViewController::new(backend, history))
}

async fn show(city: &str) -> Result<()> {
    let mut controller = new_controller()?;
    println!("Fetching weather...");
    controller.submit(city).await;
    print_outcome(&controller.state())
}

async fn suggest(query: &str) -> Result<()> {
    let query = query.trim();
    if query.chars().count() < view::MIN_QUERY_LEN {
        println!("Type at least {} characters.", view::MIN_QUERY_LEN);
        return Ok(());
    }

    let config = Config::load()?;
    let backend = HttpBackend::new(config.endpoint_or_default());
    let suggestions = backend.city_suggestions(query).await?;

    if suggestions.is_empty() {
        println!("No matching cities.");
        return Ok(());
    }

    for suggestion in &suggestions {
        let detail = render::suggestion_detail(suggestion);
        if detail.is_empty() {
            println!("{}", suggestion.name);
        } else {
            println!("{} ({detail})", suggestion.name);
        }
    }

    Ok(())
}

fn history() -> Result<()> {
    let store = HistoryStore::new(FileStorage::open()?);
    let entries = store.history();

    if entries.is_empty() {
        println!("No recent cities.");
        return Ok(());
    }

    println!("Recent cities:");
    for city in &entries {
        let viewed = city.timestamp.with_timezone(&chrono::Local);
        println!("  {}  ({})", city.full_name, viewed.format("%Y-%m-%d %H:%M"));
    }

    Ok(())
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let endpoint = inquire::Text::new("Backend endpoint:")
        .with_default(config.endpoint_or_default())
        .with_help_message("Base URL of the weather backend")
        .prompt()?;

    config.set_endpoint(endpoint.trim().trim_end_matches('/').to_string());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

/// Print the result panels, or surface the controller's error message.
pub(crate) fn print_outcome(state: &UiState) -> Result<()> {
    match state.phase {
        Phase::Result => {
            if let Some(bundle) = &state.result {
                println!();
                println!("{}", render::location_heading(bundle));

                println!("\nCurrent weather");
                for line in render::current_panel(&bundle.weather) {
                    println!("  {line}");
                }

                println!("\nNext 24 hours");
                for line in render::hourly_panel(&bundle.weather) {
                    println!("  {line}");
                }

                println!("\nDaily forecast");
                for line in render::daily_panel(&bundle.weather) {
                    println!("  {line}");
                }
            }
            Ok(())
        }
        Phase::Error => {
            let message =
                state.error.clone().unwrap_or_else(|| "Weather lookup failed".to_string());
            bail!("{message}")
        }
        _ => Ok(()),
    }
}
