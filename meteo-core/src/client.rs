use std::fmt::Debug;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{CitySuggestion, Location, WeatherBundle, WeatherData};

/// Error reported by the backend inside a successful (200) response body,
/// e.g. `{"error": "city not found"}`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct BackendError(pub String);

/// The two backend endpoints this client talks to.
#[async_trait]
pub trait WeatherBackend: Send + Sync + Debug {
    /// `GET /api/city-suggestions?q=<query>`.
    async fn city_suggestions(&self, query: &str) -> Result<Vec<CitySuggestion>>;

    /// `POST /api/weather` with body `{"city": <city>}`.
    async fn weather(&self, city: &str) -> Result<WeatherBundle>;
}

/// HTTP implementation of [`WeatherBackend`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    http: Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self { base_url: base_url.trim_end_matches('/').to_string(), http: Client::new() }
    }
}

#[derive(Debug, Serialize)]
struct CityRequest<'a> {
    city: &'a str,
}

/// The weather endpoint answers 200 for both outcomes; the payload carries
/// either the data or an `error` field.
#[derive(Debug, Deserialize)]
struct WeatherEnvelope {
    error: Option<String>,
    location: Option<Location>,
    weather: Option<WeatherData>,
}

impl WeatherEnvelope {
    fn into_bundle(self) -> Result<WeatherBundle> {
        if let Some(message) = self.error {
            return Err(BackendError(message).into());
        }

        match (self.location, self.weather) {
            (Some(location), Some(weather)) => Ok(WeatherBundle { location, weather }),
            _ => Err(anyhow!("Weather response is missing the location or weather payload")),
        }
    }
}

#[async_trait]
impl WeatherBackend for HttpBackend {
    async fn city_suggestions(&self, query: &str) -> Result<Vec<CitySuggestion>> {
        let url = format!("{}/api/city-suggestions", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("q", query)])
            .send()
            .await
            .context("Failed to send request to the city-suggestions endpoint")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read city-suggestions response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "City-suggestions request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: Vec<CitySuggestion> =
            serde_json::from_str(&body).context("Failed to parse city-suggestions JSON")?;

        Ok(parsed)
    }

    async fn weather(&self, city: &str) -> Result<WeatherBundle> {
        let url = format!("{}/api/weather", self.base_url);

        let res = self
            .http
            .post(&url)
            .json(&CityRequest { city })
            .send()
            .await
            .context("Failed to send request to the weather endpoint")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read weather response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Weather request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let envelope: WeatherEnvelope =
            serde_json::from_str(&body).context("Failed to parse weather JSON")?;

        envelope.into_bundle()
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    // Back off to a char boundary; backend error strings are not ASCII.
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
