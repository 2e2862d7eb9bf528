use serde::{Deserialize, Serialize};

/// One entry returned by the city-suggestions endpoint.
///
/// `region`, `country` and `full_name` arrive as plain strings and may be
/// empty when the geocoder has no subdivision or country for a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySuggestion {
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub full_name: String,
}

/// Resolved location attached to a weather response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub region: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub time: String,
    pub temperature: f64,
    pub weathercode: u32,
    pub windspeed: f64,
}

/// Hourly forecast arrays, indexed in lockstep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hourly {
    pub time: Vec<String>,
    pub temperature_2m: Vec<f64>,
    pub weathercode: Vec<u32>,
    pub precipitation_probability: Vec<f64>,
    pub apparent_temperature: Vec<f64>,
}

/// Daily forecast arrays, indexed in lockstep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Daily {
    pub time: Vec<String>,
    pub temperature_2m_max: Vec<f64>,
    pub temperature_2m_min: Vec<f64>,
    pub weathercode: Vec<u32>,
    pub precipitation_sum: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherData {
    pub current_weather: CurrentWeather,
    pub hourly: Hourly,
    pub daily: Daily,
}

/// Successful payload of the weather endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherBundle {
    pub location: Location,
    pub weather: WeatherData,
}

/// Compose the display string `name[, region][, country]`.
///
/// Blank segments are skipped entirely, so the separator never dangles.
/// The result doubles as the deduplication key for the history store.
pub fn compose_full_name(name: &str, region: Option<&str>, country: Option<&str>) -> String {
    let mut full = String::from(name);
    for part in [region, country] {
        if let Some(part) = part.filter(|p| !p.trim().is_empty()) {
            full.push_str(", ");
            full.push_str(part);
        }
    }
    full
}
