//! Projection of weather payloads into display strings. Everything here is
//! pure formatting; missing or short arrays shorten the output instead of
//! panicking.

use chrono::{NaiveDate, NaiveDateTime};

use crate::codes;
use crate::model::{CitySuggestion, WeatherBundle, WeatherData, compose_full_name};

/// Hourly panel shows at most the first day of entries.
pub const HOURLY_ENTRIES: usize = 24;

/// Location heading, `name[, region][, country]`.
pub fn location_heading(bundle: &WeatherBundle) -> String {
    compose_full_name(
        &bundle.location.name,
        bundle.location.region.as_deref(),
        bundle.location.country.as_deref(),
    )
}

/// Current-conditions panel, one line per field.
pub fn current_panel(weather: &WeatherData) -> Vec<String> {
    let current = &weather.current_weather;
    let mut lines = vec![
        format!("Time:        {}", format_time(&current.time)),
        format!("Temperature: {}°C", current.temperature),
    ];

    // "Feels like" comes from the first hourly sample, as the current
    // block itself carries no apparent temperature.
    if let Some(feels) = weather.hourly.apparent_temperature.first() {
        lines.push(format!("Feels like:  {feels}°C"));
    }

    lines.push(format!("Conditions:  {}", codes::describe(current.weathercode)));
    lines.push(format!("Wind:        {} km/h", current.windspeed));
    lines
}

/// One line per hour for the first [`HOURLY_ENTRIES`] entries.
pub fn hourly_panel(weather: &WeatherData) -> Vec<String> {
    let hourly = &weather.hourly;

    hourly
        .time
        .iter()
        .zip(&hourly.temperature_2m)
        .zip(&hourly.weathercode)
        .zip(&hourly.precipitation_probability)
        .take(HOURLY_ENTRIES)
        .map(|(((time, temp), code), precip)| {
            format!("{}  {temp}°C  {}  {precip}%", format_hour(time), codes::describe(*code))
        })
        .collect()
}

/// One line per forecast day, all entries.
pub fn daily_panel(weather: &WeatherData) -> Vec<String> {
    let daily = &weather.daily;

    daily
        .time
        .iter()
        .zip(&daily.temperature_2m_max)
        .zip(&daily.temperature_2m_min)
        .zip(&daily.weathercode)
        .zip(&daily.precipitation_sum)
        .map(|((((time, max), min), code), precip)| {
            format!(
                "{}  {max}° / {min}°  {}  {precip} mm",
                format_date(time),
                codes::describe(*code),
            )
        })
        .collect()
}

/// Secondary line of a suggestion item: `region, country`, the separator
/// appearing only when both parts are present.
pub fn suggestion_detail(suggestion: &CitySuggestion) -> String {
    match (suggestion.region.is_empty(), suggestion.country.is_empty()) {
        (false, false) => format!("{}, {}", suggestion.region, suggestion.country),
        (false, true) => suggestion.region.clone(),
        (true, false) => suggestion.country.clone(),
        (true, true) => String::new(),
    }
}

/// Display string for a suggestion: its `full_name` when the backend sent
/// one, otherwise composed from the parts.
pub fn suggestion_display(suggestion: &CitySuggestion) -> String {
    if !suggestion.full_name.is_empty() {
        return suggestion.full_name.clone();
    }

    let detail = suggestion_detail(suggestion);
    if detail.is_empty() {
        suggestion.name.clone()
    } else {
        format!("{}, {detail}", suggestion.name)
    }
}

// Forecast timestamps arrive as local ISO strings without an offset,
// e.g. "2025-06-01T12:00"; some backends include seconds.
fn parse_naive(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

fn format_time(value: &str) -> String {
    match parse_naive(value) {
        Some(dt) => dt.format("%H:%M").to_string(),
        None => value.to_string(),
    }
}

fn format_hour(value: &str) -> String {
    match parse_naive(value) {
        Some(dt) => dt.format("%H:00").to_string(),
        None => value.to_string(),
    }
}

fn format_date(value: &str) -> String {
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => date.format("%a %-d %b").to_string(),
        Err(_) => value.to_string(),
    }
}
