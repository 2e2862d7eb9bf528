//! Core library for the `meteo` weather lookup client.
//!
//! This crate defines:
//! - The local history store (last viewed city + bounded recent-city list)
//! - A client for the backend suggestion and weather endpoints
//! - The view controller driving debounced suggestions and weather lookups
//! - Rendering of forecasts into display strings
//!
//! It is used by `meteo-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod codes;
pub mod config;
pub mod history;
pub mod model;
pub mod render;
pub mod view;

pub use client::{BackendError, HttpBackend, WeatherBackend};
pub use config::Config;
pub use history::{
    CityRecord, FileStorage, HistoryStore, MAX_HISTORY_ITEMS, MemoryStorage, RecentCity, Storage,
};
pub use model::{CitySuggestion, Location, WeatherBundle, WeatherData, compose_full_name};
pub use view::{Phase, UiState, ViewController};
