//! Air-quality aggregation server
//!
//! Resolves current air quality and weather for a coordinate from a chain of
//! third-party providers (falling back to simulated data), derives a naive
//! 24-hour air-quality forecast from the weather, and exposes both over HTTP
//! and as MCP tools.

pub mod aggregator;
pub mod config;
pub mod constants;
pub mod error;
pub mod forecast;
pub mod formatters;
pub mod insight;
pub mod models;
pub mod providers;
pub mod readings;
pub mod service;
pub mod web;

pub use aggregator::SourceAggregator;
pub use config::AppConfig;
pub use error::{ApiError, ProviderError};
pub use forecast::{ForecastEngine, ForecastError};
pub use insight::{GeminiClient, InsightClient, InsightError};
pub use providers::ConditionsProvider;
pub use readings::{
    AirQualityReading, Coordinate, CurrentWeather, ForecastPoint, HourlyWeather, Resolved,
    WeatherReading,
};
pub use service::AirQualityService;
pub use web::AppState;
