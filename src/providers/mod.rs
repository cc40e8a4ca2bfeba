//! Data providers
//!
//! Every upstream source, real or simulated, implements [`ConditionsProvider`]
//! so the aggregator can walk an ordered chain of them without knowing which
//! service sits behind each entry.

pub mod airnow;
pub mod open_meteo;
pub mod openaq;
pub mod simulated;
pub mod waqi;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::ProviderError;
use crate::readings::Coordinate;

pub use airnow::AirNowProvider;
pub use open_meteo::OpenMeteoProvider;
pub use openaq::OpenAqProvider;
pub use simulated::{SimulatedAirQuality, SimulatedWeather};
pub use waqi::WaqiProvider;

/// Fetch current conditions for a coordinate
#[async_trait]
pub trait ConditionsProvider: Send + Sync {
    type Reading: Send;

    /// Query the provider once. Transport errors, error statuses, malformed
    /// payloads and payloads without the expected fields all come back as
    /// `Err`.
    async fn fetch(&self, coordinate: Coordinate) -> Result<Self::Reading, ProviderError>;

    /// Label attached to readings from this provider, e.g. `"(OpenAQ)"`
    fn source_label(&self) -> &'static str;
}

/// Sends a prepared request and deserializes the JSON body
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    request: RequestBuilder,
) -> Result<T, ProviderError> {
    let response = request.send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Status(status.as_u16()));
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| ProviderError::Parse(e.to_string()))
}

/// Joins a configured base URL and a path without doubling slashes
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Holder for the HTTP client shared by all real providers
#[derive(Debug, Clone)]
pub(crate) struct HttpSource {
    pub client: Client,
    pub base_url: String,
}

impl HttpSource {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(endpoint(&self.base_url, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_cleanly() {
        assert_eq!(
            endpoint("https://api.waqi.info/", "/feed/geo:1;2/"),
            "https://api.waqi.info/feed/geo:1;2/"
        );
        assert_eq!(
            endpoint("http://127.0.0.1:8080", "latest"),
            "http://127.0.0.1:8080/latest"
        );
    }
}
