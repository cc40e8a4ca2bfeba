//! World Air Quality Index (AQICN) geo feed

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use super::{fetch_json, ConditionsProvider, HttpSource};
use crate::error::ProviderError;
use crate::models::{WaqiData, WaqiResponse, WaqiValue};
use crate::readings::{AirQualityReading, Coordinate};

pub struct WaqiProvider {
    http: HttpSource,
    token: String,
}

impl WaqiProvider {
    pub fn new(client: Client, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: HttpSource::new(client, base_url),
            token: token.into(),
        }
    }

    fn extract(response: WaqiResponse) -> Result<AirQualityReading, ProviderError> {
        if response.status != "ok" {
            return Err(ProviderError::NoData);
        }

        let data: WaqiData = serde_json::from_value(response.data)
            .map_err(|e| ProviderError::Parse(e.to_string()))?;
        let value = |v: Option<WaqiValue>| v.and_then(|v| v.v);

        Ok(AirQualityReading {
            pm25: value(data.iaqi.pm25),
            pm10: value(data.iaqi.pm10),
            o3: value(data.iaqi.o3),
        })
    }
}

#[async_trait]
impl ConditionsProvider for WaqiProvider {
    type Reading = AirQualityReading;

    #[instrument(skip(self), fields(provider = "waqi"))]
    async fn fetch(&self, coordinate: Coordinate) -> Result<AirQualityReading, ProviderError> {
        debug!(base_url = %self.http.base_url, "Fetching AQICN geo feed");

        let path = format!("feed/geo:{};{}/", coordinate.latitude, coordinate.longitude);
        let request = self.http.get(&path).query(&[("token", &self.token)]);

        let response: WaqiResponse = fetch_json(request).await?;
        let reading = Self::extract(response)?;
        if reading.is_empty() {
            return Err(ProviderError::NoData);
        }
        Ok(reading)
    }

    fn source_label(&self) -> &'static str {
        "(AQICN)"
    }
}
