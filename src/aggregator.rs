//! Multi-source aggregation with fallback
//!
//! Air quality walks a fixed priority chain (AirNow, OpenAQ, AQICN) and stops
//! at the first provider that yields data. Weather has a single real
//! provider. When nothing real answers, a simulated provider fills in so
//! callers of the `resolve_*` methods always get a reading.

use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use tracing::{info, instrument, warn};

use crate::config::AppConfig;
use crate::constants::{DEFAULT_BASELINE_AQI, USER_AGENT};
use crate::providers::{
    AirNowProvider, ConditionsProvider, OpenAqProvider, OpenMeteoProvider, SimulatedAirQuality,
    SimulatedWeather, WaqiProvider,
};
use crate::readings::{AirQualityReading, Coordinate, HourlyWeather, Resolved, WeatherReading};

pub type AirQualitySource = Box<dyn ConditionsProvider<Reading = AirQualityReading>>;
pub type WeatherSource = Box<dyn ConditionsProvider<Reading = WeatherReading>>;

pub struct SourceAggregator {
    air_quality: Vec<AirQualitySource>,
    weather: Option<WeatherSource>,
    simulated_air_quality: AirQualitySource,
    simulated_weather: WeatherSource,
}

impl SourceAggregator {
    /// Build an aggregator over explicit providers, with the default
    /// randomized simulators as the last resort.
    pub fn new(air_quality: Vec<AirQualitySource>, weather: Option<WeatherSource>) -> Self {
        Self {
            air_quality,
            weather,
            simulated_air_quality: Box::new(SimulatedAirQuality::new()),
            simulated_weather: Box::new(SimulatedWeather::new()),
        }
    }

    /// Build the production chain from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.provider_timeout_secs))
            .build()?;

        let mut air_quality: Vec<AirQualitySource> = Vec::with_capacity(3);
        match &config.airnow_api_key {
            Some(key) => air_quality.push(Box::new(AirNowProvider::new(
                client.clone(),
                &config.airnow_base_url,
                key,
            ))),
            None => warn!("AirNow API key not configured, skipping AirNow"),
        }
        air_quality.push(Box::new(OpenAqProvider::new(
            client.clone(),
            &config.openaq_base_url,
        )));
        air_quality.push(Box::new(WaqiProvider::new(
            client.clone(),
            &config.waqi_base_url,
            &config.waqi_token,
        )));

        let weather: WeatherSource =
            Box::new(OpenMeteoProvider::new(client, &config.open_meteo_base_url));

        Ok(Self::new(air_quality, Some(weather)))
    }

    /// Replace the air-quality simulator
    #[must_use]
    pub fn with_simulated_air_quality(
        mut self,
        provider: impl ConditionsProvider<Reading = AirQualityReading> + 'static,
    ) -> Self {
        self.simulated_air_quality = Box::new(provider);
        self
    }

    /// Replace the weather simulator
    #[must_use]
    pub fn with_simulated_weather(
        mut self,
        provider: impl ConditionsProvider<Reading = WeatherReading> + 'static,
    ) -> Self {
        self.simulated_weather = Box::new(provider);
        self
    }

    /// Labels of the real air-quality providers, in priority order
    pub fn air_quality_chain(&self) -> Vec<&'static str> {
        self.air_quality.iter().map(|p| p.source_label()).collect()
    }

    /// First real air-quality reading in priority order, if any.
    #[instrument(skip(self))]
    pub async fn first_real_air_quality(
        &self,
        coordinate: Coordinate,
    ) -> Option<Resolved<AirQualityReading>> {
        first_success(&self.air_quality, coordinate).await
    }

    /// Air quality for the coordinate; simulated when the chain is exhausted.
    #[instrument(skip(self))]
    pub async fn resolve_air_quality(&self, coordinate: Coordinate) -> Resolved<AirQualityReading> {
        if let Some(resolved) = self.first_real_air_quality(coordinate).await {
            return resolved;
        }

        warn!("All air-quality providers failed, using simulated data");
        fallback(self.simulated_air_quality.as_ref(), coordinate).await
    }

    /// Weather for the coordinate; simulated when the provider fails.
    #[instrument(skip(self))]
    pub async fn resolve_weather(&self, coordinate: Coordinate) -> Resolved<WeatherReading> {
        if let Some(resolved) = self.real_weather(coordinate).await {
            return resolved;
        }

        warn!("Weather provider failed, using simulated data");
        fallback(self.simulated_weather.as_ref(), coordinate).await
    }

    /// Hourly forecast from the real provider only. Simulated weather has no
    /// hourly series, so there is nothing to fall back on here.
    #[instrument(skip(self))]
    pub async fn hourly_forecast(&self, coordinate: Coordinate) -> Option<HourlyWeather> {
        match self.real_weather(coordinate).await?.data {
            WeatherReading::Hourly(hourly) => Some(hourly),
            WeatherReading::Current(_) => {
                warn!("Weather provider returned no hourly series");
                None
            }
        }
    }

    /// PM2.5 of the first real provider that answered, or the fixed default.
    #[instrument(skip(self))]
    pub async fn baseline_aqi(&self, coordinate: Coordinate) -> f64 {
        let baseline = self
            .first_real_air_quality(coordinate)
            .await
            .and_then(|resolved| resolved.data.pm25);

        baseline.unwrap_or_else(|| {
            info!(
                default = DEFAULT_BASELINE_AQI,
                "No PM2.5 baseline available, using default"
            );
            DEFAULT_BASELINE_AQI
        })
    }

    async fn real_weather(&self, coordinate: Coordinate) -> Option<Resolved<WeatherReading>> {
        let provider = self.weather.as_ref()?;
        first_success(std::slice::from_ref(provider), coordinate).await
    }
}

/// Walks providers in order and returns the first reading. Failures are
/// logged and swallowed.
async fn first_success<R: Send>(
    providers: &[Box<dyn ConditionsProvider<Reading = R>>],
    coordinate: Coordinate,
) -> Option<Resolved<R>> {
    for provider in providers {
        let source = provider.source_label();
        match provider.fetch(coordinate).await {
            Ok(reading) => {
                info!(source, "Provider returned data");
                return Some(Resolved::new(reading, source));
            }
            Err(e) => warn!(source, error = %e, "Provider failed, trying next"),
        }
    }
    None
}

/// Simulators are expected to always succeed; a failing stand-in yields an
/// empty reading under its own label.
async fn fallback<R: Send + Default>(
    provider: &dyn ConditionsProvider<Reading = R>,
    coordinate: Coordinate,
) -> Resolved<R> {
    let source = provider.source_label();
    match provider.fetch(coordinate).await {
        Ok(reading) => Resolved::new(reading, source),
        Err(e) => {
            warn!(source, error = %e, "Fallback provider failed");
            Resolved::new(R::default(), source)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::providers::{SimulatedAirQuality, SimulatedWeather};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FakeAirQuality {
        label: &'static str,
        reading: Option<AirQualityReading>,
        calls: Arc<AtomicUsize>,
    }

    impl FakeAirQuality {
        fn new(
            label: &'static str,
            reading: Option<AirQualityReading>,
        ) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    label,
                    reading,
                    calls: Arc::clone(&calls),
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl ConditionsProvider for FakeAirQuality {
        type Reading = AirQualityReading;

        async fn fetch(&self, _coordinate: Coordinate) -> Result<AirQualityReading, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reading.ok_or(ProviderError::NoData)
        }

        fn source_label(&self) -> &'static str {
            self.label
        }
    }

    struct FailingWeather;

    #[async_trait]
    impl ConditionsProvider for FailingWeather {
        type Reading = WeatherReading;

        async fn fetch(&self, _coordinate: Coordinate) -> Result<WeatherReading, ProviderError> {
            Err(ProviderError::Status(500))
        }

        fn source_label(&self) -> &'static str {
            "(Open-Meteo)"
        }
    }

    fn pm25(value: f64) -> AirQualityReading {
        AirQualityReading {
            pm25: Some(value),
            ..Default::default()
        }
    }

    const HERE: Coordinate = Coordinate::new(34.05, -118.24);

    #[tokio::test]
    async fn test_first_provider_wins_and_stops_chain() {
        let (a, a_calls) = FakeAirQuality::new("(AirNow)", Some(pm25(61.0)));
        let (b, b_calls) = FakeAirQuality::new("(OpenAQ)", Some(pm25(12.0)));
        let (c, c_calls) = FakeAirQuality::new("(AQICN)", Some(pm25(30.0)));
        let aggregator = SourceAggregator::new(vec![Box::new(a), Box::new(b), Box::new(c)], None);

        let resolved = aggregator.resolve_air_quality(HERE).await;

        assert_eq!(resolved.source, "(AirNow)");
        assert_eq!(resolved.data.pm25, Some(61.0));
        assert_eq!(a_calls.load(Ordering::SeqCst), 1);
        assert_eq!(b_calls.load(Ordering::SeqCst), 0);
        assert_eq!(c_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_falls_through_to_third_provider() {
        let (a, _) = FakeAirQuality::new("(AirNow)", None);
        let (b, _) = FakeAirQuality::new("(OpenAQ)", None);
        let (c, _) = FakeAirQuality::new("(AQICN)", Some(pm25(30.0)));
        let aggregator = SourceAggregator::new(vec![Box::new(a), Box::new(b), Box::new(c)], None);

        let resolved = aggregator.resolve_air_quality(HERE).await;
        assert_eq!(resolved.source, "(AQICN)");
        assert_eq!(resolved.data.pm25, Some(30.0));
    }

    #[tokio::test]
    async fn test_partial_reading_is_final() {
        let ozone_only = AirQualityReading {
            o3: Some(40.0),
            ..Default::default()
        };
        let (a, _) = FakeAirQuality::new("(AirNow)", Some(ozone_only));
        let (b, b_calls) = FakeAirQuality::new("(OpenAQ)", Some(pm25(12.0)));
        let aggregator = SourceAggregator::new(vec![Box::new(a), Box::new(b)], None);

        let resolved = aggregator.resolve_air_quality(HERE).await;
        assert_eq!(resolved.source, "(AirNow)");
        assert_eq!(resolved.data.pm25, None);
        assert_eq!(b_calls.load(Ordering::SeqCst), 0);

        // The chain stopped at AirNow, so the baseline falls back to the default
        assert_eq!(aggregator.baseline_aqi(HERE).await, DEFAULT_BASELINE_AQI);
    }

    #[tokio::test]
    async fn test_exhausted_chain_is_simulated() {
        let (a, _) = FakeAirQuality::new("(OpenAQ)", None);
        let aggregator = SourceAggregator::new(vec![Box::new(a)], None)
            .with_simulated_air_quality(SimulatedAirQuality::with_sampler(|| 0.5));

        let resolved = aggregator.resolve_air_quality(HERE).await;
        assert_eq!(resolved.source, "(Simulated)");
        assert_eq!(resolved.data.pm25, Some(25.4));
    }

    #[tokio::test]
    async fn test_empty_chain_is_simulated() {
        let aggregator = SourceAggregator::new(Vec::new(), None);
        let resolved = aggregator.resolve_air_quality(HERE).await;
        assert_eq!(resolved.source, "(Simulated)");
        assert!(!resolved.data.is_empty());
    }

    #[tokio::test]
    async fn test_baseline_uses_first_real_pm25() {
        let (a, _) = FakeAirQuality::new("(OpenAQ)", Some(pm25(18.5)));
        let aggregator = SourceAggregator::new(vec![Box::new(a)], None);
        assert_eq!(aggregator.baseline_aqi(HERE).await, 18.5);
    }

    #[tokio::test]
    async fn test_baseline_never_uses_simulated_data() {
        let aggregator = SourceAggregator::new(Vec::new(), None)
            .with_simulated_air_quality(SimulatedAirQuality::with_sampler(|| 0.9));
        assert_eq!(aggregator.baseline_aqi(HERE).await, DEFAULT_BASELINE_AQI);
    }

    #[tokio::test]
    async fn test_weather_failure_simulated_on_resolve_but_not_forecast() {
        let aggregator = SourceAggregator::new(Vec::new(), Some(Box::new(FailingWeather)))
            .with_simulated_weather(SimulatedWeather::with_sampler(|| 0.5));

        let resolved = aggregator.resolve_weather(HERE).await;
        assert_eq!(resolved.source, "(Simulated)");
        assert!(matches!(resolved.data, WeatherReading::Current(_)));

        assert!(aggregator.hourly_forecast(HERE).await.is_none());
    }

    #[test]
    fn test_from_config_skips_airnow_without_key() {
        let config = AppConfig::default();
        let aggregator = SourceAggregator::from_config(&config).unwrap();
        assert_eq!(aggregator.air_quality_chain(), vec!["(OpenAQ)", "(AQICN)"]);

        let config = AppConfig {
            airnow_api_key: Some("key".into()),
            ..AppConfig::default()
        };
        let aggregator = SourceAggregator::from_config(&config).unwrap();
        assert_eq!(
            aggregator.air_quality_chain(),
            vec!["(AirNow)", "(OpenAQ)", "(AQICN)"]
        );
    }
}
