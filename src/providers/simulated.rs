//! Synthetic readings used when every real provider came back empty
//!
//! Values jitter around fixed centres. The jitter source is a sampler closure
//! returning numbers in `[0, 1)`; the default draws from `rand`.

use async_trait::async_trait;
use rand::Rng;

use super::ConditionsProvider;
use crate::constants::SIMULATED_SOURCE;
use crate::error::ProviderError;
use crate::readings::{AirQualityReading, Coordinate, CurrentWeather, WeatherReading};

pub type Sampler = Box<dyn Fn() -> f64 + Send + Sync>;

fn random_sampler() -> Sampler {
    Box::new(|| rand::rng().random::<f64>())
}

/// `centre + (r - 0.5) * spread`
fn jitter(sampler: &Sampler, centre: f64, spread: f64) -> f64 {
    centre + (sampler() - 0.5) * spread
}

pub struct SimulatedAirQuality {
    sampler: Sampler,
}

impl SimulatedAirQuality {
    pub fn new() -> Self {
        Self {
            sampler: random_sampler(),
        }
    }

    pub fn with_sampler(sampler: impl Fn() -> f64 + Send + Sync + 'static) -> Self {
        Self {
            sampler: Box::new(sampler),
        }
    }

    pub fn sample(&self) -> AirQualityReading {
        AirQualityReading {
            pm25: Some(jitter(&self.sampler, 25.4, 10.0)),
            pm10: Some(jitter(&self.sampler, 45.8, 15.0)),
            o3: Some(jitter(&self.sampler, 55.2, 20.0)),
        }
    }
}

impl Default for SimulatedAirQuality {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConditionsProvider for SimulatedAirQuality {
    type Reading = AirQualityReading;

    async fn fetch(&self, _coordinate: Coordinate) -> Result<AirQualityReading, ProviderError> {
        Ok(self.sample())
    }

    fn source_label(&self) -> &'static str {
        SIMULATED_SOURCE
    }
}

pub struct SimulatedWeather {
    sampler: Sampler,
}

impl SimulatedWeather {
    pub fn new() -> Self {
        Self {
            sampler: random_sampler(),
        }
    }

    pub fn with_sampler(sampler: impl Fn() -> f64 + Send + Sync + 'static) -> Self {
        Self {
            sampler: Box::new(sampler),
        }
    }

    pub fn sample(&self) -> CurrentWeather {
        CurrentWeather {
            temperature_2m: jitter(&self.sampler, 28.0, 5.0),
            rain: 0.0,
            wind_speed_10m: jitter(&self.sampler, 10.0, 5.0),
            relative_humidity_2m: jitter(&self.sampler, 60.0, 20.0),
        }
    }
}

impl Default for SimulatedWeather {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConditionsProvider for SimulatedWeather {
    type Reading = WeatherReading;

    async fn fetch(&self, _coordinate: Coordinate) -> Result<WeatherReading, ProviderError> {
        Ok(WeatherReading::Current(self.sample()))
    }

    fn source_label(&self) -> &'static str {
        SIMULATED_SOURCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint_sampler_yields_centres() {
        let reading = SimulatedAirQuality::with_sampler(|| 0.5).sample();
        assert_eq!(reading.pm25, Some(25.4));
        assert_eq!(reading.pm10, Some(45.8));
        assert_eq!(reading.o3, Some(55.2));

        let weather = SimulatedWeather::with_sampler(|| 0.5).sample();
        assert_eq!(weather.temperature_2m, 28.0);
        assert_eq!(weather.wind_speed_10m, 10.0);
        assert_eq!(weather.relative_humidity_2m, 60.0);
        assert_eq!(weather.rain, 0.0);
    }

    #[test]
    fn test_random_values_stay_in_range() {
        let provider = SimulatedAirQuality::new();
        for _ in 0..200 {
            let reading = provider.sample();
            let pm25 = reading.pm25.unwrap();
            let pm10 = reading.pm10.unwrap();
            let o3 = reading.o3.unwrap();
            assert!((20.4..30.4).contains(&pm25), "pm25 out of range: {pm25}");
            assert!((38.3..53.3).contains(&pm10), "pm10 out of range: {pm10}");
            assert!((45.2..65.2).contains(&o3), "o3 out of range: {o3}");
        }
    }

    #[tokio::test]
    async fn test_simulated_providers_never_fail() {
        let coordinate = Coordinate::new(0.0, 0.0);
        assert!(SimulatedAirQuality::new().fetch(coordinate).await.is_ok());
        let weather = SimulatedWeather::new().fetch(coordinate).await.unwrap();
        assert!(matches!(weather, WeatherReading::Current(_)));
        assert_eq!(SimulatedWeather::new().source_label(), "(Simulated)");
    }
}
