//! Rule-based 24-hour air-quality forecast
//!
//! Starting from a baseline AQI, each hour scales the running value by wind
//! and rain factors and clamps it from below. The wind rule and the
//! rain/stillness rule are applied one after the other, so a windy, rainy
//! hour compounds both reductions.

use thiserror::Error;

use crate::constants::FORECAST_HOURS;
use crate::readings::{ForecastPoint, HourlyWeather};

const STRONG_WIND_KMH: f64 = 20.0;
const MODERATE_WIND_KMH: f64 = 10.0;
const STILL_AIR_KMH: f64 = 5.0;
const HEAVY_RAIN_MM: f64 = 0.5;

const STRONG_WIND_FACTOR: f64 = 0.90;
const MODERATE_WIND_FACTOR: f64 = 0.97;
const RAIN_WASHOUT_FACTOR: f64 = 0.85;
const STAGNATION_FACTOR: f64 = 1.02;

/// Predicted values never drop below this floor
pub const MIN_PREDICTED_AQI: f64 = 10.0;

#[derive(Debug, Error, PartialEq)]
pub enum ForecastError {
    #[error("Hourly forecast covers {actual} hours, {expected} required")]
    InsufficientData { expected: usize, actual: usize },

    #[error("Hourly forecast has no {series} value for hour {hour}")]
    MissingValue { series: &'static str, hour: usize },
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ForecastEngine;

impl ForecastEngine {
    pub const fn new() -> Self {
        Self
    }

    /// Derive the next 24 hourly values from `baseline_aqi`.
    pub fn predict(
        &self,
        baseline_aqi: f64,
        hourly: &HourlyWeather,
    ) -> Result<Vec<ForecastPoint>, ForecastError> {
        let available = hourly.hours();
        if available < FORECAST_HOURS {
            return Err(ForecastError::InsufficientData {
                expected: FORECAST_HOURS,
                actual: available,
            });
        }

        let mut current = baseline_aqi;
        let mut points = Vec::with_capacity(FORECAST_HOURS);
        for hour in 0..FORECAST_HOURS {
            let wind = required(&hourly.wind_speed_10m, "wind_speed_10m", hour)?;
            let rain = required(&hourly.rain, "rain", hour)?;
            current = step(current, wind, rain);

            points.push(ForecastPoint {
                label: hourly.time[hour].clone(),
                predicted_aqi: round2(current),
                temperature: hourly.temperature_2m[hour],
                wind_speed: wind,
            });
        }

        Ok(points)
    }
}

/// Value of a rule input for one hour; a gap ends the forecast.
fn required(
    series: &[Option<f64>],
    name: &'static str,
    hour: usize,
) -> Result<f64, ForecastError> {
    series[hour].ok_or(ForecastError::MissingValue { series: name, hour })
}

/// One hour of the rule set. The clamped, unrounded value carries forward.
fn step(current: f64, wind: f64, rain: f64) -> f64 {
    let mut next = current;

    if wind > STRONG_WIND_KMH {
        next *= STRONG_WIND_FACTOR;
    } else if wind > MODERATE_WIND_KMH {
        next *= MODERATE_WIND_FACTOR;
    }

    if rain > HEAVY_RAIN_MM {
        next *= RAIN_WASHOUT_FACTOR;
    } else if wind < STILL_AIR_KMH && rain == 0.0 {
        next *= STAGNATION_FACTOR;
    }

    next.max(MIN_PREDICTED_AQI)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
