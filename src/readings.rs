//! Readings passed between providers, the aggregator and the forecast engine.

use serde::{Deserialize, Serialize};

/// Geographic position of a request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Parses raw query values. Returns `None` when either value is missing,
    /// blank, or not a number.
    pub fn parse(latitude: Option<&str>, longitude: Option<&str>) -> Option<Self> {
        let latitude = latitude?.trim().parse::<f64>().ok()?;
        let longitude = longitude?.trim().parse::<f64>().ok()?;
        Some(Self::new(latitude, longitude))
    }
}

/// Pollutant concentrations (or AQI sub-indices, depending on the provider).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AirQualityReading {
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub o3: Option<f64>,
}

impl AirQualityReading {
    /// True when no pollutant came back at all.
    pub fn is_empty(&self) -> bool {
        self.pm25.is_none() && self.pm10.is_none() && self.o3.is_none()
    }
}

/// Hourly series as returned by Open-Meteo. Open-Meteo reports gaps as
/// `null`, which are kept in place so every series stays aligned with `time`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlyWeather {
    pub time: Vec<String>,
    pub temperature_2m: Vec<Option<f64>>,
    pub rain: Vec<Option<f64>>,
    pub wind_speed_10m: Vec<Option<f64>>,
    pub relative_humidity_2m: Vec<Option<f64>>,
}

impl HourlyWeather {
    /// Number of hours covered by every series.
    pub fn hours(&self) -> usize {
        [
            self.time.len(),
            self.temperature_2m.len(),
            self.rain.len(),
            self.wind_speed_10m.len(),
            self.relative_humidity_2m.len(),
        ]
        .into_iter()
        .min()
        .unwrap_or(0)
    }
}

/// Single-valued conditions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature_2m: f64,
    pub rain: f64,
    pub wind_speed_10m: f64,
    pub relative_humidity_2m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeatherReading {
    Hourly(HourlyWeather),
    Current(CurrentWeather),
}

/// Empty hourly series.
impl Default for WeatherReading {
    fn default() -> Self {
        Self::Hourly(HourlyWeather::default())
    }
}

/// A reading together with the label of the provider that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolved<T> {
    #[serde(flatten)]
    pub data: T,
    pub source: String,
}

impl<T> Resolved<T> {
    pub fn new(data: T, source: impl Into<String>) -> Self {
        Self {
            data,
            source: source.into(),
        }
    }
}

/// One hour of the derived air-quality forecast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub label: String,
    pub predicted_aqi: f64,
    pub temperature: Option<f64>,
    pub wind_speed: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_parse() {
        assert_eq!(
            Coordinate::parse(Some("52.52"), Some(" 13.41 ")),
            Some(Coordinate::new(52.52, 13.41))
        );
        assert_eq!(Coordinate::parse(None, Some("13.41")), None);
        assert_eq!(Coordinate::parse(Some("52.52"), Some("")), None);
        assert_eq!(Coordinate::parse(Some("north"), Some("13.41")), None);
    }

    #[test]
    fn test_empty_reading() {
        assert!(AirQualityReading::default().is_empty());
        let partial = AirQualityReading {
            o3: Some(31.0),
            ..Default::default()
        };
        assert!(!partial.is_empty());
    }

    #[test]
    fn test_hours_uses_shortest_series() {
        let hourly = HourlyWeather {
            time: vec!["a".into(), "b".into(), "c".into()],
            temperature_2m: vec![Some(1.0), Some(2.0), Some(3.0)],
            rain: vec![Some(0.0), Some(0.0)],
            wind_speed_10m: vec![Some(5.0), Some(6.0), None],
            relative_humidity_2m: vec![Some(50.0), Some(51.0), Some(52.0)],
        };
        assert_eq!(hourly.hours(), 2);
    }

    #[test]
    fn test_hourly_keeps_null_gaps() {
        let hourly: HourlyWeather = serde_json::from_value(serde_json::json!({
            "time": ["2024-06-01T00:00", "2024-06-01T01:00"],
            "temperature_2m": [18.2, null],
            "rain": [null, 0.4],
            "wind_speed_10m": [7.0, 8.5],
            "relative_humidity_2m": [70, 72]
        }))
        .unwrap();

        assert_eq!(hourly.hours(), 2);
        assert_eq!(hourly.rain, vec![None, Some(0.4)]);
        assert_eq!(hourly.temperature_2m[1], None);

        let json = serde_json::to_value(&hourly).unwrap();
        assert!(json["rain"][0].is_null());
        assert_eq!(json["rain"][1], 0.4);
    }

    #[test]
    fn test_resolved_flattens_source() {
        let resolved = Resolved::new(
            AirQualityReading {
                pm25: Some(12.5),
                pm10: None,
                o3: Some(40.0),
            },
            "(OpenAQ)",
        );
        let json = serde_json::to_value(&resolved).unwrap();
        assert_eq!(json["pm25"], 12.5);
        assert!(json["pm10"].is_null());
        assert_eq!(json["source"], "(OpenAQ)");
    }

    #[test]
    fn test_current_weather_serializes_flat() {
        let resolved = Resolved::new(
            WeatherReading::Current(CurrentWeather {
                temperature_2m: 27.0,
                rain: 0.0,
                wind_speed_10m: 9.5,
                relative_humidity_2m: 61.0,
            }),
            "(Simulated)",
        );
        let json = serde_json::to_value(&resolved).unwrap();
        assert_eq!(json["temperature_2m"], 27.0);
        assert_eq!(json["source"], "(Simulated)");
    }
}
