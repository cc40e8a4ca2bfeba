use crate::readings::{AirQualityReading, ForecastPoint, Resolved, WeatherReading};

fn value_or_na(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.1}"))
}

/// Formats resolved air quality and weather into a human-readable string
pub fn format_air_data(
    aq: &Resolved<AirQualityReading>,
    weather: &Resolved<WeatherReading>,
) -> String {
    let mut output = format!("Air Quality {}\n", aq.source);
    output.push_str(&format!(
        "  PM2.5: {}\n  PM10: {}\n  O3: {}\n\n",
        value_or_na(aq.data.pm25),
        value_or_na(aq.data.pm10),
        value_or_na(aq.data.o3)
    ));

    output.push_str(&format!("Weather {}\n", weather.source));
    match &weather.data {
        WeatherReading::Current(current) => {
            output.push_str(&format!(
                "  Temperature: {:.1}\u{00b0}C\n  Wind Speed: {:.1} km/h\n  \
                 Humidity: {:.0}%\n  Rain: {:.1} mm\n",
                current.temperature_2m,
                current.wind_speed_10m,
                current.relative_humidity_2m,
                current.rain
            ));
        }
        WeatherReading::Hourly(hourly) => {
            for i in 0..hourly.hours() {
                output.push_str(&format!(
                    "  {}: {}\u{00b0}C, wind {} km/h, humidity {}%, rain {} mm\n",
                    hourly.time[i],
                    value_or_na(hourly.temperature_2m[i]),
                    value_or_na(hourly.wind_speed_10m[i]),
                    value_or_na(hourly.relative_humidity_2m[i]),
                    value_or_na(hourly.rain[i])
                ));
            }
        }
    }
    output
}

/// Formats a derived forecast into a human-readable table
pub fn format_prediction(baseline_aqi: f64, points: &[ForecastPoint]) -> String {
    let mut output = format!(
        "Predicted Air Quality (next {} hours)\nBaseline AQI: {:.1}\n\n",
        points.len(),
        baseline_aqi
    );

    for point in points {
        output.push_str(&format!(
            "{}: AQI {:.2} | {}\u{00b0}C | wind {:.1} km/h\n",
            point.label,
            point.predicted_aqi,
            value_or_na(point.temperature),
            point.wind_speed
        ));
    }
    output
}
