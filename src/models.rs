use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// AirNow API Models
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AirNowObservation {
    #[serde(rename = "ParameterName")]
    pub parameter_name: String,
    #[serde(rename = "AQI")]
    pub aqi: Option<f64>,
}

// ============================================================================
// OpenAQ API Models
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct OpenAqResponse {
    #[serde(default)]
    pub results: Vec<OpenAqLocation>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAqLocation {
    #[serde(default)]
    pub measurements: Vec<OpenAqMeasurement>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAqMeasurement {
    pub parameter: String,
    pub value: Option<f64>,
}

// ============================================================================
// World Air Quality Index (AQICN) API Models
// ============================================================================

/// `data` is a station object on success and an error string otherwise.
#[derive(Debug, Deserialize)]
pub struct WaqiResponse {
    pub status: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct WaqiData {
    #[serde(default)]
    pub iaqi: WaqiIaqi,
}

#[derive(Debug, Default, Deserialize)]
pub struct WaqiIaqi {
    pub pm25: Option<WaqiValue>,
    pub pm10: Option<WaqiValue>,
    pub o3: Option<WaqiValue>,
}

#[derive(Debug, Deserialize)]
pub struct WaqiValue {
    pub v: Option<f64>,
}

// ============================================================================
// Open-Meteo API Models
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct OpenMeteoResponse {
    pub hourly: Option<crate::readings::HourlyWeather>,
}

// ============================================================================
// Gemini API Models
// ============================================================================

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<GeminiContent>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GeminiPart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: GeminiContent,
}

// ============================================================================
// MCP Tool Request Models
// ============================================================================

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetAirDataRequest {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct PredictAirQualityRequest {
    pub latitude: f64,
    pub longitude: f64,
}
