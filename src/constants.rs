/// User agent string for HTTP requests
pub const USER_AGENT: &str = concat!("air-quality-server/", env!("CARGO_PKG_VERSION"));

/// AirNow API base URL
pub const AIRNOW_API_BASE: &str = "https://www.airnowapi.org";

/// OpenAQ API base URL
pub const OPENAQ_API_BASE: &str = "https://api.openaq.org/v2";

/// World Air Quality Index (AQICN) API base URL
pub const WAQI_API_BASE: &str = "https://api.waqi.info";

/// Open-Meteo API base URL
pub const OPEN_METEO_API_BASE: &str = "https://api.open-meteo.com/v1";

/// Gemini generative language API base URL
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini model used for insights
pub const GEMINI_MODEL: &str = "gemini-1.5-flash-latest";

/// Shared demo token accepted by the AQICN feed
pub const WAQI_DEMO_TOKEN: &str = "demo";

/// Source label attached to synthetic readings
pub const SIMULATED_SOURCE: &str = "(Simulated)";

/// Baseline used for the forecast when no provider reports PM2.5
pub const DEFAULT_BASELINE_AQI: f64 = 50.0;

/// Number of hourly steps in a derived forecast
pub const FORECAST_HOURS: usize = 24;

/// Hourly variables requested from Open-Meteo
pub const OPEN_METEO_HOURLY_VARIABLES: &str =
    "temperature_2m,rain,wind_speed_10m,relative_humidity_2m";

/// Returned when Gemini answers without any text part
pub const NO_INSIGHT_TEXT: &str = "No insight received.";
