//! HTTP API
//!
//! `/api/air_data`, `/api/predict_aq` and `/api/insight` plus a static file
//! fallback for the prebuilt frontend.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{info, instrument, warn};

use crate::aggregator::SourceAggregator;
use crate::error::ApiError;
use crate::forecast::ForecastEngine;
use crate::insight::InsightClient;
use crate::readings::{AirQualityReading, Coordinate, ForecastPoint, Resolved, WeatherReading};

/// Shared, immutable state for every request
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<SourceAggregator>,
    pub engine: ForecastEngine,
    pub insight: Option<Arc<dyn InsightClient>>,
}

impl AppState {
    pub fn new(aggregator: SourceAggregator, insight: Option<Arc<dyn InsightClient>>) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            engine: ForecastEngine::new(),
            insight,
        }
    }
}

/// API routes only
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/api/air_data", get(air_data))
        .route("/api/predict_aq", get(predict_aq))
        .route("/api/insight", post(insight))
        .route("/api/gemini_insight", post(insight))
        .with_state(state)
}

/// API routes with the frontend served for every other path
pub fn router(state: AppState, frontend_dir: &str) -> Router {
    api_router(state)
        .fallback_service(ServeDir::new(frontend_dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Deserialize)]
pub struct CoordinateQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

impl CoordinateQuery {
    fn coordinate(&self) -> Result<Coordinate, ApiError> {
        Coordinate::parse(self.lat.as_deref(), self.lon.as_deref()).ok_or_else(|| {
            ApiError::BadRequest("Latitude and longitude are required".to_string())
        })
    }
}

#[derive(Debug, Serialize)]
pub struct AirDataResponse {
    pub aq: Resolved<AirQualityReading>,
    pub weather: Resolved<WeatherReading>,
}

#[derive(Debug, Default, Serialize)]
pub struct PredictionResponse {
    pub labels: Vec<String>,
    pub aqi_data: Vec<f64>,
    pub temp_data: Vec<Option<f64>>,
    pub wind_data: Vec<f64>,
}

impl From<Vec<ForecastPoint>> for PredictionResponse {
    fn from(points: Vec<ForecastPoint>) -> Self {
        let mut response = Self::default();
        for point in points {
            response.labels.push(point.label);
            response.aqi_data.push(point.predicted_aqi);
            response.temp_data.push(point.temperature);
            response.wind_data.push(point.wind_speed);
        }
        response
    }
}

#[derive(Debug, Deserialize)]
pub struct InsightRequest {
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InsightResponse {
    pub text: String,
}

#[instrument(skip_all, fields(lat = ?query.lat, lon = ?query.lon))]
async fn air_data(
    State(state): State<AppState>,
    Query(query): Query<CoordinateQuery>,
) -> Result<Json<AirDataResponse>, ApiError> {
    let coordinate = query.coordinate()?;

    let aq = state.aggregator.resolve_air_quality(coordinate).await;
    let weather = state.aggregator.resolve_weather(coordinate).await;
    info!(aq_source = %aq.source, weather_source = %weather.source, "Resolved air data");

    Ok(Json(AirDataResponse { aq, weather }))
}

#[instrument(skip_all, fields(lat = ?query.lat, lon = ?query.lon))]
async fn predict_aq(
    State(state): State<AppState>,
    Query(query): Query<CoordinateQuery>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let coordinate = query.coordinate()?;

    let baseline = state.aggregator.baseline_aqi(coordinate).await;

    let Some(hourly) = state.aggregator.hourly_forecast(coordinate).await else {
        return Err(ApiError::Internal(
            "Could not retrieve weather forecast".to_string(),
        ));
    };

    let points = state.engine.predict(baseline, &hourly).map_err(|e| {
        warn!(error = %e, "Forecast derivation failed");
        ApiError::Internal("Could not retrieve weather forecast".to_string())
    })?;

    info!(baseline, hours = points.len(), "Derived air-quality forecast");
    Ok(Json(PredictionResponse::from(points)))
}

#[instrument(skip_all)]
async fn insight(
    State(state): State<AppState>,
    body: Result<Json<InsightRequest>, JsonRejection>,
) -> Result<Json<InsightResponse>, ApiError> {
    let prompt = body
        .ok()
        .and_then(|Json(request)| request.prompt)
        .filter(|prompt| !prompt.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Prompt is required".to_string()))?;

    let Some(client) = state.insight.as_ref() else {
        return Err(ApiError::Internal(
            "GEMINI_API_KEY not configured on server".to_string(),
        ));
    };

    let text = client.generate(&prompt).await.map_err(|e| {
        warn!(error = %e, "Insight provider failed");
        ApiError::ServiceUnavailable("Could not fetch AI insights right now.".to_string())
    })?;

    Ok(Json(InsightResponse { text }))
}
