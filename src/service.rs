use std::sync::Arc;

use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters, ServerHandler},
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router, ErrorData as McpError,
};

use crate::aggregator::SourceAggregator;
use crate::forecast::ForecastEngine;
use crate::formatters::{format_air_data, format_prediction};
use crate::models::{GetAirDataRequest, PredictAirQualityRequest};
use crate::readings::Coordinate;

/// MCP service exposing the aggregator and forecast engine as tools
#[derive(Clone)]
pub struct AirQualityService {
    aggregator: Arc<SourceAggregator>,
    engine: ForecastEngine,
    tool_router: ToolRouter<Self>,
}

impl AirQualityService {
    /// Creates a new service over an aggregator
    pub fn new(aggregator: Arc<SourceAggregator>) -> Self {
        Self {
            aggregator,
            engine: ForecastEngine::new(),
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_handler]
impl ServerHandler for AirQualityService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "air-quality".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(
                "Air-quality and weather readings aggregated from AirNow, OpenAQ, AQICN and \
                Open-Meteo, plus a rule-based 24-hour air-quality prediction."
                    .to_string(),
            ),
        }
    }
}

#[tool_router]
impl AirQualityService {
    /// Gets current air quality and weather for a location
    #[tool(description = "Get current air quality (PM2.5, PM10, O3) and weather for any location. Provide latitude and longitude (e.g., latitude: 34.05, longitude: -118.24 for Los Angeles). Providers are tried in order and simulated data is returned if all of them fail; the source of each reading is reported.")]
    async fn get_air_data(
        &self,
        Parameters(request): Parameters<GetAirDataRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(
            "Getting air data for coordinates: {}, {}",
            request.latitude,
            request.longitude
        );

        let coordinate = Coordinate::new(request.latitude, request.longitude);
        let aq = self.aggregator.resolve_air_quality(coordinate).await;
        let weather = self.aggregator.resolve_weather(coordinate).await;

        Ok(CallToolResult::success(vec![Content::text(
            format_air_data(&aq, &weather),
        )]))
    }

    /// Predicts air quality for the next 24 hours
    #[tool(description = "Predict air quality for the next 24 hours at a location, derived from the current PM2.5 reading and the hourly wind and rain forecast. Provide latitude and longitude.")]
    async fn predict_air_quality(
        &self,
        Parameters(request): Parameters<PredictAirQualityRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(
            "Predicting air quality for coordinates: {}, {}",
            request.latitude,
            request.longitude
        );

        let coordinate = Coordinate::new(request.latitude, request.longitude);
        let baseline = self.aggregator.baseline_aqi(coordinate).await;

        let hourly = self
            .aggregator
            .hourly_forecast(coordinate)
            .await
            .ok_or_else(|| {
                McpError::internal_error("Could not retrieve weather forecast", None)
            })?;

        let points = self.engine.predict(baseline, &hourly).map_err(|e| {
            McpError::internal_error(format!("Failed to derive forecast: {}", e), None)
        })?;

        Ok(CallToolResult::success(vec![Content::text(
            format_prediction(baseline, &points),
        )]))
    }
}
