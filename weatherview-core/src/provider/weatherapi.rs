use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    error::FetchError,
    model::{ForecastRequest, WeatherSnapshot},
};

use super::ForecastSource;

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com";

/// Client for WeatherAPI.com's `forecast.json` endpoint.
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { api_key, base_url, http: Client::new() }
    }

    pub fn forecast_url(&self) -> String {
        format!("{}/v1/forecast.json", self.base_url)
    }
}

#[async_trait]
impl ForecastSource for WeatherApiClient {
    async fn fetch_forecast(&self, request: &ForecastRequest) -> Result<WeatherSnapshot, FetchError> {
        let url = self.forecast_url();
        let days = request.days.to_string();

        debug!(query = %request.query, days = request.days, "requesting WeatherAPI forecast");

        // The key travels in the query string, so strip URLs from transport errors.
        let res = self
            .http
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", request.query.as_str()),
                ("days", days.as_str()),
                ("aqi", yes_no(request.air_quality)),
                ("alerts", yes_no(request.alerts)),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.without_url().to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.without_url().to_string()))?;

        if !status.is_success() {
            let message = api_error_message(&body).unwrap_or_else(|| truncate_body(&body));
            warn!(status = status.as_u16(), %message, "WeatherAPI forecast request rejected");
            return Err(FetchError::Status { status: status.as_u16(), message });
        }

        let snapshot: WeatherSnapshot = serde_json::from_str(&body)?;

        debug!(location = %snapshot.location.name, "WeatherAPI forecast decoded");
        Ok(snapshot)
    }
}

#[derive(Debug, Deserialize)]
struct WaErrorBody {
    error: WaErrorDetail,
}

#[derive(Debug, Deserialize)]
struct WaErrorDetail {
    message: String,
}

/// WeatherAPI wraps failures as `{"error": {"code": .., "message": ".."}}`.
fn api_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<WaErrorBody>(body)
        .ok()
        .map(|b| b.error.message)
        .filter(|m| !m.is_empty())
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
