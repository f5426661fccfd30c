use crate::{Config, FetchError, ForecastRequest, WeatherSnapshot, provider::weatherapi::WeatherApiClient};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod weatherapi;

/// Anything that can answer a forecast request.
///
/// Implementations make exactly one round trip per call: no caching, no retry.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn fetch_forecast(&self, request: &ForecastRequest) -> Result<WeatherSnapshot, FetchError>;
}

/// Construct the WeatherAPI.com client from config.
pub fn source_from_config(config: &Config) -> anyhow::Result<WeatherApiClient> {
    let api_key = config.api_key()?;

    let client = match config.base_url.as_deref() {
        Some(base) => WeatherApiClient::with_base_url(api_key.to_owned(), base),
        None => WeatherApiClient::new(api_key.to_owned()),
    };

    Ok(client)
}
