//! Weather view-state controller.
//!
//! Every public operation publishes `Loading`, runs one fetch and publishes
//! exactly one terminal state. Overlapping calls are not coordinated: whichever
//! finishes last owns the state.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::{
    config::Config,
    error::FetchError,
    location::{LocationProvider, LocationTracker},
    model::ForecastRequest,
    provider::{ForecastSource, source_from_config},
    state::{StateCell, StateReceiver, UiState},
};

#[derive(Debug, Clone)]
pub struct WeatherController {
    source: Arc<dyn ForecastSource>,
    location: Arc<dyn LocationProvider>,
    default_place: Arc<str>,
    air_quality: bool,
    alerts: bool,
    state: Arc<StateCell>,
}

impl WeatherController {
    pub fn new(
        source: Arc<dyn ForecastSource>,
        location: Arc<dyn LocationProvider>,
        default_place: impl Into<String>,
    ) -> Self {
        Self {
            source,
            location,
            default_place: Arc::from(default_place.into()),
            air_quality: false,
            alerts: false,
            state: Arc::new(StateCell::new()),
        }
    }

    /// Controller wired to WeatherAPI.com and the configured location settings.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let source = source_from_config(config)?;
        let location = LocationTracker::from_config(&config.location);

        Ok(Self::new(Arc::new(source), Arc::new(location), config.default_place())
            .with_extras(config.air_quality, config.alerts))
    }

    /// Ask the API for air quality and alert blocks as well.
    pub fn with_extras(mut self, air_quality: bool, alerts: bool) -> Self {
        self.air_quality = air_quality;
        self.alerts = alerts;
        self
    }

    pub fn subscribe(&self) -> StateReceiver {
        self.state.subscribe()
    }

    pub fn state(&self) -> UiState {
        self.state.current()
    }

    /// Spawn a fetch for the device position, falling back to the default place.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn fetch_weather_for_current_location(&self, days: u8) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move { this.refresh_for_current_location(days).await })
    }

    /// Spawn a fetch for an explicit place name.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn fetch_weather(&self, place: impl Into<String>, days: u8) -> JoinHandle<()> {
        let this = self.clone();
        let place = place.into();
        tokio::spawn(async move { this.refresh(&place, days).await })
    }

    pub async fn refresh_for_current_location(&self, days: u8) {
        self.state.publish(UiState::Loading);

        match self.location.current_location().await {
            Some(coords) => self.load(&coords.to_query(), days).await,
            None => {
                info!(place = %self.default_place, "location unavailable, using default place");
                // Already Loading; go straight to the fetch.
                let place = Arc::clone(&self.default_place);
                self.load(&place, days).await
            }
        }
    }

    pub async fn refresh(&self, place: &str, days: u8) {
        self.state.publish(UiState::Loading);
        self.load(place, days).await
    }

    async fn load(&self, query: &str, days: u8) {
        let request = ForecastRequest::new(query, days)
            .with_air_quality(self.air_quality)
            .with_alerts(self.alerts);

        let result = self.source.fetch_forecast(&request).await;

        match &result {
            Ok(snapshot) => info!(location = %snapshot.location.name, "forecast loaded"),
            Err(e @ FetchError::Decode(_)) => error!(query, error = %e, "forecast reply unreadable"),
            Err(e) => warn!(query, error = %e, "forecast request failed"),
        }

        self.state.publish(UiState::from_result(result));
    }
}
