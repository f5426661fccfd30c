//! Core library for `weatherview`.
//!
//! This crate defines:
//! - The WeatherAPI.com forecast data model and HTTP client
//! - Device location resolution behind platform seams
//! - The observable view state and the controller that drives it
//! - Configuration & credentials handling
//!
//! It is used by `weatherview-cli`, but any display layer can subscribe to a
//! [`WeatherController`] and render its [`UiState`].

pub mod config;
pub mod controller;
pub mod error;
pub mod location;
pub mod model;
pub mod provider;
pub mod sky;
pub mod state;

pub use config::{Config, DEFAULT_PLACE, LocationConfig};
pub use controller::WeatherController;
pub use error::{FetchError, PositionError};
pub use location::{LocationProvider, LocationTracker};
pub use model::{Coordinates, DEFAULT_DAYS, ForecastRequest, HourWindow, WeatherSnapshot};
pub use provider::{ForecastSource, weatherapi::WeatherApiClient};
pub use sky::SkyTheme;
pub use state::{StateReceiver, UiState};
