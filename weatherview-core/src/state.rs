//! Observable view state.
//!
//! A single current-value cell: one writer (the controller), any number of
//! readers holding a [`StateReceiver`]. Values are replaced whole, never
//! patched.

use tokio::sync::watch;
use tracing::debug;

use crate::{error::FetchError, model::WeatherSnapshot};

/// Shown when a failure carries no description of its own.
pub const UNKNOWN_ERROR: &str = "An unknown error occurred";

#[derive(Debug, Clone, PartialEq)]
pub enum UiState {
    Loading,
    Success(WeatherSnapshot),
    Error(String),
}

impl UiState {
    /// Terminal state for a finished fetch.
    pub fn from_result(result: Result<WeatherSnapshot, FetchError>) -> Self {
        match result {
            Ok(snapshot) => UiState::Success(snapshot),
            Err(err) => UiState::error(err.to_string()),
        }
    }

    /// Error state; an empty message is replaced by [`UNKNOWN_ERROR`].
    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            UiState::Error(UNKNOWN_ERROR.to_string())
        } else {
            UiState::Error(message)
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_loading()
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        match self {
            UiState::Success(s) => Some(s),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            UiState::Error(m) => Some(m),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            UiState::Loading => "loading",
            UiState::Success(_) => "success",
            UiState::Error(_) => "error",
        }
    }
}

pub type StateReceiver = watch::Receiver<UiState>;

#[derive(Debug)]
pub struct StateCell {
    tx: watch::Sender<UiState>,
}

impl StateCell {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(UiState::Loading);
        Self { tx }
    }

    /// Replace the current value and wake subscribers. Works with no subscribers.
    pub fn publish(&self, state: UiState) {
        debug!(state = state.label(), "publishing view state");
        self.tx.send_replace(state);
    }

    pub fn subscribe(&self) -> StateReceiver {
        self.tx.subscribe()
    }

    pub fn current(&self) -> UiState {
        self.tx.borrow().clone()
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new()
    }
}
