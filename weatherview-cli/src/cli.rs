use std::io::IsTerminal;

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{Confirm, Password, PasswordDisplayMode, Text};
use tracing::debug;
use weatherview_core::{
    Config, HourWindow, LocationConfig, StateReceiver, UiState, WeatherController,
    WeatherSnapshot,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherview", version, about = "Current conditions and forecast from WeatherAPI.com")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI key and the fallback place.
    Configure {
        /// API key; prompted for when omitted.
        #[arg(long)]
        api_key: Option<String>,

        /// Place used when no position is available; prompted for when omitted.
        #[arg(long)]
        default_place: Option<String>,
    },

    /// Show weather for a place, or for the current position.
    Show {
        /// Place name. When absent, the configured position is used, then the default place.
        place: Option<String>,

        /// Number of forecast days to request.
        #[arg(long)]
        days: Option<u8>,

        /// Latitude of the last known position.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude of the last known position.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Treat location access as denied.
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        no_location: bool,

        /// Hours of today to list: 6, 12 or all.
        #[arg(long, default_value = "6")]
        hours: String,

        /// Print the decoded reply as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Print the location of the config file.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { api_key, default_place } => configure(api_key, default_place),
            Command::Show { place, days, lat, lon, no_location, hours, json } => {
                let mut config = Config::load()?;
                apply_location_overrides(&mut config, lat.zip(lon), no_location);

                let days = days.unwrap_or_else(|| config.days());
                let window = HourWindow::try_from(hours.as_str())?;

                show(&config, place, days, window, json).await
            }
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

/// Command-line position and permission take precedence over the config file.
fn apply_location_overrides(config: &mut Config, coords: Option<(f64, f64)>, no_location: bool) {
    if let Some((latitude, longitude)) = coords {
        config.location = LocationConfig {
            enabled: true,
            latitude: Some(latitude),
            longitude: Some(longitude),
        };
    }
    if no_location {
        config.location.enabled = false;
    }
}

fn configure(api_key: Option<String>, default_place: Option<String>) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    let interactive = std::io::stdin().is_terminal();

    let api_key = match api_key {
        Some(key) => key,
        None if interactive => Password::new("WeatherAPI key:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()
            .context("Failed to read API key")?,
        None => return Err(anyhow!("No API key given.\nHint: pass `--api-key <KEY>`.")),
    };
    if api_key.trim().is_empty() {
        return Err(anyhow!("API key must not be empty"));
    }
    config.set_api_key(api_key);

    config.default_place = resolve_default_place(default_place, &config, interactive)?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

/// Explicit value, else a prompt on a terminal, else whatever is already stored.
fn resolve_default_place(
    arg: Option<String>,
    config: &Config,
    interactive: bool,
) -> anyhow::Result<Option<String>> {
    let place = match arg {
        Some(place) => place,
        None if interactive => Text::new("Default place:")
            .with_default(config.default_place())
            .prompt()
            .context("Failed to read default place")?,
        None => return Ok(config.default_place.clone()),
    };

    Ok(Some(place.trim().to_string()).filter(|p| !p.is_empty()))
}

async fn show(
    config: &Config,
    place: Option<String>,
    days: u8,
    window: HourWindow,
    json: bool,
) -> anyhow::Result<()> {
    let controller = WeatherController::from_config(config)?;

    let snapshot = drive(
        &controller,
        |c| {
            match place {
                Some(place) => c.fetch_weather(place, days),
                None => c.fetch_weather_for_current_location(days),
            };
        },
        days,
        |message| {
            eprintln!("{}", render::render_error(message));
            offer_retry()
        },
    )
    .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", render::render_snapshot(&snapshot, window, chrono::Local::now().naive_local()));
    }
    Ok(())
}

/// Run the first fetch, then keep offering retries (current location) until
/// a snapshot arrives or `retry` declines. A declined retry returns the last
/// error message as the error.
async fn drive(
    controller: &WeatherController,
    first: impl FnOnce(&WeatherController),
    days: u8,
    mut retry: impl FnMut(&str) -> anyhow::Result<bool>,
) -> anyhow::Result<WeatherSnapshot> {
    let mut rx = controller.subscribe();
    let mut state = await_terminal(&mut rx, || first(controller)).await?;

    loop {
        match state {
            UiState::Success(snapshot) => return Ok(snapshot),
            UiState::Error(message) => {
                if !retry(&message)? {
                    return Err(anyhow!(message));
                }
                state = await_terminal(&mut rx, || {
                    controller.fetch_weather_for_current_location(days);
                })
                .await?;
            }
            UiState::Loading => {
                state = await_terminal(&mut rx, || {}).await?;
            }
        }
    }
}

/// Run `start` and wait until the state it triggers becomes terminal.
async fn await_terminal(rx: &mut StateReceiver, start: impl FnOnce()) -> anyhow::Result<UiState> {
    // Mark the current value as seen so a stale terminal state is not picked up.
    rx.borrow_and_update();
    start();
    rx.changed().await.context("Weather controller stopped")?;

    let state = rx.wait_for(UiState::is_terminal).await.context("Weather controller stopped")?;
    debug!(state = ?*state, "terminal state received");
    Ok(state.clone())
}

fn offer_retry() -> anyhow::Result<bool> {
    if !std::io::stdin().is_terminal() {
        return Ok(false);
    }

    Confirm::new("Retry?")
        .with_default(true)
        .prompt()
        .context("Failed to read retry answer")
}
