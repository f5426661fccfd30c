use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of forecast days requested when the caller does not say otherwise.
pub const DEFAULT_DAYS: u8 = 3;

/// A device position, only ever used to build a `"<lat>,<lon>"` query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Query string accepted by the forecast endpoint's `q` parameter.
    ///
    /// Whole degrees keep their fractional part (`40.0`, not `40`).
    pub fn to_query(&self) -> String {
        format!("{:?},{:?}", self.latitude, self.longitude)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query())
    }
}

/// Parameters of one forecast call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRequest {
    /// Either `"<lat>,<lon>"` or a free-text place name; sent verbatim.
    pub query: String,
    pub days: u8,
    pub air_quality: bool,
    pub alerts: bool,
}

impl ForecastRequest {
    pub fn new(query: impl Into<String>, days: u8) -> Self {
        Self { query: query.into(), days, air_quality: false, alerts: false }
    }

    pub fn with_air_quality(mut self, enabled: bool) -> Self {
        self.air_quality = enabled;
        self
    }

    pub fn with_alerts(mut self, enabled: bool) -> Self {
        self.alerts = enabled;
        self
    }
}

/// One decoded `forecast.json` reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: Location,
    pub current: Current,
    /// Absent on partial replies.
    #[serde(default)]
    pub forecast: Option<Forecast>,
}

impl WeatherSnapshot {
    /// First forecast day, i.e. today in the location's time zone.
    pub fn today(&self) -> Option<&ForecastDay> {
        self.forecast.as_ref().and_then(|f| f.forecastday.first())
    }

    /// At most `n` leading forecast days.
    pub fn forecast_days(&self, n: usize) -> &[ForecastDay] {
        match &self.forecast {
            Some(f) => &f.forecastday[..f.forecastday.len().min(n)],
            None => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub tz_id: Option<String>,
    #[serde(default)]
    pub localtime_epoch: Option<i64>,
    #[serde(default)]
    pub localtime: Option<String>,
}

impl Location {
    /// "Name, Region, Country" with empty parts skipped.
    pub fn display_name(&self) -> String {
        [self.name.as_str(), self.region.as_str(), self.country.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub text: String,
    /// Protocol-relative, e.g. `//cdn.weatherapi.com/weather/64x64/day/113.png`.
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub code: Option<i32>,
}

impl Condition {
    pub fn icon_url(&self) -> Option<String> {
        if self.icon.is_empty() {
            None
        } else if self.icon.starts_with("//") {
            Some(format!("https:{}", self.icon))
        } else {
            Some(self.icon.clone())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Current {
    #[serde(default)]
    pub last_updated_epoch: Option<i64>,
    #[serde(default)]
    pub last_updated: Option<String>,
    pub temp_c: f64,
    #[serde(default)]
    pub temp_f: Option<f64>,
    #[serde(default)]
    pub is_day: Option<i32>,
    pub condition: Condition,
    #[serde(default)]
    pub wind_kph: Option<f64>,
    #[serde(default)]
    pub wind_mph: Option<f64>,
    #[serde(default)]
    pub wind_degree: Option<i32>,
    #[serde(default)]
    pub wind_dir: Option<String>,
    #[serde(default)]
    pub pressure_mb: Option<f64>,
    #[serde(default)]
    pub pressure_in: Option<f64>,
    #[serde(default)]
    pub precip_mm: Option<f64>,
    #[serde(default)]
    pub humidity: Option<i32>,
    #[serde(default)]
    pub cloud: Option<i32>,
    #[serde(default)]
    pub feelslike_c: Option<f64>,
    #[serde(default)]
    pub vis_km: Option<f64>,
    #[serde(default)]
    pub uv: Option<f64>,
    #[serde(default)]
    pub gust_kph: Option<f64>,
}

impl Current {
    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        self.last_updated_epoch.and_then(|ts| DateTime::from_timestamp(ts, 0))
    }

    /// `true` only when the provider explicitly reports night.
    pub fn is_night(&self) -> bool {
        self.is_day == Some(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    #[serde(default)]
    pub forecastday: Vec<ForecastDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub day: Day,
    #[serde(default)]
    pub astro: Option<Astro>,
    #[serde(default)]
    pub hour: Vec<Hour>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub maxtemp_c: f64,
    pub mintemp_c: f64,
    #[serde(default)]
    pub avgtemp_c: Option<f64>,
    #[serde(default)]
    pub maxwind_kph: Option<f64>,
    #[serde(default)]
    pub totalprecip_mm: Option<f64>,
    #[serde(default)]
    pub avgvis_km: Option<f64>,
    #[serde(default)]
    pub avghumidity: Option<f64>,
    #[serde(default)]
    pub daily_will_it_rain: Option<i32>,
    #[serde(default)]
    pub daily_chance_of_rain: Option<i32>,
    #[serde(default)]
    pub uv: Option<f64>,
    pub condition: Condition,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Astro {
    #[serde(default)]
    pub sunrise: Option<String>,
    #[serde(default)]
    pub sunset: Option<String>,
    #[serde(default)]
    pub moonrise: Option<String>,
    #[serde(default)]
    pub moonset: Option<String>,
    #[serde(default)]
    pub moon_phase: Option<String>,
    #[serde(default)]
    pub moon_illumination: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hour {
    /// Local time as `YYYY-MM-DD HH:MM`.
    pub time: String,
    #[serde(default)]
    pub time_epoch: Option<i64>,
    pub temp_c: f64,
    pub condition: Condition,
    #[serde(default)]
    pub is_day: Option<i32>,
    #[serde(default)]
    pub wind_kph: Option<f64>,
    #[serde(default)]
    pub wind_dir: Option<String>,
    #[serde(default)]
    pub pressure_mb: Option<f64>,
    #[serde(default)]
    pub precip_mm: Option<f64>,
    #[serde(default)]
    pub humidity: Option<i32>,
    #[serde(default)]
    pub cloud: Option<i32>,
    #[serde(default)]
    pub feelslike_c: Option<f64>,
    #[serde(default)]
    pub windchill_c: Option<f64>,
    #[serde(default)]
    pub heatindex_c: Option<f64>,
    #[serde(default)]
    pub dewpoint_c: Option<f64>,
    #[serde(default)]
    pub will_it_rain: Option<i32>,
    #[serde(default)]
    pub chance_of_rain: Option<i32>,
    #[serde(default)]
    pub will_it_snow: Option<i32>,
    #[serde(default)]
    pub chance_of_snow: Option<i32>,
    #[serde(default)]
    pub vis_km: Option<f64>,
    #[serde(default)]
    pub gust_kph: Option<f64>,
    #[serde(default)]
    pub uv: Option<f64>,
}

impl Hour {
    const TIME_FORMAT: &'static str = "%Y-%m-%d %H:%M";

    pub fn local_time(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.time, Self::TIME_FORMAT).ok()
    }

    /// `HH:MM`, or the raw provider string if it cannot be parsed.
    pub fn label(&self) -> String {
        self.local_time()
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_else(|| self.time.clone())
    }

    pub fn is_current_hour(&self, now: NaiveDateTime) -> bool {
        self.local_time()
            .is_some_and(|t| t.date() == now.date() && t.hour() == now.hour())
    }
}

/// How many of today's hours the details view lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HourWindow {
    #[default]
    Next6,
    Next12,
    All,
}

impl HourWindow {
    pub fn select<'a>(&self, hours: &'a [Hour]) -> &'a [Hour] {
        let n = match self {
            HourWindow::Next6 => 6,
            HourWindow::Next12 => 12,
            HourWindow::All => hours.len(),
        };
        &hours[..hours.len().min(n)]
    }
}

impl TryFrom<&str> for HourWindow {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "6" => Ok(HourWindow::Next6),
            "12" => Ok(HourWindow::Next12),
            "all" | "24" => Ok(HourWindow::All),
            _ => Err(anyhow::anyhow!("Unknown hour window '{value}'. Supported: 6, 12, all.")),
        }
    }
}
