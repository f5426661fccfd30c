//! Text rendering of the published view state.

use std::fmt::Write;

use chrono::NaiveDateTime;
use weatherview_core::{HourWindow, SkyTheme, WeatherSnapshot};

/// Days shown in the forecast strip.
const FORECAST_DAYS: usize = 3;

pub fn render_snapshot(snapshot: &WeatherSnapshot, window: HourWindow, now: NaiveDateTime) -> String {
    let mut out = String::new();
    let current = &snapshot.current;
    let theme = SkyTheme::for_snapshot(snapshot);

    let _ = writeln!(out, "{}", snapshot.location.display_name());
    let _ = writeln!(out, "{} {:.1}°C  {}", theme.icon(), current.temp_c, current.condition.text);
    if let Some(updated) = current.last_updated.as_deref() {
        let _ = writeln!(out, "Updated {updated}");
    }

    out.push('\n');
    let _ = writeln!(out, "  Feels like   {}", opt(current.feelslike_c, "°C"));
    let _ = writeln!(out, "  Humidity     {}", opt(current.humidity, "%"));
    let wind = match (&current.wind_kph, &current.wind_dir) {
        (Some(kph), Some(dir)) => format!("{kph:.1} km/h {dir}"),
        (Some(kph), None) => format!("{kph:.1} km/h"),
        _ => "n/a".to_string(),
    };
    let _ = writeln!(out, "  Wind         {wind}");
    let _ = writeln!(out, "  Pressure     {}", opt(current.pressure_mb, " hPa"));
    let _ = writeln!(out, "  UV index     {}", opt(current.uv, ""));
    let _ = writeln!(out, "  Visibility   {}", opt(current.vis_km, " km"));

    let days = snapshot.forecast_days(FORECAST_DAYS);
    if !days.is_empty() {
        out.push('\n');
        out.push_str("Forecast\n");
        for day in days {
            let _ = writeln!(
                out,
                "  {} {}  {:>5.1}° / {:>5.1}°  {}",
                day.date.format("%a"),
                day.date,
                day.day.maxtemp_c,
                day.day.mintemp_c,
                day.day.condition.text,
            );
        }
    }

    if let Some(today) = snapshot.today() {
        let hours = window.select(&today.hour);
        if !hours.is_empty() {
            out.push('\n');
            out.push_str("Today by hour\n");
            for hour in hours {
                let marker = if hour.is_current_hour(now) { "▶" } else { " " };
                let rain = hour
                    .chance_of_rain
                    .map(|c| format!("  {c}% rain"))
                    .unwrap_or_default();
                let _ = writeln!(
                    out,
                    " {marker} {}  {:>5.1}°C  {}{rain}",
                    hour.label(),
                    hour.temp_c,
                    hour.condition.text,
                );
            }
        }

        if let Some(astro) = &today.astro {
            if let (Some(rise), Some(set)) = (&astro.sunrise, &astro.sunset) {
                out.push('\n');
                let _ = writeln!(out, "Sunrise {rise}  Sunset {set}");
            }
        }
    }

    out
}

pub fn render_error(message: &str) -> String {
    format!("Could not load weather: {message}")
}

fn opt<T: std::fmt::Display>(value: Option<T>, unit: &str) -> String {
    value.map(|v| format!("{v}{unit}")).unwrap_or_else(|| "n/a".to_string())
}
