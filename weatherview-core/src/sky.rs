use crate::model::WeatherSnapshot;

/// Background mood for a condition, picked from the provider's condition text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkyTheme {
    ClearNight,
    Night,
    Rain,
    Cloudy,
    Snow,
    #[default]
    Clear,
}

impl SkyTheme {
    /// Condition text may be English or Spanish depending on the `lang` the API served.
    pub fn classify(condition_text: Option<&str>, is_night: bool) -> Self {
        let c = condition_text.unwrap_or_default().to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| c.contains(w));

        if is_night && has(&["clear", "sunny"]) {
            Self::ClearNight
        } else if is_night {
            Self::Night
        } else if has(&["rain", "shower", "lluv"]) {
            Self::Rain
        } else if has(&["cloud", "nublado"]) {
            Self::Cloudy
        } else if has(&["snow", "nieve"]) {
            Self::Snow
        } else {
            Self::Clear
        }
    }

    pub fn for_snapshot(snapshot: &WeatherSnapshot) -> Self {
        Self::classify(Some(&snapshot.current.condition.text), snapshot.current.is_night())
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::ClearNight => "🌙",
            Self::Night => "🌌",
            Self::Rain => "🌧",
            Self::Cloudy => "☁",
            Self::Snow => "❄",
            Self::Clear => "☀",
        }
    }
}
