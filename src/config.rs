//! Explicitly injected client configuration

/// OpenWeatherMap current-weather API root
pub const DEFAULT_API_BASE: &str = "https://api.openweathermap.org/data/2.5";

/// Static icon asset root
pub const DEFAULT_ICON_BASE: &str = "https://openweathermap.org/img/wn";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing OpenWeatherMap API key (pass --api-key or set OPENWEATHER_API_KEY)")]
    MissingApiKey,
}

/// Everything the weather client needs, handed over at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeatherConfig {
    pub api_key: String,
    pub api_base: String,
    pub icon_base: String,
}

impl WeatherConfig {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(Self {
            api_key,
            api_base: DEFAULT_API_BASE.to_string(),
            icon_base: DEFAULT_ICON_BASE.to_string(),
        })
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_icon_base(mut self, base: impl Into<String>) -> Self {
        self.icon_base = base.into().trim_end_matches('/').to_string();
        self
    }
}
