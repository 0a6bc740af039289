//! OpenWeatherMap client

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::WeatherConfig;
use crate::state::WeatherReport;

/// Message used when a transport error carries no text of its own
pub const TRANSPORT_FALLBACK: &str = "Network request failed";

/// Why one city's lookup failed. `Display` is the text shown to the user.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("{message}")]
    Remote { status: u16, message: String },
    #[error("{0}")]
    Transport(String),
    #[error("Malformed weather response: {0}")]
    Parse(String),
}

impl LookupError {
    fn transport(error: reqwest::Error) -> Self {
        LookupError::Transport(transport_message(&error.without_url()))
    }

    /// Build a remote error from a non-success status and its raw body
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|body| body.message)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP error, status {}", status));
        LookupError::Remote { status, message }
    }
}

/// Join an error and its causes into one line, e.g.
/// "error sending request: connection refused".
///
/// Blank or repeated layers are skipped; an error with no text at all gets
/// `TRANSPORT_FALLBACK`.
pub fn transport_message(error: &dyn std::error::Error) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut current = Some(error);
    while let Some(layer) = current {
        let text = layer.to_string();
        let text = text.trim();
        if !text.is_empty() && !parts.iter().any(|part| part.contains(text)) {
            parts.push(text.to_string());
        }
        current = layer.source();
    }
    if parts.is_empty() {
        TRANSPORT_FALLBACK.to_string()
    } else {
        parts.join(": ")
    }
}

/// One current-weather lookup, the seam the aggregator fans out over
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current(&self, city: &str) -> Result<WeatherReport, LookupError>;
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    name: String,
    weather: Vec<ConditionEntry>,
    main: MainBlock,
    wind: WindBlock,
}

#[derive(Debug, Deserialize)]
struct ConditionEntry {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f32,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct WindBlock {
    speed: f32,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Decode a success body into a report
pub fn parse_current(body: &str) -> Result<WeatherReport, LookupError> {
    let data: CurrentResponse =
        serde_json::from_str(body).map_err(|e| LookupError::Parse(e.to_string()))?;
    let condition = data
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| LookupError::Parse("missing weather condition".to_string()))?;
    if data.main.humidity > 100 {
        return Err(LookupError::Parse(format!(
            "humidity {}% is out of range",
            data.main.humidity
        )));
    }

    Ok(WeatherReport {
        place: data.name,
        description: condition.description,
        icon: condition.icon,
        temperature: data.main.temp,
        humidity: data.main.humidity,
        wind_speed: data.wind.speed,
    })
}

/// Icon asset URL for a provider icon code
pub fn icon_url(icon_base: &str, icon: &str) -> String {
    format!("{}/{}@2x.png", icon_base, urlencoding::encode(icon))
}

// ============================================================================
// HTTP client
// ============================================================================

pub struct OpenWeatherClient {
    client: reqwest::Client,
    config: WeatherConfig,
}

impl OpenWeatherClient {
    pub fn new(config: WeatherConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &WeatherConfig {
        &self.config
    }

    fn lookup_url(&self, city: &str) -> String {
        format!(
            "{}/weather?q={}&appid={}&units=metric",
            self.config.api_base,
            urlencoding::encode(city),
            urlencoding::encode(&self.config.api_key)
        )
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn current(&self, city: &str) -> Result<WeatherReport, LookupError> {
        let response = self
            .client
            .get(self.lookup_url(city))
            .send()
            .await
            .map_err(LookupError::transport)?;

        let status = response.status();
        let body = response.text().await.map_err(LookupError::transport)?;

        if !status.is_success() {
            return Err(LookupError::from_status(status.as_u16(), &body));
        }
        parse_current(&body)
    }
}
