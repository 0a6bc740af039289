//! Application state - single source of truth

use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::cities::CityList;
use crate::config::DEFAULT_ICON_BASE;

/// Cities tracked when none are given on the command line
pub const DEFAULT_CITIES: [&str; 3] = ["London", "Tokyo", "New York"];

/// Current conditions for one city, as reported by the provider (metric units)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeatherReport {
    /// Place name returned by the provider, may differ from the query
    pub place: String,
    pub description: String,
    /// Provider icon code, e.g. "01d"
    pub icon: String,
    pub temperature: f32,
    pub humidity: u8,
    pub wind_speed: f32,
}

impl WeatherReport {
    /// Temperature rounded for display: 18.4 -> "18°C"
    pub fn temperature_label(&self) -> String {
        format!("{}°C", self.temperature.round() as i32)
    }

    pub fn humidity_label(&self) -> String {
        format!("{}%", self.humidity)
    }

    pub fn wind_label(&self) -> String {
        format!("{} m/s", self.wind_speed)
    }

    pub fn glyph(&self) -> &'static str {
        condition_glyph(&self.icon)
    }

    /// One-line summary used by the cards and print mode
    pub fn summary(&self) -> String {
        format!(
            "{} {} {}, humidity {}, wind {}",
            self.place,
            self.temperature_label(),
            self.description,
            self.humidity_label(),
            self.wind_label()
        )
    }
}

/// Map a provider icon code ("01d", "10n", ...) to a terminal glyph
pub fn condition_glyph(icon: &str) -> &'static str {
    let night = icon.ends_with('n');
    match icon.get(..2) {
        Some("01") if night => "🌙",
        Some("01") => "☀️",
        Some("02") => "🌤️",
        Some("03") => "⛅",
        Some("04") => "☁️",
        Some("09") => "🌧️",
        Some("10") => "🌦️",
        Some("11") => "⛈️",
        Some("13") => "❄️",
        Some("50") => "🌫️",
        _ => "🌡️",
    }
}

/// Latest lookup result for one city
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum Outcome {
    /// Request in flight, no data yet
    #[default]
    Pending,
    Success(WeatherReport),
    Failure(String),
}

impl Outcome {
    pub fn is_pending(&self) -> bool {
        matches!(self, Outcome::Pending)
    }

    pub fn report(&self) -> Option<&WeatherReport> {
        match self {
            Outcome::Success(report) => Some(report),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Outcome::Failure(message) => Some(message),
            _ => None,
        }
    }
}

static PENDING: Outcome = Outcome::Pending;

/// City identifier -> latest outcome
pub type ResultSet = BTreeMap<String, Outcome>;

/// Animation timing for the header gradient seam.
pub const LOADING_ANIM_TICK_MS: u64 = 15;
pub const LOADING_ANIM_CYCLE_TICKS: u32 = 60;

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    // --- Core data (visible in debug) ---
    /// Tracked cities in insertion order
    #[debug(section = "Cities", label = "Tracked", debug_fmt)]
    pub cities: CityList,

    /// Latest outcome per city
    #[debug(section = "Cities", label = "Results", debug_fmt)]
    pub results: ResultSet,

    /// Index of the highlighted card
    #[debug(section = "Cities", label = "Selected")]
    pub selected: usize,

    /// Cards showing their detail rows
    #[debug(section = "Cities", label = "Expanded", debug_fmt)]
    pub expanded: BTreeSet<String>,

    /// Number of the latest full fetch cycle
    #[debug(section = "Fetch", label = "Cycle")]
    pub cycle: u64,

    /// Whether the latest full cycle is still running
    #[debug(section = "Fetch", label = "In flight")]
    pub cycle_in_flight: bool,

    /// Root for icon asset URLs shown in expanded cards
    #[debug(skip)]
    pub icon_base: String,

    // --- Animation internals (skipped) ---
    #[debug(skip)]
    pub tick_count: u32,

    /// Remaining ticks to finish the current animation cycle after loading
    #[debug(skip)]
    pub loading_anim_ticks_remaining: u32,

    // --- Add-city overlay (skipped) ---
    #[debug(skip)]
    pub add_mode: bool,

    #[debug(skip)]
    pub add_query: String,

    /// Rejection message for the last submitted name
    #[debug(skip)]
    pub add_error: Option<String>,
}

impl AppState {
    /// Create state tracking the given cities, with nothing fetched yet
    pub fn new(cities: CityList) -> Self {
        Self {
            cities,
            results: ResultSet::new(),
            selected: 0,
            expanded: BTreeSet::new(),
            cycle: 0,
            cycle_in_flight: false,
            icon_base: DEFAULT_ICON_BASE.to_string(),
            tick_count: 0,
            loading_anim_ticks_remaining: 0,
            add_mode: false,
            add_query: String::new(),
            add_error: None,
        }
    }

    pub fn with_icon_base(mut self, icon_base: impl Into<String>) -> Self {
        self.icon_base = icon_base.into();
        self
    }

    /// Outcome for a tracked city; cities never fetched read as Pending
    pub fn outcome(&self, city: &str) -> &Outcome {
        self.results.get(city).unwrap_or(&PENDING)
    }

    pub fn selected_city(&self) -> Option<&str> {
        self.cities.get(self.selected)
    }

    pub fn is_expanded(&self, city: &str) -> bool {
        self.expanded.contains(city)
    }

    pub fn any_pending(&self) -> bool {
        self.cities.iter().any(|city| self.outcome(city).is_pending())
    }

    pub fn loading_anim_active(&self) -> bool {
        self.cycle_in_flight || self.any_pending() || self.loading_anim_ticks_remaining > 0
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(CityList::new(DEFAULT_CITIES))
    }
}
