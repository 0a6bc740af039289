//! Actions: intents from the keyboard and results from fetch tasks

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::{Outcome, ResultSet};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Weather category =====
    /// Intent: start a full fetch cycle over every tracked city
    WeatherRefresh,

    /// Result: a full cycle settled (cycle number, outcomes)
    WeatherDidRefresh(u64, ResultSet),

    // ===== City category =====
    /// Result: the lookup for one newly added city settled, stamped with the
    /// cycle that was current when it started
    CityDidLoad(String, u64, Outcome),

    /// Open the add-city overlay
    CityAddOpen,

    /// Close the overlay without adding
    CityAddClose,

    /// Overlay text changed
    CityAddQueryChange(String),

    /// Submit the overlay text as a new city
    CityAddSubmit(String),

    // ===== Card category =====
    /// Highlight a card by index
    CardSelect(usize),

    CardNext,

    CardPrev,

    /// Expand or collapse the highlighted card
    CardToggle,

    /// Force a re-render (for cursor movement, etc.)
    Render,

    // ===== Uncategorized (global) =====
    /// Periodic tick for loading animation
    Tick,

    /// Exit the application
    Quit,
}
