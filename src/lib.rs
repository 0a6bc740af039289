//! Weather board - multi-city weather TUI built on tui-dispatch
//!
//! The library exposes the aggregator and the app modules for testing.

pub mod action;
pub mod aggregator;
pub mod api;
pub mod cities;
pub mod components;
pub mod config;
pub mod effect;
pub mod reducer;
pub mod state;
