//! Store flows through EffectStoreTestHarness
//!
//! Fetch tasks are simulated by completing the result actions by hand, the
//! same way the effect handler would once its lookups settle.

use tui_dispatch::NumericComponentId;
use tui_dispatch::testing::*;
use weather_board::{
    action::Action,
    cities::CityList,
    components::{Component, CityBoard, CityBoardProps},
    effect::Effect,
    reducer::reducer,
    state::{AppState, Outcome, ResultSet, WeatherReport},
};

fn report(place: &str) -> WeatherReport {
    WeatherReport {
        place: place.into(),
        description: "clear sky".into(),
        icon: "01d".into(),
        temperature: 18.4,
        humidity: 60,
        wind_speed: 3.1,
    }
}

fn state_with(cities: &[&str]) -> AppState {
    AppState::new(CityList::new(cities))
}

// ============================================================================
// Fetch cycles
// ============================================================================

#[test]
fn test_refresh_flow_with_partial_failure() {
    let mut harness = EffectStoreTestHarness::new(state_with(&["A", "B"]), reducer);

    harness.dispatch_collect(Action::WeatherRefresh);
    harness.assert_state(|s| s.cycle_in_flight && s.any_pending());

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(
        |e| matches!(e, Effect::FetchCycle { cycle: 1, cities } if cities.len() == 2),
    );

    let mut results = ResultSet::new();
    results.insert("A".into(), Outcome::Success(report("A")));
    results.insert("B".into(), Outcome::Failure("operation timed out".into()));
    harness.complete_action(Action::WeatherDidRefresh(1, results));
    let (changed, total) = harness.process_emitted();

    assert_eq!((changed, total), (1, 1));
    harness.assert_state(|s| !s.cycle_in_flight);
    harness.assert_state(|s| s.outcome("A").report().is_some());
    harness.assert_state(|s| s.outcome("B").error() == Some("operation timed out"));
}

#[test]
fn test_second_refresh_supersedes_first() {
    let mut harness = EffectStoreTestHarness::new(state_with(&["A"]), reducer);

    harness.dispatch_collect(Action::WeatherRefresh);
    harness.dispatch_collect(Action::WeatherRefresh);
    let effects = harness.drain_effects();
    effects.effects_count(2);

    let mut late = ResultSet::new();
    late.insert("A".into(), Outcome::Failure("stale".into()));
    let mut fresh = ResultSet::new();
    fresh.insert("A".into(), Outcome::Success(report("A")));

    harness.complete_action(Action::WeatherDidRefresh(2, fresh));
    harness.complete_action(Action::WeatherDidRefresh(1, late));
    let (changed, total) = harness.process_emitted();

    assert_eq!((changed, total), (1, 2));
    harness.assert_state(|s| s.outcome("A").report().is_some());
}

// ============================================================================
// Adding cities
// ============================================================================

#[test]
fn test_add_city_fetches_only_new_city() {
    let mut harness = EffectStoreTestHarness::new(state_with(&["London"]), reducer);

    harness.dispatch_collect(Action::CityAddOpen);
    harness.dispatch_collect(Action::CityAddQueryChange("Lagos".into()));
    harness.dispatch_collect(Action::CityAddSubmit("Lagos".into()));

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(
        |e| matches!(e, Effect::FetchCity { city, cycle: 0 } if city == "Lagos"),
    );
    harness.assert_state(|s| s.cities.len() == 2 && !s.add_mode);

    harness.complete_action(Action::CityDidLoad(
        "Lagos".into(),
        0,
        Outcome::Success(report("Lagos")),
    ));
    harness.process_emitted();
    harness.assert_state(|s| s.outcome("Lagos").report().is_some());
}

#[test]
fn test_add_duplicate_is_rejected() {
    let mut harness = EffectStoreTestHarness::new(state_with(&["Lagos"]), reducer);

    harness.dispatch_collect(Action::CityAddOpen);
    harness.dispatch_collect(Action::CityAddSubmit("Lagos".into()));

    harness.drain_effects().effects_empty();
    harness.assert_state(|s| s.cities.len() == 1);
    harness.assert_state(|s| s.add_mode && s.add_error.is_some());
}

#[test]
fn test_new_city_failure_does_not_touch_existing_success() {
    let mut harness = EffectStoreTestHarness::new(state_with(&["A"]), reducer);
    let mut results = ResultSet::new();
    results.insert("A".into(), Outcome::Success(report("A")));
    harness.dispatch_collect(Action::WeatherRefresh);
    harness.complete_action(Action::WeatherDidRefresh(1, results));
    harness.process_emitted();

    harness.dispatch_collect(Action::CityAddSubmit("B".into()));
    harness.complete_action(Action::CityDidLoad(
        "B".into(),
        1,
        Outcome::Failure("city not found".into()),
    ));
    harness.process_emitted();

    harness.assert_state(|s| s.outcome("A") == &Outcome::Success(report("A")));
    harness.assert_state(|s| s.outcome("B").error() == Some("city not found"));
}

#[test]
fn test_slow_add_lookup_loses_to_later_cycle() {
    let mut harness = EffectStoreTestHarness::new(state_with(&["A"]), reducer);

    harness.dispatch_collect(Action::CityAddSubmit("X".into()));
    harness.dispatch_collect(Action::WeatherRefresh);
    harness.drain_effects().effects_count(2);

    let mut results = ResultSet::new();
    results.insert("A".into(), Outcome::Success(report("A")));
    results.insert("X".into(), Outcome::Success(report("X")));
    harness.complete_action(Action::WeatherDidRefresh(1, results));
    harness.complete_action(Action::CityDidLoad(
        "X".into(),
        0,
        Outcome::Failure("timed out".into()),
    ));
    let (changed, total) = harness.process_emitted();

    assert_eq!((changed, total), (1, 2));
    harness.assert_state(|s| s.outcome("X") == &Outcome::Success(report("X")));
}

// ============================================================================
// Keyboard + render
// ============================================================================

#[test]
fn test_keyboard_expand_shows_details() {
    let mut state = state_with(&["London"]);
    state
        .results
        .insert("London".into(), Outcome::Success(report("London")));
    let mut harness = EffectStoreTestHarness::new(state, reducer);
    let mut component = CityBoard;

    let actions = harness.send_keys::<NumericComponentId, _, _>("enter", |state, event| {
        let props = CityBoardProps {
            state,
            is_focused: true,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });
    actions.assert_first(Action::CardToggle);
    for action in actions {
        harness.dispatch_collect(action);
    }

    let output = harness.render_plain(70, 30, |frame, area, state| {
        let props = CityBoardProps {
            state,
            is_focused: true,
        };
        component.render(frame, area, props);
    });

    assert!(
        output.contains("3.1 m/s"),
        "Wind should be visible once expanded:\n{}",
        output
    );
    assert!(output.contains("60%"));
}

#[test]
fn test_render_loading_then_loaded() {
    let mut harness = EffectStoreTestHarness::new(state_with(&["Oslo"]), reducer);
    let mut component = CityBoard;

    harness.dispatch_collect(Action::WeatherRefresh);
    let loading = harness.render_plain(60, 24, |frame, area, state| {
        component.render(
            frame,
            area,
            CityBoardProps {
                state,
                is_focused: true,
            },
        );
    });
    assert!(loading.contains("Loading..."), "{}", loading);

    let mut results = ResultSet::new();
    results.insert("Oslo".into(), Outcome::Success(report("Oslo")));
    harness.complete_action(Action::WeatherDidRefresh(1, results));
    harness.process_emitted();

    let loaded = harness.render_plain(60, 24, |frame, area, state| {
        component.render(
            frame,
            area,
            CityBoardProps {
                state,
                is_focused: true,
            },
        );
    });
    assert!(loaded.contains("clear sky"), "{}", loaded);
    assert!(!loaded.contains("Loading..."));
}
