//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::aggregator;
use crate::effect::Effect;
use crate::state::{AppState, Outcome, LOADING_ANIM_CYCLE_TICKS};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Weather actions =====
        Action::WeatherRefresh => {
            if state.cities.is_empty() {
                return DispatchResult::unchanged();
            }
            // A newer cycle supersedes any cycle still running
            state.cycle += 1;
            state.cycle_in_flight = true;
            for city in state.cities.iter() {
                state
                    .results
                    .entry(city.to_string())
                    .or_insert(Outcome::Pending);
            }
            state.tick_count = 0;
            state.loading_anim_ticks_remaining = 0;
            DispatchResult::changed_with(Effect::FetchCycle {
                cycle: state.cycle,
                cities: state.cities.as_slice().to_vec(),
            })
        }

        Action::WeatherDidRefresh(cycle, results) => {
            if cycle != state.cycle {
                return DispatchResult::unchanged();
            }
            state.results = aggregator::merge(&state.results, results);
            state.cycle_in_flight = false;
            state.loading_anim_ticks_remaining = ticks_to_phase_zero(state.tick_count);
            DispatchResult::changed()
        }

        // ===== City actions =====
        Action::CityDidLoad(city, cycle, outcome) => {
            // Any cycle started after the add covers this city with newer data
            if cycle != state.cycle || !state.cities.contains(&city) {
                return DispatchResult::unchanged();
            }
            state.results.insert(city, outcome);
            if !state.any_pending() {
                state.loading_anim_ticks_remaining = ticks_to_phase_zero(state.tick_count);
            }
            DispatchResult::changed()
        }

        Action::CityAddOpen => {
            state.add_mode = true;
            state.add_query.clear();
            state.add_error = None;
            DispatchResult::changed()
        }

        Action::CityAddClose => {
            state.add_mode = false;
            state.add_query.clear();
            state.add_error = None;
            DispatchResult::changed()
        }

        Action::CityAddQueryChange(query) => {
            state.add_query = query;
            state.add_error = None;
            DispatchResult::changed()
        }

        Action::CityAddSubmit(query) => match state.cities.add(&query).map(str::to_string) {
            Ok(city) => {
                state.results.insert(city.clone(), Outcome::Pending);
                state.selected = state.cities.len() - 1;
                state.add_mode = false;
                state.add_query.clear();
                state.add_error = None;
                state.tick_count = 0;
                state.loading_anim_ticks_remaining = 0;
                DispatchResult::changed_with(Effect::FetchCity {
                    city,
                    cycle: state.cycle,
                })
            }
            Err(e) => {
                state.add_query = query;
                state.add_error = Some(e.to_string());
                DispatchResult::changed()
            }
        },

        // ===== Card actions =====
        Action::CardSelect(index) => {
            if index < state.cities.len() && index != state.selected {
                state.selected = index;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::CardNext => step_selection(state, 1),

        Action::CardPrev => step_selection(state, state.cities.len().saturating_sub(1)),

        Action::CardToggle => {
            let Some(city) = state.selected_city().map(str::to_string) else {
                return DispatchResult::unchanged();
            };
            if !state.expanded.remove(&city) {
                state.expanded.insert(city);
            }
            DispatchResult::changed()
        }

        Action::Render => DispatchResult::changed(),

        // ===== Global actions =====
        Action::Tick => {
            let animating = state.loading_anim_active();
            if animating {
                state.tick_count = state.tick_count.wrapping_add(1);
                if state.loading_anim_ticks_remaining > 0 {
                    state.loading_anim_ticks_remaining -= 1;
                }
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Move the highlight forward by `offset`, wrapping around the list
fn step_selection(state: &mut AppState, offset: usize) -> DispatchResult<Effect> {
    let len = state.cities.len();
    if len < 2 {
        return DispatchResult::unchanged();
    }
    state.selected = (state.selected + offset) % len;
    DispatchResult::changed()
}

fn ticks_to_phase_zero(tick_count: u32) -> u32 {
    let cycle = LOADING_ANIM_CYCLE_TICKS.max(1);
    match tick_count % cycle {
        0 if tick_count == 0 => cycle,
        0 => 0,
        remainder => cycle - remainder,
    }
}
