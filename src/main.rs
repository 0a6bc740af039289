//! Weather board - multi-city weather TUI

use std::cell::RefCell;
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Rect};
use tracing_subscriber::EnvFilter;
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_components::centered_rect;
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};
use weather_board::action::Action;
use weather_board::aggregator;
use weather_board::api::{OpenWeatherClient, WeatherSource};
use weather_board::cities::CityList;
use weather_board::components::{
    AddCityOverlay, AddCityOverlayProps, CityBoard, CityBoardProps, Component,
};
use weather_board::config::{DEFAULT_API_BASE, WeatherConfig};
use weather_board::effect::Effect;
use weather_board::reducer::reducer;
use weather_board::state::{AppState, DEFAULT_CITIES, LOADING_ANIM_TICK_MS, Outcome};

/// Weather board - current conditions for several cities at once
#[derive(Parser, Debug)]
#[command(name = "weather-board")]
#[command(about = "Track the current weather of several cities side by side")]
struct Args {
    /// City to track (repeat for several)
    #[arg(long = "city", short, value_name = "NAME")]
    cities: Vec<String>,

    /// OpenWeatherMap API key
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Current-weather API root
    #[arg(long, env = "OPENWEATHER_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Refresh interval in seconds (minimum 1)
    #[arg(long, short, default_value = "600", value_parser = clap::value_parser!(u64).range(1..))]
    refresh_interval: u64,

    /// Fetch once, print one line per city and exit
    #[arg(long)]
    print: bool,

    /// Write logs to this file (the terminal belongs to the UI)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum BoardComponentId {
    Board,
    AddCity,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum BoardContext {
    Main,
    AddCity,
}

impl EventRoutingState<BoardComponentId, BoardContext> for AppState {
    fn focused(&self) -> Option<BoardComponentId> {
        if self.add_mode {
            Some(BoardComponentId::AddCity)
        } else {
            Some(BoardComponentId::Board)
        }
    }

    fn modal(&self) -> Option<BoardComponentId> {
        if self.add_mode {
            Some(BoardComponentId::AddCity)
        } else {
            None
        }
    }

    fn binding_context(&self, id: BoardComponentId) -> BoardContext {
        match id {
            BoardComponentId::Board => BoardContext::Main,
            BoardComponentId::AddCity => BoardContext::AddCity,
        }
    }

    fn default_context(&self) -> BoardContext {
        BoardContext::Main
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        cities,
        api_key,
        api_base,
        refresh_interval,
        print,
        log_file,
        debug: debug_args,
    } = Args::parse();

    init_logging(log_file, print)?;

    let config = match WeatherConfig::new(api_key.unwrap_or_default()) {
        Ok(config) => config.with_api_base(api_base),
        Err(e) => {
            tracing::error!(error = %e, "cannot start without an API key");
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };
    let icon_base = config.icon_base.clone();
    let source: Arc<dyn WeatherSource> = Arc::new(OpenWeatherClient::new(config));

    let cities = if cities.is_empty() {
        CityList::new(DEFAULT_CITIES)
    } else {
        CityList::new(&cities)
    };

    if print {
        print_board(source, &cities).await;
        return Ok(());
    }

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(cities).with_icon_base(icon_base))
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(
        &mut terminal,
        &debug,
        store,
        source,
        refresh_interval,
        replay_actions,
    )
    .await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

/// Install a subscriber only where log lines cannot corrupt the UI
fn init_logging(log_file: Option<PathBuf>, print: bool) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("weather_board=info"));

    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if print {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
    Ok(())
}

/// One fetch cycle straight to stdout, in list order
async fn print_board(source: Arc<dyn WeatherSource>, cities: &CityList) {
    let results = aggregator::fetch_all(source, cities.as_slice()).await;
    for city in cities.iter() {
        match results.get(city) {
            Some(Outcome::Success(report)) => println!("{}: {}", city, report.summary()),
            Some(Outcome::Failure(message)) => println!("{}: error: {}", city, message),
            Some(Outcome::Pending) | None => println!("{}: no result", city),
        }
    }
}

struct BoardUi {
    board: CityBoard,
    add_city: AddCityOverlay,
}

impl BoardUi {
    fn new() -> Self {
        Self {
            board: CityBoard,
            add_city: AddCityOverlay::new(),
        }
    }

    fn add_city_props(state: &AppState, is_focused: bool) -> AddCityOverlayProps<'_> {
        AddCityOverlayProps {
            query: &state.add_query,
            error: state.add_error.as_deref(),
            is_focused,
            on_query_change: Action::CityAddQueryChange,
            on_submit: Action::CityAddSubmit,
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<BoardComponentId>,
    ) {
        event_ctx.set_component_area(BoardComponentId::Board, area);

        let props = CityBoardProps {
            state,
            is_focused: render_ctx.is_focused() && !state.add_mode,
        };
        self.board.render(frame, area, props);

        self.add_city.set_open(state.add_mode);
        if state.add_mode {
            let modal_area = centered_rect(50, 7, area);
            event_ctx.set_component_area(BoardComponentId::AddCity, modal_area);
            let props = Self::add_city_props(state, render_ctx.is_focused());
            self.add_city.render(frame, area, props);
        } else {
            event_ctx
                .component_areas
                .remove(&BoardComponentId::AddCity);
        }
    }

    fn handle_board_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = CityBoardProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self
            .board
            .handle_event(event, props)
            .into_iter()
            .collect();
        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    }

    fn handle_add_city_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        self.add_city.set_open(state.add_mode);
        let props = Self::add_city_props(state, true);
        let actions: Vec<_> = self
            .add_city
            .handle_event(event, props)
            .into_iter()
            .collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    source: Arc<dyn WeatherSource>,
    refresh_interval: u64,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(BoardUi::new()));
    let mut bus: EventBus<AppState, Action, BoardComponentId, BoardContext> = EventBus::new();
    let keybindings: Keybindings<BoardContext> = Keybindings::new();

    let ui_board = Rc::clone(&ui);
    bus.register(BoardComponentId::Board, move |event, state| {
        ui_board.borrow_mut().handle_board_event(&event.kind, state)
    });

    let ui_add_city = Rc::clone(&ui);
    bus.register(BoardComponentId::AddCity, move |event, state| {
        ui_add_city
            .borrow_mut()
            .handle_add_city_event(&event.kind, state)
    });

    // Re-render on terminal resize (no action needed, just redraw)
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::WeatherRefresh),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(LOADING_ANIM_TICK_MS),
                    || Action::Tick,
                );

                runtime.subscriptions().interval(
                    "refresh",
                    Duration::from_secs(refresh_interval),
                    || Action::WeatherRefresh,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, Arc::clone(&source)),
        )
        .await
}

/// Handle effects by spawning tasks.
///
/// Every full cycle shares one task key, so starting a cycle aborts the one
/// before it (and with it that cycle's in-flight lookups).
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, source: Arc<dyn WeatherSource>) {
    match effect {
        Effect::FetchCycle { cycle, cities } => {
            ctx.tasks().spawn(TaskKey::new("fetch_cycle"), async move {
                let results = aggregator::fetch_all(source, &cities).await;
                Action::WeatherDidRefresh(cycle, results)
            });
        }
        Effect::FetchCity { city, cycle } => {
            let key = format!("city:{}", city);
            ctx.tasks().spawn(TaskKey::new(key), async move {
                let mut results = aggregator::fetch_all(source, std::slice::from_ref(&city)).await;
                let outcome = results
                    .remove(&city)
                    .unwrap_or_else(|| Outcome::Failure(aggregator::TASK_LOST.to_string()));
                Action::CityDidLoad(city, cycle, outcome)
            });
        }
    }
}
