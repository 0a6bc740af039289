use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Layout};
use ratatui::prelude::{Frame, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::board_header::HEADER_OVERHEAD;
use super::{BoardHeader, BoardHeaderProps, CityCard, CityCardProps, Component};
use crate::action::Action;
use crate::state::AppState;

/// Banner height cap: terminus font (6 rows) plus the subtitle rows
const HEADER_CAP: u16 = 6 + HEADER_OVERHEAD;

pub struct CityBoardProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// The main screen: banner, stacked city cards and the key hints
#[derive(Default)]
pub struct CityBoard;

impl Component<Action> for CityBoard {
    type Props<'a> = CityBoardProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Char('r') | KeyCode::F(5) => Some(Action::WeatherRefresh),
                KeyCode::Char('a') | KeyCode::Char('/') => Some(Action::CityAddOpen),
                KeyCode::Char('j') | KeyCode::Down => Some(Action::CardNext),
                KeyCode::Char('k') | KeyCode::Up => Some(Action::CardPrev),
                KeyCode::Enter | KeyCode::Char(' ') => Some(Action::CardToggle),
                KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: CityBoardProps<'_>) {
        let state = props.state;
        let chunks = Layout::vertical([
            Constraint::Max(HEADER_CAP),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

        render_header(frame, chunks[0], state);
        if state.cities.is_empty() {
            render_empty_hint(frame, chunks[1]);
        } else {
            render_cards(frame, chunks[1], state);
        }

        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            chunks[2],
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&[
                    StatusBarHint::new("r", "refresh"),
                    StatusBarHint::new("a", "add"),
                    StatusBarHint::new("↑↓", "move"),
                    StatusBarHint::new("enter", "details"),
                    StatusBarHint::new("q", "quit"),
                ]),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let selected = state.selected_city();
    let report = selected.and_then(|city| state.outcome(city).report());
    let title = match (report, selected) {
        (Some(report), _) => report.place.as_str(),
        (None, Some(city)) => city,
        (None, None) => "Weather",
    };

    let mut subtitle = match state.cities.len() {
        1 => "1 city".to_string(),
        n => format!("{} cities", n),
    };
    if state.cycle > 0 {
        subtitle.push_str(&format!(" · cycle #{}", state.cycle));
    }
    if state.cycle_in_flight {
        subtitle.push_str(" · refreshing");
    }

    let mut header = BoardHeader;
    header.render(
        frame,
        area,
        BoardHeaderProps {
            title,
            subtitle: &subtitle,
            temperature: report.map(|r| r.temperature),
            is_animating: state.loading_anim_active(),
            tick_count: state.tick_count,
        },
    );
}

fn render_empty_hint(frame: &mut Frame, area: Rect) {
    let hint = Line::from(vec![
        Span::styled("Press ", Style::default().fg(Color::DarkGray)),
        Span::styled("a", Style::default().fg(Color::Cyan).bold()),
        Span::styled(" to add a city", Style::default().fg(Color::DarkGray)),
    ])
    .centered();
    frame.render_widget(Paragraph::new(hint), area);
}

fn card_props<'a>(state: &'a AppState, index: usize, city: &'a str) -> CityCardProps<'a> {
    CityCardProps {
        city,
        outcome: state.outcome(city),
        is_selected: index == state.selected,
        is_expanded: state.is_expanded(city),
        icon_base: &state.icon_base,
    }
}

/// Stack cards top to bottom, scrolled so the selected card is visible
fn render_cards(frame: &mut Frame, area: Rect, state: &AppState) {
    let heights: Vec<u16> = state
        .cities
        .iter()
        .enumerate()
        .map(|(index, city)| card_props(state, index, city).height())
        .collect();
    let first = first_visible(&heights, state.selected, area.height);

    let mut card = CityCard;
    let mut y = area.y;
    let bottom = area.y + area.height;
    for (index, city) in state.cities.iter().enumerate().skip(first) {
        let height = heights[index].min(bottom.saturating_sub(y));
        if height == 0 {
            break;
        }
        let card_area = Rect::new(area.x, y, area.width, height);
        card.render(frame, card_area, card_props(state, index, city));
        y += height;
    }
}

/// Smallest starting index that still shows the whole selected card
fn first_visible(heights: &[u16], selected: usize, available: u16) -> usize {
    if heights.is_empty() {
        return 0;
    }
    let selected = selected.min(heights.len() - 1);
    let mut used: u16 = heights[..=selected].iter().sum();
    let mut first = 0;
    while used > available && first < selected {
        used -= heights[first];
        first += 1;
    }
    first
}
