use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use super::{Component, ERROR_ICON};
use crate::action::Action;
use crate::api::icon_url;
use crate::state::{Outcome, WeatherReport};

/// One tracked city: a compact summary, with detail rows when expanded
pub struct CityCard;

pub struct CityCardProps<'a> {
    pub city: &'a str,
    pub outcome: &'a Outcome,
    pub is_selected: bool,
    pub is_expanded: bool,
    pub icon_base: &'a str,
}

impl CityCardProps<'_> {
    /// Rows needed including the border
    pub fn height(&self) -> u16 {
        card_lines(self).len() as u16 + 2
    }
}

impl Component<Action> for CityCard {
    type Props<'a> = CityCardProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let border = if props.is_selected {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let marker = if props.is_expanded { "▾" } else { "▸" };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(Line::from(vec![
                Span::styled(format!(" {} ", marker), border),
                Span::styled(format!("{} ", props.city), Style::default().bold()),
            ]));

        frame.render_widget(Paragraph::new(card_lines(&props)).block(block), area);
    }
}

fn card_lines(props: &CityCardProps<'_>) -> Vec<Line<'static>> {
    match props.outcome {
        Outcome::Pending => vec![Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::DarkGray),
        ))],
        Outcome::Failure(message) => vec![Line::from(vec![
            Span::raw(format!("{} ", ERROR_ICON)),
            Span::styled(message.clone(), Style::default().fg(Color::Rgb(200, 100, 100))),
        ])],
        Outcome::Success(report) => report_lines(props, report),
    }
}

fn report_lines(props: &CityCardProps<'_>, report: &WeatherReport) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::raw(format!("{} ", report.glyph())),
        Span::styled(
            report.temperature_label(),
            Style::default()
                .fg(temperature_color(report.temperature))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(report.description.clone(), Style::default().fg(Color::Gray)),
    ])];

    if report.place != props.city {
        lines.push(Line::from(Span::styled(
            format!("reported as {}", report.place),
            Style::default().fg(Color::DarkGray),
        )));
    }

    if props.is_expanded {
        let label = Style::default().fg(Color::DarkGray);
        lines.push(Line::from(vec![
            Span::styled("Humidity  ", label),
            Span::raw(report.humidity_label()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Wind      ", label),
            Span::raw(report.wind_label()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Icon      ", label),
            Span::styled(
                icon_url(props.icon_base, &report.icon),
                Style::default().fg(Color::Blue),
            ),
        ]));
    }
    lines
}

pub(crate) fn temperature_color(celsius: f32) -> Color {
    match celsius {
        t if t < 0.0 => Color::Rgb(150, 200, 255),
        t if t < 15.0 => Color::Rgb(100, 180, 255),
        t if t < 25.0 => Color::Rgb(100, 200, 150),
        t if t < 35.0 => Color::Rgb(255, 180, 80),
        _ => Color::Rgb(255, 60, 60),
    }
}
