use artbox::{
    Alignment as ArtAlignment, Color as ArtColor, ColorStop, Fill, LinearGradient, Renderer,
    fonts, integrations::ratatui::ArtBox,
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Component;
use crate::action::Action;
use crate::state::LOADING_ANIM_CYCLE_TICKS;

/// FIGlet banner for the highlighted city, tinted by its temperature.
/// The gradient seam sweeps across while any lookup is in flight.
pub struct BoardHeader;

pub struct BoardHeaderProps<'a> {
    pub title: &'a str,
    pub subtitle: &'a str,
    pub temperature: Option<f32>,
    pub is_animating: bool,
    pub tick_count: u32,
}

/// Rows below the banner: spacer + subtitle.
pub const HEADER_OVERHEAD: u16 = 2;

fn palette(temp: Option<f32>) -> (ArtColor, ArtColor) {
    match temp {
        Some(t) if t < 0.0 => (ArtColor::rgb(150, 200, 255), ArtColor::rgb(200, 230, 255)),
        Some(t) if t < 15.0 => (ArtColor::rgb(100, 180, 255), ArtColor::rgb(150, 220, 200)),
        Some(t) if t < 25.0 => (ArtColor::rgb(100, 200, 150), ArtColor::rgb(255, 220, 100)),
        Some(t) if t < 35.0 => (ArtColor::rgb(255, 180, 80), ArtColor::rgb(255, 120, 80)),
        Some(_) => (ArtColor::rgb(255, 100, 80), ArtColor::rgb(255, 60, 60)),
        None => (ArtColor::rgb(180, 180, 180), ArtColor::rgb(220, 220, 220)),
    }
}

/// Gradient whose stops are rotated by `phase` (0..1)
fn swept_gradient(colors: (ArtColor, ArtColor), phase: f32) -> Fill {
    Fill::Linear(LinearGradient::new(
        5.0,
        swept_stops(colors, phase)
            .into_iter()
            .map(|(pos, color)| ColorStop::new(pos, color))
            .collect(),
    ))
}

/// Same stop layout for every phase, so the sweep never jumps at the seam
fn swept_stops((from, to): (ArtColor, ArtColor), phase: f32) -> Vec<(f32, ArtColor)> {
    let phase = phase.rem_euclid(1.0);
    let mid = from.interpolate(to, 0.5);
    let edge = from.interpolate(to, 0.08);
    let base = [(0.0, edge), (0.35, from), (0.5, mid), (0.65, to), (1.0, edge)];

    let mut stops: Vec<(f32, ArtColor)> = base
        .iter()
        .map(|&(pos, color)| ((pos + phase) % 1.0, color))
        .collect();
    // Both ends take the colour that wrapped past the seam
    let seam = color_at(&base, 1.0 - phase);
    stops.push((0.0, seam));
    stops.push((1.0, seam));
    stops.sort_by(|a, b| a.0.total_cmp(&b.0));
    stops
}

fn color_at(stops: &[(f32, ArtColor)], position: f32) -> ArtColor {
    let pos = position.clamp(0.0, 1.0);
    for pair in stops.windows(2) {
        let ((start, a), (end, b)) = (pair[0], pair[1]);
        if pos <= end {
            let span = end - start;
            if span <= f32::EPSILON {
                return b;
            }
            return a.interpolate(b, (pos - start) / span);
        }
    }
    stops.last().map_or(ArtColor::rgb(220, 220, 220), |stop| stop.1)
}

fn sweep_phase(tick_count: u32) -> f32 {
    let steps = LOADING_ANIM_CYCLE_TICKS.max(1);
    (tick_count % steps) as f32 / steps as f32
}

impl Component<Action> for BoardHeader {
    type Props<'a> = BoardHeaderProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let chunks = Layout::vertical([
            Constraint::Fill(1),   // Banner
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Subtitle
        ])
        .split(area);

        let phase = if props.is_animating {
            sweep_phase(props.tick_count)
        } else {
            0.0
        };
        let renderer = Renderer::new(fonts::stack(&["terminus", "miniwi"]))
            .with_plain_fallback()
            .with_alignment(ArtAlignment::Center)
            .with_fill(swept_gradient(palette(props.temperature), phase));
        frame.render_widget(ArtBox::new(&renderer, props.title), chunks[0]);

        let subtitle = Line::from(vec![Span::styled(
            props.subtitle.to_string(),
            Style::default().fg(Color::DarkGray),
        )])
        .centered();
        frame.render_widget(Paragraph::new(subtitle), chunks[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swept_stops_keep_shape_at_phase_zero() {
        let colors = palette(Some(18.0));
        let positions = |phase: f32| -> Vec<f32> {
            swept_stops(colors, phase).iter().map(|s| s.0).collect()
        };
        let at_rest = positions(0.0);

        assert_eq!(at_rest.len(), positions(0.25).len());
        assert_eq!(at_rest.first(), Some(&0.0));
        assert_eq!(at_rest.last(), Some(&1.0));
        assert_eq!(at_rest, positions(1.0));
    }

    #[test]
    fn test_sweep_phase_wraps() {
        assert_eq!(sweep_phase(0), 0.0);
        assert_eq!(sweep_phase(LOADING_ANIM_CYCLE_TICKS), 0.0);
        assert!((sweep_phase(LOADING_ANIM_CYCLE_TICKS / 2) - 0.5).abs() < 1e-6);
    }
}
