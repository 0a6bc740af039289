use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding, TextInput, TextInputProps,
    TextInputStyle, centered_rect,
};

use super::{Component, ERROR_ICON};
use crate::action::Action;

const PLACEHOLDER: &str = "City name, e.g. Lagos";

/// Modal text field for adding a city to the board
pub struct AddCityOverlay {
    input: TextInput,
    modal: Modal,
    was_open: bool,
}

pub struct AddCityOverlayProps<'a> {
    pub query: &'a str,
    pub error: Option<&'a str>,
    pub is_focused: bool,
    pub on_query_change: fn(String) -> Action,
    pub on_submit: fn(String) -> Action,
}

impl Default for AddCityOverlay {
    fn default() -> Self {
        Self {
            input: TextInput::new(),
            modal: Modal::new(),
            was_open: false,
        }
    }
}

impl AddCityOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the text field each time the overlay opens
    pub fn set_open(&mut self, is_open: bool) {
        if is_open && !self.was_open {
            self.input = TextInput::new();
        }
        self.was_open = is_open;
    }

    fn input_style(bg: Option<Color>) -> TextInputStyle {
        TextInputStyle {
            base: BaseStyle {
                border: None,
                padding: Padding::all(1),
                bg,
                fg: None,
            },
            placeholder_style: None,
            cursor_style: None,
        }
    }
}

impl Component<Action> for AddCityOverlay {
    type Props<'a> = AddCityOverlayProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        let EventKind::Key(key) = event else {
            return Vec::new();
        };

        match key.code {
            KeyCode::Esc => vec![Action::CityAddClose],
            KeyCode::Enter => vec![(props.on_submit)(props.query.to_string())],
            _ => {
                let input_props = TextInputProps {
                    value: props.query,
                    placeholder: PLACEHOLDER,
                    is_focused: true,
                    style: Self::input_style(None),
                    on_change: props.on_query_change,
                    on_submit: props.on_submit,
                    on_cursor_move: Some(|_| Action::Render),
                };
                self.input
                    .handle_event(event, input_props)
                    .into_iter()
                    .collect()
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if area.width < 20 || area.height < 7 {
            return;
        }

        let AddCityOverlay { input, modal, .. } = self;
        let modal_area = centered_rect(50, 7, area);
        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            let chunks = Layout::vertical([
                Constraint::Length(1), // Title
                Constraint::Length(3), // Input
                Constraint::Length(1), // Error / hint
            ])
            .split(content_area);

            frame.render_widget(
                Paragraph::new(Line::from(" Add a city").style(Style::default().fg(Color::Cyan))),
                chunks[0],
            );

            let input_props = TextInputProps {
                value: props.query,
                placeholder: PLACEHOLDER,
                is_focused: props.is_focused,
                style: Self::input_style(Some(Color::Rgb(50, 50, 60))),
                on_change: props.on_query_change,
                on_submit: props.on_submit,
                on_cursor_move: Some(|_| Action::Render),
            };
            input.render(frame, chunks[1], input_props);

            let footer = match props.error {
                Some(error) => Line::from(vec![
                    Span::raw(format!(" {} ", ERROR_ICON)),
                    Span::styled(error.to_string(), Style::default().fg(Color::Rgb(200, 100, 100))),
                ]),
                None => Line::from(Span::styled(
                    " Enter to add, Esc to cancel",
                    Style::default().fg(Color::DarkGray),
                )),
            };
            frame.render_widget(Paragraph::new(footer), chunks[2]);
        };

        modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: modal_area,
                style: ModalStyle {
                    base: BaseStyle {
                        bg: Some(Color::Rgb(35, 35, 45)),
                        padding: Padding::default(),
                        border: None,
                        fg: None,
                    },
                    ..Default::default()
                },
                behavior: ModalBehavior::default(),
                on_close: || Action::CityAddClose,
                render_content: &mut render_content,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_dispatch::testing::*;

    fn overlay_props(query: &str) -> AddCityOverlayProps<'_> {
        AddCityOverlayProps {
            query,
            error: None,
            is_focused: true,
            on_query_change: Action::CityAddQueryChange,
            on_submit: Action::CityAddSubmit,
        }
    }

    #[test]
    fn test_enter_submits_query() {
        let mut overlay = AddCityOverlay::new();
        let actions: Vec<_> = overlay
            .handle_event(&EventKind::Key(key("enter")), overlay_props("Lagos"))
            .into_iter()
            .collect();
        actions.assert_first(Action::CityAddSubmit("Lagos".into()));
    }

    #[test]
    fn test_esc_closes() {
        let mut overlay = AddCityOverlay::new();
        let actions: Vec<_> = overlay
            .handle_event(&EventKind::Key(key("esc")), overlay_props(""))
            .into_iter()
            .collect();
        actions.assert_first(Action::CityAddClose);
    }

    #[test]
    fn test_render_shows_error() {
        let mut render = RenderHarness::new(60, 20);
        let mut overlay = AddCityOverlay::new();

        let output = render.render_to_string_plain(|frame| {
            let props = AddCityOverlayProps {
                error: Some("Lagos is already on the board"),
                ..overlay_props("Lagos")
            };
            overlay.render(frame, frame.area(), props);
        });

        assert!(output.contains("already on the board"));
    }
}
