use crate::app::AppState;
use crate::domain::UiMode;
use crate::ui::styles::{error_style, hint_style};
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

/// Render the keybindings hint bar. A pending status message replaces the hints.
pub fn render_keybindings(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(message) = &app.status_message {
        let paragraph = Paragraph::new(format!(" {}", message)).style(error_style());
        f.render_widget(paragraph, area);
        return;
    }

    let hints: &[&str] = match app.ui_mode {
        UiMode::Stats => &[" v/Esc back   ", "q quit"],
        _ => &[
            " Tab/1-4 quadrant   ",
            "↑/↓ select   ",
            "a add   ",
            "x delete   ",
            "+/- progress   ",
            "d deadline   ",
            "t timer   ",
            "l label   ",
            "v stats   ",
            "C clear   ",
            "R reset labels   ",
            "q quit",
        ],
    };

    let line = Line::from(hints.iter().map(|h| Span::raw(*h)).collect::<Vec<_>>());
    let paragraph = Paragraph::new(line).style(hint_style());
    f.render_widget(paragraph, area);
}
