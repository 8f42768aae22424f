use crate::app::AppState;
use crate::domain::UiMode;
use crate::ui::{
    layout::create_modal_area,
    styles::{modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the single-line prompt for a new task or a quadrant label
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    let (title_text, field_label) = match app.ui_mode {
        UiMode::AddingTask => (" Add Task ", "Task:"),
        UiMode::EditingLabel => (" Rename Quadrant ", "Label:"),
        _ => return,
    };
    let modal_area = create_modal_area(area, 8);

    // Clear the area behind the form
    f.render_widget(Clear, modal_area);

    let quadrant = app.selected_quadrant;
    let lines = vec![
        Line::raw(""),
        Line::raw(format!("  {} {}", app.board.label(quadrant), field_label)),
        Line::from(vec![
            Span::raw("  > "),
            Span::styled(app.input_buffer.as_str(), modal_title_style()),
            Span::styled("█", modal_title_style()), // Cursor
        ]),
        Line::raw(""),
        Line::raw("  Enter to submit  ·  Esc to cancel"),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title_text, modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}
