use crate::app::AppState;
use crate::domain::{format_clock, format_duration, now_ms, UiMode};
use crate::ui::{
    layout::create_modal_area,
    styles::{error_style, modal_bg_style, modal_title_style, running_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn modal_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title, modal_title_style()))
        .style(modal_bg_style())
}

/// Render the focus timer modal
pub fn render_timer_modal(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(task) = app.timer_task() else {
        return;
    };
    let modal_area = create_modal_area(area, 12);

    // Clear the area behind the modal
    f.render_widget(Clear, modal_area);

    let running = task.is_running();
    let mut lines = Vec::new();

    lines.push(Line::raw(""));
    lines.push(Line::raw(format!("  {}", task.text)));
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(format_clock(app.live_elapsed), modal_title_style()),
        if running {
            Span::styled("  (RUNNING)", running_style())
        } else {
            Span::raw("  (paused)")
        },
    ]));
    lines.push(Line::raw(format!(
        "  {} sessions, {} tracked",
        task.session_count(),
        format_duration(task.elapsed_secs(now_ms()))
    )));
    lines.push(Line::raw(""));

    // Options
    lines.push(Line::from(vec![
        Span::styled("  [s]", modal_title_style()),
        Span::raw(" Start  "),
        Span::styled("[p]", modal_title_style()),
        Span::raw(" Pause  "),
        Span::styled("[x]", modal_title_style()),
        Span::raw(" Stop  "),
    ]));
    lines.push(Line::from(vec![
        Span::styled("  [Esc]", modal_title_style()),
        Span::raw(" Hide (keeps running)"),
    ]));

    let paragraph = Paragraph::new(lines)
        .block(modal_block(" ⏱ Focus Timer "))
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}

/// Render the yes/no confirmation for board-wide actions
pub fn render_confirm_modal(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(action) = app.confirm else {
        return;
    };
    let modal_area = create_modal_area(area, 7);
    f.render_widget(Clear, modal_area);

    let lines = vec![
        Line::raw(""),
        Line::raw(format!("  {}", action.prompt())),
        Line::raw(""),
        Line::from(vec![
            Span::styled("  [y]", modal_title_style()),
            Span::raw(" Yes  "),
            Span::styled("[n]", modal_title_style()),
            Span::raw(" No"),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(modal_block(" Confirm "))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, modal_area);
}

/// Render the deadline form
pub fn render_deadline_modal(f: &mut Frame, app: &AppState, area: Rect) {
    if app.ui_mode != UiMode::EditingDeadline {
        return;
    }
    let Some(form) = &app.deadline_form else {
        return;
    };
    let modal_area = create_modal_area(area, 9);
    f.render_widget(Clear, modal_area);

    let mut lines = vec![
        Line::raw(""),
        Line::raw("  Days from creation, or a date (YYYY-MM-DD):"),
        Line::from(vec![
            Span::raw("  > "),
            Span::styled(form.input.as_str(), modal_title_style()),
            Span::styled("█", modal_title_style()), // Cursor
        ]),
        Line::raw(""),
    ];
    match &form.error {
        Some(error) => lines.push(Line::styled(format!("  {}", error), error_style())),
        None => lines.push(Line::raw("  Enter to save  ·  Esc to cancel")),
    }

    let paragraph = Paragraph::new(lines)
        .block(modal_block(" Deadline "))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, modal_area);
}
