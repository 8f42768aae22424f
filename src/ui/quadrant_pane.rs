use crate::app::AppState;
use crate::domain::{deadline_status, format_duration, ring_glyph, DeadlineStatus, QuadrantId, Task};
use crate::ui::styles::{
    border_style, default_style, muted_style, overdue_style, running_style, selected_style, title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

const BAR_WIDTH: usize = 10;

/// Text progress bar, e.g. `▓▓▓▓░░░░░░ 40%`
fn progress_bar(progress: u8) -> String {
    let filled = usize::from(progress.min(100)) * BAR_WIDTH / 100;
    format!(
        "{}{} {:>3}%",
        "▓".repeat(filled),
        "░".repeat(BAR_WIDTH - filled),
        progress
    )
}

/// Short countdown text next to the ring
fn deadline_label(status: &DeadlineStatus) -> String {
    if status.overdue {
        "overdue".to_string()
    } else {
        format!("{}d left", status.days_left())
    }
}

/// Render one quadrant of the matrix
pub fn render_quadrant_pane(f: &mut Frame, app: &AppState, q: QuadrantId, area: Rect) {
    let now = crate::domain::now_ms();
    let focused = app.selected_quadrant == q;
    let selected = app.selected_index[q.index()];

    let items: Vec<ListItem> = app
        .board
        .tasks(q)
        .iter()
        .enumerate()
        .map(|(idx, task)| {
            let line = create_task_line(task, now, app.config.use_emoji);
            let style = if focused && idx == selected {
                selected_style()
            } else {
                default_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let title = format!(" {} {} ({}) ", q.index() + 1, app.board.label(q), app.board.tasks(q).len());

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(focused))
            .title(Span::styled(title, title_style(q, focused))),
    );

    let mut state = ListState::default();
    if focused && !app.board.tasks(q).is_empty() {
        state.select(Some(selected));
    }
    f.render_stateful_widget(list, area, &mut state);
}

/// Format: [◔] Write proposal  ▓▓▓▓░░░░░░  40%  ⏱ 1h 5m (RUNNING)  3d left
fn create_task_line(task: &Task, now: i64, use_emoji: bool) -> Line<'static> {
    let status = deadline_status(task, now);
    let mut spans = Vec::new();

    spans.push(Span::raw(format!("[{}] ", ring_glyph(status.percent, use_emoji))));
    spans.push(Span::raw(task.text.clone()));
    spans.push(Span::raw("  ".to_string()));
    spans.push(Span::styled(progress_bar(task.progress), muted_style()));

    let elapsed = task.elapsed_secs(now);
    if elapsed > 0 || task.is_running() {
        spans.push(Span::raw(format!("  ⏱ {}", format_duration(elapsed))));
    }
    if task.is_running() {
        spans.push(Span::styled(" (RUNNING)".to_string(), running_style()));
    }

    let deadline_style = if status.overdue { overdue_style() } else { muted_style() };
    spans.push(Span::styled(format!("  {}", deadline_label(&status)), deadline_style));

    Line::from(spans)
}
