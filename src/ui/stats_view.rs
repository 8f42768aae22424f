use crate::app::AppState;
use crate::domain::{format_duration, now_ms};
use crate::report::{task_totals, weekly_series, TaskTotal, WeeklySeries};
use crate::ui::layout::create_stats_layout;
use crate::ui::keybindings::render_keybindings;
use crate::ui::styles::{border_style, gauge_style, heading_style, muted_style, quadrant_color};
use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Render the stats screen: time share per task and this week's chart
pub fn render_stats_view(f: &mut Frame, app: &AppState) {
    let layout = create_stats_layout(f.size());
    let now = Local::now();

    render_keybindings(f, app, layout.keybindings_area);
    render_shares(f, app, &task_totals(&app.board, now_ms()), layout.shares_area);
    render_weekly(f, app, &weekly_series(&app.board, now), layout.weekly_area);
}

fn stats_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(true))
        .title(Span::styled(title, heading_style()))
}

fn render_shares(f: &mut Frame, app: &AppState, totals: &[TaskTotal], area: Rect) {
    let grand_total: i64 = totals.iter().map(|t| t.secs).sum();
    let block = stats_block(format!(" Time Share (total {}) ", format_duration(grand_total)));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if totals.is_empty() {
        let empty = Paragraph::new(" No focus time tracked yet.").style(muted_style());
        f.render_widget(empty, inner);
        return;
    }

    let visible = totals.len().min(usize::from(inner.height));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(1); visible])
        .split(inner);

    for (total, row) in totals.iter().zip(rows.iter()) {
        let gauge = Gauge::default()
            .gauge_style(gauge_style().fg(quadrant_color(total.quadrant)))
            .ratio(total.share.clamp(0.0, 1.0))
            .label(format!(
                "{} [{}] {} ({:.1}%)",
                total.text,
                app.board.label(total.quadrant),
                format_duration(total.secs),
                total.share * 100.0
            ));
        f.render_widget(gauge, *row);
    }
}

/// Colors cycled across the tasks of the weekly chart
const SERIES_COLORS: [Color; 8] = [
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
    Color::LightRed,
    Color::LightGreen,
];

fn series_color(index: usize) -> Color {
    SERIES_COLORS[index % SERIES_COLORS.len()]
}

/// Split one day's stacked column into per-task segment heights.
/// Cumulative rounding keeps the stack height proportional to the day total.
fn stack_heights(per_task: &[i64], max_total: i64, height: u16) -> Vec<u16> {
    if max_total <= 0 {
        return vec![0; per_task.len()];
    }
    let scale = |secs: i64| ((secs as f64 / max_total as f64) * f64::from(height)).round() as u16;

    let mut heights = Vec::with_capacity(per_task.len());
    let mut cumulative = 0;
    let mut drawn = 0;
    for secs in per_task {
        cumulative += (*secs).max(0);
        let top = scale(cumulative).min(height);
        heights.push(top - drawn);
        drawn = top;
    }
    heights
}

fn render_weekly(f: &mut Frame, app: &AppState, weekly: &WeeklySeries, area: Rect) {
    let block = stats_block(format!(
        " Week of {} ({} minutes) ",
        weekly.week_start,
        weekly.total() / 60
    ));

    if weekly.series.is_empty() {
        let empty = Paragraph::new(Line::styled(" No focus sessions recorded this week.", muted_style()))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height < 2 || inner.width < 14 {
        return;
    }

    // Bottom row holds the day labels, the rest is the stacked columns
    let chart_height = inner.height - 1;
    let label_y = inner.y + chart_height;
    let column_width = inner.width / 7;
    let bar_width = column_width.saturating_sub(2).max(1);
    let day_totals = weekly.day_totals();
    let max_total = day_totals.iter().copied().max().unwrap_or(0);

    let buf = f.buffer_mut();
    for (day_index, day) in weekly.days().iter().enumerate() {
        let x0 = inner.x + day_index as u16 * column_width;

        let per_task: Vec<i64> = weekly.series.iter().map(|s| s.per_day[day_index]).collect();
        let mut y = label_y;
        for (series_index, segment) in stack_heights(&per_task, max_total, chart_height).iter().enumerate() {
            let style = Style::default().fg(series_color(series_index));
            for _ in 0..*segment {
                y -= 1;
                for x in x0 + 1..x0 + 1 + bar_width {
                    buf.get_mut(x, y).set_symbol("█").set_style(style);
                }
            }
        }

        let label = format!("{} {}m", day.format("%a"), day_totals[day_index] / 60);
        buf.set_stringn(x0 + 1, label_y, label, usize::from(column_width.saturating_sub(1)), muted_style());
    }

    // Legend in the bottom border row
    let legend: Vec<Span> = weekly
        .series
        .iter()
        .enumerate()
        .flat_map(|(i, s)| {
            [
                Span::styled("■ ", Style::default().fg(series_color(i))),
                Span::raw(format!("{} ({})  ", s.text, app.board.label(s.quadrant))),
            ]
        })
        .collect();
    let legend_area = Rect::new(area.x + 1, area.y + area.height - 1, area.width.saturating_sub(2), 1);
    f.render_widget(Paragraph::new(Line::from(legend)), legend_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_heights_proportional() {
        // Busiest day fills the column
        assert_eq!(stack_heights(&[1800, 1800], 3600, 10), vec![5, 5]);
        // Half as busy: half the height, split by task
        assert_eq!(stack_heights(&[900, 0, 900], 3600, 10), vec![3, 0, 2]);
        assert_eq!(stack_heights(&[0, 0], 3600, 10), vec![0, 0]);
    }

    #[test]
    fn test_stack_heights_empty_week() {
        assert_eq!(stack_heights(&[0, 0], 0, 10), vec![0, 0]);
    }

    #[test]
    fn test_render_weekly_stacks_columns() {
        use crate::domain::{Board, QuadrantId};
        use crate::persistence::{Config, MemoryStorage};
        use crate::report::stats::TaskSeries;
        use chrono::NaiveDate;
        use ratatui::{backend::TestBackend, Terminal};

        let app = AppState::new(Board::default(), Box::new(MemoryStorage::new()), Config::default());
        let weekly = WeeklySeries {
            week_start: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            series: vec![
                TaskSeries { quadrant: QuadrantId::Q1, text: "Report".to_string(), per_day: [0, 3600, 0, 0, 0, 0, 0] },
                TaskSeries { quadrant: QuadrantId::Q2, text: "Gym".to_string(), per_day: [0, 3600, 1800, 0, 0, 0, 0] },
            ],
        };

        let mut terminal = Terminal::new(TestBackend::new(70, 12)).unwrap();
        terminal.draw(|f| render_weekly(f, &app, &weekly, f.size())).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Mon 120m"));
        assert!(text.contains("Report"));

        // Monday column: both tasks stacked in their own colors
        let column: Vec<Color> = (1..11).map(|y| buffer.get(11, y).fg).collect();
        assert!(column.contains(&series_color(0)));
        assert!(column.contains(&series_color(1)));
    }

    #[test]
    fn test_series_colors_cycle() {
        assert_eq!(series_color(0), Color::Red);
        assert_eq!(series_color(8), Color::Red);
    }
}
