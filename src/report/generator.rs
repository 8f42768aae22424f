use crate::domain::{deadline_status, format_duration, Board, QuadrantId};
use crate::persistence::atomic_write;
use crate::report::stats::{quadrant_totals, task_totals, tasks_as_of, weekly_series};
use anyhow::Result;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Format a fraction as a percentage with 1 decimal place
fn format_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Render the markdown stats report for the board as seen at `now`.
/// Tasks created and sessions started after `now` are left out.
pub fn render_report(board: &Board, now: DateTime<Local>) -> String {
    let now_ms = now.timestamp_millis();
    let totals = task_totals(board, now_ms);
    let by_quadrant = quadrant_totals(board, now_ms);
    let weekly = weekly_series(board, now);
    let grand_total: i64 = by_quadrant.iter().sum();

    let mut report = String::new();

    report.push_str(&format!("# Focus Stats - {}\n\n", now.date_naive()));

    // Summary
    report.push_str("## Summary\n\n");
    report.push_str(&format!("- **Total Tasks:** {}\n", tasks_as_of(board, now_ms).count()));
    report.push_str(&format!("- **Total Focus Time:** {}\n", format_duration(grand_total)));

    let overdue = tasks_as_of(board, now_ms)
        .filter(|(_, _, t)| deadline_status(t, now_ms).overdue)
        .count();
    report.push_str(&format!("- **Past Deadline:** {}\n", overdue));

    if let Some((q, i)) = board.open_session() {
        if let Some(task) = board.task(q, i).filter(|t| t.open_record().is_some_and(|r| r.start <= now_ms)) {
            report.push_str(&format!(
                "- **Running:** {} ({} so far)\n",
                task.text,
                format_duration(task.live_secs(now_ms))
            ));
        }
    }
    report.push('\n');

    // Quadrants
    report.push_str("## Quadrants\n\n");
    report.push_str("| Quadrant | Tasks | Avg Progress | Focus Time |\n");
    report.push_str("|---|---|---|---|\n");
    for q in QuadrantId::all() {
        let tasks: Vec<_> = board.tasks(*q).iter().filter(|t| t.created_at <= now_ms).collect();
        let avg_progress = if tasks.is_empty() {
            0
        } else {
            tasks.iter().map(|t| u32::from(t.progress)).sum::<u32>() / tasks.len() as u32
        };
        report.push_str(&format!(
            "| {} | {} | {}% | {} |\n",
            board.label(*q),
            tasks.len(),
            avg_progress,
            format_duration(by_quadrant[q.index()])
        ));
    }
    report.push('\n');

    // Time by task
    if !totals.is_empty() {
        report.push_str("## Time by Task\n\n");
        for total in &totals {
            report.push_str(&format!(
                "- {} [{}]: {} ({})\n",
                total.text,
                board.label(total.quadrant),
                format_duration(total.secs),
                format_percent(total.share)
            ));
        }
        report.push('\n');
    }

    // This week
    report.push_str(&format!("## Week of {}\n\n", weekly.week_start));
    if weekly.series.is_empty() {
        report.push_str("No focus sessions recorded this week.\n");
    } else {
        let days = weekly.days();
        report.push_str("| Task |");
        for day in &days {
            report.push_str(&format!(" {} |", day.format("%a %d")));
        }
        report.push_str(" Total |\n|---|");
        report.push_str(&"---|".repeat(days.len() + 1));
        report.push('\n');

        for series in &weekly.series {
            report.push_str(&format!("| {} |", series.text));
            for secs in &series.per_day {
                report.push_str(&format!(" {} |", format_cell(*secs)));
            }
            report.push_str(&format!(" {} |\n", format_duration(series.total())));
        }

        report.push_str("| **Total** |");
        for secs in &weekly.day_totals() {
            report.push_str(&format!(" {} |", format_cell(*secs)));
        }
        report.push_str(&format!(" {} |\n", format_duration(weekly.total())));
    }

    report
}

fn format_cell(secs: i64) -> String {
    if secs == 0 {
        "-".to_string()
    } else {
        format_duration(secs)
    }
}

/// Write the stats report to `output`
pub fn generate_report(board: &Board, now: DateTime<Local>, output: &Path) -> Result<PathBuf> {
    let report = render_report(board, now);
    atomic_write(output, &report)?;
    log::info!("Wrote stats report to {}", output.display());
    Ok(output.to_path_buf())
}
