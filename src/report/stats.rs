use crate::domain::task::local_time;
use crate::domain::{Board, QuadrantId, Task, TimeRecord};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate};

/// Focus time of one task, for the share-of-total breakdown
#[derive(Debug, Clone, PartialEq)]
pub struct TaskTotal {
    pub quadrant: QuadrantId,
    pub text: String,
    pub secs: i64,
    /// Fraction of all tracked time (0.0..=1.0)
    pub share: f64,
}

/// One task's per-day seconds across the current week
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSeries {
    pub quadrant: QuadrantId,
    pub text: String,
    /// Index 0 is Sunday
    pub per_day: [i64; 7],
}

impl TaskSeries {
    pub fn total(&self) -> i64 {
        self.per_day.iter().sum()
    }
}

/// Weekly chart data: a Sunday-anchored 7-day window
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklySeries {
    pub week_start: NaiveDate,
    pub series: Vec<TaskSeries>,
}

impl WeeklySeries {
    /// The seven dates of the window, Sunday first
    pub fn days(&self) -> [NaiveDate; 7] {
        std::array::from_fn(|i| self.week_start + Duration::days(i as i64))
    }

    /// Seconds per day summed over all tasks
    pub fn day_totals(&self) -> [i64; 7] {
        let mut totals = [0; 7];
        for s in &self.series {
            for (total, secs) in totals.iter_mut().zip(s.per_day.iter()) {
                *total += secs;
            }
        }
        totals
    }

    pub fn total(&self) -> i64 {
        self.series.iter().map(TaskSeries::total).sum()
    }
}

/// Tasks that existed at `now`
pub fn tasks_as_of(board: &Board, now: i64) -> impl Iterator<Item = (QuadrantId, usize, &Task)> {
    board.iter().filter(move |(_, _, task)| task.created_at <= now)
}

/// Per-task totals as of `now` (a running session counts up to `now`),
/// biggest first, zero-time tasks omitted
pub fn task_totals(board: &Board, now: i64) -> Vec<TaskTotal> {
    let mut totals: Vec<TaskTotal> = tasks_as_of(board, now)
        .map(|(q, _, task)| TaskTotal {
            quadrant: q,
            text: task.text.clone(),
            secs: task.secs_until(now),
            share: 0.0,
        })
        .filter(|t| t.secs > 0)
        .collect();

    let grand_total: i64 = totals.iter().map(|t| t.secs).sum();
    if grand_total > 0 {
        for t in &mut totals {
            t.share = t.secs as f64 / grand_total as f64;
        }
    }

    totals.sort_by(|a, b| b.secs.cmp(&a.secs));
    totals
}

/// Focus seconds per quadrant as of `now`
pub fn quadrant_totals(board: &Board, now: i64) -> [i64; 4] {
    let mut totals = [0; 4];
    for (q, _, task) in tasks_as_of(board, now) {
        totals[q.index()] += task.secs_until(now);
    }
    totals
}

/// Most recent Sunday (today if today is Sunday)
pub fn week_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(i64::from(today.weekday().num_days_from_sunday()))
}

/// Bucket closed records by the local day their start falls on, within the
/// week containing `now`. Records starting after `now` are ignored and one
/// ending after it is cut there. Tasks with no time this week are left out.
pub fn weekly_series(board: &Board, now: DateTime<Local>) -> WeeklySeries {
    let week_start = week_start(now.date_naive());
    let now_ms = now.timestamp_millis();

    let series = tasks_as_of(board, now_ms)
        .filter_map(|(q, _, task)| {
            let mut per_day = [0; 7];
            for record in task.time_records.iter().filter(|r| !r.is_open() && r.start <= now_ms) {
                let Some(started) = local_time(record.start) else {
                    continue;
                };
                let offset = (started.date_naive() - week_start).num_days();
                if (0..7).contains(&offset) {
                    let end = record.end.unwrap_or(record.start).min(now_ms);
                    per_day[offset as usize] += TimeRecord::closed(record.start, end).duration_secs(end);
                }
            }

            let series = TaskSeries {
                quadrant: q,
                text: task.text.clone(),
                per_day,
            };
            (series.total() > 0).then_some(series)
        })
        .collect();

    WeeklySeries { week_start, series }
}
