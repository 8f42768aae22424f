use super::task::{Task, DAY_MS};
use chrono::{Local, NaiveDate, TimeZone};

/// Derived deadline countdown for a task
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeadlineStatus {
    pub days_passed: i64,
    pub days_total: i64,
    /// Fraction of the deadline window used up, within 0.0..=1.0
    pub percent: f64,
    /// `now` is past the deadline instant (end of the last allowed day)
    pub overdue: bool,
}

impl DeadlineStatus {
    /// Days remaining before the deadline (0 once reached)
    pub fn days_left(&self) -> i64 {
        (self.days_total - self.days_passed).max(0)
    }
}

/// Parse an ISO date into the deadline instant (23:59:59 local on that day)
pub fn deadline_ms_for_date(date: &str) -> Option<i64> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    let end_of_day = date.and_hms_opt(23, 59, 59)?;
    Local
        .from_local_datetime(&end_of_day)
        .earliest()
        .map(|dt| dt.timestamp_millis())
}

/// Whole days between two instants, rounded up
fn ceil_days(from: i64, to: i64) -> i64 {
    (to.saturating_sub(from) as f64 / DAY_MS as f64).ceil() as i64
}

/// Compute the countdown for `task` as seen at `now` (ms since epoch).
///
/// A date deadline wins over the day-count. An unparseable date degrades to a
/// one-day window, which reads as fully elapsed.
pub fn deadline_status(task: &Task, now: i64) -> DeadlineStatus {
    let days_passed = ceil_days(task.created_at, now).max(1);

    let (days_total, deadline_ms) = if !task.ddl_date.trim().is_empty() {
        match deadline_ms_for_date(&task.ddl_date) {
            Some(deadline) => (ceil_days(task.created_at, deadline).max(1), Some(deadline)),
            None => (1, None),
        }
    } else {
        let days = i64::from(task.days_to_ddl.max(1));
        (days, Some(task.created_at.saturating_add(days.saturating_mul(DAY_MS))))
    };

    let percent = (days_passed as f64 / days_total as f64).min(1.0);
    let overdue = deadline_ms.map(|d| now > d).unwrap_or(true);

    DeadlineStatus {
        days_passed,
        days_total,
        percent,
        overdue,
    }
}

/// Circular countdown glyph for a deadline fraction
pub fn ring_glyph(percent: f64, use_emoji: bool) -> &'static str {
    if use_emoji {
        if percent < 0.25 {
            "🕐"
        } else if percent < 0.5 {
            "🕒"
        } else if percent < 0.75 {
            "🕕"
        } else if percent < 1.0 {
            "🕘"
        } else {
            "⏰"
        }
    } else if percent < 0.25 {
        "○"
    } else if percent < 0.5 {
        "◔"
    } else if percent < 0.75 {
        "◑"
    } else if percent < 1.0 {
        "◕"
    } else {
        "●"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn local_ms(y: i32, m: u32, d: u32, h: u32) -> i64 {
        Local
            .with_ymd_and_hms(y, m, d, h, 0, 0)
            .earliest()
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn test_fresh_one_day_task_is_full() {
        let now = local_ms(2024, 3, 1, 12);
        let task = Task::new("t".to_string(), now);
        let status = deadline_status(&task, now);
        assert_eq!(status.days_passed, 1);
        assert_eq!(status.days_total, 1);
        assert_eq!(status.percent, 1.0);
    }

    #[test]
    fn test_days_to_ddl_fraction() {
        let created = local_ms(2024, 3, 1, 12);
        let mut task = Task::new("t".to_string(), created);
        task.set_days_to_ddl(4);

        let status = deadline_status(&task, created + Duration::hours(30).num_milliseconds());
        assert_eq!(status.days_passed, 2);
        assert_eq!(status.days_total, 4);
        assert_eq!(status.percent, 0.5);
        assert_eq!(status.days_left(), 2);
        assert!(!status.overdue);
    }

    #[test]
    fn test_date_deadline_halfway() {
        let created = local_ms(2024, 3, 1, 12);
        let mut task = Task::new("t".to_string(), created);
        task.set_ddl_date("2024-03-11");

        let now = created + 5 * DAY_MS;
        let status = deadline_status(&task, now);
        assert_eq!(status.days_passed, 5);
        assert!(status.days_total == 10 || status.days_total == 11);
        assert!((status.percent - 0.5).abs() < 0.1, "percent was {}", status.percent);
    }

    #[test]
    fn test_percent_never_exceeds_one() {
        let created = local_ms(2024, 3, 1, 12);
        let mut task = Task::new("t".to_string(), created);
        task.set_days_to_ddl(2);

        let status = deadline_status(&task, created + 30 * DAY_MS);
        assert_eq!(status.percent, 1.0);
        assert_eq!(status.days_left(), 0);
        assert!(status.overdue);
    }

    #[test]
    fn test_malformed_date_degrades() {
        let created = local_ms(2024, 3, 1, 12);
        let mut task = Task::new("t".to_string(), created);
        task.ddl_date = "next tuesday".to_string();

        let status = deadline_status(&task, created + DAY_MS);
        assert_eq!(status.days_total, 1);
        assert_eq!(status.percent, 1.0);
    }

    #[test]
    fn test_date_before_creation_clamps_to_one_day() {
        let created = local_ms(2024, 3, 10, 12);
        let mut task = Task::new("t".to_string(), created);
        task.set_ddl_date("2024-03-01");

        let status = deadline_status(&task, created);
        assert_eq!(status.days_total, 1);
        assert!(status.overdue);
    }

    #[test]
    fn test_deadline_is_end_of_day() {
        let deadline = deadline_ms_for_date("2024-03-11").unwrap();
        let expected = Local
            .with_ymd_and_hms(2024, 3, 11, 23, 59, 59)
            .earliest()
            .unwrap()
            .timestamp_millis();
        assert_eq!(deadline, expected);
        assert!(deadline_ms_for_date("2024-13-40").is_none());
    }

    #[test]
    fn test_extreme_created_at_does_not_overflow() {
        let mut task = Task::new("x".to_string(), i64::MAX);
        task.set_days_to_ddl(30);
        let status = deadline_status(&task, i64::MIN);
        assert_eq!(status.days_passed, 1);
        assert!(!status.overdue);
    }

    #[test]
    fn test_ring_glyph() {
        assert_eq!(ring_glyph(0.0, false), "○");
        assert_eq!(ring_glyph(0.3, false), "◔");
        assert_eq!(ring_glyph(0.6, false), "◑");
        assert_eq!(ring_glyph(0.9, false), "◕");
        assert_eq!(ring_glyph(1.0, false), "●");
        assert_eq!(ring_glyph(1.0, true), "⏰");
    }
}
