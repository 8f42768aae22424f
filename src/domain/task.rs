use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Milliseconds in one day
pub const DAY_MS: i64 = 86_400_000;

/// Current wall-clock time in milliseconds since the epoch
pub fn now_ms() -> i64 {
    Local::now().timestamp_millis()
}

/// Convert milliseconds since the epoch to local time
pub fn local_time(ms: i64) -> Option<DateTime<Local>> {
    Local.timestamp_millis_opt(ms).single()
}

/// One contiguous focus session. `end` is absent while the session is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRecord {
    pub start: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
}

impl TimeRecord {
    pub fn open(start: i64) -> Self {
        Self { start, end: None }
    }

    pub fn closed(start: i64, end: i64) -> Self {
        Self { start, end: Some(end) }
    }

    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Whole seconds covered by this record; open records count up to `now`
    pub fn duration_secs(&self, now: i64) -> i64 {
        let end = self.end.unwrap_or(now);
        (end.saturating_sub(self.start) / 1000).max(0)
    }
}

/// A task inside one quadrant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Addresses the task from modals (not persisted)
    #[serde(skip, default = "Uuid::new_v4")]
    pub id: Uuid,
    pub text: String,
    /// Always within 0..=100
    pub progress: u8,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
    #[serde(rename = "daysToDDL")]
    pub days_to_ddl: u32,
    /// ISO date (YYYY-MM-DD) or empty
    #[serde(rename = "ddlDate")]
    pub ddl_date: String,
    #[serde(rename = "timeRecords")]
    pub time_records: Vec<TimeRecord>,
}

impl Task {
    pub fn new(text: String, created_at: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            progress: 0,
            created_at,
            days_to_ddl: 1,
            ddl_date: String::new(),
            time_records: Vec::new(),
        }
    }

    /// Set progress from any raw control value, clamped into 0..=100
    pub fn set_progress(&mut self, raw: i64) {
        self.progress = raw.clamp(0, 100) as u8;
    }

    /// Use a day-count deadline (clears any date deadline)
    pub fn set_days_to_ddl(&mut self, days: u32) {
        self.days_to_ddl = days.max(1);
        self.ddl_date.clear();
    }

    /// Use a calendar-date deadline (resets the day-count to its default)
    pub fn set_ddl_date(&mut self, date: &str) {
        self.ddl_date = date.trim().to_string();
        self.days_to_ddl = 1;
    }

    /// The currently open session, if any
    pub fn open_record(&self) -> Option<&TimeRecord> {
        self.time_records.last().filter(|r| r.is_open())
    }

    pub fn is_running(&self) -> bool {
        self.open_record().is_some()
    }

    /// Append a new open record. Returns false if a session is already open.
    pub fn start_session(&mut self, now: i64) -> bool {
        if self.is_running() {
            return false;
        }
        self.time_records.push(TimeRecord::open(now));
        true
    }

    /// Close the open session, if any. Pause and stop both end up here.
    pub fn close_session(&mut self, now: i64) -> bool {
        match self.time_records.last_mut() {
            Some(record) if record.is_open() => {
                record.end = Some(now.max(record.start));
                true
            }
            _ => false,
        }
    }

    /// Seconds from closed records only
    pub fn closed_secs(&self) -> i64 {
        self.time_records
            .iter()
            .filter(|r| !r.is_open())
            .map(|r| r.duration_secs(0))
            .sum()
    }

    /// Seconds of the open session up to `now` (0 if none)
    pub fn live_secs(&self, now: i64) -> i64 {
        self.open_record().map(|r| r.duration_secs(now)).unwrap_or(0)
    }

    /// Total focus time in whole seconds, including a running session
    pub fn elapsed_secs(&self, now: i64) -> i64 {
        self.closed_secs() + self.live_secs(now)
    }

    /// Focus seconds as they stood at `at`: sessions starting later are
    /// ignored and a session spanning `at` is cut off there
    pub fn secs_until(&self, at: i64) -> i64 {
        self.time_records
            .iter()
            .filter(|r| r.start <= at)
            .map(|r| TimeRecord::closed(r.start, r.end.map_or(at, |end| end.min(at))).duration_secs(at))
            .sum()
    }

    /// Number of recorded sessions (open one included)
    pub fn session_count(&self) -> usize {
        self.time_records.len()
    }
}

/// Format seconds as "HH:MM:SS" for the live timer display
pub fn format_clock(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Format seconds as "Xh Ym" (omits 0 values), or "Xs" below a minute
pub fn format_duration(secs: i64) -> String {
    let total_minutes = secs.max(0) / 60;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 && minutes > 0 {
        format!("{}h {}m", hours, minutes)
    } else if hours > 0 {
        format!("{}h", hours)
    } else if minutes > 0 {
        format!("{}m", minutes)
    } else {
        format!("{}s", secs.max(0))
    }
}
