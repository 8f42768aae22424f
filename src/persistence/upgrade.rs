//! Version-tolerant decoding of persisted board state.
//!
//! Older data stored each task as a plain string, and later shapes gained
//! fields one at a time. Every load runs the same upgrade: each entry is
//! normalized into a full [`Task`] with fixed defaults for anything missing.
//! Running it on already-upgraded data is a no-op.

use crate::domain::{QuadrantId, Task, TimeRecord};
use anyhow::{Context, Result};
use serde_json::{Map, Value};

/// Default values for fields missing from a stored task
pub const DEFAULT_PROGRESS: u8 = 0;
pub const DEFAULT_DAYS_TO_DDL: u32 = 1;

/// Latest representable instant in ms (the JavaScript `Date` limit)
pub const MAX_TIMESTAMP_MS: f64 = 8.64e15;

/// Decode the quadrant -> task list document.
///
/// Quadrants missing from the document come back empty. Entries that are
/// neither strings nor objects, or have no text, are dropped.
pub fn upgrade_tasks(json: &str, now: i64) -> Result<[Vec<Task>; 4]> {
    let value: Value = serde_json::from_str(json).context("Stored tasks are not valid JSON")?;
    let map = value
        .as_object()
        .context("Stored tasks are not a quadrant map")?;

    let mut tasks: [Vec<Task>; 4] = Default::default();

    for (key, entries) in map {
        let Some(q) = QuadrantId::from_key(key) else {
            log::warn!("Ignoring unknown quadrant key {:?} in stored tasks", key);
            continue;
        };
        let Some(entries) = entries.as_array() else {
            log::warn!("Stored tasks for {} are not a list, using an empty one", key);
            continue;
        };

        for entry in entries {
            match upgrade_task(entry, now) {
                Some(task) => tasks[q.index()].push(task),
                None => log::warn!("Dropping unreadable task entry in {}: {}", key, entry),
            }
        }
    }

    Ok(tasks)
}

/// Decode the quadrant -> label document. Missing or blank labels get their default.
pub fn upgrade_labels(json: &str) -> Result<[String; 4]> {
    let value: Value = serde_json::from_str(json).context("Stored labels are not valid JSON")?;
    let map = value
        .as_object()
        .context("Stored labels are not a quadrant map")?;

    Ok((*QuadrantId::all()).map(|q| {
        map.get(q.key())
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(q.default_label())
            .to_string()
    }))
}

/// Upgrade a single stored task entry
pub fn upgrade_task(entry: &Value, now: i64) -> Option<Task> {
    match entry {
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            Some(Task::new(text.to_string(), now))
        }
        Value::Object(fields) => upgrade_task_object(fields, now),
        _ => None,
    }
}

fn upgrade_task_object(fields: &Map<String, Value>, now: i64) -> Option<Task> {
    let text = fields.get("text")?.as_str()?.trim();
    if text.is_empty() {
        return None;
    }

    let mut task = Task::new(text.to_string(), now);

    task.progress = fields
        .get("progress")
        .and_then(number)
        .map(|p| p.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(DEFAULT_PROGRESS);

    if let Some(created_at) = fields.get("createdAt").and_then(number) {
        match timestamp(created_at) {
            Some(ms) => task.created_at = ms,
            None => log::warn!("Ignoring out-of-range createdAt {} for {:?}", created_at, text),
        }
    }

    task.days_to_ddl = fields
        .get("daysToDDL")
        .and_then(number)
        .filter(|d| *d >= 1.0)
        .map(|d| d.min(u32::MAX as f64) as u32)
        .unwrap_or(DEFAULT_DAYS_TO_DDL);

    task.ddl_date = fields
        .get("ddlDate")
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    task.time_records = fields
        .get("timeRecords")
        .and_then(Value::as_array)
        .map(|records| normalize_records(records.iter().filter_map(upgrade_record).collect()))
        .unwrap_or_default();

    Some(task)
}

/// Accept JSON numbers and numeric strings (form inputs were stored raw)
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Epoch milliseconds within 0..=MAX_TIMESTAMP_MS
fn timestamp(ms: f64) -> Option<i64> {
    (0.0..=MAX_TIMESTAMP_MS).contains(&ms).then_some(ms as i64)
}

fn upgrade_record(value: &Value) -> Option<TimeRecord> {
    let raw_start = value.get("start").and_then(number)?;
    let Some(start) = timestamp(raw_start) else {
        log::warn!("Dropping time record with out-of-range start {}", raw_start);
        return None;
    };

    let end = match value.get("end").and_then(number) {
        None => None,
        Some(raw_end) => match timestamp(raw_end) {
            Some(end) => Some(end.max(start)),
            None => {
                log::warn!("Dropping time record with out-of-range end {}", raw_end);
                return None;
            }
        },
    };
    Some(TimeRecord { start, end })
}

/// Only the last record may stay open; earlier open records close at their own start
fn normalize_records(mut records: Vec<TimeRecord>) -> Vec<TimeRecord> {
    let last = records.len().saturating_sub(1);
    for record in records.iter_mut().take(last) {
        if record.end.is_none() {
            record.end = Some(record.start);
        }
    }
    records
}
