use super::storage::Storage;
use super::upgrade::{upgrade_labels, upgrade_tasks};
use crate::domain::{Board, QuadrantId, Task};
use anyhow::{Context, Result};
use std::collections::BTreeMap;

/// Storage key for the quadrant -> task list document
pub const TASKS_KEY: &str = "quadrant-tasks";
/// Storage key for the quadrant -> label document
pub const LABELS_KEY: &str = "quadrant-labels";

/// Serialize the task lists as `{"q1": [...], ...}`
pub fn encode_tasks(board: &Board) -> Result<String> {
    let map: BTreeMap<QuadrantId, &[Task]> = QuadrantId::all()
        .iter()
        .map(|q| (*q, board.tasks(*q)))
        .collect();
    serde_json::to_string(&map).context("Failed to serialize tasks")
}

/// Serialize the labels as `{"q1": "...", ...}`
pub fn encode_labels(board: &Board) -> Result<String> {
    let map: BTreeMap<QuadrantId, &str> = QuadrantId::all()
        .iter()
        .map(|q| (*q, board.label(*q)))
        .collect();
    serde_json::to_string(&map).context("Failed to serialize labels")
}

/// Write both documents
pub fn save_board(storage: &dyn Storage, board: &Board) -> Result<()> {
    storage
        .set(TASKS_KEY, &encode_tasks(board)?)
        .with_context(|| format!("Failed to store {}", TASKS_KEY))?;
    storage
        .set(LABELS_KEY, &encode_labels(board)?)
        .with_context(|| format!("Failed to store {}", LABELS_KEY))?;
    Ok(())
}

/// Load the board, falling back per document to the default state.
///
/// Never fails: unreadable or missing documents are logged and replaced by
/// four empty quadrants or the default labels.
pub fn load_board(storage: &dyn Storage, now: i64) -> Board {
    let tasks = match read_document(storage, TASKS_KEY) {
        Some(json) => upgrade_tasks(&json, now).unwrap_or_else(|e| {
            log::warn!("Could not read stored tasks, starting empty: {:#}", e);
            Default::default()
        }),
        None => Default::default(),
    };

    let labels = match read_document(storage, LABELS_KEY) {
        Some(json) => upgrade_labels(&json).unwrap_or_else(|e| {
            log::warn!("Could not read stored labels, using defaults: {:#}", e);
            Board::default_labels()
        }),
        None => Board::default_labels(),
    };

    let board = Board::new(tasks, labels);
    log::debug!("Loaded {} tasks", board.total_tasks());
    board
}

fn read_document(storage: &dyn Storage, key: &str) -> Option<String> {
    match storage.get(key) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Could not read {}: {:#}", key, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimeRecord;
    use crate::persistence::storage::{FileStorage, MemoryStorage};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_empty_storage() {
        let storage = MemoryStorage::new();
        let board = load_board(&storage, 0);
        assert_eq!(board.total_tasks(), 0);
        assert_eq!(board.labels(), &Board::default_labels());
    }

    #[test]
    fn test_load_corrupt_storage_falls_back() {
        let storage = MemoryStorage::new();
        storage.set(TASKS_KEY, "{not json").unwrap();
        storage.set(LABELS_KEY, "[]").unwrap();

        let board = load_board(&storage, 0);
        assert_eq!(board.total_tasks(), 0);
        assert_eq!(board.labels(), &Board::default_labels());
    }

    #[test]
    fn test_roundtrip_preserves_tasks() {
        let storage = MemoryStorage::new();
        let mut board = Board::default();
        board.add_task(QuadrantId::Q1, "Write report", 1_000);
        board.add_task(QuadrantId::Q3, "Reply to email", 2_000);
        board.set_progress(QuadrantId::Q1, 0, 35).unwrap();
        board.set_deadline_date(QuadrantId::Q1, 0, "2024-06-30").unwrap();
        board.set_deadline_days(QuadrantId::Q3, 0, 4).unwrap();
        board.start_timer(QuadrantId::Q1, 0, 5_000).unwrap();
        board.close_timer(QuadrantId::Q1, 0, 35_000).unwrap();
        board.start_timer(QuadrantId::Q3, 0, 40_000).unwrap();

        save_board(&storage, &board).unwrap();
        let loaded = load_board(&storage, 99_000);

        for q in QuadrantId::all() {
            let before = board.tasks(*q);
            let after = loaded.tasks(*q);
            assert_eq!(before.len(), after.len());
            for (a, b) in before.iter().zip(after) {
                assert_eq!(a.text, b.text);
                assert_eq!(a.progress, b.progress);
                assert_eq!(a.created_at, b.created_at);
                assert_eq!(a.days_to_ddl, b.days_to_ddl);
                assert_eq!(a.ddl_date, b.ddl_date);
                assert_eq!(a.time_records, b.time_records);
            }
        }
        assert_eq!(
            loaded.task(QuadrantId::Q3, 0).unwrap().time_records,
            vec![TimeRecord::open(40_000)]
        );
    }

    #[test]
    fn test_label_survives_reload() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        let mut board = Board::default();
        board.set_label(QuadrantId::Q2, "Someday");
        save_board(&storage, &board).unwrap();

        let reloaded = load_board(&FileStorage::new(temp_dir.path()), 0);
        assert_eq!(reloaded.label(QuadrantId::Q2), "Someday");
        assert_eq!(reloaded.label(QuadrantId::Q1), "重要且紧急");
    }

    #[test]
    fn test_encoded_shape() {
        let mut board = Board::default();
        board.add_task(QuadrantId::Q4, "Tidy", 10);
        let json: serde_json::Value = serde_json::from_str(&encode_tasks(&board).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "q1": [], "q2": [], "q3": [],
                "q4": [{
                    "text": "Tidy",
                    "progress": 0,
                    "createdAt": 10,
                    "daysToDDL": 1,
                    "ddlDate": "",
                    "timeRecords": []
                }]
            })
        );
    }
}
