use super::enums::QuadrantId;
use super::task::Task;
use uuid::Uuid;

/// Error type for board operations
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("no task at {0:?}[{1}]")]
    TaskNotFound(QuadrantId, usize),
    #[error("a focus session is already running for \"{0}\"")]
    AlreadyRunning(String),
    #[error("another focus session is running for \"{0}\"; stop it first")]
    OtherSessionOpen(String),
}

/// The whole persisted state: four task lists plus their labels
#[derive(Debug, Clone)]
pub struct Board {
    tasks: [Vec<Task>; 4],
    labels: [String; 4],
    /// Refuse to start a session while any other task has one open
    pub single_session: bool,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            tasks: Default::default(),
            labels: Self::default_labels(),
            single_session: true,
        }
    }
}

impl Board {
    pub fn new(tasks: [Vec<Task>; 4], labels: [String; 4]) -> Self {
        Self {
            tasks,
            labels,
            single_session: true,
        }
    }

    pub fn default_labels() -> [String; 4] {
        (*QuadrantId::all()).map(|q| q.default_label().to_string())
    }

    pub fn tasks(&self, q: QuadrantId) -> &[Task] {
        &self.tasks[q.index()]
    }

    pub fn task(&self, q: QuadrantId, index: usize) -> Option<&Task> {
        self.tasks[q.index()].get(index)
    }

    fn task_mut(&mut self, q: QuadrantId, index: usize) -> Result<&mut Task, BoardError> {
        self.tasks[q.index()]
            .get_mut(index)
            .ok_or(BoardError::TaskNotFound(q, index))
    }

    pub fn label(&self, q: QuadrantId) -> &str {
        &self.labels[q.index()]
    }

    pub fn labels(&self) -> &[String; 4] {
        &self.labels
    }

    /// Iterate every task with its position
    pub fn iter(&self) -> impl Iterator<Item = (QuadrantId, usize, &Task)> {
        QuadrantId::all().iter().flat_map(move |q| {
            self.tasks[q.index()]
                .iter()
                .enumerate()
                .map(move |(i, t)| (*q, i, t))
        })
    }

    pub fn total_tasks(&self) -> usize {
        self.tasks.iter().map(Vec::len).sum()
    }

    /// Locate a task by its in-memory id
    pub fn find(&self, id: Uuid) -> Option<(QuadrantId, usize)> {
        self.iter().find(|(_, _, t)| t.id == id).map(|(q, i, _)| (q, i))
    }

    /// Add a task to the end of a quadrant. Blank text is ignored.
    pub fn add_task(&mut self, q: QuadrantId, raw_text: &str, now: i64) -> bool {
        let text = raw_text.trim();
        if text.is_empty() {
            return false;
        }
        self.tasks[q.index()].push(Task::new(text.to_string(), now));
        true
    }

    pub fn remove_task(&mut self, q: QuadrantId, index: usize) -> Result<Task, BoardError> {
        let list = &mut self.tasks[q.index()];
        if index >= list.len() {
            return Err(BoardError::TaskNotFound(q, index));
        }
        Ok(list.remove(index))
    }

    /// Empty every quadrant; labels are kept
    pub fn clear_all(&mut self) {
        for list in &mut self.tasks {
            list.clear();
        }
    }

    /// Rename a quadrant. Blank input leaves the old label in place.
    pub fn set_label(&mut self, q: QuadrantId, raw: &str) -> bool {
        let label = raw.trim();
        if label.is_empty() {
            return false;
        }
        self.labels[q.index()] = label.to_string();
        true
    }

    pub fn reset_labels(&mut self) {
        self.labels = Self::default_labels();
    }

    pub fn set_progress(&mut self, q: QuadrantId, index: usize, raw: i64) -> Result<u8, BoardError> {
        let task = self.task_mut(q, index)?;
        task.set_progress(raw);
        Ok(task.progress)
    }

    pub fn set_deadline_days(&mut self, q: QuadrantId, index: usize, days: u32) -> Result<(), BoardError> {
        self.task_mut(q, index)?.set_days_to_ddl(days);
        Ok(())
    }

    pub fn set_deadline_date(&mut self, q: QuadrantId, index: usize, date: &str) -> Result<(), BoardError> {
        self.task_mut(q, index)?.set_ddl_date(date);
        Ok(())
    }

    /// The task with an open session, if any (first in reading order)
    pub fn open_session(&self) -> Option<(QuadrantId, usize)> {
        self.iter().find(|(_, _, t)| t.is_running()).map(|(q, i, _)| (q, i))
    }

    /// Start a focus session on a task
    pub fn start_timer(&mut self, q: QuadrantId, index: usize, now: i64) -> Result<(), BoardError> {
        if self.single_session {
            if let Some((oq, oi)) = self.open_session() {
                if (oq, oi) != (q, index) {
                    let other = self.tasks[oq.index()][oi].text.clone();
                    return Err(BoardError::OtherSessionOpen(other));
                }
            }
        }

        let task = self.task_mut(q, index)?;
        if !task.start_session(now) {
            return Err(BoardError::AlreadyRunning(task.text.clone()));
        }
        Ok(())
    }

    /// Close the open session on a task. Returns whether anything was closed.
    pub fn close_timer(&mut self, q: QuadrantId, index: usize, now: i64) -> Result<bool, BoardError> {
        Ok(self.task_mut(q, index)?.close_session(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::TimeRecord;

    #[test]
    fn test_default_board() {
        let board = Board::default();
        assert_eq!(board.total_tasks(), 0);
        assert_eq!(board.label(QuadrantId::Q1), "重要且紧急");
        assert_eq!(board.label(QuadrantId::Q4), "不重要不紧急");
    }

    #[test]
    fn test_add_and_remove_task() {
        let mut board = Board::default();
        assert!(board.add_task(QuadrantId::Q1, "  Write report  ", 10));
        assert_eq!(board.tasks(QuadrantId::Q1).len(), 1);
        assert_eq!(board.tasks(QuadrantId::Q1)[0].text, "Write report");

        let removed = board.remove_task(QuadrantId::Q1, 0).unwrap();
        assert_eq!(removed.text, "Write report");
        assert!(board.tasks(QuadrantId::Q1).is_empty());
    }

    #[test]
    fn test_blank_task_is_ignored() {
        let mut board = Board::default();
        assert!(!board.add_task(QuadrantId::Q2, "   ", 10));
        assert_eq!(board.total_tasks(), 0);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut board = Board::default();
        assert_eq!(
            board.remove_task(QuadrantId::Q3, 0).unwrap_err(),
            BoardError::TaskNotFound(QuadrantId::Q3, 0)
        );
    }

    #[test]
    fn test_clear_all_keeps_labels() {
        let mut board = Board::default();
        board.set_label(QuadrantId::Q2, "Someday");
        for q in QuadrantId::all() {
            board.add_task(*q, "task", 0);
        }
        board.clear_all();
        assert_eq!(board.total_tasks(), 0);
        assert_eq!(board.label(QuadrantId::Q2), "Someday");
    }

    #[test]
    fn test_set_label_trims_and_rejects_blank() {
        let mut board = Board::default();
        assert!(board.set_label(QuadrantId::Q2, "  Someday "));
        assert_eq!(board.label(QuadrantId::Q2), "Someday");
        assert!(!board.set_label(QuadrantId::Q2, " "));
        assert_eq!(board.label(QuadrantId::Q2), "Someday");

        board.reset_labels();
        assert_eq!(board.label(QuadrantId::Q2), "重要不紧急");
    }

    #[test]
    fn test_set_progress_clamps() {
        let mut board = Board::default();
        board.add_task(QuadrantId::Q1, "t", 0);
        assert_eq!(board.set_progress(QuadrantId::Q1, 0, 250).unwrap(), 100);
        assert_eq!(board.set_progress(QuadrantId::Q1, 0, -1).unwrap(), 0);
        assert!(board.set_progress(QuadrantId::Q1, 5, 10).is_err());
    }

    #[test]
    fn test_single_session_enforced() {
        let mut board = Board::default();
        board.add_task(QuadrantId::Q1, "first", 0);
        board.add_task(QuadrantId::Q3, "second", 0);

        board.start_timer(QuadrantId::Q1, 0, 1_000).unwrap();
        assert_eq!(board.open_session(), Some((QuadrantId::Q1, 0)));

        let err = board.start_timer(QuadrantId::Q3, 0, 2_000).unwrap_err();
        assert_eq!(err, BoardError::OtherSessionOpen("first".to_string()));

        let err = board.start_timer(QuadrantId::Q1, 0, 2_000).unwrap_err();
        assert_eq!(err, BoardError::AlreadyRunning("first".to_string()));

        assert!(board.close_timer(QuadrantId::Q1, 0, 3_000).unwrap());
        board.start_timer(QuadrantId::Q3, 0, 4_000).unwrap();
        assert_eq!(board.open_session(), Some((QuadrantId::Q3, 0)));
    }

    #[test]
    fn test_concurrent_sessions_when_allowed() {
        let mut board = Board::default();
        board.single_session = false;
        board.add_task(QuadrantId::Q1, "first", 0);
        board.add_task(QuadrantId::Q2, "second", 0);

        board.start_timer(QuadrantId::Q1, 0, 1_000).unwrap();
        board.start_timer(QuadrantId::Q2, 0, 1_000).unwrap();
        assert!(board.task(QuadrantId::Q2, 0).unwrap().is_running());
    }

    #[test]
    fn test_close_timer_records_interval() {
        let mut board = Board::default();
        board.add_task(QuadrantId::Q4, "t", 0);
        board.start_timer(QuadrantId::Q4, 0, 1_000).unwrap();
        board.close_timer(QuadrantId::Q4, 0, 31_000).unwrap();
        assert_eq!(
            board.task(QuadrantId::Q4, 0).unwrap().time_records,
            vec![TimeRecord::closed(1_000, 31_000)]
        );
        assert!(!board.close_timer(QuadrantId::Q4, 0, 40_000).unwrap());
    }

    #[test]
    fn test_find_by_id() {
        let mut board = Board::default();
        board.add_task(QuadrantId::Q2, "a", 0);
        board.add_task(QuadrantId::Q2, "b", 0);
        let id = board.task(QuadrantId::Q2, 1).unwrap().id;
        assert_eq!(board.find(id), Some((QuadrantId::Q2, 1)));
        assert_eq!(board.find(Uuid::new_v4()), None);
    }
}
