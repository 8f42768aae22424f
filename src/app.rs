use crate::domain::{now_ms, Board, ConfirmAction, QuadrantId, Task, UiMode};
use crate::persistence::{save_board, Config, Storage};
use chrono::NaiveDate;
use uuid::Uuid;

/// Focus-session modal for one task
#[derive(Debug, Clone)]
pub struct TimerModal {
    pub task_id: Uuid,
}

/// Deadline form: a day count ("5") or a date ("2024-06-30")
#[derive(Debug, Clone)]
pub struct DeadlineForm {
    pub task_id: Uuid,
    pub input: String,
    pub error: Option<String>,
}

/// Parsed deadline input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeadlineInput {
    Days(u32),
    Date(NaiveDate),
}

impl DeadlineInput {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(days) = raw.parse::<u32>() {
            return (days >= 1).then_some(Self::Days(days));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().map(Self::Date)
    }
}

/// Main application state
pub struct AppState {
    pub board: Board,
    storage: Box<dyn Storage>,
    pub config: Config,
    pub ui_mode: UiMode,
    pub selected_quadrant: QuadrantId,
    /// Selected row per quadrant
    pub selected_index: [usize; 4],
    /// Text being typed for a new task or a label
    pub input_buffer: String,
    pub timer_modal: Option<TimerModal>,
    pub deadline_form: Option<DeadlineForm>,
    pub confirm: Option<ConfirmAction>,
    /// One-line feedback shown in the hint bar until the next key
    pub status_message: Option<String>,
    pub needs_save: bool,
    /// Seconds of the open session in the timer modal, 0 when paused (display only)
    pub live_elapsed: i64,
}

impl AppState {
    pub fn new(mut board: Board, storage: Box<dyn Storage>, config: Config) -> Self {
        board.single_session = config.single_session;

        Self {
            board,
            storage,
            config,
            ui_mode: UiMode::Normal,
            selected_quadrant: QuadrantId::Q1,
            selected_index: [0; 4],
            input_buffer: String::new(),
            timer_modal: None,
            deadline_form: None,
            confirm: None,
            status_message: None,
            needs_save: false,
            live_elapsed: 0,
        }
    }

    /// Mirror the board to storage. Failures are logged; memory stays authoritative.
    pub fn save(&mut self) {
        if let Err(e) = save_board(self.storage.as_ref(), &self.board) {
            log::warn!("Could not save state: {:#}", e);
            self.status_message = Some("Could not save (see quadrant.log)".to_string());
        }
        self.needs_save = false;
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Get the selected task as (quadrant, index)
    pub fn get_selected_task(&self) -> Option<(QuadrantId, usize)> {
        let q = self.selected_quadrant;
        let index = self.selected_index[q.index()];
        self.board.task(q, index).map(|_| (q, index))
    }

    pub fn selected_task(&self) -> Option<&Task> {
        let (q, i) = self.get_selected_task()?;
        self.board.task(q, i)
    }

    pub fn select_quadrant(&mut self, q: QuadrantId) {
        self.selected_quadrant = q;
    }

    pub fn next_quadrant(&mut self) {
        self.selected_quadrant = self.selected_quadrant.next();
    }

    pub fn prev_quadrant(&mut self) {
        self.selected_quadrant = self.selected_quadrant.prev();
    }

    pub fn move_selection_up(&mut self) {
        let slot = &mut self.selected_index[self.selected_quadrant.index()];
        *slot = slot.saturating_sub(1);
    }

    pub fn move_selection_down(&mut self) {
        let len = self.board.tasks(self.selected_quadrant).len();
        let slot = &mut self.selected_index[self.selected_quadrant.index()];
        if *slot + 1 < len {
            *slot += 1;
        }
    }

    /// Keep every quadrant's selection inside its list
    fn clamp_selection(&mut self) {
        for q in QuadrantId::all() {
            let len = self.board.tasks(*q).len();
            let slot = &mut self.selected_index[q.index()];
            if *slot >= len {
                *slot = len.saturating_sub(1);
            }
        }
    }

    // ------------------------------------------------------------------
    // Text input (new task, label)
    // ------------------------------------------------------------------

    pub fn input_add_char(&mut self, c: char) {
        self.input_buffer.push(c);
    }

    pub fn input_backspace(&mut self) {
        self.input_buffer.pop();
    }

    /// Start adding a task to the selected quadrant
    pub fn start_add_task(&mut self) {
        self.input_buffer.clear();
        self.ui_mode = UiMode::AddingTask;
    }

    /// Add the typed task. Blank input keeps the prompt open.
    pub fn submit_add_task(&mut self) {
        let q = self.selected_quadrant;
        if self.board.add_task(q, &self.input_buffer, now_ms()) {
            log::debug!("Added task to {}", q.key());
            self.selected_index[q.index()] = self.board.tasks(q).len() - 1;
            self.input_buffer.clear();
            self.ui_mode = UiMode::Normal;
            self.needs_save = true;
        }
    }

    /// Leave text input without changes
    pub fn cancel_input(&mut self) {
        self.input_buffer.clear();
        self.ui_mode = UiMode::Normal;
    }

    /// Start renaming the selected quadrant (buffer starts with the current label)
    pub fn start_edit_label(&mut self) {
        self.input_buffer = self.board.label(self.selected_quadrant).to_string();
        self.ui_mode = UiMode::EditingLabel;
    }

    /// Save the typed label; blank input leaves the label unchanged
    pub fn submit_label(&mut self) {
        if self.board.set_label(self.selected_quadrant, &self.input_buffer) {
            self.needs_save = true;
        }
        self.cancel_input();
    }

    // ------------------------------------------------------------------
    // Task edits
    // ------------------------------------------------------------------

    /// Delete the selected task
    pub fn remove_selected(&mut self) {
        if let Some((q, i)) = self.get_selected_task() {
            if let Ok(task) = self.board.remove_task(q, i) {
                log::debug!("Removed task {:?} from {}", task.text, q.key());
                if self.timer_modal.as_ref().map(|m| m.task_id) == Some(task.id) {
                    self.close_timer_modal();
                }
                self.clamp_selection();
                self.needs_save = true;
            }
        }
    }

    /// Nudge progress of the selected task by `delta` percentage points
    pub fn adjust_progress(&mut self, delta: i64) {
        if let Some((q, i)) = self.get_selected_task() {
            let current = self.board.task(q, i).map(|t| i64::from(t.progress)).unwrap_or(0);
            if self.board.set_progress(q, i, current + delta).is_ok() {
                self.needs_save = true;
            }
        }
    }

    pub fn increase_progress(&mut self) {
        self.adjust_progress(i64::from(self.config.progress_step));
    }

    pub fn decrease_progress(&mut self) {
        self.adjust_progress(-i64::from(self.config.progress_step));
    }

    /// Open the deadline form for the selected task
    pub fn open_deadline_form(&mut self) {
        if let Some(task) = self.selected_task() {
            let input = if task.ddl_date.is_empty() {
                task.days_to_ddl.to_string()
            } else {
                task.ddl_date.clone()
            };
            self.deadline_form = Some(DeadlineForm {
                task_id: task.id,
                input,
                error: None,
            });
            self.ui_mode = UiMode::EditingDeadline;
        }
    }

    pub fn deadline_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.deadline_form {
            form.input.push(c);
            form.error = None;
        }
    }

    pub fn deadline_backspace(&mut self) {
        if let Some(form) = &mut self.deadline_form {
            form.input.pop();
            form.error = None;
        }
    }

    /// Apply the deadline form. Invalid input keeps the form open with an error.
    pub fn submit_deadline(&mut self) {
        let Some(form) = &mut self.deadline_form else {
            return;
        };
        let Some(parsed) = DeadlineInput::parse(&form.input) else {
            form.error = Some("Enter a number of days or a date as YYYY-MM-DD".to_string());
            return;
        };
        let task_id = form.task_id;

        if let Some((q, i)) = self.board.find(task_id) {
            let result = match parsed {
                DeadlineInput::Days(days) => self.board.set_deadline_days(q, i, days),
                DeadlineInput::Date(date) => {
                    self.board.set_deadline_date(q, i, &date.format("%Y-%m-%d").to_string())
                }
            };
            if result.is_ok() {
                self.needs_save = true;
            }
        }
        self.cancel_deadline_form();
    }

    pub fn cancel_deadline_form(&mut self) {
        self.deadline_form = None;
        self.ui_mode = UiMode::Normal;
    }

    // ------------------------------------------------------------------
    // Focus timer
    // ------------------------------------------------------------------

    /// Open the timer modal for the selected task (resumes display of an open session)
    pub fn open_timer_modal(&mut self) {
        if let Some(task) = self.selected_task() {
            self.timer_modal = Some(TimerModal { task_id: task.id });
            self.ui_mode = UiMode::Timer;
            self.refresh_live_elapsed();
        }
    }

    /// Hide the modal. A running session keeps running.
    pub fn close_timer_modal(&mut self) {
        self.timer_modal = None;
        self.live_elapsed = 0;
        if self.ui_mode == UiMode::Timer {
            self.ui_mode = UiMode::Normal;
        }
    }

    /// Position of the task shown in the timer modal
    fn timer_target(&self) -> Option<(QuadrantId, usize)> {
        let modal = self.timer_modal.as_ref()?;
        self.board.find(modal.task_id)
    }

    pub fn timer_task(&self) -> Option<&Task> {
        let (q, i) = self.timer_target()?;
        self.board.task(q, i)
    }

    pub fn timer_start(&mut self) {
        let Some((q, i)) = self.timer_target() else {
            return;
        };
        match self.board.start_timer(q, i, now_ms()) {
            Ok(()) => {
                log::info!("Focus session started on {}[{}]", q.key(), i);
                self.needs_save = true;
            }
            Err(e) => self.status_message = Some(e.to_string()),
        }
        self.refresh_live_elapsed();
    }

    /// Close the open interval; the modal stays up
    pub fn timer_pause(&mut self) {
        let Some((q, i)) = self.timer_target() else {
            return;
        };
        if let Ok(true) = self.board.close_timer(q, i, now_ms()) {
            log::info!("Focus session closed on {}[{}]", q.key(), i);
            self.needs_save = true;
        }
        self.refresh_live_elapsed();
    }

    /// Close the open interval and hide the modal
    pub fn timer_stop(&mut self) {
        self.timer_pause();
        self.close_timer_modal();
    }

    fn refresh_live_elapsed(&mut self) {
        let now = now_ms();
        self.live_elapsed = self.timer_task().map(|t| t.live_secs(now)).unwrap_or(0);
    }

    /// Periodic tick: refresh the displayed counter only, never the records
    pub fn tick(&mut self) {
        if self.timer_modal.is_some() {
            self.refresh_live_elapsed();
        }
    }

    // ------------------------------------------------------------------
    // Board-wide actions
    // ------------------------------------------------------------------

    pub fn request_confirm(&mut self, action: ConfirmAction) {
        self.confirm = Some(action);
        self.ui_mode = UiMode::Confirm;
    }

    pub fn confirm_yes(&mut self) {
        match self.confirm.take() {
            Some(ConfirmAction::ClearAllTasks) => {
                self.board.clear_all();
                self.selected_index = [0; 4];
                self.close_timer_modal();
                log::info!("Cleared all tasks");
                self.needs_save = true;
            }
            Some(ConfirmAction::ResetLabels) => {
                self.board.reset_labels();
                self.needs_save = true;
            }
            None => {}
        }
        self.ui_mode = UiMode::Normal;
    }

    pub fn confirm_no(&mut self) {
        self.confirm = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Switch between the matrix and the stats screen
    pub fn toggle_stats(&mut self) {
        self.ui_mode = if self.ui_mode == UiMode::Stats {
            UiMode::Normal
        } else {
            UiMode::Stats
        };
    }
}
