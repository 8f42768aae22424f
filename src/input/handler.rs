use crate::app::AppState;
use crate::domain::{ConfirmAction, QuadrantId, UiMode};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    app.status_message = None;

    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::AddingTask | UiMode::EditingLabel => handle_text_input_mode(app, key),
        UiMode::EditingDeadline => handle_deadline_mode(app, key),
        UiMode::Timer => handle_timer_mode(app, key),
        UiMode::Confirm => handle_confirm_mode(app, key),
        UiMode::Stats => handle_stats_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        // Quadrant focus
        KeyCode::Tab => app.next_quadrant(),
        KeyCode::BackTab => app.prev_quadrant(),
        KeyCode::Char(c @ '1'..='4') => {
            let index = c as usize - '1' as usize;
            if let Some(q) = QuadrantId::from_index(index) {
                app.select_quadrant(q);
            }
        }

        // Task selection
        KeyCode::Up | KeyCode::Char('k') => app.move_selection_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection_down(),

        KeyCode::Char('a') => app.start_add_task(),
        KeyCode::Char('x') | KeyCode::Delete => app.remove_selected(),
        KeyCode::Char('l') => app.start_edit_label(),

        // Progress
        KeyCode::Char('+') | KeyCode::Char('=') => app.increase_progress(),
        KeyCode::Char('-') | KeyCode::Char('_') => app.decrease_progress(),

        KeyCode::Char('d') => app.open_deadline_form(),
        KeyCode::Char('t') | KeyCode::Enter => app.open_timer_modal(),

        KeyCode::Char('C') => app.request_confirm(ConfirmAction::ClearAllTasks),
        KeyCode::Char('R') => app.request_confirm(ConfirmAction::ResetLabels),

        KeyCode::Char('v') => app.toggle_stats(),

        KeyCode::Char('q') => return Ok(true),
        _ => {}
    }
    Ok(false)
}

/// Handle keys while typing a task or a label
fn handle_text_input_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => {
            if app.ui_mode == UiMode::AddingTask {
                app.submit_add_task();
            } else {
                app.submit_label();
            }
        }
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Backspace => app.input_backspace(),
        KeyCode::Char(c) => app.input_add_char(c),
        _ => {}
    }
    Ok(false)
}

fn handle_deadline_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.submit_deadline(),
        KeyCode::Esc => app.cancel_deadline_form(),
        KeyCode::Backspace => app.deadline_backspace(),
        KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => app.deadline_add_char(c),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in the focus timer modal
fn handle_timer_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('s') => app.timer_start(),
        KeyCode::Char('p') => app.timer_pause(),
        KeyCode::Char('x') => app.timer_stop(),
        KeyCode::Esc | KeyCode::Char('q') => app.close_timer_modal(),
        _ => {}
    }
    Ok(false)
}

fn handle_confirm_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_yes(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.confirm_no(),
        _ => {}
    }
    Ok(false)
}

fn handle_stats_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('v') | KeyCode::Esc => app.toggle_stats(),
        KeyCode::Char('q') => return Ok(true),
        _ => {}
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{now_ms, Board};
    use crate::persistence::{Config, MemoryStorage};

    fn create_test_app() -> AppState {
        let mut board = Board::default();
        board.add_task(QuadrantId::Q1, "Test task", now_ms());
        AppState::new(board, Box::new(MemoryStorage::new()), Config::default())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn type_keys(app: &mut AppState, text: &str) {
        for c in text.chars() {
            handle_key(app, key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn test_handle_quit() {
        let mut app = create_test_app();
        assert!(handle_key(&mut app, key(KeyCode::Char('q'))).unwrap());

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(handle_key(&mut app, ctrl_c).unwrap());
    }

    #[test]
    fn test_handle_quadrant_navigation() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Tab)).unwrap();
        assert_eq!(app.selected_quadrant, QuadrantId::Q2);

        handle_key(&mut app, key(KeyCode::Char('4'))).unwrap();
        assert_eq!(app.selected_quadrant, QuadrantId::Q4);

        handle_key(&mut app, key(KeyCode::Tab)).unwrap();
        assert_eq!(app.selected_quadrant, QuadrantId::Q1);

        handle_key(&mut app, key(KeyCode::BackTab)).unwrap();
        assert_eq!(app.selected_quadrant, QuadrantId::Q4);
    }

    #[test]
    fn test_handle_add_task() {
        let mut app = create_test_app();

        // Press 'a' to open the prompt
        handle_key(&mut app, key(KeyCode::Char('a'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::AddingTask);

        // 'q' is text here, not quit
        type_keys(&mut app, "quiz");
        handle_key(&mut app, key(KeyCode::Backspace)).unwrap();

        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.board.tasks(QuadrantId::Q1)[1].text, "qui");
    }

    #[test]
    fn test_handle_remove_task() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Delete)).unwrap();
        assert!(app.board.tasks(QuadrantId::Q1).is_empty());
    }

    #[test]
    fn test_handle_progress_keys() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('+'))).unwrap();
        handle_key(&mut app, key(KeyCode::Char('+'))).unwrap();
        handle_key(&mut app, key(KeyCode::Char('-'))).unwrap();
        assert_eq!(app.selected_task().unwrap().progress, 10);
    }

    #[test]
    fn test_handle_label_edit_cancel() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('l'))).unwrap();
        type_keys(&mut app, "!!");
        handle_key(&mut app, key(KeyCode::Esc)).unwrap();
        assert_eq!(app.board.label(QuadrantId::Q1), "重要且紧急");
    }

    #[test]
    fn test_handle_deadline_ignores_letters() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('d'))).unwrap();
        handle_key(&mut app, key(KeyCode::Backspace)).unwrap();
        type_keys(&mut app, "1x2");
        assert_eq!(app.deadline_form.as_ref().unwrap().input, "12");

        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.selected_task().unwrap().days_to_ddl, 12);
    }

    #[test]
    fn test_handle_timer_keys() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.ui_mode, UiMode::Timer);

        handle_key(&mut app, key(KeyCode::Char('s'))).unwrap();
        assert!(app.timer_task().unwrap().is_running());

        // Esc hides the modal without stopping
        handle_key(&mut app, key(KeyCode::Esc)).unwrap();
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.selected_task().unwrap().is_running());

        handle_key(&mut app, key(KeyCode::Char('t'))).unwrap();
        handle_key(&mut app, key(KeyCode::Char('x'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(!app.selected_task().unwrap().is_running());
        assert_eq!(app.board.tasks(QuadrantId::Q1).len(), 1);
    }

    #[test]
    fn test_handle_clear_all_confirm() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('C'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::Confirm);
        handle_key(&mut app, key(KeyCode::Char('n'))).unwrap();
        assert_eq!(app.board.total_tasks(), 1);

        handle_key(&mut app, key(KeyCode::Char('C'))).unwrap();
        handle_key(&mut app, key(KeyCode::Char('y'))).unwrap();
        assert_eq!(app.board.total_tasks(), 0);
    }

    #[test]
    fn test_handle_stats_view() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('v'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::Stats);
        handle_key(&mut app, key(KeyCode::Esc)).unwrap();
        assert_eq!(app.ui_mode, UiMode::Normal);
    }
}
