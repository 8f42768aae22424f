pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod modal;
pub mod quadrant_pane;
pub mod stats_view;
pub mod styles;

use crate::app::AppState;
use crate::domain::{QuadrantId, UiMode};
use input_form::render_input_form;
use keybindings::render_keybindings;
use layout::create_layout;
use modal::{render_confirm_modal, render_deadline_modal, render_timer_modal};
use quadrant_pane::render_quadrant_pane;
use ratatui::Frame;
use stats_view::render_stats_view;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    if app.ui_mode == UiMode::Stats {
        render_stats_view(f, app);
        return;
    }

    let size = f.size();
    let layout = create_layout(size);

    render_keybindings(f, app, layout.keybindings_area);

    for q in QuadrantId::all() {
        render_quadrant_pane(f, app, *q, layout.quadrant_area(*q));
    }

    // Overlays
    match app.ui_mode {
        UiMode::AddingTask | UiMode::EditingLabel => render_input_form(f, app, size),
        UiMode::EditingDeadline => render_deadline_modal(f, app, size),
        UiMode::Timer => render_timer_modal(f, app, size),
        UiMode::Confirm => render_confirm_modal(f, app, size),
        UiMode::Normal | UiMode::Stats => {}
    }
}
