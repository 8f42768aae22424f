use crate::domain::QuadrantId;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main layout structure
pub struct MainLayout {
    /// Quadrant panes in Q1..Q4 order
    pub quadrant_areas: [Rect; 4],
    pub keybindings_area: Rect,
}

impl MainLayout {
    pub fn quadrant_area(&self, q: QuadrantId) -> Rect {
        self.quadrant_areas[q.index()]
    }
}

/// Create the main layout
/// - Top bar: keybindings (1 row)
/// - Main area: 2x2 grid, Q1 Q2 on top and Q3 Q4 below
pub fn create_layout(area: Rect) -> MainLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Keybindings bar
            Constraint::Min(0),    // Matrix
        ])
        .split(area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(main_chunks[1]);

    let split_row = |row: Rect| {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(row)
    };
    let top = split_row(rows[0]);
    let bottom = split_row(rows[1]);

    MainLayout {
        quadrant_areas: [top[0], top[1], bottom[0], bottom[1]],
        keybindings_area: main_chunks[0],
    }
}

/// Stats screen: share gauges above the weekly chart
pub struct StatsLayout {
    pub keybindings_area: Rect,
    pub shares_area: Rect,
    pub weekly_area: Rect,
}

pub fn create_stats_layout(area: Rect) -> StatsLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Percentage(40),
            Constraint::Min(0),
        ])
        .split(area);

    StatsLayout {
        keybindings_area: chunks[0],
        shares_area: chunks[1],
        weekly_area: chunks[2],
    }
}

/// Create centered modal area with a fixed height
pub fn create_modal_area(area: Rect, height: u16) -> Rect {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Length(height),
            Constraint::Percentage(25),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(vertical_chunks[1]);

    horizontal_chunks[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_layout() {
        let area = Rect::new(0, 0, 100, 51);
        let layout = create_layout(area);

        assert_eq!(layout.keybindings_area.height, 1);
        for rect in &layout.quadrant_areas {
            assert_eq!(rect.width, 50);
            assert_eq!(rect.height, 25);
        }

        let q1 = layout.quadrant_area(QuadrantId::Q1);
        let q4 = layout.quadrant_area(QuadrantId::Q4);
        assert!(q1.x < q4.x);
        assert!(q1.y < q4.y);
    }

    #[test]
    fn test_create_stats_layout() {
        let layout = create_stats_layout(Rect::new(0, 0, 100, 41));
        assert_eq!(layout.keybindings_area.height, 1);
        assert!(layout.shares_area.height > 0);
        assert!(layout.weekly_area.height > 0);
    }

    #[test]
    fn test_create_modal_area() {
        let area = Rect::new(0, 0, 100, 50);
        let modal = create_modal_area(area, 9);

        assert!(modal.width < area.width);
        assert_eq!(modal.height, 9);
    }
}
