pub mod board;
pub mod deadline;
pub mod enums;
pub mod task;

pub use board::{Board, BoardError};
pub use deadline::{deadline_status, ring_glyph, DeadlineStatus};
pub use enums::{ConfirmAction, QuadrantId, UiMode};
pub use task::{format_clock, format_duration, now_ms, Task, TimeRecord};
