use serde::{Deserialize, Serialize};

/// One of the four fixed Eisenhower quadrants
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QuadrantId {
    /// Important and urgent
    #[serde(rename = "q1")]
    Q1,
    /// Important, not urgent
    #[serde(rename = "q2")]
    Q2,
    /// Not important, urgent
    #[serde(rename = "q3")]
    Q3,
    /// Not important, not urgent
    #[serde(rename = "q4")]
    Q4,
}

impl QuadrantId {
    /// Parse from a storage key like "q1"
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "q1" => Some(Self::Q1),
            "q2" => Some(Self::Q2),
            "q3" => Some(Self::Q3),
            "q4" => Some(Self::Q4),
            _ => None,
        }
    }

    /// Storage key for this quadrant
    pub fn key(&self) -> &'static str {
        match self {
            Self::Q1 => "q1",
            Self::Q2 => "q2",
            Self::Q3 => "q3",
            Self::Q4 => "q4",
        }
    }

    /// Position in fixed-size per-quadrant arrays
    pub fn index(&self) -> usize {
        match self {
            Self::Q1 => 0,
            Self::Q2 => 1,
            Self::Q3 => 2,
            Self::Q4 => 3,
        }
    }

    /// Inverse of `index`
    pub fn from_index(index: usize) -> Option<Self> {
        Self::all().get(index).copied()
    }

    /// Default label shown until the user renames the quadrant
    pub fn default_label(&self) -> &'static str {
        match self {
            Self::Q1 => "重要且紧急",
            Self::Q2 => "重要不紧急",
            Self::Q3 => "不重要但紧急",
            Self::Q4 => "不重要不紧急",
        }
    }

    /// Next quadrant in reading order (wraps around)
    pub fn next(&self) -> Self {
        Self::all()[(self.index() + 1) % 4]
    }

    /// Previous quadrant in reading order (wraps around)
    pub fn prev(&self) -> Self {
        Self::all()[(self.index() + 3) % 4]
    }

    /// All quadrants in reading order (top-left, top-right, bottom-left, bottom-right)
    pub fn all() -> &'static [QuadrantId; 4] {
        &[Self::Q1, Self::Q2, Self::Q3, Self::Q4]
    }
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    AddingTask,
    EditingLabel,
    EditingDeadline,
    Timer,
    Confirm,
    Stats,
}

/// Destructive actions that need a y/n confirmation first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    ClearAllTasks,
    ResetLabels,
}

impl ConfirmAction {
    /// Question shown in the confirmation dialog
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::ClearAllTasks => "Clear every task in all four quadrants?",
            Self::ResetLabels => "Reset all quadrant labels to their defaults?",
        }
    }
}
