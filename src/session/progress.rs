//! Progress events for long-running operations

use std::fmt;

use serde::Serialize;

/// Progress notifications emitted while a long-running operation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Progress {
    /// Work is underway with no stage count.
    Indeterminate { description: String },
    /// Determinate progress: `stage` out of `total`.
    Structured {
        description: String,
        stage: u32,
        total: u32,
    },
    /// Something went wrong; nothing else follows for this operation.
    Failure { description: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressKind {
    Indeterminate,
    Structured,
    Failure,
}

impl Progress {
    pub fn indeterminate(description: impl Into<String>) -> Self {
        Self::Indeterminate {
            description: description.into(),
        }
    }

    pub fn failure(description: impl Into<String>) -> Self {
        Self::Failure {
            description: description.into(),
        }
    }

    pub fn kind(&self) -> ProgressKind {
        match self {
            Self::Indeterminate { .. } => ProgressKind::Indeterminate,
            Self::Structured { .. } => ProgressKind::Structured,
            Self::Failure { .. } => ProgressKind::Failure,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Self::Indeterminate { description }
            | Self::Structured { description, .. }
            | Self::Failure { description } => description,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.kind() == ProgressKind::Failure
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Indeterminate { description } => write!(f, "{}", description),
            Self::Structured {
                description,
                stage,
                total,
            } => write!(f, "[{}/{}] {}", stage, total, description),
            Self::Failure { description } => write!(f, "✗ {}", description),
        }
    }
}

/// Issues `Structured` events for one operation.
///
/// `total` is fixed at construction and stages only move forward, so every
/// event produced by one counter satisfies `1 <= stage <= total` with
/// non-decreasing stages.
#[derive(Debug, Clone)]
pub struct StageCounter {
    current: u32,
    total: u32,
}

impl StageCounter {
    /// Start a counter at `start` (clamped into `1..=total`).
    pub fn new(start: u32, total: u32) -> Self {
        let total = total.max(1);
        Self {
            current: start.clamp(1, total),
            total,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Move to the next stage and describe it. Saturates at `total`.
    pub fn advance(&mut self, description: impl Into<String>) -> Progress {
        self.current = self.current.saturating_add(1).min(self.total);
        Progress::Structured {
            description: description.into(),
            stage: self.current,
            total: self.total,
        }
    }
}
