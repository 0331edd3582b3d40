//! Job lifecycle phases.
//!
//! ```text
//! Received → Validated ─┬─ SkippedNoOutput ─────────────────────┬─ Completed
//!                       └─ Opened → Transformed → Packaged ─────┘
//!          (any non-terminal phase) ───────────────────────────── Failed
//! ```

use std::fmt;

use tracing::{debug, warn};

/// A point in a job's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    Received,
    Validated,
    SkippedNoOutput,
    Opened,
    Transformed,
    Packaged,
    Completed,
    Failed,
}

impl JobPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobPhase::Completed | JobPhase::Failed)
    }

    /// Whether `next` may follow `self`.
    pub fn can_advance_to(&self, next: JobPhase) -> bool {
        use JobPhase::*;

        if next == Failed {
            return !self.is_terminal();
        }

        matches!(
            (self, next),
            (Received, Validated)
                | (Validated, SkippedNoOutput)
                | (Validated, Opened)
                | (Opened, Transformed)
                | (Transformed, Packaged)
                | (SkippedNoOutput, Completed)
                | (Packaged, Completed)
        )
    }
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobPhase::Received => "received",
            JobPhase::Validated => "validated",
            JobPhase::SkippedNoOutput => "skipped-no-output",
            JobPhase::Opened => "opened",
            JobPhase::Transformed => "transformed",
            JobPhase::Packaged => "packaged",
            JobPhase::Completed => "completed",
            JobPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Record of the phases one job passed through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobTrace {
    phases: Vec<JobPhase>,
}

impl Default for JobTrace {
    fn default() -> Self {
        Self::new()
    }
}

impl JobTrace {
    /// A trace positioned at `Received`.
    pub fn new() -> Self {
        Self {
            phases: vec![JobPhase::Received],
        }
    }

    /// A trace for a `JobSpec` that was validated elsewhere.
    pub fn validated() -> Self {
        let mut trace = Self::new();
        trace.advance(JobPhase::Validated);
        trace
    }

    pub fn current(&self) -> JobPhase {
        self.phases.last().copied().unwrap_or(JobPhase::Received)
    }

    pub fn phases(&self) -> &[JobPhase] {
        &self.phases
    }

    /// Moves to `next`. Illegal transitions are logged and ignored.
    pub fn advance(&mut self, next: JobPhase) {
        let current = self.current();
        if !current.can_advance_to(next) {
            warn!(from = %current, to = %next, "Ignoring illegal job phase transition");
            debug_assert!(false, "illegal job phase transition {current} -> {next}");
            return;
        }
        debug!(from = %current, to = %next, "Job phase");
        self.phases.push(next);
    }

    pub fn fail(&mut self) {
        if !self.current().is_terminal() {
            self.advance(JobPhase::Failed);
        }
    }
}
