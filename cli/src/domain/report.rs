//! Per-step outcome of a provisioning run.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::plan::Step;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    Succeeded,
    /// Nothing to do (empty manifest).
    Skipped,
    Failed {
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<i32>,
    },
    /// An earlier step failed.
    NotRun,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub step: Step,
    #[serde(flatten)]
    pub status: StepStatus,
}

/// Outcome of every step plus the run's timing.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub steps: Vec<StepOutcome>,
}

impl RunReport {
    /// A report with every step `NotRun`.
    #[must_use]
    pub fn start(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at: None,
            steps: Step::ALL
                .iter()
                .map(|&step| StepOutcome {
                    step,
                    status: StepStatus::NotRun,
                })
                .collect(),
        }
    }

    pub fn record(&mut self, step: Step, status: StepStatus) {
        if let Some(outcome) = self.steps.iter_mut().find(|o| o.step == step) {
            outcome.status = status;
        }
    }

    #[must_use]
    pub fn status(&self, step: Step) -> StepStatus {
        self.steps
            .iter()
            .find(|o| o.step == step)
            .map_or(StepStatus::NotRun, |o| o.status)
    }

    /// `true` when no step failed and none was left unrun.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.steps
            .iter()
            .all(|o| matches!(o.status, StepStatus::Succeeded | StepStatus::Skipped))
    }
}
