use std::time::{Duration, Instant};

use crate::error::UnwindFailure;

/// Status of an undo action after the sequencer ran it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionStatus {
    /// The action completed.
    Reverted,
    /// The action returned an error or panicked.
    Failed,
}

/// Record of one undo action attempted during an unwind.
#[derive(Debug)]
pub struct ActionRecord {
    /// Description the action was registered with.
    pub description: String,
    /// Outcome of the attempt.
    pub status: ActionStatus,
    /// When the attempt started.
    pub started_at: Instant,
    /// When the attempt finished.
    pub completed_at: Instant,
}

impl ActionRecord {
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.completed_at.duration_since(self.started_at)
    }
}

/// What a call to `execute` did as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum RollbackOutcome {
    /// Rollback was disabled; nothing ran and the log was left in place.
    Disabled,
    /// The log was empty.
    NothingToRollBack,
    /// Every action ran and succeeded.
    Completed,
    /// Every action ran and at least one failed.
    CompletedWithErrors,
    /// The sequencer had already been unwound; nothing ran again.
    AlreadyUnwound {
        /// Aggregate result of the earlier unwind.
        succeeded: bool,
    },
}

/// Result of unwinding a sequencer, with one record per attempted action in
/// the order they ran.
#[derive(Debug)]
pub struct RollbackReport<E> {
    outcome: RollbackOutcome,
    records: Vec<ActionRecord>,
    failures: Vec<UnwindFailure<E>>,
}

impl<E> RollbackReport<E> {
    pub(crate) fn skipped(outcome: RollbackOutcome) -> Self {
        Self {
            outcome,
            records: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub(crate) fn unwound(records: Vec<ActionRecord>, failures: Vec<UnwindFailure<E>>) -> Self {
        let outcome = if failures.is_empty() {
            RollbackOutcome::Completed
        } else {
            RollbackOutcome::CompletedWithErrors
        };
        Self {
            outcome,
            records,
            failures,
        }
    }

    #[must_use]
    pub fn outcome(&self) -> RollbackOutcome {
        self.outcome
    }

    /// True unless an undo action failed.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        match self.outcome {
            RollbackOutcome::Disabled
            | RollbackOutcome::NothingToRollBack
            | RollbackOutcome::Completed => true,
            RollbackOutcome::CompletedWithErrors => false,
            RollbackOutcome::AlreadyUnwound { succeeded } => succeeded,
        }
    }

    /// Attempted actions, most recently registered first.
    #[must_use]
    pub fn records(&self) -> &[ActionRecord] {
        &self.records
    }

    #[must_use]
    pub fn failures(&self) -> &[UnwindFailure<E>] {
        &self.failures
    }

    /// Consume the report, keeping only the failures.
    #[must_use]
    pub fn into_failures(self) -> Vec<UnwindFailure<E>> {
        self.failures
    }

    /// One line per attempted action for display.
    #[must_use]
    pub fn summary(&self) -> String {
        self.records
            .iter()
            .map(|record| {
                let status = match record.status {
                    ActionStatus::Reverted => "↩",
                    ActionStatus::Failed => "⚠",
                };
                format!("{status} {}", record.description)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UnwindError;

    fn record(description: &str, status: ActionStatus) -> ActionRecord {
        let now = Instant::now();
        ActionRecord {
            description: description.to_string(),
            status,
            started_at: now,
            completed_at: now,
        }
    }

    #[test]
    fn skipped_report_has_no_records() {
        let report: RollbackReport<String> = RollbackReport::skipped(RollbackOutcome::Disabled);

        assert!(report.records().is_empty());
        assert!(report.failures().is_empty());
        assert!(report.succeeded());
    }

    #[test]
    fn unwound_without_failures_is_completed() {
        let report: RollbackReport<String> =
            RollbackReport::unwound(vec![record("Stop services", ActionStatus::Reverted)], vec![]);

        assert_eq!(report.outcome(), RollbackOutcome::Completed);
        assert!(report.succeeded());
    }

    #[test]
    fn unwound_with_failures_is_completed_with_errors() {
        let failure = UnwindFailure {
            description: "Stop services".to_string(),
            error: UnwindError::Failed("daemon unreachable".to_string()),
        };
        let report =
            RollbackReport::unwound(vec![record("Stop services", ActionStatus::Failed)], vec![failure]);

        assert_eq!(report.outcome(), RollbackOutcome::CompletedWithErrors);
        assert!(!report.succeeded());
        assert_eq!(report.into_failures().len(), 1);
    }

    #[test]
    fn already_unwound_reports_earlier_result() {
        let report: RollbackReport<String> =
            RollbackReport::skipped(RollbackOutcome::AlreadyUnwound { succeeded: false });

        assert!(!report.succeeded());
    }

    #[test]
    fn summary_marks_reverted_and_failed_actions() {
        let report: RollbackReport<String> = RollbackReport::unwound(
            vec![
                record("Stop services", ActionStatus::Reverted),
                record("Remove .env file", ActionStatus::Failed),
            ],
            vec![],
        );

        let summary = report.summary();

        assert!(summary.contains("↩ Stop services"));
        assert!(summary.contains("⚠ Remove .env file"));
    }
}
