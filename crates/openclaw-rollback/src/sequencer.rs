use std::fmt::{self, Display};
use std::time::Instant;

use tracing::{Span, debug, info, warn};

use crate::action::RollbackAction;
use crate::error::UnwindFailure;
use crate::report::{ActionRecord, ActionStatus, RollbackOutcome, RollbackReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Accumulating,
    Unwound { succeeded: bool },
}

/// Records undo actions during a forward workflow and runs them in reverse
/// when the workflow fails.
///
/// A sequencer belongs to exactly one workflow invocation. It starts out
/// accumulating; the first call to [`execute`](Self::execute) moves it to the
/// terminal unwound phase, after which nothing registered on it will run.
///
/// The lifetime `'a` bounds what undo closures may borrow, typically the
/// container engine and filesystem collaborators of the owning workflow.
pub struct RollbackSequencer<'a, E> {
    enabled: bool,
    log: Vec<RollbackAction<'a, E>>,
    phase: Phase,
    span: Span,
}

impl<'a, E> RollbackSequencer<'a, E> {
    /// Create an enabled, empty sequencer attributed to the current span.
    #[must_use]
    pub fn new() -> Self {
        Self::with_span(Span::current())
    }

    /// Create an enabled, empty sequencer whose log lines are emitted inside
    /// `span`.
    #[must_use]
    pub fn with_span(span: Span) -> Self {
        Self {
            enabled: true,
            log: Vec::new(),
            phase: Phase::Accumulating,
            span,
        }
    }

    /// Append an undo action. The action is never run here.
    pub fn add_action<F>(&mut self, description: impl Into<String>, operation: F)
    where
        F: FnMut() -> Result<(), E> + 'a,
    {
        let action = RollbackAction::new(description, operation);
        let _entered = self.span.enter();
        if self.is_unwound() {
            debug!(
                action = action.description(),
                "rollback already executed; late action will not run"
            );
        } else {
            debug!(action = action.description(), "added rollback action");
        }
        self.log.push(action);
    }

    /// Turn `execute` into a no-op that leaves partial state in place.
    ///
    /// The log is kept as is.
    pub fn disable(&mut self) {
        let _entered = self.span.enter();
        self.enabled = false;
        debug!("rollback disabled");
    }

    /// Forget every registered action.
    pub fn clear(&mut self) {
        let _entered = self.span.enter();
        self.log.clear();
        debug!("rollback actions cleared");
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn is_unwound(&self) -> bool {
        matches!(self.phase, Phase::Unwound { .. })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.log.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Descriptions of the registered actions in registration order.
    pub fn descriptions(&self) -> impl Iterator<Item = &str> + '_ {
        self.log.iter().map(RollbackAction::description)
    }
}

impl<E> RollbackSequencer<'_, E>
where
    E: Display,
{
    /// Unwind every registered action, most recent first.
    ///
    /// Returns `true` when rollback is disabled, the log is empty, or every
    /// action succeeded. Failures of individual actions are logged and
    /// reported through the return value, never raised.
    pub fn execute(&mut self) -> bool {
        self.execute_with_report().succeeded()
    }

    /// Unwind like [`execute`](Self::execute) and return a record of every
    /// attempted action.
    pub fn execute_with_report(&mut self) -> RollbackReport<E> {
        let span = self.span.clone();
        let _entered = span.enter();

        if !self.enabled {
            info!(
                pending = self.log.len(),
                "rollback is disabled, leaving partial state in place"
            );
            self.phase = Phase::Unwound { succeeded: true };
            return RollbackReport::skipped(RollbackOutcome::Disabled);
        }

        if let Phase::Unwound { succeeded } = self.phase {
            debug!("rollback already executed, skipping");
            return RollbackReport::skipped(RollbackOutcome::AlreadyUnwound { succeeded });
        }

        if self.log.is_empty() {
            info!("nothing to roll back");
            self.phase = Phase::Unwound { succeeded: true };
            return RollbackReport::skipped(RollbackOutcome::NothingToRollBack);
        }

        warn!(actions = self.log.len(), "executing rollback");

        let mut records = Vec::with_capacity(self.log.len());
        let mut failures = Vec::new();

        for action in self.log.iter_mut().rev() {
            let description = action.description().to_string();
            info!(action = %description, "rolling back");

            let started_at = Instant::now();
            let result = action.invoke();
            let completed_at = Instant::now();

            let status = match result {
                Ok(()) => ActionStatus::Reverted,
                Err(error) => {
                    warn!(action = %description, %error, "rollback action failed");
                    failures.push(UnwindFailure {
                        description: description.clone(),
                        error,
                    });
                    ActionStatus::Failed
                }
            };

            records.push(ActionRecord {
                description,
                status,
                started_at,
                completed_at,
            });
        }

        let succeeded = failures.is_empty();
        if succeeded {
            info!("rollback completed successfully");
        } else {
            warn!(failed = failures.len(), "rollback completed with errors");
        }

        self.phase = Phase::Unwound { succeeded };
        RollbackReport::unwound(records, failures)
    }
}

impl<E> Default for RollbackSequencer<'_, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for RollbackSequencer<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RollbackSequencer")
            .field("enabled", &self.enabled)
            .field("phase", &self.phase)
            .field("log", &self.log)
            .finish_non_exhaustive()
    }
}
