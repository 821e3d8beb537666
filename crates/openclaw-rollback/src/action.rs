use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crate::error::UnwindError;

type UndoFn<'a, E> = Box<dyn FnMut() -> Result<(), E> + 'a>;

/// One reversible step: a label plus a fully bound undo operation.
///
/// Everything the operation needs is moved into the closure when the action
/// is created, so later changes to the workflow's configuration do not leak
/// into the undo.
pub struct RollbackAction<'a, E> {
    description: String,
    operation: UndoFn<'a, E>,
}

impl<'a, E> RollbackAction<'a, E> {
    /// Bind an undo operation to a description.
    pub fn new<F>(description: impl Into<String>, operation: F) -> Self
    where
        F: FnMut() -> Result<(), E> + 'a,
    {
        Self {
            description: description.into(),
            operation: Box::new(operation),
        }
    }

    /// Human-readable label used for reporting.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Run the operation, turning a panic into an [`UnwindError::Panicked`].
    pub(crate) fn invoke(&mut self) -> Result<(), UnwindError<E>> {
        match panic::catch_unwind(AssertUnwindSafe(|| (self.operation)())) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(error)) => Err(UnwindError::Failed(error)),
            Err(payload) => Err(UnwindError::Panicked(panic_message(payload.as_ref()))),
        }
    }
}

impl<E> fmt::Debug for RollbackAction<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RollbackAction")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
