use thiserror::Error;

/// Why a single undo action did not complete.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UnwindError<E> {
    /// The action returned an error.
    #[error("{0}")]
    Failed(E),

    /// The action panicked. Holds the panic message when it was a string.
    #[error("undo action panicked: {0}")]
    Panicked(String),
}

/// An undo action that failed while the sequencer was unwinding.
#[derive(Debug, Error)]
#[error("rollback action '{description}' failed")]
pub struct UnwindFailure<E> {
    /// Description the action was registered with.
    pub description: String,
    /// What went wrong.
    #[source]
    pub error: UnwindError<E>,
}
