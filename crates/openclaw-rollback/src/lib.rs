//! Rollback sequencing for multi-step deployment workflows.
//!
//! A workflow registers one undo action after each forward step that leaves
//! externally visible state behind. If a later step fails, the workflow calls
//! [`RollbackSequencer::execute`], which runs the registered actions in
//! reverse registration order (LIFO). A failing or panicking undo action is
//! logged and counted, but never stops the remaining actions and never
//! propagates to the caller.
//!
//! ```
//! use std::cell::RefCell;
//!
//! use openclaw_rollback::RollbackSequencer;
//!
//! let calls = RefCell::new(Vec::new());
//! let mut rollback: RollbackSequencer<'_, std::io::Error> = RollbackSequencer::new();
//!
//! rollback.add_action("remove config file", || {
//!     calls.borrow_mut().push("remove-file");
//!     Ok(())
//! });
//! rollback.add_action("stop services", || {
//!     calls.borrow_mut().push("stop-service");
//!     Ok(())
//! });
//!
//! assert!(rollback.execute());
//! assert_eq!(*calls.borrow(), ["stop-service", "remove-file"]);
//! ```

mod action;
mod error;
mod report;
mod sequencer;

pub use action::RollbackAction;
pub use error::{UnwindError, UnwindFailure};
pub use report::{ActionRecord, ActionStatus, RollbackOutcome, RollbackReport};
pub use sequencer::RollbackSequencer;
