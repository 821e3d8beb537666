use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag set when the user asks the current workflow to stop.
///
/// Clones observe the same flag. Running commands are killed once it is
/// triggered and workflows check it between steps.
#[derive(Debug, Clone, Default)]
pub struct InterruptSignal {
    triggered: Arc<AtomicBool>,
}

impl InterruptSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.triggered.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Clear the flag so cleanup commands can run after an interrupt.
    ///
    /// A later trigger stops those commands again.
    pub fn reset(&self) {
        self.triggered.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_signal_is_not_triggered() {
        assert!(!InterruptSignal::new().is_triggered());
    }

    #[test]
    fn clones_share_state() {
        let signal = InterruptSignal::new();
        let handler_copy = signal.clone();

        handler_copy.trigger();

        assert!(signal.is_triggered());
    }

    #[test]
    fn reset_clears_every_clone() {
        let signal = InterruptSignal::new();
        let handler_copy = signal.clone();
        handler_copy.trigger();

        signal.reset();

        assert!(!handler_copy.is_triggered());
    }

    #[test]
    fn trigger_is_visible_across_threads() {
        let signal = InterruptSignal::new();
        let remote = signal.clone();

        std::thread::spawn(move || remote.trigger())
            .join()
            .expect("thread should not panic");

        assert!(signal.is_triggered());
    }
}
