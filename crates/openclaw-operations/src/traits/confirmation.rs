use crate::Result;

pub trait ConfirmationProvider: Send + Sync {
    /// Ask a yes/no question. Declining is `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the interaction cannot be completed.
    fn confirm(&self, prompt: &str) -> Result<bool>;
}
