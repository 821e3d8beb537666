use dialoguer::Confirm;
use openclaw_operations::traits::ConfirmationProvider;
use openclaw_operations::{OperationError, Result};

/// Yes/no prompts on the terminal. Declining and escaping both answer no.
pub struct TerminalConfirmation;

impl TerminalConfirmation {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalConfirmation {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfirmationProvider for TerminalConfirmation {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        let answer = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact_opt()
            .map_err(|e| match e {
                dialoguer::Error::IO(io_err) => OperationError::Interaction(io_err),
            })?;
        Ok(answer.unwrap_or(false))
    }
}
