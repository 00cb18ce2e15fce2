//! Operator input providers
//!
//! Credential and confirmation input is injected so the sign-in flow and
//! the migrations can run against scripted answers in tests.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Failed to read input: {0}")]
    Io(String),

    #[error("Non-interactive environment, cannot prompt for {0}")]
    NonInteractive(String),

    #[error("Expected {expected}, got {got}")]
    Mismatch { expected: String, got: String },
}

pub type PromptResult<T> = Result<T, PromptError>;

/// Source of the secrets needed to open a session
pub trait PasswordProvider: Send + Sync {
    /// Password for `email`
    fn password(&self, email: &str) -> PromptResult<String>;

    /// One-time code emailed to `email` after a password sign-in
    fn one_time_code(&self, email: &str) -> PromptResult<String>;
}

/// Source of typed confirmations for irreversible actions
pub trait ConfirmationProvider: Send + Sync {
    /// Show `prompt` and return what the operator typed, without the line ending
    fn ask(&self, prompt: &str) -> PromptResult<String>;
}

/// Ask `prompt` and fail unless the answer is exactly `expected`
pub fn verify_prompt(
    provider: &dyn ConfirmationProvider,
    prompt: &str,
    expected: &str,
) -> PromptResult<()> {
    let got = provider.ask(prompt)?;
    if got == expected {
        Ok(())
    } else {
        Err(PromptError::Mismatch {
            expected: expected.to_string(),
            got,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    impl ConfirmationProvider for Fixed {
        fn ask(&self, _prompt: &str) -> PromptResult<String> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_verify_prompt_exact_match() {
        assert!(verify_prompt(&Fixed("Benchmark NLP"), "confirm: ", "Benchmark NLP").is_ok());
    }

    #[test]
    fn test_verify_prompt_mismatch() {
        let err = verify_prompt(&Fixed("benchmark nlp"), "confirm: ", "Benchmark NLP").unwrap_err();
        match err {
            PromptError::Mismatch { expected, got } => {
                assert_eq!(expected, "Benchmark NLP");
                assert_eq!(got, "benchmark nlp");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_verify_prompt_is_not_trimmed() {
        assert!(verify_prompt(&Fixed("y "), "ok? ", "y").is_err());
        assert!(verify_prompt(&Fixed("Y"), "ok? ", "y").is_err());
    }
}
