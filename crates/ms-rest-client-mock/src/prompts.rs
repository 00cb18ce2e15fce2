//! Scripted operator input

use std::collections::VecDeque;
use std::sync::Mutex;

use ms_client_api::{ConfirmationProvider, PasswordProvider, PromptError, PromptResult};

/// Fixed credentials; records which secrets were requested
#[derive(Debug)]
pub struct StaticPasswords {
    password: String,
    one_time_code: Option<String>,
    requested: Mutex<Vec<&'static str>>,
}

impl StaticPasswords {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            one_time_code: None,
            requested: Mutex::default(),
        }
    }

    pub fn with_one_time_code(mut self, code: impl Into<String>) -> Self {
        self.one_time_code = Some(code.into());
        self
    }

    /// `"password"` / `"one_time_code"` in request order
    pub fn requested(&self) -> Vec<&'static str> {
        self.requested
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn note(&self, what: &'static str) {
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(what);
        }
    }
}

impl PasswordProvider for StaticPasswords {
    fn password(&self, _email: &str) -> PromptResult<String> {
        self.note("password");
        Ok(self.password.clone())
    }

    fn one_time_code(&self, _email: &str) -> PromptResult<String> {
        self.note("one_time_code");
        self.one_time_code
            .clone()
            .ok_or_else(|| PromptError::NonInteractive("one-time code".to_string()))
    }
}

/// Answers confirmation prompts from a queue; fails once it runs dry
#[derive(Debug, Default)]
pub struct ScriptedConfirmations {
    answers: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirmations {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            prompts: Mutex::default(),
        }
    }

    /// Prompts shown so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl ConfirmationProvider for ScriptedConfirmations {
    fn ask(&self, prompt: &str) -> PromptResult<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        self.answers
            .lock()
            .map_err(|e| PromptError::Io(e.to_string()))?
            .pop_front()
            .ok_or_else(|| PromptError::NonInteractive(prompt.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ms_client_api::verify_prompt;

    #[test]
    fn test_scripted_confirmations_in_order() {
        let confirmations = ScriptedConfirmations::new(["Benchmark", "y"]);
        assert!(verify_prompt(&confirmations, "instance? ", "Benchmark").is_ok());
        assert!(verify_prompt(&confirmations, "replace? ", "y").is_ok());
        assert!(matches!(
            confirmations.ask("again? "),
            Err(PromptError::NonInteractive(_))
        ));
        assert_eq!(confirmations.prompts(), vec!["instance? ", "replace? ", "again? "]);
    }

    #[test]
    fn test_static_passwords_without_code() {
        let passwords = StaticPasswords::new("hunter2");
        assert_eq!(passwords.password("a@b.c").unwrap(), "hunter2");
        assert!(passwords.one_time_code("a@b.c").is_err());
        assert_eq!(passwords.requested(), vec!["password", "one_time_code"]);
    }
}
