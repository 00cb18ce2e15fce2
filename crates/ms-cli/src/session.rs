//! Sign-in options shared by every command

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use ms_rest_client::{ClientConfig, RestClient};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::console::ConsolePrompts;

#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    /// Account used to sign in
    #[arg(long, env = "MINDSAY_EMAIL", global = true)]
    pub email: Option<String>,

    /// Work on the production back-office instead of staging
    #[arg(long, global = true)]
    pub production: bool,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl SessionArgs {
    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(self.production)
    }

    /// Sign in, prompting on the terminal for the password and emailed code
    pub async fn connect(&self) -> Result<RestClient> {
        let email = self
            .email
            .as_deref()
            .context("--email (or MINDSAY_EMAIL) is required to sign in")?;
        debug!("signing in as {} on {}", email, self.config().environment);

        let client =
            RestClient::connect(self.config(), email, &ConsolePrompts, Arc::new(ConsolePrompts))
                .await
                .with_context(|| format!("Failed to sign in as {}", email))?;
        Ok(client)
    }
}

/// Log to stderr so stdout only carries command output
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
