//! In-memory stand-in for the Mindsay back-office
//!
//! [`MockClient`] implements [`ms_client_api::ClientApi`] over a
//! [`MockBackend`] snapshot, applies mutations to it, and records every
//! call that changes server state so tests can assert on ordering.

pub mod backend;
pub mod client;
pub mod prompts;

pub use backend::MockBackend;
pub use client::{MockCall, MockClient};
pub use prompts::{ScriptedConfirmations, StaticPasswords};
