//! Mindsay back-office REST API contract types and validation
//!
//! This crate defines the typed records exchanged with the Mindsay
//! back-office (BOS). Every JSON body is decoded into one of these types at
//! the client boundary, so a missing or malformed field fails the call that
//! fetched it instead of surfacing later in a migration.

pub mod error;
pub mod types;
pub mod validation;

pub use error::*;
pub use types::*;
