//! Environment setup and data-migration procedures for the Mindsay
//! back-office.
//!
//! Every procedure talks to the back-office through
//! [`ms_client_api::ClientApi`] and issues its calls strictly in sequence.
//! The first failing call stops the procedure and is returned; calls that
//! already succeeded stay applied.

pub mod entity_types;
pub mod environment;
pub mod error;
pub mod image_templates;

/// Core result type used by the migration procedures.
pub type Result<T> = std::result::Result<T, Error>;

pub use error::Error;

/// Instance/language/experiment selection.
pub use environment::{setup_environment, EnvironmentSelection, InstanceRef};

/// Duplicate image template collapsing and its sanity check.
pub use image_templates::{
    assert_image_templates_unique, collapse_duplicate_image_templates, duplicate_groups,
    image_templates_are_unique, plan_repoints, CollapseReport, CollapsedGroup, DuplicateGroup,
};

/// Entity type replacement across all intents.
pub use entity_types::{
    replace_entity_type, EntityTypeRef, EntityTypeReplacement, ReplaceReport, UpdatedUserNode,
};
