//! Migration commands

use anyhow::Result;
use clap::Args;
use ms_core::{
    assert_image_templates_unique, collapse_duplicate_image_templates, replace_entity_type,
    setup_environment, EntityTypeReplacement, EnvironmentSelection, InstanceRef,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::console::ConsolePrompts;
use crate::session::SessionArgs;

/// Instance, language and experiment a migration runs in
#[derive(Args, Debug, Clone)]
pub struct EnvironmentArgs {
    /// Instance name (exact match) or numeric id
    #[arg(long)]
    pub instance: InstanceRef,

    /// Bot language, e.g. fr_FR
    #[arg(long)]
    pub language: String,

    /// Experiment id, for bots that use experiments
    #[arg(long)]
    pub experiment: Option<i64>,
}

impl EnvironmentArgs {
    pub fn selection(&self) -> EnvironmentSelection {
        EnvironmentSelection {
            instance: self.instance.clone(),
            language: self.language.clone(),
            experiment_id: self.experiment,
        }
    }
}

#[derive(Args, Debug)]
pub struct DedupArgs {
    #[command(flatten)]
    pub environment: EnvironmentArgs,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl DedupArgs {
    pub async fn run(self, session: &SessionArgs) -> Result<()> {
        let client = session.connect().await?;
        setup_environment(&client, &self.environment.selection()).await?;

        let report = collapse_duplicate_image_templates(&client).await?;
        assert_image_templates_unique(&client).await?;

        if self.json {
            print_json(&report)?;
        } else {
            println!(
                "Collapsed {} duplicated names: {} templates updated, {} image templates deleted",
                report.groups.len(),
                report.updated_template_count(),
                report.deleted_image_template_count()
            );
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub environment: EnvironmentArgs,
}

impl CheckArgs {
    pub async fn run(self, session: &SessionArgs) -> Result<()> {
        let client = session.connect().await?;
        setup_environment(&client, &self.environment.selection()).await?;

        assert_image_templates_unique(&client).await?;
        info!("Image template names are unique");
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ReplaceArgs {
    #[command(flatten)]
    pub environment: EnvironmentArgs,

    /// Entity type to replace
    #[arg(long)]
    pub old: i64,

    /// Entity type to use instead
    #[arg(long)]
    pub new: i64,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl ReplaceArgs {
    pub fn replacement(&self) -> EntityTypeReplacement {
        EntityTypeReplacement {
            old: self.old,
            new: self.new,
        }
    }

    pub async fn run(self, session: &SessionArgs) -> Result<()> {
        let client = session.connect().await?;
        setup_environment(&client, &self.environment.selection()).await?;

        let report = replace_entity_type(&client, &ConsolePrompts, self.replacement()).await?;

        if self.json {
            print_json(&report)?;
        } else {
            println!(
                "Replaced entity type {} by {} in {} entities across {} user nodes ({} skipped)",
                report.old.name,
                report.new.name,
                report.updated_entity_count(),
                report.updated.len(),
                report.skipped_user_nodes
            );
        }
        let untrained = report.deploy_skipped();
        if !untrained.is_empty() {
            warn!("User nodes not retrained (no intent to deploy): {:?}", untrained);
        }
        Ok(())
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
