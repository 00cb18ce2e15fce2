//! Read-only access to back-office records

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, ValueEnum};
use ms_core::{setup_environment, EnvironmentSelection, InstanceRef};
use ms_rest_api_contract::RecordId;
use ms_rest_client::RestClient;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::migrate::print_json;
use crate::session::SessionArgs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Resource {
    Environment,
    Instances,
    Bots,
    Experiments,
    EntityType,
    Services,
    UserNodes,
    UserNodesFull,
    Intent,
    MachineNodes,
    CaseStatements,
    Answers,
    ImageTemplates,
    KnowledgeBases,
    ApiConnectors,
    Channels,
}

impl Resource {
    fn label(self) -> String {
        self.to_possible_value()
            .map(|value| value.get_name().to_string())
            .unwrap_or_else(|| format!("{:?}", self))
    }
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Kind of record to fetch
    #[arg(value_enum)]
    pub resource: Resource,

    /// Record id (a UUID for channels); lists all records when omitted
    pub id: Option<String>,

    /// Select this instance (name or id) first
    #[arg(long, requires = "language")]
    pub instance: Option<InstanceRef>,

    #[arg(long, requires = "instance")]
    pub language: Option<String>,

    #[arg(long, requires = "instance")]
    pub experiment: Option<i64>,
}

impl GetArgs {
    pub fn selection(&self) -> Option<EnvironmentSelection> {
        let instance = self.instance.clone()?;
        let language = self.language.clone()?;
        Some(EnvironmentSelection {
            instance,
            language,
            experiment_id: self.experiment,
        })
    }

    pub async fn run(self, session: &SessionArgs) -> Result<()> {
        let client = session.connect().await?;
        if let Some(selection) = self.selection() {
            setup_environment(&client, &selection).await?;
        }

        let value = self.fetch(&client).await?;
        print_json(&value)
    }

    async fn fetch(&self, client: &RestClient) -> Result<Value> {
        let id = self.id.as_deref();
        match self.resource {
            Resource::Environment => {
                self.no_id()?;
                to_json(client.get_current_environment().await?)
            }
            Resource::Instances => match id {
                None => to_json(client.list_instances().await?),
                Some(id) => to_json(client.get_instance(parse_id(id)?).await?),
            },
            Resource::Bots => {
                self.no_id()?;
                to_json(client.list_bots().await?)
            }
            Resource::Experiments => {
                self.no_id()?;
                to_json(client.list_experiments().await?)
            }
            Resource::EntityType => to_json(client.get_entity_type(self.required_id()?).await?),
            Resource::Services => match id {
                None => to_json(client.list_services().await?),
                Some(id) => to_json(client.get_service(parse_id(id)?).await?),
            },
            Resource::UserNodes => match id {
                None => to_json(client.list_user_nodes().await?),
                Some(id) => to_json(client.get_user_node(parse_id(id)?).await?),
            },
            Resource::UserNodesFull => {
                self.no_id()?;
                to_json(client.list_user_nodes_full().await?)
            }
            Resource::Intent => to_json(client.get_intent(self.required_id()?).await?),
            Resource::MachineNodes => match id {
                None => to_json(client.list_machine_nodes().await?),
                Some(id) => to_json(client.get_machine_node(parse_id(id)?).await?),
            },
            Resource::CaseStatements => match id {
                None => to_json(client.list_case_statements().await?),
                Some(id) => to_json(client.get_case_statement(parse_id(id)?).await?),
            },
            Resource::Answers => match id {
                None => to_json(client.list_answers().await?),
                Some(id) => to_json(client.get_answer(parse_id(id)?).await?),
            },
            Resource::ImageTemplates => {
                self.no_id()?;
                to_json(client.list_image_templates().await?)
            }
            Resource::KnowledgeBases => match id {
                None => to_json(client.list_knowledge_bases().await?),
                Some(id) => to_json(client.get_knowledge_base(parse_id(id)?).await?),
            },
            Resource::ApiConnectors => match id {
                None => to_json(client.list_api_connectors().await?),
                Some(id) => to_json(client.get_api_connector(parse_id(id)?).await?),
            },
            Resource::Channels => match id {
                None => to_json(client.list_channels().await?),
                Some(id) => {
                    let uuid = Uuid::parse_str(id)
                        .with_context(|| format!("Invalid channel UUID: {}", id))?;
                    to_json(client.get_channel(uuid).await?)
                }
            },
        }
    }

    fn required_id(&self) -> Result<RecordId> {
        let id = self
            .id
            .as_deref()
            .ok_or_else(|| anyhow!("{} requires an id", self.resource.label()))?;
        parse_id(id)
    }

    fn no_id(&self) -> Result<()> {
        if self.id.is_some() {
            bail!("{} does not take an id", self.resource.label());
        }
        Ok(())
    }
}

pub fn parse_id(id: &str) -> Result<RecordId> {
    id.parse()
        .with_context(|| format!("Invalid record id: {}", id))
}

fn to_json<T: Serialize>(value: T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(parse_id("forty-two").is_err());
    }

    #[test]
    fn test_resource_label_matches_command_line_name() {
        assert_eq!(Resource::UserNodesFull.label(), "user-nodes-full");
        assert_eq!(Resource::EntityType.label(), "entity-type");
    }
}
