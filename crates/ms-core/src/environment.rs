//! Instance, language and experiment selection

use std::fmt;
use std::str::FromStr;

use ms_client_api::ClientApi;
use ms_rest_api_contract::CurrentEnvironment;
use tracing::debug;

use crate::{Error, Result};

/// How the operator names the instance to work on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceRef {
    Id(i64),
    Name(String),
}

impl FromStr for InstanceRef {
    type Err = std::convert::Infallible;

    /// Numeric input is an id, anything else an exact instance name
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(id) => InstanceRef::Id(id),
            Err(_) => InstanceRef::Name(s.to_string()),
        })
    }
}

impl fmt::Display for InstanceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceRef::Id(id) => write!(f, "#{}", id),
            InstanceRef::Name(name) => f.write_str(name),
        }
    }
}

/// Server-side scope a migration runs in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentSelection {
    pub instance: InstanceRef,
    pub language: String,
    pub experiment_id: Option<i64>,
}

/// Select instance, then language, then experiment (when given)
pub async fn setup_environment<C>(
    client: &C,
    selection: &EnvironmentSelection,
) -> Result<CurrentEnvironment>
where
    C: ClientApi + ?Sized,
{
    let instance_id = match &selection.instance {
        InstanceRef::Id(id) => *id,
        InstanceRef::Name(name) => resolve_instance(client, name).await?,
    };

    client.set_current_instance(instance_id).await?;
    let mut environment = client.set_current_language(&selection.language).await?;

    if let Some(experiment_id) = selection.experiment_id {
        environment = client.set_current_experiment(experiment_id).await?;
    }

    Ok(environment)
}

/// Id of the first instance whose name matches exactly
async fn resolve_instance<C>(client: &C, name: &str) -> Result<i64>
where
    C: ClientApi + ?Sized,
{
    let instances = client.list_instances().await?;
    let instance = instances
        .iter()
        .find(|instance| instance.name == name)
        .ok_or_else(|| Error::InstanceNotFound(name.to_string()))?;
    debug!("resolved instance {:?} to id {}", name, instance.id);
    Ok(instance.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_ref_parsing() {
        assert_eq!("42".parse::<InstanceRef>().unwrap(), InstanceRef::Id(42));
        assert_eq!(
            "Benchmark NLP - test".parse::<InstanceRef>().unwrap(),
            InstanceRef::Name("Benchmark NLP - test".to_string())
        );
    }

    #[test]
    fn test_instance_ref_display() {
        assert_eq!(InstanceRef::Id(3).to_string(), "#3");
        assert_eq!(InstanceRef::Name("Benchmark".into()).to_string(), "Benchmark");
    }
}
