//! Back-office environment selection

use std::fmt;

use url::Url;

const STAGING_BASE_URL: &str = "https://staging-bos.destygo.com/";
const PRODUCTION_BASE_URL: &str = "https://bos.destygo.com/";

/// Which back-office deployment a session talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendEnvironment {
    #[default]
    Staging,
    Production,
}

impl BackendEnvironment {
    pub fn from_production_flag(production: bool) -> Self {
        if production {
            Self::Production
        } else {
            Self::Staging
        }
    }

    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn base_url(self) -> &'static str {
        match self {
            Self::Staging => STAGING_BASE_URL,
            Self::Production => PRODUCTION_BASE_URL,
        }
    }
}

impl fmt::Display for BackendEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Upper case so production stands out in the logs
        match self {
            Self::Staging => f.write_str("staging"),
            Self::Production => f.write_str("PRODUCTION"),
        }
    }
}

/// Connection settings for [`crate::RestClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub environment: BackendEnvironment,
    /// Replaces the environment's base URL (SSH tunnels, tests)
    pub base_url: Option<Url>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            environment: BackendEnvironment::Staging,
            base_url: None,
            user_agent: format!("mindsay-rs/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    pub fn new(production: bool) -> Self {
        Self {
            environment: BackendEnvironment::from_production_flag(production),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Base URL requests are joined against
    pub fn resolve_base_url(&self) -> Result<Url, url::ParseError> {
        match &self.base_url {
            Some(url) => Ok(url.clone()),
            None => Url::parse(self.environment.base_url()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_by_environment() {
        assert_eq!(
            ClientConfig::new(false).resolve_base_url().unwrap().as_str(),
            "https://staging-bos.destygo.com/"
        );
        assert_eq!(
            ClientConfig::new(true).resolve_base_url().unwrap().as_str(),
            "https://bos.destygo.com/"
        );
    }

    #[test]
    fn test_base_url_override() {
        let config = ClientConfig::new(true).with_base_url(Url::parse("http://localhost:8022/").unwrap());
        assert_eq!(config.resolve_base_url().unwrap().as_str(), "http://localhost:8022/");
        assert!(config.environment.is_production());
    }

    #[test]
    fn test_environment_display() {
        assert_eq!(BackendEnvironment::Staging.to_string(), "staging");
        assert_eq!(BackendEnvironment::Production.to_string(), "PRODUCTION");
    }
}
