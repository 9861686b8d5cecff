use crate::adapters::http::DEFAULT_API_BASE;
use crate::core::description::Boilerplate;
use crate::domain::model::AuthorOverride;
use crate::utils::error::{Result, SyncError};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::Path;

lazy_static! {
    static ref ENV_VAR: Regex = Regex::new(r"\$\{([^}]+)\}").unwrap();
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub zenodo: ZenodoConfig,
    pub community: CommunityConfig,
    pub sources: SourcesConfig,
    pub description: Boilerplate,
    pub author_overrides: AuthorOverrides,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZenodoConfig {
    pub api_base: String,
    pub timeout_seconds: u64,
}

impl Default for ZenodoConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunityConfig {
    pub id: String,
    /// Record attached when no id is given on the command line.
    pub record_id: String,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            id: "es-replication-repository".to_string(),
            record_id: "17861977".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub root: String,
    pub titlepage: String,
    pub readme: String,
    /// Draft populated when no id is given on the command line.
    pub draft_id: String,
    pub repository_url: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            root: "HAFiscal-QE".to_string(),
            titlepage: "Subfiles/HAFiscal-titlepage.tex".to_string(),
            readme: "README.md".to_string(),
            draft_id: "18065765".to_string(),
            repository_url: "https://github.com/llorracc/HAFiscal-QE".to_string(),
        }
    }
}

/// `[[author_overrides]]` entries; an explicit empty list disables the
/// built-in table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorOverrides(pub Vec<AuthorOverride>);

impl Default for AuthorOverrides {
    fn default() -> Self {
        Self(vec![AuthorOverride {
            surname: "Carroll".to_string(),
            orcid: Some("0000-0003-3732-9312".to_string()),
            affiliation: None,
            split_affiliation_on_and: true,
        }])
    }
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SyncError::ConfigError {
                message: format!("configuration file {} not found", path.display()),
            },
            _ => SyncError::Io(e),
        })?;
        Self::from_toml_str(&content)
    }

    /// Built-in defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                Self::from_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed)?)
    }

    /// Replaces `${VAR}` with the environment value; unknown names are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &Captures| {
                let name = &caps[1];
                std::env::var(name).unwrap_or_else(|_| format!("${{{}}}", name))
            })
            .into_owned()
    }
}
