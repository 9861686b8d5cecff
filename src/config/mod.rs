pub mod toml_config;

use crate::core::description::Boilerplate;
use crate::domain::model::AuthorOverride;
use crate::utils::error::{Result, SyncError};
use crate::utils::validation::{self, Validate};
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;
use toml_config::TomlConfig;

pub const ACCESS_TOKEN_ENV: &str = "ZENODO_ACCESS_TOKEN";

/// Arguments shared by both command-line tools.
#[derive(Debug, Clone, Default, Args)]
pub struct CliConfig {
    /// Record or draft ID (from the DOI: 10.5281/zenodo.17861977 -> 17861977)
    pub record_id: Option<String>,

    /// Zenodo personal access token, used when ZENODO_ACCESS_TOKEN is unset
    pub access_token: Option<String>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the Zenodo API base URL
    #[arg(long)]
    pub api_base: Option<String>,

    /// Compute the update and print it without changing anything remotely
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workflow {
    AddCommunity,
    PopulateMetadata,
}

/// Fully resolved run configuration: command line over TOML over defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_base: String,
    pub access_token: String,
    pub record_id: String,
    pub timeout: Duration,
    pub dry_run: bool,
    pub community_id: String,
    pub source_root: PathBuf,
    pub titlepage_path: String,
    pub readme_path: String,
    pub repository_url: String,
    pub boilerplate: Boilerplate,
    pub author_overrides: Vec<AuthorOverride>,
}

impl Settings {
    pub fn resolve(cli: &CliConfig, file: TomlConfig, workflow: Workflow) -> Result<Self> {
        let access_token = pick_access_token(
            std::env::var(ACCESS_TOKEN_ENV).ok(),
            cli.access_token.clone(),
        )
        .ok_or(SyncError::MissingCredential)?;

        let default_id = match workflow {
            Workflow::AddCommunity => file.community.record_id,
            Workflow::PopulateMetadata => file.sources.draft_id,
        };

        Ok(Self {
            api_base: cli.api_base.clone().unwrap_or(file.zenodo.api_base),
            access_token,
            record_id: cli.record_id.clone().unwrap_or(default_id),
            timeout: Duration::from_secs(file.zenodo.timeout_seconds),
            dry_run: cli.dry_run,
            community_id: file.community.id,
            source_root: PathBuf::from(file.sources.root),
            titlepage_path: file.sources.titlepage,
            readme_path: file.sources.readme,
            repository_url: file.sources.repository_url,
            boilerplate: file.description,
            author_overrides: file.author_overrides.0,
        })
    }

    pub fn with_community(mut self, community_id: Option<String>) -> Self {
        if let Some(id) = community_id {
            self.community_id = id;
        }
        self
    }

    pub fn with_source_root(mut self, source_root: Option<PathBuf>) -> Self {
        if let Some(root) = source_root {
            self.source_root = root;
        }
        self
    }
}

/// The environment variable wins; the positional argument is the fallback.
/// Blank values count as unset.
pub fn pick_access_token(from_env: Option<String>, from_args: Option<String>) -> Option<String> {
    let usable = |t: &String| !t.trim().is_empty();
    from_env.filter(usable).or_else(|| from_args.filter(usable))
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("zenodo.api_base", &self.api_base)?;
        validation::validate_non_empty_string("access_token", &self.access_token)?;
        validation::validate_record_id("record_id", &self.record_id)?;
        validation::validate_non_empty_string("community.id", &self.community_id)?;
        validation::validate_path("sources.titlepage", &self.titlepage_path)?;
        validation::validate_path("sources.readme", &self.readme_path)?;
        validation::validate_url("sources.repository_url", &self.repository_url)?;
        if self.timeout.is_zero() {
            return Err(SyncError::InvalidConfigValueError {
                field: "zenodo.timeout_seconds".to_string(),
                value: "0".to_string(),
                reason: "Timeout must be at least one second".to_string(),
            });
        }
        Ok(())
    }
}
