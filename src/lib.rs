pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{LocalStorage, ZenodoClient};
pub use app::pipelines::{CommunityPipeline, MetadataPipeline};
pub use config::{CliConfig, Settings};
pub use core::engine::SyncEngine;
pub use domain::ports::SyncOutcome;
pub use utils::error::{Result, SyncError};
