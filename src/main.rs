use clap::Parser;
use std::path::PathBuf;
use zenodo_sync::config::toml_config::TomlConfig;
use zenodo_sync::config::Workflow;
use zenodo_sync::utils::{logger, validation::Validate};
use zenodo_sync::{
    CliConfig, LocalStorage, MetadataPipeline, Settings, SyncEngine, SyncError, SyncOutcome,
    ZenodoClient,
};

#[derive(Parser)]
#[command(name = "populate-zenodo-metadata")]
#[command(about = "Populate a Zenodo draft from the replication repository's title page and README")]
struct Args {
    #[command(flatten)]
    common: CliConfig,

    /// Root of the replication repository checkout
    #[arg(long)]
    source_root: Option<PathBuf>,
}

const RULE: &str = "======================================================================";

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logger::init(args.common.verbose, args.common.log_json);

    println!("{}", RULE);
    println!("Populate Zenodo Metadata from Replication Sources");
    println!("{}", RULE);
    println!();

    if let Err(e) = run(args).await {
        report_failure(&e);
        std::process::exit(e.exit_code());
    }
}

async fn run(args: Args) -> zenodo_sync::Result<()> {
    let file = TomlConfig::load(args.common.config.as_deref())?;
    let settings = Settings::resolve(&args.common, file, Workflow::PopulateMetadata)?
        .with_source_root(args.source_root);
    settings.validate()?;
    tracing::debug!(
        "Sources: {} ({}, {})",
        settings.source_root.display(),
        settings.titlepage_path,
        settings.readme_path
    );

    println!("Draft ID: {}", settings.record_id);
    println!("Sources: {}", settings.source_root.display());
    println!();

    let client = ZenodoClient::new(&settings.api_base, &settings.access_token, settings.timeout)?;
    let storage = LocalStorage::new(settings.source_root.clone());
    let engine = SyncEngine::new(MetadataPipeline::new(client, storage, settings));

    match engine.run().await? {
        SyncOutcome::DryRun { record_id, metadata } => {
            println!("Dry run: metadata that would be sent to draft {}:", record_id);
            println!("{}", serde_json::to_string_pretty(&metadata)?);
        }
        outcome => {
            println!();
            println!("{}", RULE);
            println!("✅ SUCCESS: Metadata populated");
            println!("{}", RULE);
            println!();
            println!("Draft URL: https://zenodo.org/deposit/{}", outcome.record_id());
            println!();
        }
    }
    Ok(())
}

fn report_failure(e: &SyncError) {
    tracing::error!(
        "Metadata population failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    if let Some(body) = e.response_body() {
        eprintln!();
        eprintln!("Response: {}", body);
    }
}
