use clap::Parser;
use zenodo_sync::config::toml_config::TomlConfig;
use zenodo_sync::config::Workflow;
use zenodo_sync::utils::{logger, validation::Validate};
use zenodo_sync::{
    CliConfig, CommunityPipeline, Settings, SyncEngine, SyncError, SyncOutcome, ZenodoClient,
};

#[derive(Parser)]
#[command(name = "add-zenodo-community")]
#[command(about = "Add a Zenodo record to a community, creating a new version if it is published")]
struct Args {
    #[command(flatten)]
    common: CliConfig,

    /// Community identifier to add the record to
    #[arg(long)]
    community: Option<String>,
}

const RULE: &str = "======================================================================";

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logger::init(args.common.verbose, args.common.log_json);

    println!("{}", RULE);
    println!("Add Zenodo Record to Econometric Society Journals' Community");
    println!("{}", RULE);
    println!();

    if let Err(e) = run(args).await {
        report_failure(&e);
        std::process::exit(e.exit_code());
    }
}

async fn run(args: Args) -> zenodo_sync::Result<()> {
    let file = TomlConfig::load(args.common.config.as_deref())?;
    let settings =
        Settings::resolve(&args.common, file, Workflow::AddCommunity)?.with_community(args.community);
    settings.validate()?;

    println!("Record ID: {}", settings.record_id);
    println!("Community: {}", settings.community_id);
    println!();

    let community = settings.community_id.clone();
    let client = ZenodoClient::new(&settings.api_base, &settings.access_token, settings.timeout)?;
    let engine = SyncEngine::new(CommunityPipeline::new(client, settings));

    match engine.run().await? {
        SyncOutcome::Unchanged { .. } => {
            println!("✅ Record is already in community '{}'", community);
            println!("No changes needed.");
        }
        SyncOutcome::DryRun { record_id, metadata } => {
            println!("Dry run: metadata that would be sent for record {}:", record_id);
            println!("{}", serde_json::to_string_pretty(&metadata)?);
        }
        SyncOutcome::Updated { record_id, .. } => {
            println!();
            println!("{}", RULE);
            println!("✅ SUCCESS: Record updated");
            println!("{}", RULE);
            println!();
            println!("Record URL: https://doi.org/10.5281/zenodo.{}", record_id);
            println!("Community: {}", community);
            println!();
            println!("Note: If record was published, a new version was created.");
            println!("      The DOI remains the same (version number increments).");
            println!();
        }
    }
    Ok(())
}

fn report_failure(e: &SyncError) {
    tracing::error!(
        "Adding community failed: {} (Category: {:?}, Severity: {:?})",
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
