use anyhow::Result;
use httpmock::prelude::*;
use serde_json::json;
use zenodo_sync::config::toml_config::TomlConfig;
use zenodo_sync::config::Workflow;
use zenodo_sync::{
    CliConfig, CommunityPipeline, Settings, SyncEngine, SyncError, SyncOutcome, ZenodoClient,
};

fn settings(server: &MockServer, record_id: &str) -> Result<Settings> {
    let cli = CliConfig {
        record_id: Some(record_id.to_string()),
        access_token: Some("test-token".to_string()),
        api_base: Some(server.base_url()),
        ..CliConfig::default()
    };
    Ok(Settings::resolve(&cli, TomlConfig::default(), Workflow::AddCommunity)?)
}

fn engine(settings: Settings) -> Result<SyncEngine<CommunityPipeline<ZenodoClient>>> {
    let client = ZenodoClient::new(&settings.api_base, &settings.access_token, settings.timeout)?;
    Ok(SyncEngine::new(CommunityPipeline::new(client, settings)))
}

#[tokio::test]
async fn test_member_record_is_left_alone() -> Result<()> {
    let server = MockServer::start();
    let get = server.mock(|when, then| {
        when.method(GET).path("/records/17861977");
        then.status(200).json_body(json!({
            "id": 17861977,
            "state": "done",
            "metadata": {"communities": [{"identifier": "es-replication-repository"}]}
        }));
    });
    let put = server.mock(|when, then| {
        when.method(PUT);
        then.status(200).json_body(json!({}));
    });
    let versions = server.mock(|when, then| {
        when.method(POST);
        then.status(201).json_body(json!({}));
    });

    let outcome = engine(settings(&server, "17861977")?)?.run().await?;

    assert!(matches!(outcome, SyncOutcome::Unchanged { .. }));
    get.assert();
    put.assert_hits(0);
    versions.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_published_record_is_versioned_then_updated() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/records/100");
        then.status(200).json_body(json!({
            "id": 100,
            "state": "done",
            "metadata": {"title": "Replication Package", "communities": [{"identifier": "other"}]}
        }));
    });
    let versions = server.mock(|when, then| {
        when.method(POST)
            .path("/records/100/versions")
            .header("authorization", "Bearer test-token");
        then.status(201).json_body(json!({"id": 101, "state": "unsubmitted"}));
    });
    let draft = server.mock(|when, then| {
        when.method(GET).path("/deposit/depositions/101");
        then.status(200).json_body(json!({
            "id": 101,
            "state": "unsubmitted",
            "metadata": {"title": "Replication Package", "communities": [{"identifier": "other"}]}
        }));
    });
    let put = server.mock(|when, then| {
        when.method(PUT)
            .path("/deposit/depositions/101")
            .json_body(json!({"metadata": {
                "title": "Replication Package",
                "communities": [
                    {"identifier": "other"},
                    {"identifier": "es-replication-repository"}
                ]
            }}));
        then.status(200).json_body(json!({"id": 101, "state": "unsubmitted", "metadata": {}}));
    });

    let outcome = engine(settings(&server, "100")?)?.run().await?;

    versions.assert();
    draft.assert();
    put.assert();
    assert_eq!(outcome.record_id(), "101");
    Ok(())
}

#[tokio::test]
async fn test_forbidden_update_surfaces_response_body() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/records/7");
        then.status(200)
            .json_body(json!({"id": 7, "state": "inprogress", "metadata": {}}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/deposit/depositions/7");
        then.status(200)
            .json_body(json!({"id": 7, "state": "inprogress", "metadata": {}}));
    });
    server.mock(|when, then| {
        when.method(PUT).path("/deposit/depositions/7");
        then.status(403).body("{\"status\": 403, \"message\": \"Permission denied.\"}");
    });

    let err = engine(settings(&server, "7")?)?.run().await.unwrap_err();

    assert!(matches!(err, SyncError::Http { status: 403, .. }));
    assert!(err.response_body().unwrap_or_default().contains("Permission denied."));
    assert!(err.recovery_suggestion().contains("new version"));
    assert_eq!(err.exit_code(), 1);
    Ok(())
}

#[tokio::test]
async fn test_dry_run_only_reads() -> Result<()> {
    let server = MockServer::start();
    let get = server.mock(|when, then| {
        when.method(GET).path("/records/100");
        then.status(200)
            .json_body(json!({"id": 100, "state": "done", "metadata": {"communities": []}}));
    });
    let writes = server.mock(|when, then| {
        when.method(POST);
        then.status(201).json_body(json!({}));
    });

    let mut settings = settings(&server, "100")?;
    settings.dry_run = true;
    let outcome = engine(settings)?.run().await?;

    get.assert();
    writes.assert_hits(0);
    match outcome {
        SyncOutcome::DryRun { metadata, .. } => {
            assert_eq!(
                metadata["communities"],
                json!([{"identifier": "es-replication-repository"}])
            );
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    Ok(())
}
