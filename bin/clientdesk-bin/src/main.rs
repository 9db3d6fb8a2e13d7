mod cli;

use std::{sync::Arc, time::Duration};

use crate::cli::Cli;
use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv;
use pragma_common::{services::ServiceGroup, telemetry::init_telemetry};

use clientdesk_analytics::OverdueScanTask;
use clientdesk_api::{
    ApiService, AppState, auth::AuthConfig, realtime::ChangeFeed, storage::LocalObjectStore,
};
use clientdesk_chat::{ChatRelay, WebhookChatClient};
use clientdesk_db::{init_pool, run_migrations};
use clientdesk_metrics::MetricsRegistry;
use pragma_common::services::Service;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let Cli {
        database_url,
        otel_collector_endpoint,
        api_port,
        jwt_secret,
        storage_root,
        chat_webhook_url,
        overdue_scan_interval_secs,
    } = Cli::parse();

    let app_name = "clientdesk_api";
    init_telemetry(app_name, otel_collector_endpoint)
        .map_err(|e| anyhow::anyhow!("Could not init telemetry: {e}"))?;

    let pool = init_pool(app_name, &database_url)?;
    run_migrations(&pool).await?;

    let chat = match chat_webhook_url {
        Some(url) => {
            tracing::info!(%url, "Chat assistant webhook configured");
            Some(Arc::new(WebhookChatClient::new(url)?) as Arc<dyn ChatRelay>)
        }
        None => {
            tracing::warn!("CHAT_WEBHOOK_URL not set; chat assistant disabled");
            None
        }
    };

    let metrics = MetricsRegistry::new();
    let feed = ChangeFeed::default();

    let app_state = AppState {
        pool: pool.clone(),
        feed: feed.clone(),
        store: Arc::new(LocalObjectStore::new(storage_root)),
        chat,
        metrics: metrics.clone(),
        auth: Arc::new(AuthConfig::new(&jwt_secret)),
    };

    let api_service = ApiService::new(app_state, "0.0.0.0", api_port);

    let overdue_service = OverdueScanTask::new(
        pool,
        metrics,
        Arc::new(feed),
        Duration::from_secs(overdue_scan_interval_secs),
    );

    ServiceGroup::default()
        .with(api_service)
        .with(overdue_service)
        .start_and_drive_to_end()
        .await?;

    Ok(())
}
