use std::{sync::Arc, time::Duration};

use clientdesk_metrics::MetricsRegistry;
use deadpool_diesel::postgres::Pool;
use pragma_common::services::{Service, ServiceRunner};

use crate::service::{ChangeSink, OverdueScanService};

pub struct OverdueScanTask {
    db_pool: Pool,
    metrics: Arc<MetricsRegistry>,
    changes: Arc<dyn ChangeSink>,
    interval: Duration,
}

impl OverdueScanTask {
    pub fn new(
        db_pool: Pool,
        metrics: Arc<MetricsRegistry>,
        changes: Arc<dyn ChangeSink>,
        interval: Duration,
    ) -> Self {
        Self {
            db_pool,
            metrics,
            changes,
            interval,
        }
    }
}

#[async_trait::async_trait]
impl Service for OverdueScanTask {
    async fn start<'a>(&mut self, mut runner: ServiceRunner<'a>) -> anyhow::Result<()> {
        let db_pool = self.db_pool.clone();
        let metrics = self.metrics.clone();
        let changes = self.changes.clone();
        let interval = self.interval;

        runner.spawn_loop(move |ctx| async move {
            let scanner = OverdueScanService::new(
                db_pool.clone(),
                metrics.clone(),
                changes.clone(),
                interval,
            );

            if let Some(result) = ctx.run_until_cancelled(scanner.run_forever()).await {
                result?;
            }

            anyhow::Ok(())
        });

        Ok(())
    }
}
