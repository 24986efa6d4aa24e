//! Pipeline Driver
//!
//! Sequences the four materialization phases over every table in the
//! schema registry:
//!
//! 1. Ensure the table bucket exists (fatal on error)
//! 2. Ensure the namespace exists (fatal on error)
//! 3. Register external tables (fail-soft per table)
//! 4. Submit a CTAS per registered table (fail-soft per table, throttled)
//!
//! Infrastructure provisioning (phases 1-2) is a shared precondition, so
//! its errors abort the run. Per-table failures in phases 3-4 are recorded
//! in the report and iteration continues, so the report always carries one
//! entry per registry table.

use crate::clock::Clock;
use crate::config::PipelineConfig;
use crate::provision::Provisioner;
use crate::query::QuerySubmitter;
use crate::register::ExternalTableRegistrar;
use crate::sql;
use lakeline_common::types::{PipelineReport, SchemaRegistry, TableSchema};
use lakeline_common::Result;
use std::sync::Arc;
use tracing::{info, warn};

pub struct PipelineDriver {
    provisioner: Provisioner,
    registrar: ExternalTableRegistrar,
    submitter: QuerySubmitter,
    clock: Arc<dyn Clock>,
    config: PipelineConfig,
}

impl PipelineDriver {
    pub fn new(
        provisioner: Provisioner,
        registrar: ExternalTableRegistrar,
        submitter: QuerySubmitter,
        clock: Arc<dyn Clock>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            provisioner,
            registrar,
            submitter,
            clock,
            config,
        }
    }

    /// Run the pipeline over `registry`, returning one success flag per
    /// table. Rerunning against already-provisioned state is safe: every
    /// create call is idempotent.
    pub async fn run(&self, registry: &SchemaRegistry) -> Result<PipelineReport> {
        let mut report = PipelineReport::new();

        info!(tables = registry.len(), table_bucket = %self.config.table_bucket,
            namespace = %self.config.namespace, "Starting layer materialization pipeline");

        info!("[1/4] Provisioning table bucket");
        let bucket_arn = self
            .provisioner
            .ensure_table_bucket(&self.config.table_bucket)
            .await?;

        info!("[2/4] Provisioning namespace");
        self.provisioner
            .ensure_namespace(&bucket_arn, &self.config.namespace)
            .await?;

        info!("[3/4] Registering external tables");
        let mut registered: Vec<&TableSchema> = Vec::with_capacity(registry.len());
        for table in registry.tables() {
            if self
                .registrar
                .register(&self.config.source_database, table)
                .await
            {
                registered.push(table);
            } else {
                report.record(table.table_name.as_str(), false);
            }
        }

        info!("[4/4] Materializing managed tables");
        let catalog = self.config.managed_catalog();
        for table in registered {
            let target = self.config.target_table_name(&table.table_name);
            let statement = sql::ctas_statement(
                &catalog,
                &self.config.namespace,
                target,
                &self.config.source_database,
                table,
            );

            info!(source = %table.table_name, target = %target, "Submitting CTAS");
            let success = self.submitter.submit_and_wait(&statement).await.is_some();
            report.record(table.table_name.as_str(), success);

            // Brief pause between submissions to stay under engine rate
            // limits.
            self.clock.sleep(self.config.submit_delay()).await;
        }

        if report.all_succeeded() {
            info!(tables = report.len(), succeeded = report.successes(),
                "Pipeline complete");
        } else {
            warn!(tables = report.len(), succeeded = report.successes(),
                failed = report.failures(), "Pipeline complete with failures");
        }
        for (table, ok) in report.iter() {
            info!(table = %table, success = ok, "Table outcome");
        }

        Ok(report)
    }
}
