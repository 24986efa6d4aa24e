//! Pipeline configuration
//!
//! An explicit value constructed at the program boundary and passed into
//! every component; library code never reads ambient process state.

use lakeline_common::{LakelineError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

fn default_poll_interval_secs() -> u64 {
    2
}

fn default_max_wait_secs() -> u64 {
    300
}

fn default_submit_delay_secs() -> u64 {
    1
}

/// Configuration for one pipeline invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Remote region for all service clients.
    pub region: String,

    /// Object-storage bucket holding the source Parquet data; also hosts
    /// query-engine result output unless `output_location` overrides it.
    pub staging_bucket: String,

    /// Catalog database the external tables are registered into.
    pub source_database: String,

    /// Table bucket the managed tables are materialized into.
    pub table_bucket: String,

    /// Namespace inside the table bucket.
    pub namespace: String,

    /// Query result output location; defaults to
    /// `s3://{staging_bucket}/athena-results/`.
    #[serde(default)]
    pub output_location: Option<String>,

    /// Layer prefix stripped from source table names to form target names
    /// (e.g. `bronze_ratings` -> `ratings`).
    #[serde(default)]
    pub layer_prefix: Option<String>,

    /// Poll interval for query execution state, in seconds.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Bounded total wait for a query to reach a terminal state, in seconds.
    #[serde(default = "default_max_wait_secs")]
    pub max_wait_secs: u64,

    /// Throttling delay between CTAS submissions, in seconds.
    #[serde(default = "default_submit_delay_secs")]
    pub submit_delay_secs: u64,
}

impl PipelineConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("region", &self.region),
            ("staging_bucket", &self.staging_bucket),
            ("source_database", &self.source_database),
            ("table_bucket", &self.table_bucket),
            ("namespace", &self.namespace),
        ] {
            if value.trim().is_empty() {
                return Err(LakelineError::Config(format!("{} must not be empty", field)));
            }
        }
        Ok(())
    }

    /// Query result output location.
    pub fn output_location(&self) -> String {
        self.output_location
            .clone()
            .unwrap_or_else(|| format!("s3://{}/athena-results/", self.staging_bucket))
    }

    /// Catalog name the query engine uses to address the table bucket.
    pub fn managed_catalog(&self) -> String {
        format!("s3tablescatalog/{}", self.table_bucket)
    }

    /// Target table name for a source table: the layer prefix, if
    /// configured, is stripped.
    pub fn target_table_name<'a>(&self, source_table: &'a str) -> &'a str {
        match &self.layer_prefix {
            Some(prefix) => source_table.strip_prefix(prefix.as_str()).unwrap_or(source_table),
            None => source_table,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_secs(self.max_wait_secs)
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_secs(self.submit_delay_secs)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn sample() -> PipelineConfig {
        PipelineConfig {
            region: "us-east-1".to_string(),
            staging_bucket: "staging".to_string(),
            source_database: "default".to_string(),
            table_bucket: "staging-tables".to_string(),
            namespace: "bronze_ns".to_string(),
            output_location: None,
            layer_prefix: Some("bronze_".to_string()),
            poll_interval_secs: 2,
            max_wait_secs: 300,
            submit_delay_secs: 1,
        }
    }

    #[test]
    fn test_output_location_default() {
        assert_eq!(sample().output_location(), "s3://staging/athena-results/");

        let mut config = sample();
        config.output_location = Some("s3://elsewhere/results/".to_string());
        assert_eq!(config.output_location(), "s3://elsewhere/results/");
    }

    #[test]
    fn test_managed_catalog() {
        assert_eq!(sample().managed_catalog(), "s3tablescatalog/staging-tables");
    }

    #[test]
    fn test_target_table_name_strips_prefix() {
        let config = sample();
        assert_eq!(config.target_table_name("bronze_ratings"), "ratings");
        assert_eq!(config.target_table_name("ratings"), "ratings");

        let mut no_prefix = sample();
        no_prefix.layer_prefix = None;
        assert_eq!(no_prefix.target_table_name("bronze_ratings"), "bronze_ratings");
    }

    #[test]
    fn test_defaults_from_json() {
        let raw = r#"{
            "region": "us-east-1",
            "staging_bucket": "staging",
            "source_database": "default",
            "table_bucket": "staging-tables",
            "namespace": "ns"
        }"#;
        let config: PipelineConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.max_wait(), Duration::from_secs(300));
        assert_eq!(config.submit_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_validate_rejects_empty_fields() {
        let mut config = sample();
        config.namespace = "".to_string();
        assert!(config.validate().is_err());
    }
}
