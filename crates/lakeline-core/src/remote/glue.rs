//! Tabular catalog implementation backed by the AWS Glue Data Catalog.
//!
//! External tables are registered with the Parquet input/output formats
//! and SerDe, matching what the query engine expects for schema-on-read
//! access over Parquet objects.

use super::{CatalogColumn, CreateOutcome, TableCatalog};
use async_trait::async_trait;
use aws_sdk_glue::error::DisplayErrorContext;
use aws_sdk_glue::types::{Column, DatabaseInput, SerDeInfo, StorageDescriptor, TableInput};
use aws_sdk_glue::Client;
use lakeline_common::{LakelineError, Result};
use tracing::{debug, info};

const PARQUET_INPUT_FORMAT: &str =
    "org.apache.hadoop.hive.ql.io.parquet.MapredParquetInputFormat";
const PARQUET_OUTPUT_FORMAT: &str =
    "org.apache.hadoop.hive.ql.io.parquet.MapredParquetOutputFormat";
const PARQUET_SERDE: &str = "org.apache.hadoop.hive.ql.io.parquet.serde.ParquetHiveSerDe";

/// Glue-backed [`TableCatalog`].
#[derive(Clone)]
pub struct GlueCatalog {
    client: Client,
}

impl GlueCatalog {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
        }
    }
}

#[async_trait]
impl TableCatalog for GlueCatalog {
    async fn database_exists(&self, database: &str) -> Result<bool> {
        match self.client.get_database().name(database).send().await {
            Ok(_) => Ok(true),
            Err(e) => {
                if e.as_service_error()
                    .is_some_and(|se| se.is_entity_not_found_exception())
                {
                    Ok(false)
                } else {
                    Err(LakelineError::Catalog(format!(
                        "get database {}: {}",
                        database,
                        DisplayErrorContext(e)
                    )))
                }
            },
        }
    }

    async fn create_database(&self, database: &str) -> Result<()> {
        let input = DatabaseInput::builder()
            .name(database)
            .build()
            .map_err(|e| LakelineError::Catalog(format!("database input: {}", e)))?;

        self.client
            .create_database()
            .database_input(input)
            .send()
            .await
            .map_err(|e| {
                LakelineError::Catalog(format!(
                    "create database {}: {}",
                    database,
                    DisplayErrorContext(e)
                ))
            })?;

        info!(database = %database, "Created catalog database");
        Ok(())
    }

    async fn create_external_table(
        &self,
        database: &str,
        table: &str,
        location: &str,
        columns: &[CatalogColumn],
    ) -> Result<CreateOutcome> {
        let mut catalog_columns = Vec::with_capacity(columns.len());
        for column in columns {
            let built = Column::builder()
                .name(&column.name)
                .r#type(&column.catalog_type)
                .build()
                .map_err(|e| LakelineError::Catalog(format!("column {}: {}", column.name, e)))?;
            catalog_columns.push(built);
        }

        let descriptor = StorageDescriptor::builder()
            .set_columns(Some(catalog_columns))
            .location(location)
            .input_format(PARQUET_INPUT_FORMAT)
            .output_format(PARQUET_OUTPUT_FORMAT)
            .serde_info(
                SerDeInfo::builder()
                    .serialization_library(PARQUET_SERDE)
                    .build(),
            )
            .build();

        let input = TableInput::builder()
            .name(table)
            .storage_descriptor(descriptor)
            .table_type("EXTERNAL_TABLE")
            .parameters("EXTERNAL", "TRUE")
            .parameters("parquet.compression", "SNAPPY")
            .build()
            .map_err(|e| LakelineError::Catalog(format!("table input {}: {}", table, e)))?;

        match self
            .client
            .create_table()
            .database_name(database)
            .table_input(input)
            .send()
            .await
        {
            Ok(_) => {
                info!(database = %database, table = %table, location = %location,
                    "Registered external table");
                Ok(CreateOutcome::Created)
            },
            Err(e) => {
                if e.as_service_error()
                    .is_some_and(|se| se.is_already_exists_exception())
                {
                    debug!(database = %database, table = %table, "External table already exists");
                    Ok(CreateOutcome::AlreadyExists)
                } else {
                    Err(LakelineError::Catalog(format!(
                        "create table {}.{}: {}",
                        database,
                        table,
                        DisplayErrorContext(e)
                    )))
                }
            },
        }
    }
}
