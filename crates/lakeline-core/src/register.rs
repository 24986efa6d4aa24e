//! External Table Registrar
//!
//! Registers a schema-on-read table over an existing storage location,
//! creating the parent database first if absent. Registration follows a
//! partial-failure policy: "already exists" counts as success, and any
//! other failure is logged and converted to `false` so one table cannot
//! abort the pipeline.

use crate::remote::{CatalogColumn, CreateOutcome, TableCatalog};
use crate::typemap::TypeMapper;
use lakeline_common::types::TableSchema;
use std::sync::Arc;
use tracing::{error, info};

pub struct ExternalTableRegistrar {
    catalog: Arc<dyn TableCatalog>,
    mapper: TypeMapper,
}

impl ExternalTableRegistrar {
    pub fn new(catalog: Arc<dyn TableCatalog>, mapper: TypeMapper) -> Self {
        Self { catalog, mapper }
    }

    /// Register `table` as an external table in `database`. Returns
    /// whether the table is usable afterwards; never propagates an error.
    pub async fn register(&self, database: &str, table: &TableSchema) -> bool {
        let columns: Vec<CatalogColumn> = table
            .columns
            .iter()
            .map(|c| CatalogColumn {
                name: c.name.clone(),
                catalog_type: self.mapper.to_catalog(&c.logical_type),
            })
            .collect();

        let result = async {
            if !self.catalog.database_exists(database).await? {
                self.catalog.create_database(database).await?;
            }
            self.catalog
                .create_external_table(
                    database,
                    &table.table_name,
                    &table.storage_location,
                    &columns,
                )
                .await
        }
        .await;

        match result {
            Ok(CreateOutcome::Created) => {
                info!(database = %database, table = %table.table_name, "External table registered");
                true
            },
            Ok(CreateOutcome::AlreadyExists) => {
                info!(database = %database, table = %table.table_name,
                    "External table already registered");
                true
            },
            Err(e) => {
                error!(database = %database, table = %table.table_name, error = %e,
                    "External table registration failed");
                false
            },
        }
    }
}
