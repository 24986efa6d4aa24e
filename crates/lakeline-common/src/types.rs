//! Schema registry and pipeline report types
//!
//! The schema registry is the static input to a pipeline run: a set of
//! logical tables, each with an object-storage location and an ordered
//! column list. It is constructed once (from a JSON file or from schema
//! discovery) and read-only afterwards.

use crate::error::{LakelineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// A single column definition: name plus the source storage type string
/// (e.g. `int64`, `double`, `timestamp[us]`, `decimal128(38, 9)`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    #[serde(rename = "type")]
    pub logical_type: String,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
}

fn default_nullable() -> bool {
    true
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, logical_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            logical_type: logical_type.into(),
            nullable: true,
        }
    }

    /// Metadata columns (leading underscore) are carried in the registry
    /// but excluded from materialized targets.
    pub fn is_metadata(&self) -> bool {
        self.name.starts_with('_')
    }
}

/// One registry entry: a logical table backed by Parquet data at a
/// storage location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub table_name: String,
    pub storage_location: String,
    pub columns: Vec<ColumnDef>,
}

impl TableSchema {
    pub fn new(
        table_name: impl Into<String>,
        storage_location: impl Into<String>,
        columns: Vec<ColumnDef>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            storage_location: storage_location.into(),
            columns,
        }
    }

    /// Columns that participate in materialized output, in registry order.
    pub fn data_columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|c| !c.is_metadata())
    }
}

/// Static mapping from logical table name to schema and location.
///
/// Table names are unique; insertion order is preserved and defines the
/// order tables are processed in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SchemaRegistry {
    tables: Vec<TableSchema>,
}

impl SchemaRegistry {
    pub fn new(tables: Vec<TableSchema>) -> Result<Self> {
        let mut seen = HashSet::new();
        for table in &tables {
            if !seen.insert(table.table_name.as_str()) {
                return Err(LakelineError::InvalidRegistry(format!(
                    "duplicate table name: {}",
                    table.table_name
                )));
            }
        }
        Ok(Self { tables })
    }

    /// Parse a registry from its JSON representation, rejecting
    /// duplicate table names.
    pub fn from_json(raw: &str) -> Result<Self> {
        let tables: Vec<TableSchema> = serde_json::from_str(raw)?;
        Self::new(tables)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.tables)?)
    }

    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Per-table success/failure outcome of a pipeline run.
///
/// One entry per registry table; never mutated after the run completes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineReport {
    results: BTreeMap<String, bool>,
}

impl PipelineReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, table: impl Into<String>, success: bool) {
        self.results.insert(table.into(), success);
    }

    pub fn get(&self, table: &str) -> Option<bool> {
        self.results.get(table).copied()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn successes(&self) -> usize {
        self.results.values().filter(|v| **v).count()
    }

    pub fn failures(&self) -> usize {
        self.results.len() - self.successes()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.results.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl std::fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} table(s): {} succeeded, {} failed",
            self.len(),
            self.successes(),
            self.failures()
        )?;
        for (table, ok) in self.iter() {
            writeln!(f, "  [{}] {}", if ok { "ok" } else { "failed" }, table)?;
        }
        Ok(())
    }
}
