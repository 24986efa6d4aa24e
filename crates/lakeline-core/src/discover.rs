//! Schema discovery
//!
//! Builds a schema registry by scanning object storage: each immediate
//! folder under the configured prefix is one logical table, and its
//! schema comes from Parquet footer introspection of the first object in
//! the folder. A few additional objects are sampled to flag inconsistent
//! column types across files.

use crate::remote::ObjectStore;
use arrow_schema::{DataType, TimeUnit};
use lakeline_common::types::{ColumnDef, SchemaRegistry, TableSchema};
use lakeline_common::{LakelineError, Result};
use parquet::arrow::arrow_reader::{ArrowReaderMetadata, ArrowReaderOptions};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Maximum number of extra files sampled per folder for the consistency
/// check.
const CONSISTENCY_SAMPLE: usize = 4;

pub struct SchemaDiscovery {
    store: Arc<dyn ObjectStore>,
}

impl SchemaDiscovery {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Scan `s3://bucket/prefix/` and return one registry entry per folder
    /// containing Parquet objects.
    pub async fn discover(&self, bucket: &str, prefix: &str) -> Result<SchemaRegistry> {
        let folders = self.store.list_prefixes(bucket, prefix).await?;
        if folders.is_empty() {
            warn!(bucket = %bucket, prefix = %prefix, "No folders found under prefix");
            return SchemaRegistry::new(Vec::new());
        }

        let mut tables = Vec::new();
        for folder in &folders {
            match self.discover_folder(bucket, folder).await? {
                Some(table) => {
                    info!(table = %table.table_name, columns = table.columns.len(),
                        "Discovered table schema");
                    tables.push(table);
                },
                None => {
                    warn!(bucket = %bucket, folder = %folder, "No Parquet objects in folder");
                },
            }
        }

        SchemaRegistry::new(tables)
    }

    async fn discover_folder(&self, bucket: &str, folder: &str) -> Result<Option<TableSchema>> {
        let keys = self.store.list_objects(bucket, folder).await?;
        let parquet_keys: Vec<&String> =
            keys.iter().filter(|k| k.ends_with(".parquet")).collect();

        let Some(sample_key) = parquet_keys.first() else {
            return Ok(None);
        };

        let columns = self.read_footer(bucket, sample_key).await?;

        // Sample a few more files; divergent column types get a warning
        // but the first file's schema wins.
        let baseline: BTreeMap<&str, &str> = columns
            .iter()
            .map(|c| (c.name.as_str(), c.logical_type.as_str()))
            .collect();
        for key in parquet_keys.iter().skip(1).take(CONSISTENCY_SAMPLE) {
            let sampled = self.read_footer(bucket, key).await?;
            for column in &sampled {
                if let Some(expected) = baseline.get(column.name.as_str()) {
                    if *expected != column.logical_type {
                        warn!(key = %key, column = %column.name,
                            expected = %expected, found = %column.logical_type,
                            "Inconsistent column type across Parquet files");
                    }
                }
            }
        }

        let table_name = folder
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(folder)
            .to_string();

        Ok(Some(TableSchema::new(
            table_name,
            format!("s3://{}/{}", bucket, folder),
            columns,
        )))
    }

    async fn read_footer(&self, bucket: &str, key: &str) -> Result<Vec<ColumnDef>> {
        let bytes = self.store.get_object(bucket, key).await?;
        let metadata = ArrowReaderMetadata::load(&bytes, ArrowReaderOptions::new())
            .map_err(|e| LakelineError::Discovery(format!("parquet footer of {}: {}", key, e)))?;

        Ok(metadata
            .schema()
            .fields()
            .iter()
            .map(|field| ColumnDef {
                name: field.name().clone(),
                logical_type: logical_type_string(field.data_type()),
                nullable: field.is_nullable(),
            })
            .collect())
    }
}

/// Render an arrow data type in the source type notation the type mapper
/// understands (`int64`, `timestamp[us]`, `decimal128(38, 9)`, ...).
pub fn logical_type_string(data_type: &DataType) -> String {
    match data_type {
        DataType::Boolean => "boolean".to_string(),
        DataType::Int8 => "int8".to_string(),
        DataType::Int16 => "int16".to_string(),
        DataType::Int32 => "int32".to_string(),
        DataType::Int64 => "int64".to_string(),
        DataType::Float32 => "float".to_string(),
        DataType::Float64 => "double".to_string(),
        DataType::Utf8 | DataType::Utf8View => "string".to_string(),
        DataType::LargeUtf8 => "large_string".to_string(),
        DataType::Binary | DataType::BinaryView => "binary".to_string(),
        DataType::LargeBinary => "large_binary".to_string(),
        DataType::Timestamp(unit, _) => format!("timestamp[{}]", time_unit_suffix(unit)),
        DataType::Date32 => "date32[day]".to_string(),
        DataType::Date64 => "date64[ms]".to_string(),
        DataType::Decimal128(precision, scale) => {
            format!("decimal128({}, {})", precision, scale)
        },
        DataType::Decimal256(precision, scale) => {
            format!("decimal256({}, {})", precision, scale)
        },
        other => format!("{:?}", other).to_lowercase(),
    }
}

fn time_unit_suffix(unit: &TimeUnit) -> &'static str {
    match unit {
        TimeUnit::Second => "s",
        TimeUnit::Millisecond => "ms",
        TimeUnit::Microsecond => "us",
        TimeUnit::Nanosecond => "ns",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_type_strings() {
        assert_eq!(logical_type_string(&DataType::Int64), "int64");
        assert_eq!(logical_type_string(&DataType::Float64), "double");
        assert_eq!(logical_type_string(&DataType::Utf8), "string");
        assert_eq!(logical_type_string(&DataType::Boolean), "boolean");
        assert_eq!(
            logical_type_string(&DataType::Timestamp(TimeUnit::Microsecond, None)),
            "timestamp[us]"
        );
        assert_eq!(logical_type_string(&DataType::Date32), "date32[day]");
        assert_eq!(
            logical_type_string(&DataType::Decimal128(38, 9)),
            "decimal128(38, 9)"
        );
    }
}
