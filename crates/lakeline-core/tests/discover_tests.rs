//! Schema discovery tests against an in-memory object store holding real
//! Parquet bytes.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use arrow_array::{ArrayRef, Float64Array, Int64Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use async_trait::async_trait;
use bytes::Bytes;
use lakeline_common::{LakelineError, Result};
use lakeline_core::discover::SchemaDiscovery;
use lakeline_core::remote::{CreateOutcome, ObjectStore};
use parquet::arrow::ArrowWriter;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// In-memory object store: `bucket/key -> bytes`.
#[derive(Default)]
struct MemoryStore {
    objects: Mutex<BTreeMap<String, Bytes>>,
}

impl MemoryStore {
    fn put(&self, bucket: &str, key: &str, bytes: Bytes) {
        self.objects
            .lock()
            .unwrap()
            .insert(format!("{}/{}", bucket, key), bytes);
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn ensure_bucket(&self, _name: &str) -> Result<CreateOutcome> {
        Ok(CreateOutcome::AlreadyExists)
    }

    async fn list_prefixes(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        let full = format!("{}/{}", bucket, prefix);
        let mut prefixes: Vec<String> = self
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter_map(|k| {
                let rest = k.strip_prefix(&full)?;
                let folder = rest.split('/').next()?;
                Some(format!("{}{}/", prefix, folder))
            })
            .collect();
        prefixes.dedup();
        Ok(prefixes)
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        let full = format!("{}/{}", bucket, prefix);
        Ok(self
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter_map(|k| k.strip_prefix(&format!("{}/", bucket)).map(str::to_string))
            .filter(|k| format!("{}/{}", bucket, k).starts_with(&full))
            .collect())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        self.objects
            .lock()
            .unwrap()
            .get(&format!("{}/{}", bucket, key))
            .cloned()
            .ok_or_else(|| LakelineError::Storage(format!("no such key: {}", key)))
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> Result<()> {
        self.put(bucket, key, body);
        Ok(())
    }
}

fn ratings_parquet() -> Bytes {
    let schema = Arc::new(Schema::new(vec![
        Field::new("userId", DataType::Int64, true),
        Field::new("rating", DataType::Float64, true),
        Field::new("_source_file", DataType::Utf8, true),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef,
            Arc::new(Float64Array::from(vec![3.5, 4.0])) as ArrayRef,
            Arc::new(StringArray::from(vec!["a.csv", "a.csv"])) as ArrayRef,
        ],
    )
    .unwrap();

    let mut buffer = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buffer, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
    Bytes::from(buffer)
}

#[tokio::test]
async fn discovers_table_schemas_from_parquet_footers() {
    let store = Arc::new(MemoryStore::default());
    store.put("staging", "bronze/ratings/part-0.parquet", ratings_parquet());
    store.put("staging", "bronze/ratings/part-1.parquet", ratings_parquet());

    let discovery = SchemaDiscovery::new(store);
    let registry = discovery.discover("staging", "bronze/").await.unwrap();

    assert_eq!(registry.len(), 1);
    let table = &registry.tables()[0];
    assert_eq!(table.table_name, "ratings");
    assert_eq!(table.storage_location, "s3://staging/bronze/ratings/");

    let types: Vec<(&str, &str)> = table
        .columns
        .iter()
        .map(|c| (c.name.as_str(), c.logical_type.as_str()))
        .collect();
    assert_eq!(
        types,
        vec![
            ("userId", "int64"),
            ("rating", "double"),
            ("_source_file", "string"),
        ]
    );
}

#[tokio::test]
async fn folder_without_parquet_is_skipped() {
    let store = Arc::new(MemoryStore::default());
    store.put("staging", "bronze/ratings/part-0.parquet", ratings_parquet());
    store.put("staging", "bronze/readme/notes.txt", Bytes::from_static(b"hi"));

    let discovery = SchemaDiscovery::new(store);
    let registry = discovery.discover("staging", "bronze/").await.unwrap();

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.tables()[0].table_name, "ratings");
}

#[tokio::test]
async fn empty_prefix_yields_empty_registry() {
    let store = Arc::new(MemoryStore::default());
    let discovery = SchemaDiscovery::new(store);

    let registry = discovery.discover("staging", "bronze/").await.unwrap();
    assert!(registry.is_empty());
}
