//! Remote API seams
//!
//! Traits abstracting the four remote services the pipeline touches:
//! object storage, the table-bucket/namespace API, the tabular catalog,
//! and the query engine. Production implementations wrap the AWS SDK
//! clients; tests substitute in-memory fakes.
//!
//! Create operations are explicitly idempotent: a remote
//! "conflict/already exists" signal maps to [`CreateOutcome::AlreadyExists`]
//! rather than an error, and only genuine failures surface as `Err`.

use async_trait::async_trait;
use bytes::Bytes;
use lakeline_common::Result;

pub mod athena;
pub mod glue;
pub mod s3;
pub mod s3tables;

pub use athena::AthenaEngine;
pub use glue::GlueCatalog;
pub use s3::S3Store;
pub use s3tables::S3TablesStore;

/// Tagged result of an idempotent create call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

/// Result of a table bucket creation; the ARN is only available on the
/// create path, existing buckets are resolved via
/// [`TableBucketStore::table_bucket_arn`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBucketCreation {
    Created { arn: String },
    AlreadyExists,
}

/// Terminal and non-terminal states reported by the query engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryState {
    /// Queued or executing; not yet terminal.
    Running,
    Succeeded,
    Failed { reason: String },
    Cancelled { reason: String },
}

/// A column in catalog-dialect form, ready for a storage descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogColumn {
    pub name: String,
    pub catalog_type: String,
}

/// Object storage: buckets, prefix listing, object get/put.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Create the bucket if absent.
    async fn ensure_bucket(&self, name: &str) -> Result<CreateOutcome>;

    /// List immediate "folder" prefixes under `prefix` (delimiter `/`).
    async fn list_prefixes(&self, bucket: &str, prefix: &str) -> Result<Vec<String>>;

    /// List all object keys under `prefix`.
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>>;

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes>;

    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> Result<()>;
}

/// Catalog-on-object-storage constructs: table buckets and namespaces.
#[async_trait]
pub trait TableBucketStore: Send + Sync {
    async fn create_table_bucket(&self, name: &str) -> Result<TableBucketCreation>;

    /// Resolve the ARN of an existing table bucket by name.
    async fn table_bucket_arn(&self, name: &str) -> Result<String>;

    async fn create_namespace(&self, bucket_arn: &str, namespace: &str)
        -> Result<CreateOutcome>;
}

/// Tabular catalog: databases and schema-on-read external tables.
#[async_trait]
pub trait TableCatalog: Send + Sync {
    async fn database_exists(&self, database: &str) -> Result<bool>;

    async fn create_database(&self, database: &str) -> Result<()>;

    async fn create_external_table(
        &self,
        database: &str,
        table: &str,
        location: &str,
        columns: &[CatalogColumn],
    ) -> Result<CreateOutcome>;
}

/// Query engine: submit a statement, poll its execution state.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    /// Submit the statement verbatim; returns the remote execution id.
    async fn start_query(&self, sql: &str, output_location: &str) -> Result<String>;

    async fn query_state(&self, execution_id: &str) -> Result<QueryState>;
}
