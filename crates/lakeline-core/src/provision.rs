//! Bucket/Namespace Provisioner
//!
//! Idempotent create-if-absent over the table-bucket store. Provisioned
//! resources are shared preconditions for the whole pipeline, so any
//! non-conflict failure here propagates as fatal.

use crate::remote::{CreateOutcome, TableBucketCreation, TableBucketStore};
use lakeline_common::Result;
use std::sync::Arc;
use tracing::info;

pub struct Provisioner {
    store: Arc<dyn TableBucketStore>,
}

impl Provisioner {
    pub fn new(store: Arc<dyn TableBucketStore>) -> Self {
        Self { store }
    }

    /// Ensure the table bucket exists; returns its ARN whether it was
    /// created by this call or already present.
    pub async fn ensure_table_bucket(&self, name: &str) -> Result<String> {
        match self.store.create_table_bucket(name).await? {
            TableBucketCreation::Created { arn } => {
                info!(table_bucket = %name, arn = %arn, "Table bucket provisioned");
                Ok(arn)
            },
            TableBucketCreation::AlreadyExists => {
                let arn = self.store.table_bucket_arn(name).await?;
                info!(table_bucket = %name, arn = %arn, "Table bucket already provisioned");
                Ok(arn)
            },
        }
    }

    /// Ensure the namespace exists inside the given table bucket.
    pub async fn ensure_namespace(&self, bucket_arn: &str, namespace: &str) -> Result<()> {
        match self.store.create_namespace(bucket_arn, namespace).await? {
            CreateOutcome::Created => {
                info!(namespace = %namespace, "Namespace provisioned");
            },
            CreateOutcome::AlreadyExists => {
                info!(namespace = %namespace, "Namespace already provisioned");
            },
        }
        Ok(())
    }
}
