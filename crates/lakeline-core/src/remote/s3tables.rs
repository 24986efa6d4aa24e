//! Table-bucket/namespace implementation backed by the AWS S3 Tables API.

use super::{CreateOutcome, TableBucketCreation, TableBucketStore};
use async_trait::async_trait;
use aws_sdk_s3tables::error::DisplayErrorContext;
use aws_sdk_s3tables::Client;
use lakeline_common::{LakelineError, Result};
use tracing::{debug, info};

/// S3 Tables-backed [`TableBucketStore`].
#[derive(Clone)]
pub struct S3TablesStore {
    client: Client,
}

impl S3TablesStore {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
        }
    }
}

#[async_trait]
impl TableBucketStore for S3TablesStore {
    async fn create_table_bucket(&self, name: &str) -> Result<TableBucketCreation> {
        match self.client.create_table_bucket().name(name).send().await {
            Ok(response) => {
                info!(table_bucket = %name, arn = %response.arn(), "Created table bucket");
                Ok(TableBucketCreation::Created {
                    arn: response.arn().to_string(),
                })
            },
            Err(e) => {
                if e.as_service_error().is_some_and(|se| se.is_conflict_exception()) {
                    debug!(table_bucket = %name, "Table bucket already exists");
                    Ok(TableBucketCreation::AlreadyExists)
                } else {
                    Err(LakelineError::provision(
                        format!("table bucket {}", name),
                        DisplayErrorContext(e).to_string(),
                    ))
                }
            },
        }
    }

    async fn table_bucket_arn(&self, name: &str) -> Result<String> {
        // Name-prefixed listing avoids a second identity call to assemble
        // the ARN by hand.
        let mut pages = self
            .client
            .list_table_buckets()
            .prefix(name)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                LakelineError::provision(
                    format!("table bucket {}", name),
                    DisplayErrorContext(e).to_string(),
                )
            })?;
            for bucket in page.table_buckets() {
                if bucket.name() == name {
                    return Ok(bucket.arn().to_string());
                }
            }
        }

        Err(LakelineError::provision(
            format!("table bucket {}", name),
            "bucket reported as existing but not found in listing",
        ))
    }

    async fn create_namespace(&self, bucket_arn: &str, namespace: &str) -> Result<CreateOutcome> {
        match self
            .client
            .create_namespace()
            .table_bucket_arn(bucket_arn)
            .namespace(namespace)
            .send()
            .await
        {
            Ok(_) => {
                info!(namespace = %namespace, "Created namespace");
                Ok(CreateOutcome::Created)
            },
            Err(e) => {
                if e.as_service_error().is_some_and(|se| se.is_conflict_exception()) {
                    debug!(namespace = %namespace, "Namespace already exists");
                    Ok(CreateOutcome::AlreadyExists)
                } else {
                    Err(LakelineError::provision(
                        format!("namespace {}", namespace),
                        DisplayErrorContext(e).to_string(),
                    ))
                }
            },
        }
    }
}
