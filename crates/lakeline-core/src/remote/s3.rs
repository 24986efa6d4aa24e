//! Object storage implementation backed by the AWS S3 API.

use super::{CreateOutcome, ObjectStore};
use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use aws_sdk_s3::Client;
use bytes::Bytes;
use lakeline_common::{LakelineError, Result};
use tracing::{debug, info};

/// S3-backed [`ObjectStore`].
#[derive(Clone)]
pub struct S3Store {
    client: Client,
    region: String,
}

impl S3Store {
    pub fn new(sdk_config: &aws_config::SdkConfig, region: impl Into<String>) -> Self {
        Self {
            client: Client::new(sdk_config),
            region: region.into(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn ensure_bucket(&self, name: &str) -> Result<CreateOutcome> {
        if self.client.head_bucket().bucket(name).send().await.is_ok() {
            debug!(bucket = %name, "Bucket already exists");
            return Ok(CreateOutcome::AlreadyExists);
        }

        let mut request = self.client.create_bucket().bucket(name);
        // us-east-1 rejects an explicit location constraint.
        if self.region != "us-east-1" {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                    .build(),
            );
        }

        match request.send().await {
            Ok(_) => {
                info!(bucket = %name, region = %self.region, "Created bucket");
                Ok(CreateOutcome::Created)
            },
            Err(e) => {
                let owned = e.as_service_error().is_some_and(|se| {
                    se.is_bucket_already_owned_by_you() || se.is_bucket_already_exists()
                });
                if owned {
                    debug!(bucket = %name, "Bucket already exists");
                    Ok(CreateOutcome::AlreadyExists)
                } else {
                    Err(LakelineError::Storage(format!(
                        "create bucket {}: {}",
                        name,
                        DisplayErrorContext(e)
                    )))
                }
            },
        }
    }

    async fn list_prefixes(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        let mut prefixes = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .delimiter("/")
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                LakelineError::Storage(format!(
                    "list prefixes under s3://{}/{}: {}",
                    bucket,
                    prefix,
                    DisplayErrorContext(e)
                ))
            })?;
            for common in page.common_prefixes() {
                if let Some(p) = common.prefix() {
                    prefixes.push(p.to_string());
                }
            }
        }

        prefixes.sort();
        Ok(prefixes)
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                LakelineError::Storage(format!(
                    "list objects under s3://{}/{}: {}",
                    bucket,
                    prefix,
                    DisplayErrorContext(e)
                ))
            })?;
            for object in page.contents() {
                if let Some(key) = object.key() {
                    keys.push(key.to_string());
                }
            }
        }

        Ok(keys)
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                LakelineError::Storage(format!(
                    "get s3://{}/{}: {}",
                    bucket,
                    key,
                    DisplayErrorContext(e)
                ))
            })?;

        let body = response.body.collect().await.map_err(|e| {
            LakelineError::Storage(format!("read s3://{}/{}: {}", bucket, key, e))
        })?;
        Ok(body.into_bytes())
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> Result<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                LakelineError::Storage(format!(
                    "put s3://{}/{}: {}",
                    bucket,
                    key,
                    DisplayErrorContext(e)
                ))
            })?;
        Ok(())
    }
}
