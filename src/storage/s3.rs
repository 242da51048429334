// file: src/storage/s3.rs
// description: S3-compatible object store for generated artifacts
// reference: https://docs.rs/aws-sdk-s3

use crate::config::StorageConfig;
use crate::error::{PipelineError, Result};
use crate::storage::ObjectStore;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use tracing::{debug, info};

pub struct S3ObjectStore {
    client: S3Client,
    bucket: String,
    content_type: String,
}

impl S3ObjectStore {
    pub fn new(client: S3Client, bucket: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            content_type: content_type.into(),
        }
    }

    /// Credentials come from the standard AWS provider chain.
    pub async fn from_config(bucket: &str, config: &StorageConfig) -> Self {
        info!("Using S3 bucket {} ({})", bucket, config.region);

        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(config.force_path_style);

        if let Some(endpoint) = &config.endpoint {
            debug!("Using custom S3 endpoint {}", endpoint);
            builder = builder.endpoint_url(endpoint);
        }

        Self::new(
            S3Client::from_conf(builder.build()),
            bucket,
            config.content_type.clone(),
        )
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<()> {
        let size = body.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(&self.content_type)
            .send()
            .await
            .map_err(|e| {
                PipelineError::RemotePersist(format!(
                    "Failed to upload {} to s3://{}: {}",
                    key,
                    self.bucket,
                    DisplayErrorContext(&e)
                ))
            })?;

        debug!("Uploaded {} bytes to s3://{}/{}", size, self.bucket, key);
        Ok(())
    }

    fn location(&self) -> String {
        format!("s3://{}", self.bucket)
    }
}
