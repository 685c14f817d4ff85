use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Builder, Credentials, Region};
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use bytes::Bytes;
use tracing::info;

use crate::modules::normalize::ports::{FetchedObject, ObjectStore, StorageError};

#[derive(Clone)]
pub struct StorageService {
    pub client: Client,
}

impl StorageService {
    pub async fn new(endpoint: &str, region: &str, access_key: &str, secret_key: &str) -> Self {
        let credentials = Credentials::new(access_key, secret_key, None, None, "static");

        let config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .endpoint_url(endpoint)
            .credentials_provider(credentials)
            .force_path_style(true) // Required for MinIO
            .build();

        let client = Client::from_conf(config);

        info!("✅ Connected to S3 ({endpoint})");

        Self { client }
    }

    fn classify<E: ProvideErrorMetadata + std::fmt::Display>(
        err: &E,
        bucket: &str,
        key: &str,
    ) -> StorageError {
        match err.code() {
            Some("NoSuchKey") => StorageError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            },
            Some("AccessDenied") => StorageError::AccessDenied {
                bucket: bucket.to_string(),
                key: key.to_string(),
            },
            _ => StorageError::Transport(err.to_string()),
        }
    }
}

#[async_trait]
impl ObjectStore for StorageService {
    async fn fetch(&self, bucket: &str, key: &str) -> Result<FetchedObject, StorageError> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Self::classify(&e, bucket, key))?;

        let content_type = output.content_type().map(str::to_string);
        // GetObject does not report the object's ACL; the canned ACL is
        // carried only when the backend exposes it some other way.
        let metadata = output.metadata().cloned().unwrap_or_default();

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Transport(e.to_string()))?
            .into_bytes();

        Ok(FetchedObject {
            body,
            content_type,
            acl: None,
            metadata,
        })
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
        acl: Option<&str>,
        metadata: &HashMap<String, String>,
    ) -> Result<(), StorageError> {
        let mut request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(aws_sdk_s3::primitives::ByteStream::from(body))
            .set_metadata(Some(metadata.clone()));

        if let Some(content_type) = content_type {
            request = request.content_type(content_type);
        }
        if let Some(acl) = acl {
            request = request.acl(ObjectCannedAcl::from(acl));
        }

        request
            .send()
            .await
            .map_err(|e| Self::classify(&e, bucket, key))?;

        Ok(())
    }
}
