use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;

use super::ObjectStore;
use crate::error::StoreError;

/// S3-backed implementation of ObjectStore.
///
/// Reads and writes whole objects in one bucket of S3 or S3-compatible
/// storage (MinIO, etc.). Keys are used as given; prefixing is the caller's
/// concern.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Create a new S3ObjectStore for the given bucket.
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Get the bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Check that the bucket exists and is reachable with the configured
    /// credentials.
    pub async fn check_bucket(&self) -> Result<(), StoreError> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| StoreError::S3(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        let resp = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) if is_missing_object(&e) => return Ok(None),
            Err(e) => {
                return Err(StoreError::S3(format!(
                    "getting {}: {}",
                    self.identifier(key),
                    DisplayErrorContext(&e)
                )));
            }
        };

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?
            .into_bytes();

        Ok(Some(data))
    }

    async fn put(&self, key: &str, body: Bytes) -> Result<(), StoreError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| StoreError::S3(format!("putting {}: {}", self.identifier(key), e)))?;
        Ok(())
    }

    fn identifier(&self, key: &str) -> String {
        format!("s3://{}/{}", self.bucket, key)
    }
}

/// Whether a GetObject failure means the key does not exist.
///
/// Only `NoSuchKey` counts. Some S3-compatible stores answer a bare 404 with
/// no error document; that is a missing key too. A 404 carrying any other
/// code (`NoSuchBucket` in particular) is a store fault.
fn is_missing_object(err: &SdkError<GetObjectError>) -> bool {
    let Some(service_err) = err.as_service_error() else {
        return false;
    };
    if service_err.is_no_such_key() {
        return true;
    }
    match service_err.code() {
        Some(code) => code == "NoSuchKey",
        None => err.raw_response().is_some_and(|r| {
            r.status().as_u16() == 404 && r.body().bytes().map_or(true, |b| b.is_empty())
        }),
    }
}

/// Create an S3 client with optional custom endpoint and region.
///
/// Use a custom endpoint for S3-compatible services like MinIO:
/// ```ignore
/// let client = create_s3_client(Some("http://localhost:9000"), "us-east-1").await;
/// ```
///
/// For AWS S3, pass `None` to use the default endpoint:
/// ```ignore
/// let client = create_s3_client(None, "us-east-1").await;
/// ```
pub async fn create_s3_client(endpoint_url: Option<&str>, region: &str) -> Client {
    let region = aws_config::Region::new(region.to_string());
    let mut config_loader =
        aws_config::defaults(aws_config::BehaviorVersion::latest()).region(region);

    if let Some(endpoint) = endpoint_url {
        config_loader = config_loader.endpoint_url(endpoint);
    }

    let sdk_config = config_loader.load().await;

    // For S3-compatible services, we often need to use path-style addressing
    let s3_config = if endpoint_url.is_some() {
        aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build()
    } else {
        aws_sdk_s3::config::Builder::from(&sdk_config).build()
    };

    Client::from_conf(s3_config)
}
