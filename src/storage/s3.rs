use crate::{
    error::{PosterError, Result},
    logger,
    storage::traits::{ObjectStorage, PutResult},
};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::{
    error::{ProvideErrorMetadata, SdkError},
    presigning::PresigningConfig,
    primitives::ByteStream,
    Client,
};
use std::fmt::Debug;
use std::time::Duration;

#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
}

impl S3Storage {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn from_sdk_config(sdk_config: &SdkConfig, bucket: impl Into<String>) -> Self {
        Self::new(Client::new(sdk_config), bucket)
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put_object(&self, key: &str, data: Vec<u8>) -> Result<PutResult> {
        let size_bytes = data.len();
        let _timer = logger::timer("s3:put_object");
        log::info!("Uploading {} bytes to s3://{}/{}", size_bytes, self.bucket, key);

        let output = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| map_sdk_error("PutObject", e))?;

        let result = PutResult {
            key: key.to_string(),
            size_bytes,
            e_tag: output.e_tag().map(str::to_string),
        };
        log::debug!("s3 put_object response: {:?}", output);
        Ok(result)
    }

    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String> {
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| PosterError::StorageError(format!("Invalid presign expiry: {}", e)))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| map_sdk_error("GetObject presign", e))?;

        Ok(request.uri().to_string())
    }
}

fn map_sdk_error<E, R>(operation: &str, err: SdkError<E, R>) -> PosterError
where
    E: ProvideErrorMetadata + Debug,
    R: Debug,
{
    log::error!("S3 {} error details: {:?}", operation, err);

    if let Some(service_error) = err.as_service_error() {
        log::error!("Service error code: {:?}", service_error.code());
        log::error!("Service error message: {:?}", service_error.message());
        PosterError::StorageError(format!(
            "S3 {} failed: {} - {}",
            operation,
            service_error.code().unwrap_or("unknown"),
            service_error.message().unwrap_or("no message")
        ))
    } else {
        PosterError::StorageError(format!("S3 {} failed: {:?}", operation, err))
    }
}
