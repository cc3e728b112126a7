use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Writes `data` under `key`, replacing any existing object.
    async fn put_object(&self, key: &str, data: Vec<u8>) -> Result<PutResult>;

    /// Issues a time-limited GET link for `key`.
    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String>;
}

#[derive(Debug, Clone, Default)]
pub struct PutResult {
    pub key: String,
    pub size_bytes: usize,
    pub e_tag: Option<String>,
}
