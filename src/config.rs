use crate::error::{PosterError, Result};
use aws_config::{meta::region::RegionProviderChain, BehaviorVersion, Region, SdkConfig};
use aws_sdk_bedrockruntime::config::Credentials;
use std::env;
use std::time::Duration;

/// Bedrock model invoked for every request.
pub const DEFAULT_MODEL_ID: &str = "stability.stable-diffusion-xl-v1";
pub const PROMPT_WEIGHT: f32 = 1.0;
pub const CFG_SCALE: f32 = 10.0;
pub const SEED: u32 = 0;
pub const STEPS: u32 = 50;
pub const WIDTH: u32 = 512;
pub const HEIGHT: u32 = 512;

pub const PRESIGN_EXPIRY_SECS: u64 = 3600;

pub const INPUT_KEY_PREFIX: &str = "test_";
pub const OUTPUT_KEY_PREFIX: &str = "posterName_";

pub const BUCKET_ENV: &str = "S3Bucket";
pub const MODEL_ID_ENV: &str = "BEDROCK_MODEL_ID";

const FALLBACK_REGION: &str = "us-east-1";

#[derive(Debug, Clone, Default)]
pub struct AwsConfig {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

impl AwsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let region = lookup("AWS_REGION").or_else(|| lookup("AWS_DEFAULT_REGION"));
        // Credentials come from the default provider chain unless set explicitly.
        AwsConfig {
            region,
            ..Default::default()
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Builds the SDK configuration shared by the S3 and Bedrock clients.
    pub async fn load(&self) -> SdkConfig {
        let region_provider = RegionProviderChain::first_try(self.region.clone().map(Region::new))
            .or_default_provider()
            .or_else(Region::new(FALLBACK_REGION));

        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);

        if let (Some(access_key), Some(secret_key)) = (&self.access_key, &self.secret_key) {
            loader = loader.credentials_provider(Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "bedrock-poster",
            ));
        }

        loader.load().await
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bucket: String,
    pub model_id: String,
    pub presign_expiry: Duration,
    pub aws: AwsConfig,
}

impl Config {
    pub fn new(bucket: impl Into<String>) -> Self {
        Config {
            bucket: bucket.into(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            presign_expiry: Duration::from_secs(PRESIGN_EXPIRY_SECS),
            aws: AwsConfig::default(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bucket = lookup(BUCKET_ENV)
            .filter(|b| !b.trim().is_empty())
            .ok_or_else(|| {
                PosterError::ConfigError(format!("{} environment variable is not set", BUCKET_ENV))
            })?;

        let mut config = Config::new(bucket).with_aws(AwsConfig::from_lookup(&lookup));
        if let Some(model_id) = lookup(MODEL_ID_ENV).filter(|m| !m.trim().is_empty()) {
            config = config.with_model_id(model_id);
        }
        Ok(config)
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn with_presign_expiry(mut self, expiry: Duration) -> Self {
        self.presign_expiry = expiry;
        self
    }

    pub fn with_aws(mut self, aws: AwsConfig) -> Self {
        self.aws = aws;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_config_from_lookup() {
        let config = Config::from_lookup(lookup_from(&[
            ("S3Bucket", "posters"),
            ("AWS_REGION", "eu-west-1"),
        ]))
        .unwrap();

        assert_eq!(config.bucket, "posters");
        assert_eq!(config.model_id, DEFAULT_MODEL_ID);
        assert_eq!(config.presign_expiry, Duration::from_secs(3600));
        assert_eq!(config.aws.region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn test_model_id_override() {
        let config = Config::from_lookup(lookup_from(&[
            ("S3Bucket", "posters"),
            ("BEDROCK_MODEL_ID", "stability.stable-diffusion-xl-v1:0"),
        ]))
        .unwrap();
        assert_eq!(config.model_id, "stability.stable-diffusion-xl-v1:0");
    }

    #[test]
    fn test_missing_bucket_is_config_error() {
        let err = Config::from_lookup(lookup_from(&[("S3Bucket", "  ")])).unwrap_err();
        assert_eq!(err.kind(), "ConfigError");
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_aws_config_builder() {
        let aws = AwsConfig::new()
            .with_region("us-west-2")
            .with_credentials("AKIAEXAMPLE", "secret");
        assert_eq!(aws.region.as_deref(), Some("us-west-2"));
        assert_eq!(aws.access_key.as_deref(), Some("AKIAEXAMPLE"));
        assert_eq!(aws.secret_key.as_deref(), Some("secret"));
    }
}
