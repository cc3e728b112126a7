use crate::{
    bedrock::traits::ImageGenerator,
    error::{PosterError, Result},
    logger,
    models::{ImageToImageRequest, ImageToImageResponse},
};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_bedrockruntime::{error::ProvideErrorMetadata, primitives::Blob, Client};

#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    model_id: String,
}

impl ImageClient {
    pub fn new(client: Client, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }

    pub fn from_sdk_config(sdk_config: &SdkConfig, model_id: impl Into<String>) -> Self {
        Self::new(Client::new(sdk_config), model_id)
    }
}

#[async_trait]
impl ImageGenerator for ImageClient {
    async fn generate(&self, request: &ImageToImageRequest) -> Result<ImageToImageResponse> {
        let request_json = serde_json::to_string(request)
            .map_err(|e| PosterError::GenerationError(e.to_string()))?;

        log::info!("Generating image with model: {}", self.model_id);
        let _timer = logger::timer("bedrock:invoke_model");

        let response = self
            .client
            .invoke_model()
            .model_id(&self.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(request_json.into_bytes()))
            .send()
            .await
            .map_err(|e| {
                log::error!("AWS SDK Image Generation Error details: {:?}", e);

                if let Some(service_error) = e.as_service_error() {
                    log::error!("Service error code: {:?}", service_error.code());
                    log::error!("Service error message: {:?}", service_error.message());
                    PosterError::GenerationError(format!(
                        "Bedrock service error: {} - {}",
                        service_error.code().unwrap_or("unknown"),
                        service_error.message().unwrap_or("no message")
                    ))
                } else {
                    PosterError::GenerationError(format!("AWS SDK error: {}", e))
                }
            })?;

        let response_bytes = response.body.into_inner();
        let parsed: ImageToImageResponse = serde_json::from_slice(&response_bytes)
            .map_err(|e| PosterError::GenerationError(format!("Malformed model response: {}", e)))?;

        for artifact in &parsed.artifacts {
            log::debug!(
                "Artifact seed={:?} finishReason={:?} base64_len={}",
                artifact.seed,
                artifact.finish_reason,
                artifact.base64.len()
            );
        }

        Ok(parsed)
    }
}
