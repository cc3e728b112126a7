use crate::{
    bedrock::ImageGenerator,
    config::{INPUT_KEY_PREFIX, OUTPUT_KEY_PREFIX, PRESIGN_EXPIRY_SECS},
    error::{PosterError, Result},
    models::{GatewayEvent, GatewayResponse, ImageToImageRequest},
    multipart::{parse_multipart, MultipartForm},
    storage::{object_key, ObjectStorage},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Local;
use std::sync::Arc;
use std::time::Duration;

pub const PROMPT_FIELD: &str = "prompt";
pub const IMAGE_FIELD: &str = "img";

/// Prompt and source image pulled out of the form.
#[derive(Debug, Clone, PartialEq)]
pub struct PosterRequest {
    pub prompt: String,
    pub image: Vec<u8>,
}

impl PosterRequest {
    /// Takes the first `prompt` value and the first `img` file.
    pub fn from_form(form: &MultipartForm) -> Result<Self> {
        let prompt = form
            .first_field(PROMPT_FIELD)
            .ok_or(PosterError::MissingFieldError {
                field: PROMPT_FIELD,
            })?
            .to_string();

        let image = form
            .first_file(IMAGE_FIELD)
            .ok_or(PosterError::MissingFieldError { field: IMAGE_FIELD })?
            .data
            .clone();

        Ok(Self { prompt, image })
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedPoster {
    pub image: Vec<u8>,
    pub storage_key: String,
    pub retrieval_url: String,
}

pub struct PosterPipeline {
    storage: Arc<dyn ObjectStorage>,
    generator: Arc<dyn ImageGenerator>,
    presign_expiry: Duration,
}

impl PosterPipeline {
    pub fn new(storage: Arc<dyn ObjectStorage>, generator: Arc<dyn ImageGenerator>) -> Self {
        Self {
            storage,
            generator,
            presign_expiry: Duration::from_secs(PRESIGN_EXPIRY_SECS),
        }
    }

    pub fn with_presign_expiry(mut self, expiry: Duration) -> Self {
        self.presign_expiry = expiry;
        self
    }

    /// Runs one request end to end. Every failure becomes a JSON error response.
    pub async fn handle(&self, event: &GatewayEvent) -> GatewayResponse {
        match self.process(event).await {
            Ok(poster) => {
                log::info!("generate_presigned_url {}", poster.retrieval_url);
                GatewayResponse::ok(poster.retrieval_url)
            }
            Err(e) => {
                if e.is_client_fault() {
                    log::warn!("Rejected request: {}", e);
                } else {
                    log::error!("Request failed: {}", e);
                }
                GatewayResponse::from_error(&e)
            }
        }
    }

    pub async fn process(&self, event: &GatewayEvent) -> Result<GeneratedPoster> {
        log::info!("headers {:?}", event.headers);

        let body = decode_body(event)?;
        let content_type = event
            .content_type()
            .ok_or_else(|| PosterError::DecodeError("Missing Content-Type header".into()))?;

        let form = parse_multipart(body, content_type).await?;
        let request = PosterRequest::from_form(&form)?;

        self.generate(request).await
    }

    /// Stores the input, asks the model for a poster, stores the result and
    /// presigns it. Steps run strictly in that order and stop at the first
    /// failure; nothing already written is rolled back.
    pub async fn generate(&self, request: PosterRequest) -> Result<GeneratedPoster> {
        let PosterRequest { prompt, image } = request;
        let generation_request = ImageToImageRequest::new(&prompt, &image);

        let input_key = object_key(INPUT_KEY_PREFIX, &Local::now());
        let put = self.storage.put_object(&input_key, image).await?;
        log::info!("s3_response key={} e_tag={:?}", put.key, put.e_tag);

        log::info!("prompt {}", prompt);
        log::info!("img len {}", generation_request.init_image.len());

        let response = self.generator.generate(&generation_request).await?;
        let poster = response.first_image()?;

        let output_key = object_key(OUTPUT_KEY_PREFIX, &Local::now());
        let put = self.storage.put_object(&output_key, poster.clone()).await?;
        log::info!(
            "Stored poster key={} size={} e_tag={:?}",
            put.key,
            put.size_bytes,
            put.e_tag
        );

        let retrieval_url = self
            .storage
            .presign_get(&output_key, self.presign_expiry)
            .await?;

        Ok(GeneratedPoster {
            image: poster,
            storage_key: output_key,
            retrieval_url,
        })
    }
}

fn decode_body(event: &GatewayEvent) -> Result<Vec<u8>> {
    let body = event
        .body
        .as_deref()
        .ok_or_else(|| PosterError::DecodeError("Request body is empty".into()))?;

    if !event.is_base64_encoded {
        log::warn!("Gateway did not flag the body as base64; decoding anyway");
    }

    // Strict alphabet: stray characters such as embedded line breaks are rejected.
    STANDARD
        .decode(body.trim())
        .map_err(|e| PosterError::DecodeError(format!("Body is not valid base64: {}", e)))
}
