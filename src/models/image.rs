use crate::config::{CFG_SCALE, HEIGHT, PROMPT_WEIGHT, SEED, STEPS, WIDTH};
use crate::error::{PosterError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPrompt {
    pub text: String,
    pub weight: f32,
}

/// Stable Diffusion image-to-image payload as accepted by Bedrock `InvokeModel`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageToImageRequest {
    pub text_prompts: Vec<TextPrompt>,
    pub cfg_scale: f32,
    pub seed: u32,
    pub steps: u32,
    pub width: u32,
    pub height: u32,
    pub init_image: String, // Base64 encoded
}

impl ImageToImageRequest {
    pub fn new(prompt: &str, init_image: &[u8]) -> Self {
        Self {
            text_prompts: vec![TextPrompt {
                text: prompt.to_string(),
                weight: PROMPT_WEIGHT,
            }],
            cfg_scale: CFG_SCALE,
            seed: SEED,
            steps: STEPS,
            width: WIDTH,
            height: HEIGHT,
            init_image: STANDARD.encode(init_image),
        }
    }

    pub fn prompt(&self) -> &str {
        self.text_prompts
            .first()
            .map(|p| p.text.as_str())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub base64: String,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(rename = "finishReason", default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageToImageResponse {
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

impl ImageToImageResponse {
    /// Decodes the first artifact. Additional artifacts are ignored.
    pub fn first_image(&self) -> Result<Vec<u8>> {
        let artifact = self
            .artifacts
            .first()
            .ok_or_else(|| PosterError::GenerationError("No images generated".into()))?;

        if artifact.finish_reason.as_deref() == Some("ERROR") {
            return Err(PosterError::GenerationError(
                "Model reported finishReason ERROR".into(),
            ));
        }

        STANDARD
            .decode(&artifact.base64)
            .map_err(|e| PosterError::GenerationError(format!("Invalid artifact base64: {}", e)))
    }
}
