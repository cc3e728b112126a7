use crate::{
    error::Result,
    models::{ImageToImageRequest, ImageToImageResponse},
};
use async_trait::async_trait;

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, request: &ImageToImageRequest) -> Result<ImageToImageResponse>;
}
