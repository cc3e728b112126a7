pub mod bedrock;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod multipart;
pub mod pipeline;
pub mod storage;

pub use bedrock::{ImageClient, ImageGenerator};
pub use config::{AwsConfig, Config};
pub use error::{PosterError, Result};
pub use models::{GatewayEvent, GatewayResponse, ImageToImageRequest, ImageToImageResponse};
pub use multipart::{parse_multipart, MultipartForm};
pub use pipeline::{GeneratedPoster, PosterPipeline, PosterRequest};
pub use storage::{ObjectStorage, S3Storage};
