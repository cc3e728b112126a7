use bedrock_poster::{
    logger::{self, LoggerConfig},
    Config, GatewayEvent, GatewayResponse, ImageClient, PosterPipeline, S3Storage,
};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(LoggerConfig::from_env())?;
    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ {}", e);
            return Err(e.into());
        }
    };
    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), &config);

    let sdk_config = config.aws.load().await;
    let storage = Arc::new(S3Storage::from_sdk_config(&sdk_config, config.bucket.clone()));
    let generator = Arc::new(ImageClient::from_sdk_config(&sdk_config, config.model_id.clone()));
    let pipeline = Arc::new(
        PosterPipeline::new(storage, generator).with_presign_expiry(config.presign_expiry),
    );
    log::info!("✅ S3 and Bedrock clients initialized");

    lambda_runtime::run(service_fn(move |event: LambdaEvent<GatewayEvent>| {
        let pipeline = Arc::clone(&pipeline);
        async move {
            logger::set_request_id(Some(event.context.request_id.clone()));
            let response = pipeline.handle(&event.payload).await;
            logger::set_request_id(None);
            Ok::<GatewayResponse, Error>(response)
        }
    }))
    .await
}
