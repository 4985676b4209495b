use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;

use podu_backend::{
    media_storage::{MediaStorage, PresignedUploader},
    server,
    types::Environment,
};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = Environment::from_env();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(environment.tracing_level().as_str()));

    // JSON logs for staging/production, regular format for development
    match environment {
        Environment::Production | Environment::Staging => {
            fmt().json().with_env_filter(env_filter).init();
        }
        Environment::Development { .. } => {
            fmt().with_env_filter(env_filter).init();
        }
    }

    let s3_client = Arc::new(S3Client::from_conf(environment.s3_client_config().await));
    let media_storage: Arc<dyn PresignedUploader> = Arc::new(MediaStorage::new(
        s3_client,
        environment.s3_bucket(),
        environment.public_base_url(),
        environment.presigned_url_expiry_secs(),
    ));

    server::start(environment, media_storage).await
}
