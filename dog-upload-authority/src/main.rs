use std::sync::Arc;

use anyhow::Result;
use dog_upload_authority::{router, S3Backend, S3Settings, ServerSettings};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let settings = S3Settings::from_env()?;
    if settings.bucket.is_empty() {
        tracing::warn!("S3_BUCKET_NAME is not set; session requests will be rejected");
    }
    let backend = S3Backend::connect(settings).await;

    let addr = ServerSettings::from_env().addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("signing authority listening on http://{addr}");

    axum::serve(listener, router(Arc::new(backend))).await?;

    Ok(())
}
