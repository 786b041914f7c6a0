mod progress;
mod settings;

use anyhow::{Context, Result};
use dog_upload::prelude::*;

use crate::settings::CliSettings;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let settings = CliSettings::from_env()?;

    let (source, mut target) = FileSource::open(&settings.file)
        .await
        .with_context(|| format!("cannot read {}", settings.file.display()))?;
    if let Some(name) = &settings.object_name {
        target = UploadTarget::new(name.clone(), target.total_bytes);
    }

    let authority = HttpSigningAuthority::new(HttpAuthorityConfig::new(&settings.api_base_url))?;
    let uploader =
        MultipartUploader::new(authority, HttpPartTransport::new(), settings.upload_config());

    let handle = uploader.start(target, source);
    let reporter = progress::spawn_reporter(handle.subscribe());

    let receipt = handle.wait().await?;
    progress::finish(reporter).await;

    println!(
        "[upload] stored {} ({} bytes, {} parts)",
        receipt.object_name,
        receipt.total_bytes,
        receipt.part_count()
    );
    if let Some(location) = &receipt.location {
        println!("[upload] location: {location}");
    }

    Ok(())
}
