use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use dog_upload::{UploadConfig, DEFAULT_PART_SIZE};

pub const USAGE: &str = "usage: upload-cli <file> [object-name]";

/// Command line and environment for one upload
#[derive(Debug, Clone)]
pub struct CliSettings {
    pub file: PathBuf,
    pub object_name: Option<String>,
    pub api_base_url: String,
    pub part_size: u64,
    pub max_concurrency: Option<usize>,
}

impl CliSettings {
    pub fn from_env() -> Result<Self> {
        Self::parse(std::env::args().skip(1), |key| std::env::var(key).ok())
    }

    pub fn parse<I, F>(args: I, lookup: F) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut args = args.into_iter();
        let Some(file) = args.next() else {
            bail!(USAGE);
        };
        let object_name = args.next();
        if args.next().is_some() {
            bail!(USAGE);
        }

        let part_size = match lookup("UPLOAD_PART_SIZE") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("UPLOAD_PART_SIZE must be a byte count, got {raw:?}"))?,
            None => DEFAULT_PART_SIZE,
        };

        let max_concurrency = lookup("UPLOAD_MAX_CONCURRENCY")
            .map(|raw| {
                raw.parse::<usize>().with_context(|| {
                    format!("UPLOAD_MAX_CONCURRENCY must be a number, got {raw:?}")
                })
            })
            .transpose()?;

        Ok(Self {
            file: PathBuf::from(file),
            object_name,
            api_base_url: lookup("UPLOAD_API_BASE_URL")
                .unwrap_or_else(|| "http://127.0.0.1:5000".to_string()),
            part_size,
            max_concurrency,
        })
    }

    pub fn upload_config(&self) -> UploadConfig {
        let config = UploadConfig::default().with_part_size(self.part_size);
        match self.max_concurrency {
            Some(limit) => config.with_max_concurrency(limit),
            None => config,
        }
    }
}
