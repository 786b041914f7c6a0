use std::time::Duration;

use crate::ConfigError;

pub const DEFAULT_PRESIGN_EXPIRES_SECS: u64 = 3600;

/// Storage settings read from the environment
#[derive(Debug, Clone)]
pub struct S3Settings {
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,

    /// Empty when `S3_BUCKET_NAME` is unset; requests then fail with "Invalid S3 bucket name"
    pub bucket: String,

    /// Custom endpoint for S3-compatible stores, addressed path-style
    pub endpoint_url: Option<String>,

    pub presign_expires: Duration,
}

impl S3Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing { key })
        };

        let presign_expires = match lookup("PRESIGN_EXPIRES_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "PRESIGN_EXPIRES_SECS",
                        value: raw,
                    })
                }
            },
            None => Duration::from_secs(DEFAULT_PRESIGN_EXPIRES_SECS),
        };

        Ok(Self {
            region: required("AWS_DEFAULT_REGION")?,
            access_key_id: required("AWS_ACCESS_KEY_ID")?,
            secret_access_key: required("AWS_SECRET_ACCESS_KEY")?,
            bucket: lookup("S3_BUCKET_NAME")
                .map(|name| name.trim().to_string())
                .unwrap_or_default(),
            endpoint_url: lookup("S3_ENDPOINT_URL").filter(|url| !url.is_empty()),
            presign_expires,
        })
    }
}

/// Listener address
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("AUTHORITY_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env_var_or("AUTHORITY_PORT", 5000),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_var_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn base() -> HashMap<String, String> {
        env(&[
            ("AWS_DEFAULT_REGION", "eu-west-1"),
            ("AWS_ACCESS_KEY_ID", "AKIA"),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
            ("S3_BUCKET_NAME", "uploads"),
        ])
    }

    #[test]
    fn reads_settings_with_defaults() {
        let vars = base();
        let settings = S3Settings::from_lookup(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(settings.region, "eu-west-1");
        assert_eq!(settings.bucket, "uploads");
        assert_eq!(settings.endpoint_url, None);
        assert_eq!(settings.presign_expires, Duration::from_secs(3600));
    }

    #[test]
    fn missing_credentials_fail() {
        let mut vars = base();
        vars.remove("AWS_SECRET_ACCESS_KEY");
        let err = S3Settings::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Missing {
                key: "AWS_SECRET_ACCESS_KEY"
            }
        ));
    }

    #[test]
    fn missing_bucket_is_left_empty() {
        let mut vars = base();
        vars.remove("S3_BUCKET_NAME");
        let settings = S3Settings::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert!(settings.bucket.is_empty());
    }

    #[test]
    fn expiry_and_endpoint_overrides() {
        let mut vars = base();
        vars.insert("PRESIGN_EXPIRES_SECS".into(), "900".into());
        vars.insert("S3_ENDPOINT_URL".into(), "http://localhost:9000".into());
        let settings = S3Settings::from_lookup(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(settings.presign_expires, Duration::from_secs(900));
        assert_eq!(settings.endpoint_url.as_deref(), Some("http://localhost:9000"));
    }

    #[test]
    fn zero_expiry_is_invalid() {
        let mut vars = base();
        vars.insert("PRESIGN_EXPIRES_SECS".into(), "0".into());
        assert!(matches!(
            S3Settings::from_lookup(|k| vars.get(k).cloned()),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
