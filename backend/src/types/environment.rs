//! Environment configuration for different deployment stages

use std::env;
use std::time::Duration;

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion};
use tracing::Level;

/// `LocalStack` endpoint used in development
const LOCALSTACK_ENDPOINT: &str = "http://localhost:4566";

/// Default presigned URL lifetime (3 minutes)
const DEFAULT_PRESIGNED_URL_EXPIRY_SECS: u64 = 3 * 60;

/// Application environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (uses `LocalStack`)
    Development {
        /// Optional override for presigned URL expiry in seconds
        presign_expiry_override: Option<u64>,
    },
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => {
                let presign_expiry_override = env::var("PRESIGNED_URL_EXPIRY_SECS")
                    .ok()
                    .and_then(|val| val.parse::<u64>().ok());

                Self::Development {
                    presign_expiry_override,
                }
            }
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Returns the S3 bucket name for the environment
    ///
    /// # Panics
    ///
    /// Panics if the `S3_BUCKET_NAME` environment variable is not set outside development
    #[must_use]
    pub fn s3_bucket(&self) -> String {
        match self {
            Self::Production | Self::Staging => {
                env::var("S3_BUCKET_NAME").expect("S3_BUCKET_NAME environment variable is not set")
            }
            Self::Development { .. } => {
                env::var("S3_BUCKET_NAME").unwrap_or_else(|_| "podu-images".to_string())
            }
        }
    }

    /// Base URL that public image links are built from, without a trailing slash
    ///
    /// # Panics
    ///
    /// Panics if the `PUBLIC_BASE_URL` environment variable is not set outside development
    #[must_use]
    pub fn public_base_url(&self) -> String {
        let url = match self {
            Self::Production | Self::Staging => env::var("PUBLIC_BASE_URL")
                .expect("PUBLIC_BASE_URL environment variable is not set"),
            Self::Development { .. } => env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("{LOCALSTACK_ENDPOINT}/{}", self.s3_bucket())),
        };

        url.trim_end_matches('/').to_string()
    }

    /// Whether to show API docs
    #[must_use]
    pub const fn show_api_docs(&self) -> bool {
        matches!(self, Self::Development { .. } | Self::Staging)
    }

    /// Returns the endpoint URL to use for the object store
    ///
    /// `S3_ENDPOINT_URL` points the client at an S3-compatible provider (R2, MinIO);
    /// development falls back to `LocalStack`.
    #[must_use]
    pub fn override_aws_endpoint_url(&self) -> Option<String> {
        let configured = env::var("S3_ENDPOINT_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        match self {
            Self::Production | Self::Staging => configured,
            Self::Development { .. } => {
                configured.or_else(|| Some(LOCALSTACK_ENDPOINT.to_string()))
            }
        }
    }

    /// AWS configuration with retry and timeout settings
    pub async fn aws_config(&self) -> aws_config::SdkConfig {
        let retry_config = RetryConfig::standard()
            .with_max_attempts(3)
            .with_initial_backoff(Duration::from_millis(50));

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(30))
            .build();

        let mut config_builder = aws_config::load_defaults(BehaviorVersion::latest())
            .await
            .to_builder()
            .retry_config(retry_config)
            .timeout_config(timeout_config);

        if let Some(endpoint_url) = self.override_aws_endpoint_url() {
            config_builder = config_builder.endpoint_url(endpoint_url);
        }

        config_builder.build()
    }

    /// AWS S3 service configuration
    pub async fn s3_client_config(&self) -> aws_sdk_s3::Config {
        let aws_config = self.aws_config().await;
        let s3_config: aws_sdk_s3::Config = (&aws_config).into();
        let mut builder = s3_config.to_builder();

        // Override "force path style" to true for compatibility with LocalStack
        // https://github.com/awslabs/aws-sdk-rust/discussions/874
        if matches!(self, Self::Development { .. }) {
            builder.set_force_path_style(Some(true));
        }

        builder.build()
    }

    /// Presigned URL expiry time in seconds
    #[must_use]
    pub fn presigned_url_expiry_secs(&self) -> u64 {
        match self {
            Self::Production | Self::Staging => DEFAULT_PRESIGNED_URL_EXPIRY_SECS,
            Self::Development {
                presign_expiry_override,
            } => presign_expiry_override.unwrap_or(DEFAULT_PRESIGNED_URL_EXPIRY_SECS),
        }
    }

    /// Default log level when `RUST_LOG` is not set
    #[must_use]
    pub fn tracing_level(&self) -> Level {
        env::var("TRACING_LEVEL")
            .ok()
            .and_then(|val| val.parse::<Level>().ok())
            .unwrap_or(match self {
                Self::Production | Self::Staging => Level::INFO,
                Self::Development { .. } => Level::DEBUG,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_environment_from_env() {
        // Test development (default)
        env::remove_var("APP_ENV");
        env::remove_var("PRESIGNED_URL_EXPIRY_SECS");
        assert_eq!(
            Environment::from_env(),
            Environment::Development {
                presign_expiry_override: None
            }
        );

        // Test explicit development, whitespace and case are ignored
        env::set_var("APP_ENV", " Development ");
        assert_eq!(
            Environment::from_env(),
            Environment::Development {
                presign_expiry_override: None
            }
        );

        env::set_var("APP_ENV", "staging");
        assert_eq!(Environment::from_env(), Environment::Staging);

        env::set_var("APP_ENV", "production");
        assert_eq!(Environment::from_env(), Environment::Production);

        env::remove_var("APP_ENV");
    }

    #[test]
    #[serial]
    #[should_panic(expected = "Invalid environment: invalid")]
    fn test_invalid_environment() {
        env::set_var("APP_ENV", "invalid");
        let _ = Environment::from_env();
    }

    #[test]
    fn test_presigned_url_expiry_secs() {
        let env = Environment::Development {
            presign_expiry_override: None,
        };
        assert_eq!(env.presigned_url_expiry_secs(), 180);

        let env = Environment::Development {
            presign_expiry_override: Some(30),
        };
        assert_eq!(env.presigned_url_expiry_secs(), 30);

        assert_eq!(Environment::Production.presigned_url_expiry_secs(), 180);
        assert_eq!(Environment::Staging.presigned_url_expiry_secs(), 180);
    }

    #[test]
    #[serial]
    fn test_development_with_env_override() {
        env::set_var("APP_ENV", "development");
        env::set_var("PRESIGNED_URL_EXPIRY_SECS", "120");

        let env = Environment::from_env();
        assert_eq!(
            env,
            Environment::Development {
                presign_expiry_override: Some(120)
            }
        );
        assert_eq!(env.presigned_url_expiry_secs(), 120);

        // Invalid value falls back to None
        env::set_var("PRESIGNED_URL_EXPIRY_SECS", "invalid");
        let env = Environment::from_env();
        assert_eq!(
            env,
            Environment::Development {
                presign_expiry_override: None
            }
        );

        env::remove_var("PRESIGNED_URL_EXPIRY_SECS");
        env::remove_var("APP_ENV");
    }

    #[test]
    #[serial]
    fn test_development_storage_defaults() {
        env::remove_var("S3_BUCKET_NAME");
        env::remove_var("PUBLIC_BASE_URL");
        env::remove_var("S3_ENDPOINT_URL");

        let env = Environment::Development {
            presign_expiry_override: None,
        };
        assert_eq!(env.s3_bucket(), "podu-images");
        assert_eq!(env.public_base_url(), "http://localhost:4566/podu-images");
        assert_eq!(
            env.override_aws_endpoint_url().as_deref(),
            Some("http://localhost:4566")
        );
        assert_eq!(Environment::Production.override_aws_endpoint_url(), None);
    }

    #[test]
    #[serial]
    fn test_storage_settings_from_env() {
        env::set_var("S3_BUCKET_NAME", "images");
        env::set_var("PUBLIC_BASE_URL", "https://i.podu.pics/");
        env::set_var("S3_ENDPOINT_URL", "https://account.r2.cloudflarestorage.com");

        let env = Environment::Production;
        assert_eq!(env.s3_bucket(), "images");
        assert_eq!(env.public_base_url(), "https://i.podu.pics");
        assert_eq!(
            env.override_aws_endpoint_url().as_deref(),
            Some("https://account.r2.cloudflarestorage.com")
        );

        env::remove_var("S3_BUCKET_NAME");
        env::remove_var("PUBLIC_BASE_URL");
        env::remove_var("S3_ENDPOINT_URL");
    }

    #[test]
    #[serial]
    #[should_panic(expected = "PUBLIC_BASE_URL environment variable is not set")]
    fn test_production_requires_public_base_url() {
        env::remove_var("PUBLIC_BASE_URL");
        let _ = Environment::Production.public_base_url();
    }

    #[test]
    fn test_show_api_docs() {
        assert!(!Environment::Production.show_api_docs());
        assert!(Environment::Staging.show_api_docs());
        assert!(Environment::Development {
            presign_expiry_override: None
        }
        .show_api_docs());
    }

    #[test]
    #[serial]
    fn test_tracing_level() {
        env::remove_var("TRACING_LEVEL");
        assert_eq!(Environment::Production.tracing_level(), Level::INFO);
        assert_eq!(
            Environment::Development {
                presign_expiry_override: None
            }
            .tracing_level(),
            Level::DEBUG
        );

        env::set_var("TRACING_LEVEL", "warn");
        assert_eq!(Environment::Production.tracing_level(), Level::WARN);
        env::remove_var("TRACING_LEVEL");
    }
}
