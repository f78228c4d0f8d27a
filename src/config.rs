use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::enums::{ DeliveryMode, StorageBackend };
use crate::error::{ AppError, Result };

/// S3 target resolved from environment variables.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    pub key_prefix: String,
    /// Overrides the virtual-hosted S3 URL when objects sit behind a CDN.
    pub public_base_url: Option<String>,
}

/// Headless browser settings.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub chrome_executable: Option<PathBuf>,
    pub no_sandbox: bool,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub storage_backend: StorageBackend,
    pub output_dir: PathBuf,
    pub s3: Option<S3Config>,
    pub delivery_mode: DeliveryMode,
    pub host_id: String,
    pub verify_base_url: Option<String>,
    pub qr_module_size: u32,
    pub render: RenderConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self> where F: Fn(&str) -> Option<String> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_host = var("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let server_port = Self::parse_number(var("SERVER_PORT"), "SERVER_PORT", 3000u16)?;

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => StorageBackend::Local,
        };

        let output_dir = PathBuf::from(var("OUTPUT_DIR").unwrap_or_else(|| "gen".to_string()));

        let s3 = match storage_backend {
            StorageBackend::S3 => {
                let bucket = var("S3_BUCKET").ok_or_else(||
                    AppError::Config("S3_BUCKET is required when STORAGE_BACKEND=s3".to_string())
                )?;
                let region = var("AWS_REGION").ok_or_else(||
                    AppError::Config("AWS_REGION is required when STORAGE_BACKEND=s3".to_string())
                )?;
                let key_prefix = var("S3_KEY_PREFIX")
                    .unwrap_or_else(|| "certificates".to_string())
                    .trim_matches('/')
                    .to_string();
                let public_base_url = var("PUBLIC_BASE_URL").map(|url|
                    url.trim_end_matches('/').to_string()
                );

                Some(S3Config {
                    bucket,
                    region,
                    key_prefix,
                    public_base_url,
                })
            }
            StorageBackend::Local => None,
        };

        let delivery_mode = match var("DELIVERY_MODE") {
            Some(raw) => raw.parse()?,
            None => storage_backend.default_delivery(),
        };

        // Local files have no URL the caller could follow
        if storage_backend == StorageBackend::Local && delivery_mode == DeliveryMode::Redirect {
            return Err(
                AppError::Config(
                    "DELIVERY_MODE=redirect requires STORAGE_BACKEND=s3; local artifacts can only be served inline".to_string()
                )
            );
        }

        let host_id = match var("HOST_ID") {
            Some(id) => id,
            None => Self::detect_hostname(),
        };

        let verify_base_url = var("VERIFY_BASE_URL").map(|url| url.trim_end_matches('/').to_string());

        let qr_module_size = Self::parse_number(var("QR_MODULE_SIZE"), "QR_MODULE_SIZE", 4u32)?;
        if qr_module_size == 0 {
            return Err(AppError::Config("QR_MODULE_SIZE must be at least 1".to_string()));
        }

        let no_sandbox = match var("CHROME_NO_SANDBOX") {
            Some(raw) => Self::parse_bool(&raw, "CHROME_NO_SANDBOX")?,
            None => false,
        };
        let timeout_secs = Self::parse_number(var("RENDER_TIMEOUT_SECS"), "RENDER_TIMEOUT_SECS", 30u64)?;

        Ok(Config {
            server_host,
            server_port,
            storage_backend,
            output_dir,
            s3,
            delivery_mode,
            host_id,
            verify_base_url,
            qr_module_size,
            render: RenderConfig {
                chrome_executable: var("CHROME_EXECUTABLE").map(PathBuf::from),
                no_sandbox,
                request_timeout: Duration::from_secs(timeout_secs),
            },
        })
    }

    /// Address the HTTP server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    fn detect_hostname() -> String {
        match sys_info::hostname() {
            Ok(name) if !name.trim().is_empty() => name.trim().to_string(),
            Ok(_) => "localhost".to_string(),
            Err(e) => {
                tracing::warn!("Could not read hostname, falling back to localhost: {}", e);
                "localhost".to_string()
            }
        }
    }

    fn parse_number<T: std::str::FromStr>(raw: Option<String>, key: &str, default: T) -> Result<T> {
        match raw {
            Some(value) =>
                value
                    .trim()
                    .parse()
                    .map_err(|_| AppError::Config(format!("{} must be a number, got '{}'", key, value))),
            None => Ok(default),
        }
    }

    fn parse_bool(raw: &str, key: &str) -> Result<bool> {
        match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(AppError::Config(format!("{} must be a boolean, got '{}'", key, raw))),
        }
    }
}
