use std::fmt;
use std::str::FromStr;

use serde::{ Deserialize, Serialize };

use crate::error::AppError;

// ─── StorageBackend ──────────────────────────────────────────────────

/// Where generated PDFs are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackend {
    Local,
    S3,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Local => "local",
            StorageBackend::S3 => "s3",
        }
    }

    /// Delivery mode used when `DELIVERY_MODE` is not set.
    pub fn default_delivery(&self) -> DeliveryMode {
        match self {
            StorageBackend::Local => DeliveryMode::Inline,
            StorageBackend::S3 => DeliveryMode::Redirect,
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "fs" | "filesystem" => Ok(StorageBackend::Local),
            "s3" | "aws" => Ok(StorageBackend::S3),
            _ => Err(AppError::Config(format!(
                "Unsupported storage backend: {}. Supported: local, s3",
                s
            ))),
        }
    }
}

// ─── DeliveryMode ────────────────────────────────────────────────────

/// How a successful response hands the PDF back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryMode {
    /// Serve the PDF bytes in the response body.
    Inline,
    /// 303 to the stored artifact.
    Redirect,
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryMode::Inline => f.write_str("inline"),
            DeliveryMode::Redirect => f.write_str("redirect"),
        }
    }
}

impl FromStr for DeliveryMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inline" | "serve" => Ok(DeliveryMode::Inline),
            "redirect" => Ok(DeliveryMode::Redirect),
            _ => Err(AppError::Config(format!(
                "Invalid delivery mode: {}. Supported: inline, redirect",
                s
            ))),
        }
    }
}
