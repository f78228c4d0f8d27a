use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::Client;
use aws_smithy_types::byte_stream::ByteStream;

use crate::config::S3Config;
use crate::error::{ AppError, Result };
use crate::providers::{ ArtifactLocation, ArtifactStore, PdfArtifact };

use super::PDF_CONTENT_TYPE;

/// Uploads artifacts to an S3 bucket under a fixed key prefix.
pub struct S3ArtifactStore {
    client: Client,
    bucket: String,
    region: String,
    key_prefix: String,
    public_base_url: Option<String>,
}

impl S3ArtifactStore {
    pub fn new(client: Client, config: &S3Config) -> Self {
        Self {
            client,
            bucket: config.bucket.clone(),
            region: config.region.clone(),
            key_prefix: config.key_prefix.clone(),
            public_base_url: config.public_base_url.clone(),
        }
    }

    /// Build a client from the default credential chain in the configured region.
    pub async fn from_config(config: &S3Config) -> Self {
        let sdk_config = aws_config
            ::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .load().await;

        Self::new(Client::new(&sdk_config), config)
    }

    pub fn object_key(&self, file_name: &str) -> String {
        if self.key_prefix.is_empty() {
            file_name.to_string()
        } else {
            format!("{}/{}", self.key_prefix, file_name)
        }
    }

    pub fn object_url(&self, key: &str) -> String {
        let encoded: Vec<String> = key
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        let path = encoded.join("/");

        match &self.public_base_url {
            Some(base) => format!("{}/{}", base, path),
            None => format!("https://{}.s3.{}.amazonaws.com/{}", self.bucket, self.region, path),
        }
    }
}

#[async_trait]
impl ArtifactStore for S3ArtifactStore {
    async fn store(&self, artifact: PdfArtifact) -> Result<ArtifactLocation> {
        let key = self.object_key(&artifact.file_name);
        let size = artifact.bytes.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(PDF_CONTENT_TYPE)
            .body(ByteStream::from(artifact.bytes))
            .send().await
            .map_err(|e| AppError::Store(put_object_error(&self.bucket, &key, &e)))?;

        let url = self.object_url(&key);
        tracing::info!("Uploaded {} bytes to s3://{}/{}", size, self.bucket, key);

        Ok(ArtifactLocation::RemoteUrl(url))
    }
}

/// Full error chain, so dispatch and timeout causes survive into the log.
fn put_object_error(bucket: &str, key: &str, err: &dyn std::error::Error) -> String {
    format!("S3 PutObject s3://{}/{} failed: {}", bucket, key, DisplayErrorContext(err))
}
