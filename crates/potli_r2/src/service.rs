use crate::error::R2Error;
use crate::logic::{decode_content, file_key, public_url_for};
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use chrono::Utc;
use potli_common::services::{BoxFuture, FileDescriptor, FileProvider, UploadFile, UploadedFile};
use potli_config::R2Config;
use tracing::{error, info};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// File storage on a Cloudflare R2 bucket through the S3 API.
#[derive(Debug, Clone)]
pub struct R2FileService {
    client: S3Client,
    bucket: String,
    public_url: String,
}

fn required<'a>(value: &'a str, name: &'static str) -> Result<&'a str, R2Error> {
    let value = value.trim();
    if value.is_empty() {
        return Err(R2Error::MissingOption(name));
    }
    Ok(value)
}

impl R2FileService {
    pub const IDENTIFIER: &'static str = "r2";

    pub fn new(config: &R2Config) -> Result<Self, R2Error> {
        let access_key_id = required(&config.access_key_id, "R2_ACCESS_KEY_ID")?;
        let secret_access_key = required(&config.secret_access_key, "R2_SECRET_ACCESS_KEY")?;
        let bucket = required(&config.bucket, "R2_BUCKET")?;
        let endpoint = required(&config.endpoint, "R2_ENDPOINT")?;
        let public_url = required(&config.public_url, "R2_PUBLIC_URL")?.trim_end_matches('/');

        let credentials = Credentials::new(access_key_id, secret_access_key, None, None, "potli-r2");
        let s3_config = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("auto"))
            .endpoint_url(endpoint)
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        info!(
            "✅ R2 file provider initialized (endpoint: {}, bucket: {}, public url: {})",
            endpoint, bucket, public_url
        );

        Ok(Self {
            client: S3Client::from_conf(s3_config),
            bucket: bucket.to_string(),
            public_url: public_url.to_string(),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub async fn upload_file(&self, mut file: UploadFile) -> Result<UploadedFile, R2Error> {
        let filename = file
            .filename
            .take()
            .filter(|f| !f.is_empty())
            .or_else(|| file.original_name.take().filter(|f| !f.is_empty()))
            .or_else(|| file.name.take().filter(|f| !f.is_empty()))
            .unwrap_or_else(|| format!("file-{}", Utc::now().timestamp_millis()));

        let key = file_key(file.url.as_deref(), file.id.as_deref(), Some(&filename));
        let body = decode_content(file.content).inspect_err(|e| {
            error!("Failed to process file content for {}: {}", filename, e);
        })?;
        let size = body.len();
        let content_type = file
            .content_type
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(body))
            .content_type(&content_type)
            .send()
            .await
            .map_err(|e| {
                let detail = DisplayErrorContext(&e).to_string();
                error!("R2 upload exception for key {} in bucket {}: {}", key, self.bucket, detail);
                R2Error::UploadError(detail)
            })?;

        let url = public_url_for(&self.public_url, &key);
        info!(
            "Uploaded file to R2 (key: {}, bucket: {}, type: {}, size: {})",
            key, self.bucket, content_type, size
        );

        Ok(UploadedFile { url, key })
    }

    /// Never fails; a missing object or a transport problem is only logged.
    pub async fn delete_file(&self, file: FileDescriptor) {
        let key = file_key(file.url.as_deref(), file.id.as_deref(), file.filename.as_deref());

        match self
            .client
            .delete_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
        {
            Ok(_) => info!("Deleted R2 object {}", key),
            Err(e) => error!(
                "R2 delete exception for key {} in bucket {}: {}",
                key,
                self.bucket,
                DisplayErrorContext(&e)
            ),
        }
    }
}

impl FileProvider for R2FileService {
    type Error = R2Error;

    fn upload(&self, file: UploadFile) -> BoxFuture<'_, UploadedFile, Self::Error> {
        Box::pin(self.upload_file(file))
    }

    fn delete(&self, file: FileDescriptor) -> BoxFuture<'_, (), Self::Error> {
        Box::pin(async move {
            self.delete_file(file).await;
            Ok(())
        })
    }
}
