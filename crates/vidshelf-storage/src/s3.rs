use crate::keys::{is_safe_key, key_under_base};
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectStore, ObjectStoreExt, PutMultipartOptions, PutOptions,
    PutPayload, Result as ObjectResult, WriteMultipart,
};
use vidshelf_core::ResourceKind;

/// Videos above this size are sent with a multipart upload.
const MULTIPART_THRESHOLD_BYTES: usize = 16 * 1024 * 1024;

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
    public_base_url: Option<String>,
}

/// Map object_store failures onto the storage taxonomy.
///
/// Errors the bucket answered with are permanent; everything else (connection
/// resets, 5xx, throttling) counts as a network failure and may be retried.
fn classify(err: ObjectStoreError) -> StorageError {
    match err {
        ObjectStoreError::NotFound { .. }
        | ObjectStoreError::AlreadyExists { .. }
        | ObjectStoreError::Precondition { .. }
        | ObjectStoreError::NotSupported { .. }
        | ObjectStoreError::InvalidPath { .. }
        | ObjectStoreError::PermissionDenied { .. }
        | ObjectStoreError::Unauthenticated { .. } => StorageError::Rejected(err.to_string()),
        other => StorageError::Network(other.to_string()),
    }
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    /// * `public_base_url` - Optional URL prefix (CDN) used instead of the bucket URL
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        public_base_url: Option<String>,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage {
            store,
            bucket,
            region,
            endpoint_url,
            public_base_url,
        })
    }

    /// URL prefix objects are published under
    ///
    /// `public_base_url` when configured, the custom endpoint in path style for
    /// S3-compatible providers, and the virtual-hosted AWS URL otherwise.
    fn url_base(&self) -> String {
        if let Some(ref base) = self.public_base_url {
            return base.trim_end_matches('/').to_string();
        }
        if let Some(ref endpoint) = self.endpoint_url {
            format!("{}/{}", endpoint.trim_end_matches('/'), self.bucket)
        } else {
            format!("https://{}.s3.{}.amazonaws.com", self.bucket, self.region)
        }
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.url_base(), key)
    }
}

fn content_type_attributes(content_type: &str) -> Attributes {
    let mut attributes = Attributes::new();
    attributes.insert(Attribute::ContentType, content_type.to_string().into());
    attributes
}

async fn put_single(
    store: &dyn ObjectStore,
    location: &Path,
    data: Bytes,
    content_type: &str,
) -> ObjectResult<()> {
    let opts = PutOptions {
        attributes: content_type_attributes(content_type),
        ..Default::default()
    };
    store
        .put_opts(location, PutPayload::from(data), opts)
        .await
        .map(drop)
}

async fn put_chunked(
    store: &dyn ObjectStore,
    location: &Path,
    data: Bytes,
    content_type: &str,
) -> ObjectResult<()> {
    let opts = PutMultipartOptions {
        attributes: content_type_attributes(content_type),
        ..Default::default()
    };
    let upload = store.put_multipart_opts(location, opts).await?;
    let mut writer = WriteMultipart::new(upload);
    writer.write(&data);
    writer.finish().await.map(drop)
}

#[async_trait]
impl Storage for S3Storage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
        kind: ResourceKind,
    ) -> StorageResult<String> {
        if !is_safe_key(storage_key) {
            return Err(StorageError::InvalidKey(storage_key.to_string()));
        }

        let size = data.len();
        let location = Path::from(storage_key.to_string());
        let multipart = kind == ResourceKind::Video && size > MULTIPART_THRESHOLD_BYTES;
        let start = std::time::Instant::now();

        let result = if multipart {
            put_chunked(&self.store, &location, data, content_type).await
        } else {
            put_single(&self.store, &location, data, content_type).await
        };

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = size,
                multipart,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            classify(e)
        })?;

        let url = self.generate_url(storage_key);

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            size_bytes = size,
            multipart,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(url)
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let start = std::time::Instant::now();
        let location = Path::from(storage_key.to_string());

        let result: ObjectResult<_> = self.store.delete(&location).await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 delete failed"
            );
            StorageError::DeleteFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let location = Path::from(storage_key.to_string());
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(classify(e)),
        }
    }

    fn key_for_url(&self, url: &str) -> Option<String> {
        key_under_base(&self.url_base(), url)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
