//! Configuration module
//!
//! Environment-driven configuration for the catalog service: HTTP server, catalog
//! backend, object storage, and ingestion limits. Loaded once at startup.

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::storage_types::StorageBackend;

// Common constants
const SERVER_PORT: u16 = 3000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const REQUEST_TIMEOUT_SECS: u64 = 600;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;
const READINESS_CHECK_INTERVAL_SECS: u64 = 5;
const MAX_VIDEO_SIZE_MB: usize = 500;
const MAX_THUMBNAIL_SIZE_MB: usize = 10;
const STORAGE_UPLOAD_TIMEOUT_SECS: u64 = 300;
const STORAGE_UPLOAD_RETRIES: u32 = 2;
const DEFAULT_PAGE_SIZE: i64 = 12;
const MAX_PAGE_SIZE: i64 = 100;
const MAX_COMMENT_LENGTH: usize = 2000;
const DEFAULT_TITLE: &str = "Untitled";

/// Which catalog store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogBackend {
    Postgres,
    /// Process-local store for development and tests
    Memory,
}

impl FromStr for CatalogBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(CatalogBackend::Postgres),
            "memory" => Ok(CatalogBackend::Memory),
            _ => Err(anyhow::anyhow!("Invalid catalog backend: {}", s)),
        }
    }
}

impl Display for CatalogBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            CatalogBackend::Postgres => write!(f, "postgres"),
            CatalogBackend::Memory => write!(f, "memory"),
        }
    }
}

/// HTTP server and connection pool settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub environment: String,
    pub request_timeout_secs: u64,
    pub http_concurrency_limit: usize,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            cors_origins: vec!["*".to_string()],
            db_max_connections: MAX_CONNECTIONS,
            db_timeout_seconds: CONNECTION_TIMEOUT_SECS,
            environment: "development".to_string(),
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
        }
    }
}

/// Catalog service configuration
#[derive(Clone, Debug)]
pub struct CatalogServiceConfig {
    pub base: BaseConfig,
    // Catalog store
    pub catalog_backend: CatalogBackend,
    pub database_url: Option<String>,
    pub readiness_check_interval_secs: u64,
    // Ingestion credential
    pub admin_password: String,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub aws_region: Option<String>,
    pub s3_public_base_url: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Ingestion limits
    pub max_video_size_bytes: usize,
    pub max_thumbnail_size_bytes: usize,
    pub video_folder: String,
    pub thumbnail_folder: String,
    pub storage_upload_timeout_secs: u64,
    pub storage_upload_retries: u32,
    pub default_title: String,
    // Browsing and interactions
    pub default_page_size: i64,
    pub max_page_size: i64,
    pub max_comment_length: usize,
    pub public_base_url: String,
}

impl Default for CatalogServiceConfig {
    fn default() -> Self {
        Self {
            base: BaseConfig::default(),
            catalog_backend: CatalogBackend::Memory,
            database_url: None,
            readiness_check_interval_secs: READINESS_CHECK_INTERVAL_SECS,
            admin_password: String::new(),
            storage_backend: StorageBackend::Local,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            aws_region: None,
            s3_public_base_url: None,
            local_storage_path: Some("./data/media".to_string()),
            local_storage_base_url: Some(format!("http://localhost:{}/media", SERVER_PORT)),
            max_video_size_bytes: MAX_VIDEO_SIZE_MB * 1024 * 1024,
            max_thumbnail_size_bytes: MAX_THUMBNAIL_SIZE_MB * 1024 * 1024,
            video_folder: "videos".to_string(),
            thumbnail_folder: "thumbnails".to_string(),
            storage_upload_timeout_secs: STORAGE_UPLOAD_TIMEOUT_SECS,
            storage_upload_retries: STORAGE_UPLOAD_RETRIES,
            default_title: DEFAULT_TITLE.to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            max_comment_length: MAX_COMMENT_LENGTH,
            public_base_url: format!("http://localhost:{}", SERVER_PORT),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<CatalogServiceConfig>);

impl Config {
    fn inner(&self) -> &CatalogServiceConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.inner().base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = CatalogServiceConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.inner().base.request_timeout_secs
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.inner().base.http_concurrency_limit
    }

    pub fn catalog_backend(&self) -> CatalogBackend {
        self.inner().catalog_backend
    }

    pub fn database_url(&self) -> Option<&str> {
        self.inner().database_url.as_deref()
    }

    pub fn readiness_check_interval_secs(&self) -> u64 {
        self.inner().readiness_check_interval_secs
    }

    pub fn admin_password(&self) -> &str {
        &self.inner().admin_password
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.inner().aws_region.as_deref()
    }

    pub fn s3_public_base_url(&self) -> Option<&str> {
        self.inner().s3_public_base_url.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.inner().local_storage_base_url.as_deref()
    }

    pub fn max_video_size_bytes(&self) -> usize {
        self.inner().max_video_size_bytes
    }

    pub fn max_thumbnail_size_bytes(&self) -> usize {
        self.inner().max_thumbnail_size_bytes
    }

    pub fn video_folder(&self) -> &str {
        &self.inner().video_folder
    }

    pub fn thumbnail_folder(&self) -> &str {
        &self.inner().thumbnail_folder
    }

    pub fn storage_upload_timeout_secs(&self) -> u64 {
        self.inner().storage_upload_timeout_secs
    }

    pub fn storage_upload_retries(&self) -> u32 {
        self.inner().storage_upload_retries
    }

    pub fn default_title(&self) -> &str {
        &self.inner().default_title
    }

    pub fn default_page_size(&self) -> i64 {
        self.inner().default_page_size
    }

    pub fn max_page_size(&self) -> i64 {
        self.inner().max_page_size
    }

    pub fn max_comment_length(&self) -> usize {
        self.inner().max_comment_length
    }

    pub fn public_base_url(&self) -> &str {
        &self.inner().public_base_url
    }
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

fn megabytes_to_bytes(key: &str, megabytes: usize) -> Result<usize, anyhow::Error> {
    megabytes
        .checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("{} is too large: {} MB", key, megabytes))
}

impl CatalogServiceConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port: u16 = env::var("PORT")
            .unwrap_or_else(|_| SERVER_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let base = BaseConfig {
            server_port,
            cors_origins,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            environment,
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| REQUEST_TIMEOUT_SECS.to_string())
                .parse::<u64>()
                .unwrap_or(REQUEST_TIMEOUT_SECS)
                .max(1),
            http_concurrency_limit: env::var("HTTP_CONCURRENCY_LIMIT")
                .unwrap_or_else(|_| HTTP_CONCURRENCY_LIMIT.to_string())
                .parse::<usize>()
                .unwrap_or(HTTP_CONCURRENCY_LIMIT)
                .max(1),
        };

        let catalog_backend = env::var("CATALOG_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .parse::<CatalogBackend>()?;

        let storage_backend = env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "s3".to_string())
            .parse::<StorageBackend>()?;

        let max_video_size_mb = env::var("MAX_VIDEO_SIZE_MB")
            .unwrap_or_else(|_| MAX_VIDEO_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_VIDEO_SIZE_MB);
        let max_thumbnail_size_mb = env::var("MAX_THUMBNAIL_SIZE_MB")
            .unwrap_or_else(|_| MAX_THUMBNAIL_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_THUMBNAIL_SIZE_MB);

        let config = CatalogServiceConfig {
            base,
            catalog_backend,
            database_url: optional_env("DATABASE_URL"),
            readiness_check_interval_secs: env::var("READINESS_CHECK_INTERVAL_SECS")
                .unwrap_or_else(|_| READINESS_CHECK_INTERVAL_SECS.to_string())
                .parse::<u64>()
                .unwrap_or(READINESS_CHECK_INTERVAL_SECS)
                .max(1),
            admin_password: env::var("ADMIN_PASSWORD")
                .map_err(|_| anyhow::anyhow!("ADMIN_PASSWORD must be set for uploads"))?,
            storage_backend,
            s3_bucket: optional_env("S3_BUCKET"),
            s3_region: optional_env("S3_REGION"),
            s3_endpoint: optional_env("S3_ENDPOINT"),
            aws_region: optional_env("AWS_REGION"),
            s3_public_base_url: optional_env("S3_PUBLIC_BASE_URL"),
            local_storage_path: optional_env("LOCAL_STORAGE_PATH"),
            local_storage_base_url: optional_env("LOCAL_STORAGE_BASE_URL"),
            max_video_size_bytes: megabytes_to_bytes("MAX_VIDEO_SIZE_MB", max_video_size_mb)?,
            max_thumbnail_size_bytes: megabytes_to_bytes(
                "MAX_THUMBNAIL_SIZE_MB",
                max_thumbnail_size_mb,
            )?,
            video_folder: env::var("VIDEO_FOLDER").unwrap_or_else(|_| "videos".to_string()),
            thumbnail_folder: env::var("THUMBNAIL_FOLDER")
                .unwrap_or_else(|_| "thumbnails".to_string()),
            storage_upload_timeout_secs: env::var("STORAGE_UPLOAD_TIMEOUT_SECS")
                .unwrap_or_else(|_| STORAGE_UPLOAD_TIMEOUT_SECS.to_string())
                .parse::<u64>()
                .unwrap_or(STORAGE_UPLOAD_TIMEOUT_SECS)
                .max(1),
            storage_upload_retries: env::var("STORAGE_UPLOAD_RETRIES")
                .unwrap_or_else(|_| STORAGE_UPLOAD_RETRIES.to_string())
                .parse()
                .unwrap_or(STORAGE_UPLOAD_RETRIES),
            default_title: optional_env("DEFAULT_TITLE")
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            default_page_size: env::var("DEFAULT_PAGE_SIZE")
                .unwrap_or_else(|_| DEFAULT_PAGE_SIZE.to_string())
                .parse()
                .unwrap_or(DEFAULT_PAGE_SIZE),
            max_page_size: env::var("MAX_PAGE_SIZE")
                .unwrap_or_else(|_| MAX_PAGE_SIZE.to_string())
                .parse()
                .unwrap_or(MAX_PAGE_SIZE),
            max_comment_length: env::var("MAX_COMMENT_LENGTH")
                .unwrap_or_else(|_| MAX_COMMENT_LENGTH.to_string())
                .parse()
                .unwrap_or(MAX_COMMENT_LENGTH),
            public_base_url: optional_env("PUBLIC_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| format!("http://localhost:{}", server_port)),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.admin_password.trim().is_empty() {
            return Err(anyhow::anyhow!("ADMIN_PASSWORD must not be empty"));
        }

        if self.catalog_backend == CatalogBackend::Postgres {
            match self.database_url.as_deref() {
                None => {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be set when using the postgres catalog backend"
                    ));
                }
                Some(url)
                    if !url.starts_with("postgres://") && !url.starts_with("postgresql://") =>
                {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be a valid PostgreSQL connection string"
                    ));
                }
                Some(_) => {}
            }
        }

        if self.max_video_size_bytes == 0 || self.max_thumbnail_size_bytes == 0 {
            return Err(anyhow::anyhow!(
                "MAX_VIDEO_SIZE_MB and MAX_THUMBNAIL_SIZE_MB must be greater than zero"
            ));
        }

        if self.default_page_size < 1 || self.max_page_size < self.default_page_size {
            return Err(anyhow::anyhow!(
                "DEFAULT_PAGE_SIZE must be at least 1 and not exceed MAX_PAGE_SIZE"
            ));
        }

        if self.video_folder.contains("..") || self.thumbnail_folder.contains("..") {
            return Err(anyhow::anyhow!(
                "VIDEO_FOLDER and THUMBNAIL_FOLDER must not contain '..'"
            ));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}
