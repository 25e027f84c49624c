//! Configuration module
//!
//! Service configuration is read from the environment (after loading an optional
//! `.env` file) and validated once at startup.

use std::env;
use std::path::PathBuf;

use crate::constants::{BYTES_PER_MB, VIDEO_MP4};
use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 8091;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_VIDEO_SIZE_MB: usize = 1024;
const MAX_THUMBNAIL_SIZE_MB: usize = 10;
const MIN_JWT_SECRET_LEN: usize = 32;

/// Settings for the ingestion service.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    // Metadata store. `None` selects the in-memory repository.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    // Object storage
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Upload admission
    pub max_video_size_bytes: usize,
    pub max_thumbnail_size_bytes: usize,
    pub video_allowed_content_type: String,
    pub thumbnail_allowed_content_types: Vec<String>,
    // External tools
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub upload_temp_dir: PathBuf,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ServiceConfig>);

impl Config {
    fn inner(&self) -> &ServiceConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.inner().environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = ServiceConfig::from_lookup(|key| env::var(key).ok())?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.inner().server_port
    }

    pub fn environment(&self) -> &str {
        &self.inner().environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().cors_origins
    }

    pub fn jwt_secret(&self) -> &str {
        &self.inner().jwt_secret
    }

    pub fn database_url(&self) -> Option<&str> {
        self.inner().database_url.as_deref()
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().db_timeout_seconds
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

    pub fn video_allowed_content_type(&self) -> &str {
        &self.inner().video_allowed_content_type
    }

    pub fn thumbnail_allowed_content_types(&self) -> &[String] {
        &self.inner().thumbnail_allowed_content_types
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.inner().ffmpeg_path
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.inner().ffprobe_path
    }

    pub fn upload_temp_dir(&self) -> &std::path::Path {
        &self.inner().upload_temp_dir
    }
}

fn is_production_name(environment: &str) -> bool {
    let environment = environment.to_lowercase();
    environment == "production" || environment == "prod"
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl ServiceConfig {
    /// Build the configuration from a key lookup. `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(var: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = var("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        if is_production_name(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        let cors_origins = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(raw) => raw.parse::<StorageBackend>()?,
            None => StorageBackend::S3,
        };

        let max_video_size_mb = var("MAX_VIDEO_SIZE_MB")
            .unwrap_or_else(|| MAX_VIDEO_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_VIDEO_SIZE_MB);

        let max_thumbnail_size_mb = var("MAX_THUMBNAIL_SIZE_MB")
            .unwrap_or_else(|| MAX_THUMBNAIL_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_THUMBNAIL_SIZE_MB);

        Ok(ServiceConfig {
            server_port: var("PORT")
                .unwrap_or_else(|| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            cors_origins,
            jwt_secret: var("JWT_SECRET")
                .ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            database_url: var("DATABASE_URL").filter(|s| !s.trim().is_empty()),
            db_max_connections: var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            storage_backend,
            s3_bucket: var("S3_BUCKET"),
            s3_region: var("S3_REGION").or_else(|| var("AWS_REGION")),
            s3_endpoint: var("S3_ENDPOINT"),
            local_storage_path: var("LOCAL_STORAGE_PATH"),
            local_storage_base_url: var("LOCAL_STORAGE_BASE_URL"),
            max_video_size_bytes: max_video_size_mb * BYTES_PER_MB,
            max_thumbnail_size_bytes: max_thumbnail_size_mb * BYTES_PER_MB,
            video_allowed_content_type: var("VIDEO_ALLOWED_CONTENT_TYPE")
                .map(|s| s.trim().to_lowercase())
                .unwrap_or_else(|| VIDEO_MP4.to_string()),
            thumbnail_allowed_content_types: split_list(
                &var("THUMBNAIL_ALLOWED_CONTENT_TYPES")
                    .unwrap_or_else(|| "image/jpeg,image/png".to_string()),
            ),
            ffmpeg_path: var("FFMPEG_PATH").unwrap_or_else(|| "ffmpeg".to_string()),
            ffprobe_path: var("FFPROBE_PATH").unwrap_or_else(|| "ffprobe".to_string()),
            upload_temp_dir: var("UPLOAD_TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        match &self.database_url {
            Some(url) => {
                if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be a valid PostgreSQL connection string"
                    ));
                }
            }
            None => {
                if is_production_name(&self.environment) {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be set in production; the in-memory store is for development only"
                    ));
                }
            }
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() {
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

        if self.max_video_size_bytes == 0 || self.max_thumbnail_size_bytes == 0 {
            return Err(anyhow::anyhow!("Upload size limits must be greater than zero"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_applied() {
        let cfg = ServiceConfig::from_lookup(lookup(&[
            ("JWT_SECRET", SECRET),
            ("S3_BUCKET", "media"),
            ("AWS_REGION", "us-east-1"),
        ]))
        .unwrap();

        assert_eq!(cfg.server_port, 8091);
        assert_eq!(cfg.storage_backend, StorageBackend::S3);
        assert_eq!(cfg.max_video_size_bytes, 1 << 30);
        assert_eq!(cfg.max_thumbnail_size_bytes, 10 << 20);
        assert_eq!(cfg.video_allowed_content_type, "video/mp4");
        assert_eq!(
            cfg.thumbnail_allowed_content_types,
            vec!["image/jpeg".to_string(), "image/png".to_string()]
        );
        assert_eq!(cfg.s3_region.as_deref(), Some("us-east-1"));
        assert!(cfg.database_url.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn missing_jwt_secret_is_an_error() {
        assert!(ServiceConfig::from_lookup(lookup(&[])).is_err());
    }

    #[test]
    fn short_jwt_secret_fails_validation() {
        let cfg = ServiceConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "short"),
            ("S3_BUCKET", "media"),
            ("S3_REGION", "eu-west-1"),
        ]))
        .unwrap();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn wildcard_cors_rejected_in_production() {
        let result = ServiceConfig::from_lookup(lookup(&[
            ("JWT_SECRET", SECRET),
            ("ENVIRONMENT", "production"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn in_memory_store_rejected_in_production() {
        let cfg = ServiceConfig::from_lookup(lookup(&[
            ("JWT_SECRET", SECRET),
            ("ENVIRONMENT", "prod"),
            ("CORS_ORIGINS", "https://app.example.com"),
            ("S3_BUCKET", "media"),
            ("S3_REGION", "us-east-1"),
        ]))
        .unwrap();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn local_backend_requires_paths() {
        let cfg = ServiceConfig::from_lookup(lookup(&[
            ("JWT_SECRET", SECRET),
            ("STORAGE_BACKEND", "local"),
            ("LOCAL_STORAGE_PATH", "/var/lib/vidvault"),
        ]))
        .unwrap();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn invalid_backend_name_is_an_error() {
        let result = ServiceConfig::from_lookup(lookup(&[
            ("JWT_SECRET", SECRET),
            ("STORAGE_BACKEND", "ftp"),
        ]));
        assert!(result.is_err());
    }
}
