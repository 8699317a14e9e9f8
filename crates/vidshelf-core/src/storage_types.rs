use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Storage backend types
///
/// Defined in core because both configuration and the storage crate need it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Local,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s3" => Ok(StorageBackend::S3),
            "local" => Ok(StorageBackend::Local),
            _ => Err(anyhow::anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::S3 => write!(f, "s3"),
            StorageBackend::Local => write!(f, "local"),
        }
    }
}

/// Kind of binary resource handed to object storage.
///
/// The kind selects the size ceiling, the accepted content types, and the
/// upload strategy used by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Video,
    Image,
}

impl ResourceKind {
    /// MIME top-level type a payload of this kind must carry.
    pub fn mime_prefix(&self) -> &'static str {
        match self {
            ResourceKind::Video => "video/",
            ResourceKind::Image => "image/",
        }
    }

    /// Whether `content_type` (parameters ignored) belongs to this kind.
    pub fn accepts(&self, content_type: &str) -> bool {
        let normalized = content_type
            .split(';')
            .next()
            .map(|s| s.trim())
            .unwrap_or(content_type)
            .to_lowercase();
        normalized.starts_with(self.mime_prefix()) && normalized.len() > self.mime_prefix().len()
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ResourceKind::Video => write!(f, "video"),
            ResourceKind::Image => write!(f, "image"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_backend_from_str() {
        assert_eq!("S3".parse::<StorageBackend>().unwrap(), StorageBackend::S3);
        assert_eq!(
            "local".parse::<StorageBackend>().unwrap(),
            StorageBackend::Local
        );
        assert!("nfs".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_resource_kind_accepts() {
        assert!(ResourceKind::Video.accepts("video/mp4"));
        assert!(ResourceKind::Video.accepts("Video/WebM; codecs=vp9"));
        assert!(!ResourceKind::Video.accepts("image/png"));
        assert!(!ResourceKind::Video.accepts("video/"));
        assert!(ResourceKind::Image.accepts("image/jpeg"));
        assert!(!ResourceKind::Image.accepts("application/octet-stream"));
    }
}
