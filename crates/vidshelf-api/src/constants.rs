//! API-wide constants.

/// Prefix for all JSON API routes
pub const API_PREFIX: &str = "/api";

/// Header carrying the ingestion credential
pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

/// Mount point for objects served by the local storage backend
pub const MEDIA_MOUNT: &str = "/media";

/// Slack on top of the video ceiling for multipart framing and text fields
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;
