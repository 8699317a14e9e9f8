//! Shared key generation for storage backends.
//!
//! Key format: `{folder}/{uuid}.{ext}`. The extension comes from the uploaded
//! file name when it looks sane, otherwise from the content type.

use uuid::Uuid;

const MAX_EXTENSION_LEN: usize = 8;

/// Generate a fresh storage key inside `folder`.
pub fn generate_storage_key(folder: &str, extension: &str) -> String {
    let folder = folder.trim_matches('/');
    if folder.is_empty() {
        format!("{}.{}", Uuid::new_v4(), extension)
    } else {
        format!("{}/{}.{}", folder, Uuid::new_v4(), extension)
    }
}

/// Reject keys that could escape the storage root.
pub fn is_safe_key(storage_key: &str) -> bool {
    !storage_key.is_empty() && !storage_key.contains("..") && !storage_key.starts_with('/')
}

/// Key of an object whose public URL is `url`, given the URL prefix the
/// backend publishes objects under. `None` when `url` is not under `base`.
pub fn key_under_base(base: &str, url: &str) -> Option<String> {
    let key = url
        .strip_prefix(base.trim_end_matches('/'))?
        .strip_prefix('/')?;
    if key.contains(['?', '#']) || key.ends_with('/') || !is_safe_key(key) {
        return None;
    }
    Some(key.to_string())
}

/// Pick an extension for an object, lowercased and without the dot.
pub fn extension_for(filename: Option<&str>, content_type: &str) -> String {
    if let Some(ext) = filename
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
    {
        return ext;
    }

    let subtype = content_type
        .split(';')
        .next()
        .and_then(|mime| mime.trim().split_once('/'))
        .map(|(_, sub)| sub.to_lowercase())
        .unwrap_or_default();

    match subtype.as_str() {
        "mp4" => "mp4",
        "webm" => "webm",
        "quicktime" => "mov",
        "x-matroska" => "mkv",
        "x-msvideo" => "avi",
        "ogg" => "ogv",
        "jpeg" | "jpg" => "jpg",
        "png" => "png",
        "webp" => "webp",
        "gif" => "gif",
        _ => "bin",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_storage_key_layout() {
        let key = generate_storage_key("videos", "mp4");
        let (folder, file) = key.split_once('/').unwrap();
        assert_eq!(folder, "videos");
        let (id, ext) = file.rsplit_once('.').unwrap();
        assert!(Uuid::parse_str(id).is_ok());
        assert_eq!(ext, "mp4");
    }

    #[test]
    fn test_generate_storage_key_trims_slashes() {
        assert!(generate_storage_key("/thumbnails/", "jpg").starts_with("thumbnails/"));
    }

    #[test]
    fn test_extension_prefers_filename() {
        assert_eq!(extension_for(Some("Holiday.MOV"), "video/mp4"), "mov");
        assert_eq!(extension_for(Some("clip"), "video/webm"), "webm");
        assert_eq!(extension_for(Some("weird.e/x"), "video/quicktime"), "mov");
        assert_eq!(extension_for(None, "image/jpeg; charset=binary"), "jpg");
        assert_eq!(extension_for(None, "application/octet-stream"), "bin");
    }

    #[test]
    fn test_is_safe_key() {
        assert!(is_safe_key("videos/a.mp4"));
        assert!(!is_safe_key("../etc/passwd"));
        assert!(!is_safe_key("/abs/path"));
        assert!(!is_safe_key(""));
    }

    #[test]
    fn test_key_under_base() {
        let base = "https://cdn.example.com/media/";
        assert_eq!(
            key_under_base(base, "https://cdn.example.com/media/videos/a.mp4").as_deref(),
            Some("videos/a.mp4")
        );
        assert_eq!(key_under_base(base, "https://other.example.com/media/videos/a.mp4"), None);
        assert_eq!(key_under_base(base, "https://cdn.example.com/mediavideos/a.mp4"), None);
        assert_eq!(key_under_base(base, "https://cdn.example.com/media/"), None);
        assert_eq!(key_under_base(base, "https://cdn.example.com/media/../secret"), None);
        assert_eq!(key_under_base(base, "https://cdn.example.com/media/videos/a.mp4?x=1"), None);
    }
}
