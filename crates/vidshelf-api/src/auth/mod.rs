//! Admin credential checks for ingestion.

use std::fmt;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use vidshelf_core::AppError;

fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// The single shared secret that authorizes uploads.
#[derive(Clone)]
pub struct AdminCredential {
    secret: Arc<str>,
}

impl AdminCredential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Arc::from(secret.into()),
        }
    }

    /// Check a presented token. An empty configured secret authorizes nothing.
    pub fn verify(&self, presented: Option<&str>) -> Result<(), AppError> {
        match presented {
            Some(token) if !self.secret.is_empty() && secure_compare(token, &self.secret) => Ok(()),
            Some(_) => Err(AppError::Unauthorized("Invalid admin password".to_string())),
            None => Err(AppError::Unauthorized("Admin password required".to_string())),
        }
    }
}

impl fmt::Debug for AdminCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredential")
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_compare() {
        assert!(secure_compare("letmein", "letmein"));
        assert!(!secure_compare("letmein", "letmeout"));
        assert!(!secure_compare("short", "longer-secret"));
    }

    #[test]
    fn test_verify() {
        let credential = AdminCredential::new("letmein");
        assert!(credential.verify(Some("letmein")).is_ok());
        assert!(matches!(
            credential.verify(Some("wrong")),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            credential.verify(None),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_empty_secret_rejects_empty_token() {
        let credential = AdminCredential::new("");
        assert!(credential.verify(Some("")).is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", AdminCredential::new("letmein"));
        assert!(!rendered.contains("letmein"));
    }
}
