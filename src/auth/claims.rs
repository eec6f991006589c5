/// JWT Claims structure
///
/// Represents the payload of a JWT token containing the subject identity
/// and standard JWT claims (RFC 7519), plus a token-kind discriminant so
/// access and refresh tokens cannot be swapped for each other.

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// The identity a token speaks for. Immutable once embedded in a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub id: i32,
    pub username: String,
}

/// Discriminates access tokens from refresh tokens.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims carried by both token kinds
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID as string)
    pub sub: String,
    /// Username of the subject
    pub username: String,
    /// Token kind (access or refresh)
    pub token_type: TokenKind,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

impl Claims {
    /// Create new claims for a subject
    ///
    /// # Arguments
    /// * `subject` - Identity the token speaks for
    /// * `token_type` - Access or Refresh
    /// * `expiry_seconds` - Token expiration in seconds from now
    /// * `issuer` - Issuer identifier
    pub fn new(
        subject: &Subject,
        token_type: TokenKind,
        expiry_seconds: i64,
        issuer: String,
    ) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: subject.id.to_string(),
            username: subject.username.clone(),
            token_type,
            exp: now + expiry_seconds,
            iat: now,
            iss: issuer,
        }
    }

    /// Extract the subject identity from the claims
    ///
    /// # Errors
    /// Returns `InvalidToken` if the subject id is not a valid integer
    pub fn subject(&self) -> Result<Subject, AuthError> {
        let id = self
            .sub
            .parse::<i32>()
            .map_err(|_| AuthError::InvalidToken)?;
        Ok(Subject {
            id,
            username: self.username.clone(),
        })
    }

    /// Check if the token has expired.
    /// A token is expired only once `now` has moved strictly past `exp`;
    /// `exp == now` still counts as live.
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        self.exp < now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_subject() -> Subject {
        Subject {
            id: 7,
            username: "alice".to_string(),
        }
    }

    #[test]
    fn test_claims_creation() {
        let subject = test_subject();
        let claims = Claims::new(&subject, TokenKind::Access, 3600, "test".to_string());

        assert_eq!(claims.sub, "7");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.token_type, TokenKind::Access);
        assert_eq!(claims.iss, "test");
        assert_eq!(claims.exp - claims.iat, 3600);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_subject_extraction() {
        let subject = test_subject();
        let claims = Claims::new(&subject, TokenKind::Refresh, 3600, "test".to_string());

        assert_eq!(claims.subject().unwrap(), subject);
    }

    #[test]
    fn test_invalid_subject_id() {
        let mut claims = Claims::new(&test_subject(), TokenKind::Access, 3600, "test".to_string());
        claims.sub = "not-a-number".to_string();

        assert_eq!(claims.subject().unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn test_expiry_boundary() {
        let mut claims = Claims::new(&test_subject(), TokenKind::Access, 3600, "test".to_string());

        // One hour in the past: always expired.
        claims.exp = chrono::Utc::now().timestamp() - 3600;
        assert!(claims.is_expired());

        // One hour in the future: always live.
        claims.exp = chrono::Utc::now().timestamp() + 3600;
        assert!(!claims.is_expired());

        // Exactly now: still live (strict > policy). A generous margin on
        // exp keeps the comparison deterministic under test scheduling.
        claims.exp = chrono::Utc::now().timestamp() + 2;
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_token_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&TokenKind::Access).unwrap(),
            r#""access""#
        );
        assert_eq!(
            serde_json::to_string(&TokenKind::Refresh).unwrap(),
            r#""refresh""#
        );
    }
}
