/// JWT Token Generation and Validation
///
/// The token codec, issuer, and verifier/refresher. Tokens are signed,
/// self-contained HS256 JWTs; validity is decided entirely by signature
/// and expiry at verification time, nothing is stored server-side.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::{Claims, Subject, TokenKind};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};

/// A freshly issued access/refresh token pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

fn encode_token(claims: &Claims, config: &JwtSettings) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Decode and verify a token string.
///
/// Malformed structure, unparseable claims, a bad signature, a wrong
/// issuer, and an expired token all come back as the same `InvalidToken`
/// value; callers must not be able to probe why a token failed.
fn decode_token(token: &str, config: &JwtSettings) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.issuer]);
    // Expiry is exact: expired means now is strictly past exp.
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::warn!("JWT validation error: {}", e);
        AuthError::InvalidToken
    })
}

/// Issue a fresh access/refresh token pair for a subject
///
/// Both tokens carry the same subject and issue time; the refresh token
/// outlives the access token (enforced by `JwtSettings::validate`).
///
/// # Errors
/// Returns error if token generation fails
pub fn issue_token_pair(subject: &Subject, config: &JwtSettings) -> Result<TokenPair, AppError> {
    let access_claims = Claims::new(
        subject,
        TokenKind::Access,
        config.access_token_expiry,
        config.issuer.clone(),
    );
    let refresh_claims = Claims::new(
        subject,
        TokenKind::Refresh,
        config.refresh_token_expiry,
        config.issuer.clone(),
    );

    Ok(TokenPair {
        access_token: encode_token(&access_claims, config)?,
        refresh_token: encode_token(&refresh_claims, config)?,
    })
}

/// Validate an access token and extract its claims
///
/// # Errors
/// Returns `InvalidToken` if the token is malformed, tampered with,
/// expired, or not of the access kind
pub fn verify_access_token(token: &str, config: &JwtSettings) -> Result<Claims, AppError> {
    let claims = decode_token(token, config)?;

    // A refresh token presented here fails exactly like a corrupt one.
    if claims.token_type != TokenKind::Access {
        tracing::warn!("Non-access token presented on a protected route");
        return Err(AuthError::InvalidToken.into());
    }

    Ok(claims)
}

/// Exchange a refresh token for a brand-new token pair
///
/// The presented token is not recorded as spent; with no server-side
/// session store it remains valid until its own expiry.
///
/// # Errors
/// Returns `ExpiredOrInvalidToken` if the token is malformed, tampered
/// with, expired, or not of the refresh kind
pub fn refresh_token_pair(token: &str, config: &JwtSettings) -> Result<TokenPair, AppError> {
    let claims = decode_token(token, config).map_err(|_| AuthError::ExpiredOrInvalidToken)?;

    if claims.token_type != TokenKind::Refresh {
        tracing::warn!("Non-refresh token presented to the refresh flow");
        return Err(AuthError::ExpiredOrInvalidToken.into());
    }

    let subject = claims
        .subject()
        .map_err(|_| AuthError::ExpiredOrInvalidToken)?;

    issue_token_pair(&subject, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_config() -> JwtSettings {
        JwtSettings {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: 3600,
            refresh_token_expiry: 604800,
            issuer: "test".to_string(),
        }
    }

    fn test_subject() -> Subject {
        Subject {
            id: 42,
            username: "alice".to_string(),
        }
    }

    fn encode_raw(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("Failed to encode test token")
    }

    fn expect_auth_error(result: Result<impl std::fmt::Debug, AppError>, expected: AuthError) {
        match result {
            Err(AppError::Auth(e)) => assert_eq!(e, expected),
            other => panic!("Expected {:?}, got {:?}", expected, other),
        }
    }

    #[test]
    fn test_codec_round_trip_preserves_claims() {
        let config = get_test_config();
        let claims = Claims::new(
            &test_subject(),
            TokenKind::Refresh,
            config.refresh_token_expiry,
            config.issuer.clone(),
        );

        let token = encode_raw(&claims, &config.secret);
        let decoded = decode_token(&token, &config).expect("Failed to decode token");

        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.username, claims.username);
        assert_eq!(decoded.token_type, claims.token_type);
        assert_eq!(decoded.iat, claims.iat);
        assert_eq!(decoded.exp, claims.exp);
        assert_eq!(decoded.iss, claims.iss);
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let config = get_test_config();
        let subject = test_subject();

        let pair = issue_token_pair(&subject, &config).expect("Failed to issue pair");
        let claims = verify_access_token(&pair.access_token, &config)
            .expect("Failed to verify access token");

        assert_eq!(claims.subject().unwrap(), subject);
        assert_eq!(claims.token_type, TokenKind::Access);
        assert_eq!(claims.iss, "test");
    }

    #[test]
    fn test_refresh_token_outlives_access_token() {
        let config = get_test_config();
        let pair = issue_token_pair(&test_subject(), &config).expect("Failed to issue pair");

        let access = decode_token(&pair.access_token, &config).unwrap();
        let refresh = decode_token(&pair.refresh_token, &config).unwrap();

        assert!(refresh.exp > access.exp);
        assert_eq!(refresh.token_type, TokenKind::Refresh);
    }

    #[test]
    fn test_garbage_token_rejected() {
        let config = get_test_config();
        expect_auth_error(
            verify_access_token("invalid.token.here", &config),
            AuthError::InvalidToken,
        );
    }

    #[test]
    fn test_tampered_token_rejected() {
        let config = get_test_config();
        let pair = issue_token_pair(&test_subject(), &config).expect("Failed to issue pair");

        // Corrupt the signature segment
        let tampered = format!("{}X", pair.access_token);
        expect_auth_error(
            verify_access_token(&tampered, &config),
            AuthError::InvalidToken,
        );

        // Corrupt the payload segment
        let mut parts: Vec<String> = pair
            .access_token
            .split('.')
            .map(|s| s.to_string())
            .collect();
        parts[1] = format!("{}AA", parts[1]);
        expect_auth_error(
            verify_access_token(&parts.join("."), &config),
            AuthError::InvalidToken,
        );
    }

    #[test]
    fn test_wrong_key_rejected() {
        let config = get_test_config();
        let pair = issue_token_pair(&test_subject(), &config).expect("Failed to issue pair");

        let mut other_config = get_test_config();
        other_config.secret = "a-completely-different-signing-secret-key".to_string();

        expect_auth_error(
            verify_access_token(&pair.access_token, &other_config),
            AuthError::InvalidToken,
        );
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let config = get_test_config();
        let pair = issue_token_pair(&test_subject(), &config).expect("Failed to issue pair");

        let mut other_config = get_test_config();
        other_config.issuer = "someone-else".to_string();

        expect_auth_error(
            verify_access_token(&pair.access_token, &other_config),
            AuthError::InvalidToken,
        );
    }

    #[test]
    fn test_expired_access_token_rejected() {
        let config = get_test_config();
        let mut claims = Claims::new(
            &test_subject(),
            TokenKind::Access,
            config.access_token_expiry,
            config.issuer.clone(),
        );
        claims.exp = chrono::Utc::now().timestamp() - 3600;

        let token = encode_raw(&claims, &config.secret);
        expect_auth_error(verify_access_token(&token, &config), AuthError::InvalidToken);
    }

    #[test]
    fn test_refresh_round_trip() {
        let config = get_test_config();
        let subject = test_subject();
        let pair = issue_token_pair(&subject, &config).expect("Failed to issue pair");

        let new_pair =
            refresh_token_pair(&pair.refresh_token, &config).expect("Failed to refresh pair");

        // The new access token verifies and speaks for the same subject.
        let claims = verify_access_token(&new_pair.access_token, &config)
            .expect("Failed to verify rotated access token");
        assert_eq!(claims.subject().unwrap(), subject);
    }

    #[test]
    fn test_access_token_rejected_by_refresh_flow() {
        let config = get_test_config();
        let pair = issue_token_pair(&test_subject(), &config).expect("Failed to issue pair");

        expect_auth_error(
            refresh_token_pair(&pair.access_token, &config),
            AuthError::ExpiredOrInvalidToken,
        );
    }

    #[test]
    fn test_refresh_token_rejected_by_access_verification() {
        let config = get_test_config();
        let pair = issue_token_pair(&test_subject(), &config).expect("Failed to issue pair");

        expect_auth_error(
            verify_access_token(&pair.refresh_token, &config),
            AuthError::InvalidToken,
        );
    }

    #[test]
    fn test_expired_refresh_token_rejected() {
        let config = get_test_config();
        let mut claims = Claims::new(
            &test_subject(),
            TokenKind::Refresh,
            config.refresh_token_expiry,
            config.issuer.clone(),
        );
        claims.exp = chrono::Utc::now().timestamp() - 1;

        let token = encode_raw(&claims, &config.secret);
        expect_auth_error(
            refresh_token_pair(&token, &config),
            AuthError::ExpiredOrInvalidToken,
        );
    }

    #[test]
    fn test_refresh_failures_are_indistinguishable() {
        // Kind confusion, expiry, and plain garbage must all resolve to
        // the same error value on the refresh path.
        let config = get_test_config();
        let pair = issue_token_pair(&test_subject(), &config).expect("Failed to issue pair");

        let kind_confusion = refresh_token_pair(&pair.access_token, &config).unwrap_err();
        let garbage = refresh_token_pair("garbage", &config).unwrap_err();

        match (kind_confusion, garbage) {
            (AppError::Auth(a), AppError::Auth(b)) => {
                assert_eq!(a, b);
                assert_eq!(a.to_string(), b.to_string());
            }
            other => panic!("Expected auth errors, got {:?}", other),
        }
    }
}
