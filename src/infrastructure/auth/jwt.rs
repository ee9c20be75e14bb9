//! JWT token issuance and verification
//!
//! Tokens are HS256-signed compact JWS strings carrying `{sub, iat, exp}`.
//! They are stateless: validity is decided by the signature and the expiry
//! alone, there is no refresh flow and no revocation list.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

use crate::domain::user::UserId;

/// Default token lifetime: one hour
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;
/// Shortest accepted token lifetime
pub const MIN_TOKEN_TTL_SECS: u64 = 1;
/// Longest accepted token lifetime: one day
pub const MAX_TOKEN_TTL_SECS: u64 = 86_400;

/// Reasons a token is rejected
///
/// Callers surfacing these to clients must collapse them into a single
/// unauthenticated outcome.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl JwtClaims {
    /// Create claims for a user issued at `issued_at`
    pub fn new(user_id: UserId, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }

    /// A token is expired from its `exp` second onwards
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Get user ID from claims
    pub fn user_id(&self) -> Result<UserId, TokenError> {
        UserId::parse(&self.sub).map_err(|_| TokenError::Malformed)
    }
}

/// A freshly signed token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Configuration for JWT service
#[derive(Clone)]
pub struct JwtConfig {
    /// Shared secret for signing and verifying tokens
    pub secret: String,
    /// Token lifetime in seconds
    pub token_ttl_secs: u64,
}

impl JwtConfig {
    /// Create new JWT configuration
    pub fn new(secret: impl Into<String>, token_ttl_secs: u64) -> Self {
        Self {
            secret: secret.into(),
            token_ttl_secs,
        }
    }

    /// Configuration with the default one hour lifetime
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self::new(secret, DEFAULT_TOKEN_TTL_SECS)
    }
}

impl Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[hidden]")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}

/// Issues and verifies identity tokens
pub trait TokenService: Send + Sync + Debug {
    /// Issue a token for a user, valid for the configured lifetime
    fn issue(&self, user_id: UserId) -> Result<IssuedToken, TokenError>;

    /// Verify a token and return the user it was issued for
    fn verify(&self, token: &str) -> Result<UserId, TokenError>;

    /// Token lifetime
    fn token_ttl(&self) -> Duration;
}

/// HS256 JWT service using a shared secret
#[derive(Clone)]
pub struct JwtService {
    ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("ttl", &self.ttl)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Create a new JWT service with the given configuration
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is compared against the caller's clock in `verify_at`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            ttl: token_lifetime(config.token_ttl_secs),
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(&self, user_id: UserId, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        let claims = JwtClaims::new(user_id, now, self.ttl);

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_at: now + self.ttl,
        })
    }

    /// Verify a token as if the current time were `now`
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, TokenError> {
        let claims = decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidSignature
                }
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })?
            .claims;

        if claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }

        claims.user_id()
    }
}

/// Lifetime as a duration, held within the accepted range
fn token_lifetime(ttl_secs: u64) -> Duration {
    let secs = ttl_secs.clamp(MIN_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS);

    i64::try_from(secs)
        .map(Duration::seconds)
        .unwrap_or_else(|_| Duration::hours(1))
}

impl TokenService for JwtService {
    fn issue(&self, user_id: UserId) -> Result<IssuedToken, TokenError> {
        self.issue_at(user_id, Utc::now())
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        self.verify_at(token, Utc::now())
    }

    fn token_ttl(&self) -> Duration {
        self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64) -> UserId {
        UserId::new(id).unwrap()
    }

    fn create_service() -> JwtService {
        JwtService::new(JwtConfig::with_secret("test-secret-key-12345"))
    }

    #[test]
    fn test_issue_and_verify() {
        let service = create_service();

        let issued = service.issue(user(7)).unwrap();
        assert!(!issued.token.is_empty());
        assert_eq!(issued.token.split('.').count(), 3);

        assert_eq!(service.verify(&issued.token).unwrap(), user(7));
    }

    #[test]
    fn test_expiry_is_one_hour_after_issuance() {
        let service = create_service();
        let now = Utc::now();

        let issued = service.issue_at(user(1), now).unwrap();
        assert_eq!(issued.expires_at, now + Duration::hours(1));
        assert_eq!(service.token_ttl(), Duration::hours(1));

        let header = jsonwebtoken::decode_header(&issued.token).unwrap();
        assert_eq!(header.alg, Algorithm::HS256);
    }

    #[test]
    fn test_valid_until_expiry_boundary() {
        let service = create_service();
        let issued_at = Utc::now();
        let token = service.issue_at(user(3), issued_at).unwrap().token;

        let just_before = issued_at + Duration::seconds(3599);
        assert_eq!(service.verify_at(&token, just_before).unwrap(), user(3));

        let at_expiry = issued_at + Duration::seconds(3600);
        assert_eq!(service.verify_at(&token, at_expiry), Err(TokenError::Expired));

        let long_after = issued_at + Duration::hours(5);
        assert_eq!(service.verify_at(&token, long_after), Err(TokenError::Expired));
    }

    #[test]
    fn test_expired_token_rejected_by_verify() {
        let service = create_service();
        let two_hours_ago = Utc::now() - Duration::hours(2);
        let token = service.issue_at(user(3), two_hours_ago).unwrap().token;

        assert_eq!(service.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_invalid_token() {
        let service = create_service();

        assert_eq!(service.verify("garbage"), Err(TokenError::Malformed));
        assert_eq!(service.verify(""), Err(TokenError::Malformed));
        assert!(service.verify("a.b.c").is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let service1 = JwtService::new(JwtConfig::with_secret("secret-a"));
        let service2 = JwtService::new(JwtConfig::with_secret("secret-b"));

        let token = service1.issue(user(1)).unwrap().token;

        assert_eq!(service2.verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let service = create_service();
        let other = JwtService::new(JwtConfig::with_secret("attacker"));

        let genuine = service.issue(user(1)).unwrap().token;
        let forged = other.issue(user(2)).unwrap().token;

        // Genuine header and signature around a payload naming another user
        let genuine_parts: Vec<&str> = genuine.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let tampered = format!(
            "{}.{}.{}",
            genuine_parts[0], forged_parts[1], genuine_parts[2]
        );

        assert_eq!(service.verify(&tampered), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_non_numeric_subject_rejected() {
        let service = create_service();
        let claims = JwtClaims {
            sub: "admin".to_string(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret-key-12345"),
        )
        .unwrap();

        assert_eq!(service.verify(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn test_missing_expiry_rejected() {
        #[derive(Serialize)]
        struct NoExp {
            sub: String,
        }

        let service = create_service();
        let token = encode(
            &Header::default(),
            &NoExp {
                sub: "1".to_string(),
            },
            &EncodingKey::from_secret(b"test-secret-key-12345"),
        )
        .unwrap();

        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn test_claims_expiration() {
        let now = Utc::now();
        let claims = JwtClaims::new(user(9), now, Duration::hours(1));

        assert!(!claims.is_expired_at(now));
        assert!(claims.is_expired_at(now + Duration::hours(1)));
        assert_eq!(claims.user_id().unwrap(), user(9));
    }

    #[test]
    fn test_out_of_range_lifetime_still_yields_usable_tokens() {
        for ttl_secs in [0, u64::MAX, 100_000_000_000_000_000] {
            let service = JwtService::new(JwtConfig::new("test-secret-key-12345", ttl_secs));

            assert!(service.token_ttl() >= Duration::seconds(1));
            assert!(service.token_ttl() <= Duration::days(1));

            let issued = service.issue(user(5)).unwrap();
            assert_eq!(service.verify(&issued.token).unwrap(), user(5));
        }
    }

    #[test]
    fn test_config_debug_hides_secret() {
        let config = JwtConfig::with_secret("very-secret");
        let debug = format!("{:?}", config);

        assert!(!debug.contains("very-secret"));
        assert_eq!(config.token_ttl_secs, DEFAULT_TOKEN_TTL_SECS);
    }
}
