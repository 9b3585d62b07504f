use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auth::user::UserRecord;
use crate::constants::{DEFAULT_TOKEN_TTL_MINUTES, TOKEN_TYPE_BEARER};
use crate::error::{Result, RustyCredsError};

/// Claim names computed by the issuer; callers cannot override them
const RESERVED_CLAIMS: [&str; 4] = ["sub", "exp", "iat", "jti"];

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user email)
    pub sub: String,
    /// Expiration time (as UTC timestamp)
    pub exp: i64,
    /// Issued at (as UTC timestamp)
    #[serde(default)]
    pub iat: i64,
    /// Token identifier, only used to correlate log lines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// Caller-supplied extra claims
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Check if the token is expired. Expiry is exclusive: a token dies at `exp`
    pub fn is_expired(&self) -> bool {
        chrono::Utc::now().timestamp() >= self.exp
    }
}

/// Login response handed back to API callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
}

impl AccessToken {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
        }
    }
}

/// Manages JWT token operations
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: chrono::Duration,
}

impl TokenManager {
    /// Creates a new token manager with a secret and the default 30 minute lifetime
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: chrono::Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
        }
    }

    /// Override the lifetime of tokens issued without an explicit ttl
    pub fn with_ttl(mut self, ttl: chrono::Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> chrono::Duration {
        self.ttl
    }

    /// Issue a token for `subject` valid for the default lifetime
    pub fn issue(&self, subject: &str, extra: Map<String, Value>) -> Result<String> {
        self.issue_with_ttl(subject, extra, self.ttl)
    }

    /// Issue a token for `subject` that expires `ttl` from now
    pub fn issue_with_ttl(
        &self,
        subject: &str,
        mut extra: Map<String, Value>,
        ttl: chrono::Duration,
    ) -> Result<String> {
        if subject.is_empty() {
            return Err(RustyCredsError::TokenError(
                "Cannot issue a token without a subject".to_string(),
            ));
        }

        for name in RESERVED_CLAIMS {
            extra.remove(name);
        }

        let now = chrono::Utc::now();
        let exp = now
            .checked_add_signed(ttl)
            .ok_or_else(|| {
                RustyCredsError::TokenError("Failed to calculate expiration time".to_string())
            })?
            .timestamp();

        let claims = Claims {
            sub: subject.to_string(),
            exp,
            iat: now.timestamp(),
            jti: Some(uuid::Uuid::new_v4().to_string()),
            extra,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| RustyCredsError::TokenError(format!("Failed to generate token: {}", e)))
    }

    /// Issue a login token for a stored user
    pub fn issue_token(&self, record: &UserRecord) -> Result<String> {
        self.issue(&record.email, Map::new())
    }

    /// Validates a JWT token and returns its claims
    pub fn validate(&self, token: &str) -> Result<Claims> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => RustyCredsError::ExpiredToken,
                _ => RustyCredsError::InvalidToken(e.to_string()),
            })?;

        // The library accepts a token in its final second; we do not
        if claims.is_expired() {
            return Err(RustyCredsError::ExpiredToken);
        }

        if claims.sub.is_empty() {
            return Err(RustyCredsError::InvalidToken(
                "Token subject is empty".to_string(),
            ));
        }

        Ok(claims)
    }

    /// Validates a token and returns the subject if valid
    pub fn validate_and_get_subject(&self, token: &str) -> Result<String> {
        Ok(self.validate(token)?.sub)
    }
}

/// Extracts bearer token from Authorization header
pub fn extract_bearer_token(auth_header: &str) -> Option<String> {
    let (scheme, token) = auth_header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
