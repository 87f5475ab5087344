//! HS256 token codec shared by the admin and user realms.
//!
//! Each realm owns one `JwtCodec` bound to its own secret. Verification is
//! all-or-nothing: callers get either the full claims map or a `TokenError`.

#[cfg(test)]
use jsonwebtoken::{EncodingKey, Header};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde_json::{Map, Value};

/// Decoded payload of a verified token.
pub type Claims = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("token signature mismatch")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            // Bad segment count, base64, JSON, algorithm or a missing `exp`.
            _ => Self::Malformed,
        }
    }
}

/// Verification only: this service never issues tokens.
///
/// Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct JwtCodec {
    decoding_key: DecodingKey,
    validation: Validation,
    #[cfg(test)]
    encoding_key: EncodingKey,
}

impl std::fmt::Debug for JwtCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtCodec")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtCodec {
    /// `leeway_seconds` is the tolerated clock skew on `exp`. Zero means the
    /// expiry is compared exactly against the local clock.
    pub fn new(secret: &str, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_seconds;
        // Tokens carry only the identity claim and `exp`.
        validation.validate_aud = false;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            #[cfg(test)]
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Verify signature and expiry, then return the claims.
    ///
    /// The signature is checked before `exp`, so a token signed with another
    /// secret reports `InvalidSignature` even when it is also expired.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }

    /// Sign `claims` the way the login service does. `exp` defaults to one hour.
    #[cfg(test)]
    pub fn encode(&self, mut claims: Claims) -> jsonwebtoken::errors::Result<String> {
        if !claims.contains_key("exp") {
            let exp = chrono::Utc::now().timestamp() + 3600;
            claims.insert("exp".to_string(), Value::from(exp));
        }

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }
}

/// Read an integer identity out of `claims[name]`.
///
/// Issuers serialize the id either as a JSON number or as a decimal string;
/// both are accepted. Anything else makes the token `Malformed`.
pub fn identity_claim(claims: &Claims, name: &str) -> Result<i64, TokenError> {
    match claims.get(name) {
        Some(Value::Number(n)) => n.as_i64().ok_or(TokenError::Malformed),
        Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| TokenError::Malformed),
        _ => Err(TokenError::Malformed),
    }
}
