use std::str::FromStr;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::Value;
use thiserror::Error;
use tracing::error;

use super::error::TokenError;
use crate::error::AppError;

/// Decoded token payload. Only the permissions entry is interpreted.
pub type Claims = serde_json::Map<String, Value>;

// Errors raised while turning configured key material into signing/verifying keys.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("invalid key material for {algorithm:?}: {source}")]
    InvalidKey {
        algorithm: Algorithm,
        #[source]
        source: jsonwebtoken::errors::Error,
    },
}

/// Parse an algorithm name such as `HS256` or `EdDSA`.
pub fn parse_algorithm(name: &str) -> Result<Algorithm, KeyError> {
    Algorithm::from_str(name.trim()).map_err(|_| KeyError::UnsupportedAlgorithm(name.to_owned()))
}

fn is_hmac(algorithm: Algorithm) -> bool {
    matches!(
        algorithm,
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
    )
}

// HMAC: the secret is used as raw bytes. Everything else: the secret is a PEM public key.
fn decoding_key(secret: &str, algorithm: Algorithm) -> Result<DecodingKey, KeyError> {
    if is_hmac(algorithm) {
        return Ok(DecodingKey::from_secret(secret.as_bytes()));
    }

    let pem = secret.as_bytes();
    let key = match algorithm {
        Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(pem),
        Algorithm::EdDSA => DecodingKey::from_ed_pem(pem),
        _ => DecodingKey::from_rsa_pem(pem),
    };

    key.map_err(|source| KeyError::InvalidKey { algorithm, source })
}

fn encoding_key(secret: &str, algorithm: Algorithm) -> Result<EncodingKey, KeyError> {
    if is_hmac(algorithm) {
        return Ok(EncodingKey::from_secret(secret.as_bytes()));
    }

    let pem = secret.as_bytes();
    let key = match algorithm {
        Algorithm::ES256 | Algorithm::ES384 => EncodingKey::from_ec_pem(pem),
        Algorithm::EdDSA => EncodingKey::from_ed_pem(pem),
        _ => EncodingKey::from_rsa_pem(pem),
    };

    key.map_err(|source| KeyError::InvalidKey { algorithm, source })
}

/// Map a jsonwebtoken failure onto the four decode error kinds clients can see.
fn classify(err: &jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::ExpiredSignature => TokenError::SignatureExpired,
        ErrorKind::MissingRequiredClaim(_)
        | ErrorKind::ImmatureSignature
        | ErrorKind::InvalidIssuer
        | ErrorKind::InvalidAudience
        | ErrorKind::InvalidSubject => TokenError::ClaimInvalid,
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::SignatureInvalid,
        _ => TokenError::TokenMalformed,
    }
}

/// Signature + expiry verification for incoming tokens.
///
/// - Key material is intentionally not printable via Debug.
/// - `exp` is required; `nbf` is checked when present; `aud` is not checked.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    algorithm: Algorithm,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithm", &self.algorithm)
            .field("leeway", &self.validation.leeway)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(secret: &str, algorithm: Algorithm) -> Result<Self, KeyError> {
        let decoding_key = decoding_key(secret, algorithm)?;

        let mut validation = Validation::new(algorithm);
        validation.set_required_spec_claims(&["exp"]);
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.leeway = 0;

        Ok(Self {
            decoding_key,
            validation,
            algorithm,
        })
    }

    pub fn with_leeway(mut self, leeway_seconds: u64) -> Self {
        self.validation.leeway = leeway_seconds;
        self
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Verify and decode a token into its claims.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| classify(&e))
    }
}

/// Signs permission tokens. Used by the demo session endpoint and tests.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    algorithm: Algorithm,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl TokenIssuer {
    /// For asymmetric algorithms `secret` must be a PKCS#8 private key PEM.
    pub fn new(secret: &str, algorithm: Algorithm) -> Result<Self, KeyError> {
        Ok(Self {
            encoding_key: encoding_key(secret, algorithm)?,
            algorithm,
        })
    }

    /// Copy `claims`, set `exp`, and sign.
    pub fn encode(&self, claims: &Claims, exp: DateTime<Utc>) -> Result<String, AppError> {
        let mut to_encode = claims.clone();
        to_encode.insert("exp".to_owned(), Value::from(exp.timestamp()));

        let mut header = Header::new(self.algorithm);
        header.typ = Some("JWT".to_string());

        jsonwebtoken::encode(&header, &to_encode, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign JWT");
            AppError::Internal
        })
    }
}
