use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::middleware::build_authenticated_user;
use crate::auth::models::{AuthenticatedUser, Claims};
use crate::error::AppError;

/// Validates bearer credentials.
///
/// Abstracted as a trait so tests and alternative identity providers can
/// stand in for the JWT implementation.
pub trait TokenVerifier: Send + Sync {
    /// Verify `token` and return the caller it identifies.
    fn verify(&self, token: &str) -> Result<AuthenticatedUser, AppError>;
}

/// HS256 JWT verifier and issuer sharing one secret.
pub struct JwtVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: Option<String>,
}

impl JwtVerifier {
    pub fn new(secret: &str, issuer: Option<String>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        }
    }

    /// Sign a token for `subject` granting `roles`, valid for `ttl`.
    pub fn issue(&self, subject: &str, roles: &[String], ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            roles: roles.to_vec(),
            exp: (now + ttl).timestamp().max(0) as usize,
            iat: now.timestamp().max(0) as usize,
            iss: self.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }

        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Auth(format!("Invalid token: {e}")))?;

        Ok(build_authenticated_user(data.claims.sub, &data.claims.roles))
    }
}
