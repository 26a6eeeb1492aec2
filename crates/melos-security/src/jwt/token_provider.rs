//! JWT token provider for creating and validating session tokens.

use super::Claims;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use melos_config::SecurityConfig;
use melos_core::{MelosError, MelosResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// Issues and validates session tokens (HS256).
#[derive(Clone)]
pub struct TokenProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: Arc<SecurityConfig>,
    validation: Validation,
}

impl TokenProvider {
    /// Creates a new token provider from security configuration.
    #[must_use]
    pub fn new(config: Arc<SecurityConfig>) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.jwt_issuer]);
        validation.set_audience(&[&config.jwt_audience]);
        validation.validate_exp = true;

        Self {
            encoding_key,
            decoding_key,
            config,
            validation,
        }
    }

    /// Generates a session token for a user.
    pub fn generate_token(
        &self,
        user_id: &str,
        username: &str,
        clearance: i64,
    ) -> MelosResult<String> {
        let expires_at =
            Utc::now() + Duration::seconds(self.config.jwt_expiration_secs as i64);

        let claims = Claims::new(
            user_id.to_string(),
            username.to_string(),
            clearance,
            self.config.jwt_issuer.clone(),
            self.config.jwt_audience.clone(),
            expires_at,
        );

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| MelosError::Internal(format!("Failed to generate token: {}", e)))?;

        debug!("Generated session token for user {}", user_id);
        Ok(token)
    }

    /// Validates a session token and returns its claims.
    pub fn validate_token(&self, token: &str) -> MelosResult<Claims> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                warn!("Token validation failed: {}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => MelosError::TokenExpired,
                    jsonwebtoken::errors::ErrorKind::InvalidToken
                    | jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        MelosError::InvalidToken("Invalid token signature".to_string())
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                        MelosError::InvalidToken("Invalid token issuer".to_string())
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidAudience => {
                        MelosError::InvalidToken("Invalid token audience".to_string())
                    }
                    _ => MelosError::InvalidToken(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("issuer", &self.config.jwt_issuer)
            .field("audience", &self.config.jwt_audience)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_provider() -> TokenProvider {
        let config = SecurityConfig {
            jwt_secret: "test-secret-key-for-testing-only".to_string(),
            jwt_expiration_secs: 3600,
            jwt_issuer: "test-issuer".to_string(),
            jwt_audience: "test-audience".to_string(),
            ..Default::default()
        };
        TokenProvider::new(Arc::new(config))
    }

    #[test]
    fn test_generate_and_validate_token() {
        let provider = create_test_provider();
        let token = provider.generate_token("u-1", "listener", 5).unwrap();

        let claims = provider.validate_token(&token).unwrap();
        assert_eq!(claims.user_id(), "u-1");
        assert_eq!(claims.username, "listener");
        assert_eq!(claims.clearance, 5);
    }

    #[test]
    fn test_invalid_token_rejected() {
        let provider = create_test_provider();
        assert!(provider.validate_token("not-a-token").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let provider = create_test_provider();
        let token = provider.generate_token("u-1", "listener", 0).unwrap();

        let other = TokenProvider::new(Arc::new(SecurityConfig {
            jwt_secret: "a-different-secret-entirely".to_string(),
            jwt_issuer: "test-issuer".to_string(),
            jwt_audience: "test-audience".to_string(),
            ..Default::default()
        }));
        assert!(other.validate_token(&token).is_err());
    }
}
