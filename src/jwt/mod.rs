//! JWT token handling

use crate::config::JwtConfig;
use crate::error::{AppError, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Audience for console tokens
const CONSOLE_AUDIENCE: &str = "bastion-console";

/// Console token claims (issued by the identity tier for console sessions)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Email
    pub email: String,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Token type discriminator (prevents token confusion attacks)
    #[serde(default)]
    pub token_type: String,
    /// Organization the session is scoped to
    pub org_id: String,
    /// Roles within that organization
    pub roles: Vec<String>,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// JWT token manager
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtManager {
    pub fn new(config: JwtConfig) -> Self {
        let algorithm = if config.private_key_pem.is_some() {
            Algorithm::RS256
        } else {
            Algorithm::HS256
        };
        let encoding_key = match config.private_key_pem.as_ref() {
            Some(private_key) => EncodingKey::from_rsa_pem(private_key.as_bytes())
                .expect("Failed to load JWT private key"),
            None => EncodingKey::from_secret(config.secret.as_bytes()),
        };
        let decoding_key = match config.public_key_pem.as_ref() {
            Some(public_key) => DecodingKey::from_rsa_pem(public_key.as_bytes())
                .expect("Failed to load JWT public key"),
            None => match config.private_key_pem.as_ref() {
                Some(private_key) => DecodingKey::from_rsa_pem(private_key.as_bytes())
                    .expect("Failed to load JWT private key"),
                None => DecodingKey::from_secret(config.secret.as_bytes()),
            },
        };
        Self {
            config,
            encoding_key,
            decoding_key,
            algorithm,
        }
    }

    /// Create a Validation with a strict leeway (5 seconds) instead of the default 60 seconds.
    /// This ensures tokens expire promptly while still tolerating minor clock skew.
    fn strict_validation(&self) -> Validation {
        let mut v = Validation::new(self.algorithm);
        v.leeway = 5;
        v
    }

    /// Create a console token
    pub fn create_console_token(
        &self,
        user_id: Uuid,
        email: &str,
        org_id: Uuid,
        roles: Vec<String>,
    ) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.token_ttl_secs);

        let claims = ConsoleClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iss: self.config.issuer.clone(),
            aud: CONSOLE_AUDIENCE.to_string(),
            token_type: "console".to_string(),
            org_id: org_id.to_string(),
            roles,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        let header = Header::new(self.algorithm);
        encode(&header, &claims, &self.encoding_key).map_err(|e| AppError::Internal(e.into()))
    }

    /// Verify and decode a console token
    pub fn verify_console_token(&self, token: &str) -> Result<ConsoleClaims> {
        let mut validation = self.strict_validation();
        validation.set_audience(&[CONSOLE_AUDIENCE]);
        validation.set_issuer(&[&self.config.issuer]);

        let token_data = decode::<ConsoleClaims>(token, &self.decoding_key, &validation)?;

        if token_data.claims.token_type != "console" {
            return Err(AppError::Unauthorized(
                "Not a console token".to_string(),
            ));
        }

        Ok(token_data.claims)
    }

    /// Get token TTL in seconds
    pub fn token_ttl(&self) -> i64 {
        self.config.token_ttl_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-for-testing-purposes-only".to_string(),
            issuer: "https://bastion.test".to_string(),
            token_ttl_secs: 3600,
            private_key_pem: None,
            public_key_pem: None,
        }
    }

    #[test]
    fn test_create_and_verify_console_token() {
        let manager = JwtManager::new(test_config());
        let user_id = Uuid::new_v4();
        let org_id = Uuid::new_v4();

        let token = manager
            .create_console_token(
                user_id,
                "admin@example.com",
                org_id,
                vec!["admin".to_string()],
            )
            .unwrap();

        let claims = manager.verify_console_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "admin@example.com");
        assert_eq!(claims.org_id, org_id.to_string());
        assert_eq!(claims.roles, vec!["admin"]);
        assert_eq!(claims.aud, "bastion-console");
    }

    #[test]
    fn test_invalid_token() {
        let manager = JwtManager::new(test_config());

        let result = manager.verify_console_token("invalid-token");
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let manager = JwtManager::new(test_config());
        let mut other_config = test_config();
        other_config.issuer = "https://somewhere-else.test".to_string();
        let other = JwtManager::new(other_config);

        let token = other
            .create_console_token(Uuid::new_v4(), "user@example.com", Uuid::new_v4(), vec![])
            .unwrap();

        assert!(manager.verify_console_token(&token).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let manager = JwtManager::new(test_config());
        let mut other_config = test_config();
        other_config.secret = "a-different-secret-entirely".to_string();
        let other = JwtManager::new(other_config);

        let token = other
            .create_console_token(Uuid::new_v4(), "user@example.com", Uuid::new_v4(), vec![])
            .unwrap();

        assert!(manager.verify_console_token(&token).is_err());
    }

    #[test]
    fn test_empty_roles() {
        let manager = JwtManager::new(test_config());

        let token = manager
            .create_console_token(Uuid::new_v4(), "member@example.com", Uuid::new_v4(), vec![])
            .unwrap();

        let claims = manager.verify_console_token(&token).unwrap();
        assert!(claims.roles.is_empty());
    }

    #[test]
    fn test_token_has_valid_structure() {
        let manager = JwtManager::new(test_config());
        let token = manager
            .create_console_token(Uuid::new_v4(), "user@example.com", Uuid::new_v4(), vec![])
            .unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);
    }

    #[test]
    fn test_token_ttl() {
        let manager = JwtManager::new(test_config());
        assert_eq!(manager.token_ttl(), 3600);
    }

    #[test]
    fn test_console_claims_serialization() {
        let claims = ConsoleClaims {
            sub: "user-123".to_string(),
            email: "test@example.com".to_string(),
            iss: "https://bastion.test".to_string(),
            aud: "bastion-console".to_string(),
            token_type: "console".to_string(),
            org_id: "org-456".to_string(),
            roles: vec!["admin".to_string()],
            iat: 1000000,
            exp: 1003600,
        };

        let json = serde_json::to_string(&claims).unwrap();
        assert!(json.contains("\"org_id\":\"org-456\""));
        assert!(json.contains("\"roles\":[\"admin\"]"));
        assert!(json.contains("\"token_type\":\"console\""));
    }
}
