//! JWT token handling

use crate::config::JwtConfig;
use crate::error::{AppError, Result};
use anyhow::Context;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access token claims (issued by `POST /api/login`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user email)
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Token ID
    pub jti: String,
    /// Granted authorities, e.g. `ROLE_USER`
    #[serde(default)]
    pub authorities: Vec<String>,
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
    /// Build a manager. RS256 when both PEM keys are configured, HS256 otherwise.
    pub fn new(config: JwtConfig) -> anyhow::Result<Self> {
        let (algorithm, encoding_key, decoding_key) =
            match (&config.private_key_pem, &config.public_key_pem) {
                (Some(private_key), Some(public_key)) => (
                    Algorithm::RS256,
                    EncodingKey::from_rsa_pem(private_key.as_bytes())
                        .context("Failed to load JWT private key")?,
                    DecodingKey::from_rsa_pem(public_key.as_bytes())
                        .context("Failed to load JWT public key")?,
                ),
                (Some(_), None) => {
                    anyhow::bail!("JWT_PUBLIC_KEY is required when JWT_PRIVATE_KEY is set")
                }
                (None, Some(_)) => {
                    anyhow::bail!("JWT_PRIVATE_KEY is required when JWT_PUBLIC_KEY is set")
                }
                (None, None) => (
                    Algorithm::HS256,
                    EncodingKey::from_secret(config.secret.as_bytes()),
                    DecodingKey::from_secret(config.secret.as_bytes()),
                ),
            };
        Ok(Self {
            config,
            encoding_key,
            decoding_key,
            algorithm,
        })
    }

    /// Validation with a 5 second leeway instead of the default 60.
    fn strict_validation(&self) -> Validation {
        let mut v = Validation::new(self.algorithm);
        v.leeway = 5;
        v.set_audience(&[&self.config.audience]);
        v.set_issuer(&[&self.config.issuer]);
        v
    }

    /// Issue an access token for `email` carrying `authorities`.
    pub fn create_access_token(&self, email: &str, authorities: &[String]) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.access_token_ttl_secs);

        let claims = AccessClaims {
            sub: email.to_string(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            jti: Uuid::new_v4().to_string(),
            authorities: authorities.to_vec(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        let header = Header::new(self.algorithm);
        encode(&header, &claims, &self.encoding_key).map_err(|e| AppError::Internal(e.into()))
    }

    /// Verify and decode an access token
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims> {
        let token_data = decode::<AccessClaims>(token, &self.decoding_key, &self.strict_validation())?;
        Ok(token_data.claims)
    }
}
