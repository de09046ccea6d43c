use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

pub fn create_access_token(user_id: Uuid, email: &str, config: &Config) -> AppResult<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        exp: (now + Duration::seconds(config.jwt_access_ttl_secs)).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create access token: {}", e)))
}

pub fn verify_token(token: &str, config: &Config) -> AppResult<TokenData<Claims>> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|_| AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::DayBoundary;

    fn test_config(secret: &str) -> Config {
        Config {
            database_url: "postgres://localhost/luma_test".into(),
            host: "127.0.0.1".into(),
            port: 0,
            frontend_url: "http://localhost:3000".into(),
            cors_extra_origins: Vec::new(),
            jwt_secret: secret.into(),
            jwt_access_ttl_secs: 900,
            groq_api_key: String::new(),
            groq_model: "test-model".into(),
            groq_base_url: "http://127.0.0.1:9".into(),
            llm_timeout_secs: 1,
            tts_base_url: "http://127.0.0.1:9".into(),
            day_boundary: DayBoundary::Local,
        }
    }

    #[test]
    fn test_token_roundtrip() {
        let config = test_config("secret-a");
        let user_id = Uuid::new_v4();
        let token = create_access_token(user_id, "ana@example.com", &config).unwrap();

        let data = verify_token(&token, &config).unwrap();
        assert_eq!(data.claims.sub, user_id);
        assert_eq!(data.claims.email, "ana@example.com");
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let token = create_access_token(Uuid::new_v4(), "ana@example.com", &test_config("secret-a")).unwrap();
        let result = verify_token(&token, &test_config("secret-b"));
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let mut config = test_config("secret-a");
        config.jwt_access_ttl_secs = -3600;
        let token = create_access_token(Uuid::new_v4(), "ana@example.com", &config).unwrap();
        assert!(verify_token(&token, &config).is_err());
    }
}
