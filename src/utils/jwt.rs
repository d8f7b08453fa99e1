use crate::error::{AppError, AppResult};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    #[serde(default)]
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Owner,
    Admin,
}

impl UserRole {
    pub fn from_claim(role: &str) -> Self {
        if role.eq_ignore_ascii_case("admin") {
            UserRole::Admin
        } else {
            UserRole::Owner
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

/// Authenticated caller, extracted from the bearer token by the auth
/// middleware and stored in the request extensions.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: i64,
    pub role: UserRole,
}

/// Verify-only JWT service. Tokens are issued by the main platform;
/// this backend shares the secret and only validates them.
#[derive(Clone)]
pub struct JwtService {
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(AppError::JwtError)
    }

    pub fn authenticate(&self, token: &str) -> AppResult<AuthUser> {
        let claims = self.verify_token(token)?;
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::AuthError("Invalid subject claim".to_string()))?;
        Ok(AuthUser {
            id,
            role: UserRole::from_claim(&claims.role),
        })
    }
}
