// ABOUTME: JWT-based caller authentication for the summarizer HTTP surface
// ABOUTME: Issues and validates HS256 tokens whose subject is the user id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Authentication
//!
//! Every request carries `Authorization: Bearer <jwt>`. The token's `sub`
//! claim identifies the caller; the engine compares it against the `userId`
//! a request claims to act for.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use summarizer_core::constants::service_names::SUMMARIZER_SERVER;
use summarizer_core::errors::{AppError, AppResult};
use tracing::{debug, warn};

/// Identity established by authentication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Subject of the validated token
    pub user_id: String,
}

impl AuthenticatedUser {
    /// Create an identity for a user id
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Resolves an `Authorization` header into a caller identity
pub trait Authenticator: Send + Sync {
    /// Authenticate the raw header value
    ///
    /// # Errors
    ///
    /// Returns an auth-required error when the header is absent and an
    /// auth-invalid error when the credential is rejected.
    fn authenticate(&self, authorization: Option<&str>) -> AppResult<AuthenticatedUser>;
}

/// `JWT` claims for caller authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User `ID`
    pub sub: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Audience (who the token is intended for)
    pub aud: String,
}

/// Authentication manager for HS256 `JWT` tokens
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_hours: i64,
}

impl AuthManager {
    /// Create a new authentication manager from a shared secret
    #[must_use]
    pub fn new(secret: &[u8], token_expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_expiry_hours,
        }
    }

    /// Generate a token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if `JWT` encoding fails.
    pub fn generate_token(&self, user_id: &str) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_owned(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.token_expiry_hours)).timestamp(),
            aud: SUMMARIZER_SERVER.to_owned(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))
    }

    /// Validate a token and return its claims
    ///
    /// # Errors
    ///
    /// Returns an auth-invalid error if the token is expired, malformed, or
    /// signed with a different secret.
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_audience(&[SUMMARIZER_SERVER]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                warn!("JWT token validation failed: {:?}", e.kind());
                AppError::auth_invalid(Self::describe_jwt_error(&e))
            })
    }

    fn describe_jwt_error(e: &jsonwebtoken::errors::Error) -> String {
        match e.kind() {
            ErrorKind::ExpiredSignature => "Token has expired".to_owned(),
            ErrorKind::InvalidSignature => "Token signature verification failed".to_owned(),
            ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) => {
                "Token is malformed".to_owned()
            }
            _ => format!("Token validation failed: {e}"),
        }
    }
}

impl Authenticator for AuthManager {
    fn authenticate(&self, authorization: Option<&str>) -> AppResult<AuthenticatedUser> {
        let header = authorization.ok_or_else(AppError::auth_required)?;
        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::auth_invalid("Authorization header must be a Bearer token"))?;

        let claims = self.validate_token(token)?;
        debug!("Authenticated user {}", claims.sub);
        Ok(AuthenticatedUser::new(claims.sub))
    }
}
