use anyhow::{Context, Result};
use axum::{
    Json, RequestPartsExt,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::settings::TokenSettings;
use crate::web::AppState;

/// Owning-user ids are stored in `VARCHAR(36)` columns.
pub const MAX_USER_ID_LEN: usize = 36;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // owning user id
    pub exp: i64,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

impl Claims {
    pub fn new(user_id: &str, lifetime: Duration, settings: &TokenSettings) -> Result<Self> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(lifetime)
            .context("Token expiry is out of range")?;

        Ok(Self {
            sub: user_id.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: settings.issuer.clone(),
            aud: settings.audience.clone(),
        })
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Signs and verifies bearer tokens with the configured HMAC key.
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    settings: TokenSettings,
}

impl JwtService {
    pub fn new(settings: &TokenSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match &settings.issuer {
            Some(issuer) => validation.set_issuer(&[issuer]),
            None => validation.iss = None,
        }
        match &settings.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            encoding_key: EncodingKey::from_secret(settings.signing_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.signing_key.as_bytes()),
            validation,
            settings: settings.clone(),
        }
    }

    pub fn generate_token(&self, user_id: &str) -> Result<String> {
        let lifetime = Duration::try_hours(self.settings.lifetime_hours)
            .context("Token lifetime is out of range")?;
        self.generate_token_with_lifetime(user_id, lifetime)
    }

    pub fn generate_token_with_lifetime(&self, user_id: &str, lifetime: Duration) -> Result<String> {
        if user_id.is_empty() || user_id.len() > MAX_USER_ID_LEN {
            anyhow::bail!(
                "User id must be between 1 and {} characters",
                MAX_USER_ID_LEN
            );
        }
        let claims = Claims::new(user_id, lifetime, &self.settings)?;
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to generate token: {}", e))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| anyhow::anyhow!("Failed to verify token: {}", e))?;

        if claims.sub.is_empty() || claims.sub.len() > MAX_USER_ID_LEN {
            anyhow::bail!("Token subject is not a valid user id");
        }

        Ok(claims)
    }
}

async fn bearer_claims(parts: &mut Parts, jwt: &JwtService) -> Result<Claims, AuthError> {
    let TypedHeader(Authorization(bearer)) = parts
        .extract::<TypedHeader<Authorization<Bearer>>>()
        .await
        .map_err(|_| AuthError::MissingToken)?;

    jwt.verify_token(bearer.token()).map_err(|e| {
        debug!("Rejected bearer token: {}", e);
        AuthError::InvalidToken
    })
}

/// Middleware that rejects any request without a valid bearer token before it
/// reaches a handler. Verified claims are left in the request extensions.
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let (mut parts, body) = request.into_parts();
    let claims = bearer_claims(&mut parts, &state.jwt).await?;
    parts.extensions.insert(claims);

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub claims: Claims,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Already verified by `require_bearer`
        let claims = match parts.extensions.get::<Claims>() {
            Some(claims) => claims.clone(),
            None => bearer_claims(parts, &state.jwt).await?,
        };

        Ok(AuthUser {
            user_id: claims.sub.clone(),
            claims,
        })
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authorization token"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
        };
        (
            status,
            [(axum::http::header::WWW_AUTHENTICATE, "Bearer")],
            Json(serde_json::json!({ "error": error_message })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> TokenSettings {
        TokenSettings {
            signing_key: "test-signing-key".to_string(),
            issuer: Some("flightbook-tests".to_string()),
            audience: Some("flightbook".to_string()),
            lifetime_hours: 1,
        }
    }

    #[test]
    fn test_token_round_trip_carries_subject() {
        let service = JwtService::new(&settings());
        let token = service.generate_token("user-123").unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.sub, "user-123");
        assert_eq!(claims.iss.as_deref(), Some("flightbook-tests"));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_signed_with_other_key_is_rejected() {
        let other = TokenSettings {
            signing_key: "another-key".to_string(),
            ..settings()
        };
        let token = JwtService::new(&other).generate_token("user-123").unwrap();
        assert!(JwtService::new(&settings()).verify_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = JwtService::new(&settings());
        let token = service
            .generate_token_with_lifetime("user-123", Duration::hours(-2))
            .unwrap();
        assert!(service.verify_token(&token).is_err());
    }

    #[test]
    fn test_wrong_audience_is_rejected() {
        let other = TokenSettings {
            audience: Some("somebody-else".to_string()),
            ..settings()
        };
        let token = JwtService::new(&other).generate_token("user-123").unwrap();
        assert!(JwtService::new(&settings()).verify_token(&token).is_err());
    }

    #[test]
    fn test_issuer_and_audience_optional() {
        let open = TokenSettings {
            issuer: None,
            audience: None,
            ..settings()
        };
        let service = JwtService::new(&open);
        let token = service.generate_token("user-123").unwrap();
        assert_eq!(service.verify_token(&token).unwrap().sub, "user-123");
    }

    #[test]
    fn test_user_id_length_is_bounded() {
        let service = JwtService::new(&settings());
        assert!(service.generate_token("").is_err());
        assert!(service.generate_token(&"x".repeat(37)).is_err());
        assert!(service.generate_token(&"x".repeat(36)).is_ok());
    }

    #[test]
    fn test_out_of_range_lifetime_is_an_error() {
        let service = JwtService::new(&TokenSettings {
            lifetime_hours: i64::MAX,
            ..settings()
        });
        assert!(service.generate_token("user-123").is_err());

        // Representable as a duration but past the end of the calendar
        let service = JwtService::new(&settings());
        let lifetime = Duration::try_days(365 * 300_000).unwrap();
        assert!(
            service
                .generate_token_with_lifetime("user-123", lifetime)
                .is_err()
        );
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let service = JwtService::new(&settings());
        assert!(service.verify_token("not-a-jwt").is_err());
    }
}
