//! JWT issuance, validation and caller identity extraction
//!
//! Tokens are HS256-signed with the configured symmetric key. Claims use
//! their raw names (`sub`, `email`, `role`, ...) with no remapping, so the
//! identity seen by handlers is exactly what the token carries.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{DateTime, Duration, Utc};
use civicops_config::JwtConfig;
use civicops_domain::{Role, UserId};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Claims carried by CivicOps access tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "displayName", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(
        rename = "isActive",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_flag"
    )]
    pub is_active: Option<bool>,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagClaim {
    Bool(bool),
    Text(String),
    Other(IgnoredAny),
}

// Accepts `true`, `"true"` or `"True"`; any other present value reads as false.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let claim = Option::<FlagClaim>::deserialize(deserializer)?;
    Ok(claim.map(|claim| match claim {
        FlagClaim::Bool(flag) => flag,
        FlagClaim::Text(text) => text.trim().eq_ignore_ascii_case("true"),
        FlagClaim::Other(_) => false,
    }))
}

/// Caller identity derived from verified claims
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub is_active: bool,
}

impl Identity {
    /// Fixed identity issued by the development token endpoint
    pub fn development() -> Self {
        Self {
            id: UserId::from_subject(Some("11111111-1111-1111-1111-111111111111")),
            email: "dev@civicops.local".to_string(),
            display_name: "Dev User".to_string(),
            role: Role::Admin,
            is_active: true,
        }
    }
}

impl From<&Claims> for Identity {
    fn from(claims: &Claims) -> Self {
        Self {
            id: UserId::from_subject(claims.sub.as_deref()),
            email: claims.email.clone().unwrap_or_default(),
            display_name: claims.display_name.clone().unwrap_or_default(),
            role: Role::from_claim(claims.role.as_deref()),
            is_active: claims.is_active.unwrap_or(true),
        }
    }
}

/// A signed token and its expiry
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies HS256 access tokens
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    ttl_minutes: u64,
}

impl JwtService {
    /// Create a service from configuration
    pub fn new(config: &JwtConfig) -> Self {
        let secret = config.signing_key.as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.leeway = config.clock_skew_seconds;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            ttl_minutes: config.token_ttl_minutes,
        }
    }

    /// Issue a token for `identity` with the configured lifetime
    pub fn issue(&self, identity: &Identity) -> ApiResult<IssuedToken> {
        let ttl = i64::try_from(self.ttl_minutes)
            .ok()
            .and_then(Duration::try_minutes)
            .ok_or_else(|| {
                ApiError::Internal(format!("Token lifetime of {} minutes is out of range", self.ttl_minutes))
            })?;
        self.issue_with_ttl(identity, ttl)
    }

    /// Issue a token with an explicit lifetime
    pub fn issue_with_ttl(&self, identity: &Identity, ttl: Duration) -> ApiResult<IssuedToken> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| ApiError::Internal("Token expiry is out of range".to_string()))?;
        let claims = Claims {
            sub: Some(identity.id.to_string()),
            email: Some(identity.email.clone()),
            display_name: Some(identity.display_name.clone()),
            role: Some(identity.role.to_string()),
            is_active: Some(identity.is_active),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("Failed to sign token: {}", e)))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify signature, issuer, audience and lifetime
    pub fn verify(&self, token: &str) -> ApiResult<Claims> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| ApiError::Authentication(e.to_string()))
    }
}

/// Extractor for an authenticated caller
///
/// Rejects with 401 when the `Authorization: Bearer` header is missing or
/// the token fails verification.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub identity: Identity,
    pub claims: Claims,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Authentication("Missing bearer token".to_string()))?;

        let token = bearer_token(header)
            .ok_or_else(|| ApiError::Authentication("Malformed authorization header".to_string()))?;

        let claims = state.jwt.verify(token)?;
        let identity = Identity::from(&claims);
        tracing::debug!(user = %identity.id, role = %identity.role, "authenticated request");

        Ok(Self { identity, claims })
    }
}

fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            signing_key: "test-signing-key-that-is-long-enough!".to_string(),
            ..JwtConfig::default()
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let service = JwtService::new(&test_config());
        let identity = Identity::development();

        let issued = service.issue(&identity).unwrap();
        let claims = service.verify(&issued.token).unwrap();

        assert_eq!(claims.iss, "CivicOps");
        assert_eq!(claims.aud, "CivicOps");
        assert_eq!(claims.exp, issued.expires_at.timestamp());
        assert_eq!(Identity::from(&claims), identity);
    }

    #[test]
    fn test_rejects_other_audience() {
        let issuer = JwtService::new(&JwtConfig {
            audience: "SomeoneElse".to_string(),
            ..test_config()
        });
        let verifier = JwtService::new(&test_config());

        let issued = issuer.issue(&Identity::development()).unwrap();
        assert!(matches!(
            verifier.verify(&issued.token),
            Err(ApiError::Authentication(_))
        ));
    }

    #[test]
    fn test_rejects_other_signing_key() {
        let issuer = JwtService::new(&JwtConfig {
            signing_key: "a-completely-different-signing-key!!".to_string(),
            ..test_config()
        });
        let verifier = JwtService::new(&test_config());

        let issued = issuer.issue(&Identity::development()).unwrap();
        assert!(verifier.verify(&issued.token).is_err());
    }

    #[test]
    fn test_rejects_expired_token() {
        let service = JwtService::new(&test_config());
        // Expired well beyond the 120 second skew
        let issued = service
            .issue_with_ttl(&Identity::development(), Duration::minutes(-10))
            .unwrap();
        assert!(service.verify(&issued.token).is_err());
    }

    #[test]
    fn test_accepts_expiry_within_skew() {
        let service = JwtService::new(&test_config());
        let issued = service
            .issue_with_ttl(&Identity::development(), Duration::seconds(-30))
            .unwrap();
        assert!(service.verify(&issued.token).is_ok());
    }

    #[test]
    fn test_identity_defaults() {
        let claims = Claims {
            sub: Some("not-a-uuid".to_string()),
            email: None,
            display_name: None,
            role: Some("unknown".to_string()),
            is_active: None,
            iss: "CivicOps".to_string(),
            aud: "CivicOps".to_string(),
            iat: 0,
            exp: 0,
        };
        let identity = Identity::from(&claims);

        assert!(identity.id.is_system());
        assert_eq!(identity.email, "");
        assert_eq!(identity.display_name, "");
        assert_eq!(identity.role, Role::Staff);
        assert!(identity.is_active);
    }

    fn sign_raw(config: &JwtConfig, mut claims: serde_json::Value) -> String {
        let now = Utc::now().timestamp();
        claims["iss"] = config.issuer.clone().into();
        claims["aud"] = config.audience.clone().into();
        claims["iat"] = now.into();
        claims["exp"] = (now + 600).into();
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.signing_key.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_token_without_subject_maps_to_system_user() {
        let config = test_config();
        let service = JwtService::new(&config);
        let token = sign_raw(&config, serde_json::json!({ "email": "anon@civicops.local" }));

        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.sub, None);

        let identity = Identity::from(&claims);
        assert!(identity.id.is_system());
        assert_eq!(identity.email, "anon@civicops.local");
    }

    #[test]
    fn test_is_active_accepts_string_values() {
        let config = test_config();
        let service = JwtService::new(&config);
        let cases = [
            (serde_json::json!("true"), true),
            (serde_json::json!(" True "), true),
            (serde_json::json!("false"), false),
            (serde_json::json!("yes"), false),
            (serde_json::json!(1), false),
            (serde_json::json!(true), true),
        ];

        for (flag, expected) in cases {
            let token = sign_raw(
                &config,
                serde_json::json!({ "sub": Uuid::new_v4().to_string(), "isActive": flag }),
            );
            let claims = service.verify(&token).unwrap();
            assert_eq!(Identity::from(&claims).is_active, expected, "isActive = {}", flag);
        }
    }

    #[test]
    fn test_out_of_range_ttl_is_an_error() {
        for minutes in [1_000_000_000_000, u64::MAX] {
            let service = JwtService::new(&JwtConfig {
                token_ttl_minutes: minutes,
                ..test_config()
            });
            assert!(matches!(
                service.issue(&Identity::development()),
                Err(ApiError::Internal(_))
            ));
        }
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("bearer  abc "), Some("abc"));
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Bearer"), None);
    }
}
