use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};

use crate::config;
use crate::error::ApiError;

/// Authenticated principal extracted from a verified bearer token.
///
/// The full claim set rides along so handlers can read arbitrary claims by
/// key without re-parsing the token.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub name: String,
    pub claims: Map<String, Value>,
}

impl AuthUser {
    fn from_claims(claims: Map<String, Value>) -> Self {
        let name = ["sub", "user_name", "client_id"]
            .iter()
            .find_map(|key| claims.get(*key).and_then(Value::as_str))
            .unwrap_or("unknown")
            .to_string();
        Self { name, claims }
    }

    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    /// Granted scopes, from either a space-separated `scope` string or a
    /// `scope` array claim.
    pub fn scopes(&self) -> Vec<&str> {
        match self.claims.get("scope") {
            Some(Value::String(raw)) => raw.split_whitespace().collect(),
            Some(Value::Array(items)) => {
                items.iter().filter_map(Value::as_str).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// Bearer-token middleware guarding every route it is layered over.
///
/// A request moves unauthenticated -> authenticated (token verified, claims
/// extracted) -> authorized (required scope present, if one is configured);
/// any failure short-circuits into the standard error envelope with 401 or
/// 403. Verification touches only request data and the configured key, so
/// requests need no coordination with each other.
pub async fn bearer_auth(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(&headers)?;
    let claims = verify(&token)?;
    let user = AuthUser::from_claims(claims);

    if let Some(required) = &config::config().security.required_scope {
        if !user.scopes().contains(&required.as_str()) {
            return Err(ApiError::forbidden());
        }
    }

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<String, ApiError> {
    let unauthorized = || {
        ApiError::unauthorized(
            "unauthorized",
            "Full authentication is required to access this resource",
        )
    };

    let header = headers
        .get("authorization")
        .ok_or_else(unauthorized)?
        .to_str()
        .map_err(|_| unauthorized())?;

    match header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(unauthorized()),
    }
}

/// Verify the token signature, expiry and audience; return the raw claim set.
fn verify(token: &str) -> Result<Map<String, Value>, ApiError> {
    let security = &config::config().security;
    if security.jwt_public_key.trim().is_empty() {
        return Err(ApiError::unauthorized(
            "invalid_token",
            "No verifier key is configured",
        ));
    }

    let (key, algorithm) = decoding_key(&security.jwt_public_key)
        .map_err(|e| ApiError::unauthorized("invalid_token", format!("Bad verifier key: {e}")))?;

    let mut validation = Validation::new(algorithm);
    validation.set_audience(&[security.audience.as_str()]);

    let data = decode::<Map<String, Value>>(token, &key, &validation)
        .map_err(|e| ApiError::unauthorized("invalid_token", e.to_string()))?;
    Ok(data.claims)
}

/// The verifier key setting accepts either a PEM public key (RS256) or a
/// plain shared secret (HS256).
fn decoding_key(raw: &str) -> Result<(DecodingKey, Algorithm), jsonwebtoken::errors::Error> {
    let raw = raw.trim();
    if raw.starts_with("-----BEGIN") {
        Ok((DecodingKey::from_rsa_pem(raw.as_bytes())?, Algorithm::RS256))
    } else {
        Ok((DecodingKey::from_secret(raw.as_bytes()), Algorithm::HS256))
    }
}
