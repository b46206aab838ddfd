use axum::{extract::Extension, response::Json};
use serde_json::{json, Value};

use crate::middleware::AuthUser;

/// GET /whoami - the authenticated principal and its full claim set.
///
/// The principal arrives as request-scoped context injected by the auth
/// middleware; handlers never reach into process-wide state for it.
pub async fn whoami(Extension(user): Extension<AuthUser>) -> Json<Value> {
    Json(json!({
        "name": user.name,
        "claims": user.claims,
    }))
}
