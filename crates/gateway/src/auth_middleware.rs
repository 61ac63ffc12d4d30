//! Bearer-token authentication for the API routes.

use {
    axum::{
        Json,
        extract::{FromRef, FromRequestParts},
        http::{StatusCode, request::Parts},
    },
    serde_json::json,
};

use crate::{
    auth::{now_ms, sha256_hex},
    state::AppState,
};

/// The authenticated caller, resolved from `Authorization: Bearer <token>`
/// against the session store. Rejects with 401 when the token is missing,
/// unknown, or expired.
pub struct CurrentUser {
    pub id: String,
    pub email: String,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app = AppState::from_ref(state);

        let Some(token) = bearer_token(&parts.headers) else {
            return Err(unauthorized());
        };
        let session = app
            .store
            .validate_session(&sha256_hex(token), now_ms())
            .await
            .ok()
            .flatten()
            .ok_or_else(unauthorized)?;
        let user = app
            .store
            .find_user(&session.user_id)
            .await
            .ok()
            .flatten()
            .ok_or_else(unauthorized)?;

        Ok(CurrentUser {
            id: user.id,
            email: user.email,
        })
    }
}

/// The raw token from an `Authorization: Bearer <token>` header.
pub(crate) fn bearer_token(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())?
        .strip_prefix("Bearer ")
}

fn unauthorized() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Unauthorized" })),
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    #[test]
    fn bearer_token_strips_the_scheme() {
        let mut h = axum::http::HeaderMap::new();
        h.insert(
            axum::http::header::AUTHORIZATION,
            "Bearer abc123".parse().unwrap(),
        );
        assert_eq!(bearer_token(&h), Some("abc123"));
    }

    #[test]
    fn bearer_token_rejects_other_schemes() {
        let mut h = axum::http::HeaderMap::new();
        h.insert(
            axum::http::header::AUTHORIZATION,
            "Basic dXNlcjpwYXNz".parse().unwrap(),
        );
        assert_eq!(bearer_token(&h), None);
    }

    #[test]
    fn bearer_token_requires_the_header() {
        assert_eq!(bearer_token(&axum::http::HeaderMap::new()), None);
    }
}
