//! `/api/auth` routes: register, login, current user, logout.

use {
    axum::{
        Json, Router,
        extract::State,
        http::{HeaderMap, StatusCode},
        response::{IntoResponse, Response},
        routing::{get, post},
    },
    serde_json::json,
    tracing::warn,
};

use atelier_store::{SessionRecord, UserRecord};

use crate::{
    auth::{generate_token, hash_password, now_ms, sha256_hex, verify_password},
    auth_middleware::{CurrentUser, bearer_token},
    server::{api_error, store_error},
    state::AppState,
};

/// Build the auth router with all `/api/auth/*` routes.
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .route("/me", get(me_handler))
        .route("/logout", post(logout_handler))
}

// ── Register / login ─────────────────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct CredentialsBody {
    email: Option<String>,
    password: Option<String>,
}

async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<CredentialsBody>,
) -> Response {
    let email = body.email.unwrap_or_default();
    let password = body.password.unwrap_or_default();
    if email.is_empty() || password.is_empty() {
        return api_error(StatusCode::BAD_REQUEST, "Missing email or password");
    }

    match state.store.find_user_by_email(&email).await {
        Ok(Some(_)) => return api_error(StatusCode::CONFLICT, "User exists"),
        Ok(None) => {},
        Err(e) => return store_error(e),
    }

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!(error = %e, "password hashing failed");
            return api_error(StatusCode::INTERNAL_SERVER_ERROR, "Registration failed");
        },
    };
    let now = now_ms();
    let user = UserRecord {
        id: now.to_string(),
        email,
        password_hash,
        created_at: now,
    };
    if let Err(e) = state.store.insert_user(user.clone()).await {
        return store_error(e);
    }

    issue_session(&state, &user).await
}

async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<CredentialsBody>,
) -> Response {
    let email = body.email.unwrap_or_default();
    let password = body.password.unwrap_or_default();
    if email.is_empty() || password.is_empty() {
        return api_error(StatusCode::BAD_REQUEST, "Missing email or password");
    }

    let user = match state.store.find_user_by_email(&email).await {
        Ok(Some(user)) => user,
        Ok(None) => return api_error(StatusCode::UNAUTHORIZED, "Invalid credentials"),
        Err(e) => return store_error(e),
    };
    if !verify_password(&password, &user.password_hash) {
        return api_error(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }

    issue_session(&state, &user).await
}

/// Mint a bearer token, persist its hash and answer `{ token, user }`.
async fn issue_session(state: &AppState, user: &UserRecord) -> Response {
    let token = generate_token();
    let session = SessionRecord {
        token_hash: sha256_hex(&token),
        user_id: user.id.clone(),
        expires_at: now_ms() + state.session_ttl_ms,
    };
    if let Err(e) = state.store.insert_session(session).await {
        return store_error(e);
    }
    Json(json!({
        "token": token,
        "user": { "id": user.id, "email": user.email },
    }))
    .into_response()
}

// ── Current session ──────────────────────────────────────────────────────────

async fn me_handler(user: CurrentUser) -> impl IntoResponse {
    Json(json!({ "user": { "id": user.id, "email": user.email } }))
}

async fn logout_handler(
    _user: CurrentUser,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    if let Some(token) = bearer_token(&headers)
        && let Err(e) = state.store.delete_session(&sha256_hex(token)).await
    {
        return store_error(e);
    }
    Json(json!({ "ok": true })).into_response()
}
