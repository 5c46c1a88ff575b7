use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::json;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, RegisterRequest, UserResponse},
        jwt::{AuthUser, JwtKeys},
        password::{hash_password, verify_password},
    },
    error::ApiError,
    state::AppState,
    store::users::NewUser,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let name = payload.name.as_deref().map(str::trim).unwrap_or_default();
    let email = payload
        .email
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_lowercase();
    let password = payload.password.unwrap_or_default();

    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(ApiError::Validation(
            "Missing required fields (name, email, password).".into(),
        ));
    }
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::Validation("Invalid email address.".into()));
    }
    if password.len() < 6 {
        warn!("password too short");
        return Err(ApiError::Validation(
            "Password must be at least 6 characters.".into(),
        ));
    }

    let existing = state.users.find_user_by_email(&email).await.map_err(|e| {
        error!(error = %e, "find_user_by_email failed");
        ApiError::from(e)
    })?;
    if existing.is_some() {
        warn!(email = %email, "email already registered");
        return Err(ApiError::Conflict("Email already registered.".into()));
    }

    let password_hash = hash_password(&password).map_err(ApiError::from)?;
    let user = state
        .users
        .create_user(NewUser {
            name: name.to_string(),
            email,
            password_hash,
        })
        .await
        .map_err(|e| {
            error!(error = %e, "create user failed");
            ApiError::from(e)
        })?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.email).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        ApiError::from(e)
    })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user.into(),
            token,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = payload
        .email
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_lowercase();
    let password = payload.password.unwrap_or_default();

    if email.is_empty() || password.is_empty() {
        return Err(ApiError::Validation("Missing email or password.".into()));
    }

    let user = state.users.find_user_by_email(&email).await.map_err(|e| {
        error!(error = %e, "find_user_by_email failed");
        ApiError::from(e)
    })?;

    // unknown email and wrong password share one response body
    let Some(user) = user else {
        warn!(email = %email, "login unknown email");
        return Err(ApiError::Unauthorized("Invalid credentials.".into()));
    };
    let ok = verify_password(&password, &user.password_hash).map_err(ApiError::from)?;
    if !ok {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized("Invalid credentials.".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.email).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        ApiError::from(e)
    })?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse {
        user: user.into(),
        token,
    }))
}

#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .users
        .get_user(identity.id)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %identity.id, "get_user failed");
            ApiError::from(e)
        })?
        .ok_or_else(|| {
            warn!(user_id = %identity.id, "token subject no longer exists");
            ApiError::Unauthorized("User not found.".into())
        })?;

    Ok(Json(UserResponse { user: user.into() }))
}

/// Token invalidation is client-side only; there is no server state to drop.
pub async fn logout() -> Json<serde_json::Value> {
    Json(json!({ "message": "Logged out." }))
}
