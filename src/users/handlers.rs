use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::UserResponse,
        handlers::is_valid_email,
        jwt::AuthUser,
        password::{hash_password, verify_password},
    },
    error::ApiError,
    state::AppState,
    store::users::UserPatch,
    users::dto::{UpdateUserRequest, UserListResponse},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

fn parse_user_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::NotFound("User not found.".into()))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> Result<Json<UserListResponse>, ApiError> {
    let users = state.users.list_users().await.map_err(|e| {
        error!(error = %e, "list_users failed");
        ApiError::from(e)
    })?;
    Ok(Json(UserListResponse {
        users: users.into_iter().map(Into::into).collect(),
    }))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = parse_user_id(&id)?;
    let user = state
        .users
        .get_user(id)
        .await
        .map_err(|e| {
            error!(error = %e, %id, "get_user failed");
            ApiError::from(e)
        })?
        .ok_or_else(|| ApiError::NotFound("User not found.".into()))?;
    Ok(Json(UserResponse { user: user.into() }))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
    payload: Option<Json<UpdateUserRequest>>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = parse_user_id(&id)?;
    if identity.id != id {
        warn!(caller = %identity.id, target = %id, "cross-account update refused");
        return Err(ApiError::Forbidden(
            "You can only modify your own account.".into(),
        ));
    }
    let Some(Json(payload)) = payload else {
        return Err(ApiError::Validation(
            "Missing user data in request body.".into(),
        ));
    };

    let mut patch = UserPatch {
        name: payload.name,
        ..Default::default()
    };

    if let Some(email) = payload.email {
        let email = email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(ApiError::Validation("Invalid email address.".into()));
        }
        let existing = state.users.find_user_by_email(&email).await.map_err(|e| {
            error!(error = %e, "find_user_by_email failed");
            ApiError::from(e)
        })?;
        if existing.is_some_and(|u| u.id != id) {
            return Err(ApiError::Conflict("Email already registered.".into()));
        }
        patch.email = Some(email);
    }

    if let Some(password) = payload.password {
        let current = payload.current_password.ok_or_else(|| {
            ApiError::Validation("Current password is required to change password.".into())
        })?;
        let user = state
            .users
            .get_user(id)
            .await
            .map_err(|e| {
                error!(error = %e, %id, "get_user failed");
                ApiError::from(e)
            })?
            .ok_or_else(|| ApiError::NotFound("User not found.".into()))?;
        let ok = verify_password(&current, &user.password_hash).map_err(ApiError::from)?;
        if !ok {
            warn!(user_id = %id, "current password mismatch on password change");
            return Err(ApiError::Forbidden("Current password is incorrect.".into()));
        }
        if password.len() < 6 {
            return Err(ApiError::Validation(
                "Password must be at least 6 characters.".into(),
            ));
        }
        patch.password_hash = Some(hash_password(&password).map_err(ApiError::from)?);
    }

    let user = state
        .users
        .update_user(id, patch)
        .await
        .map_err(|e| {
            error!(error = %e, %id, "update_user failed");
            ApiError::from(e)
        })?
        .ok_or_else(|| ApiError::NotFound("User not found.".into()))?;

    info!(user_id = %user.id, "user updated");
    Ok(Json(UserResponse { user: user.into() }))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_user_id(&id)?;
    if identity.id != id {
        warn!(caller = %identity.id, target = %id, "cross-account delete refused");
        return Err(ApiError::Forbidden(
            "You can only delete your own account.".into(),
        ));
    }

    // recipes owned by this user stay behind; no cascade
    let deleted = state.users.delete_user(id).await.map_err(|e| {
        error!(error = %e, %id, "delete_user failed");
        ApiError::from(e)
    })?;
    if !deleted {
        return Err(ApiError::NotFound("User not found.".into()));
    }
    info!(user_id = %id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
