use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::jwt::{AuthUser, MaybeAuthUser},
    error::ApiError,
    recipes::dto::{
        CreateRecipeRequest, ListRecipesQuery, RecipeListResponse, RecipeView,
        UpdateRecipeRequest,
    },
    state::AppState,
    store::recipes::RecipeFilter,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route(
            "/recipes/:id",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    MaybeAuthUser(identity): MaybeAuthUser,
    Query(query): Query<ListRecipesQuery>,
) -> Result<Json<RecipeListResponse>, ApiError> {
    let filter = RecipeFilter {
        search: query.search.filter(|s| !s.is_empty()),
        // "All" is the category dropdown's no-filter sentinel
        category: query.category.filter(|c| !c.is_empty() && c != "All"),
        owner: identity,
    };
    let recipes = state.recipes.list_recipes(filter).await.map_err(|e| {
        error!(error = %e, "list_recipes failed");
        ApiError::from(e)
    })?;
    Ok(Json(RecipeListResponse {
        recipes: recipes.into_iter().map(Into::into).collect(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn create_recipe(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(payload): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<RecipeView>), ApiError> {
    let name = match payload.name.as_deref().map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => {
            return Err(ApiError::Validation(
                "Missing required field (name).".into(),
            ))
        }
    };

    let new = payload.into_new_recipe(name, &identity);
    let recipe = state.recipes.create_recipe(new).await.map_err(|e| {
        error!(error = %e, "create_recipe failed");
        ApiError::from(e)
    })?;

    info!(recipe_id = %recipe.id, owner_id = ?recipe.owner_id, "recipe created");
    Ok((StatusCode::CREATED, Json(recipe.into())))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecipeView>, ApiError> {
    // a malformed id can never name a recipe
    let Ok(id) = Uuid::parse_str(&id) else {
        return Err(ApiError::NotFound("Recipe not found.".into()));
    };
    let recipe = state
        .recipes
        .get_recipe(id)
        .await
        .map_err(|e| {
            error!(error = %e, %id, "get_recipe failed");
            ApiError::from(e)
        })?
        .ok_or_else(|| ApiError::NotFound("Recipe not found.".into()))?;
    Ok(Json(recipe.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_recipe(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
    payload: Option<Json<UpdateRecipeRequest>>,
) -> Result<Json<RecipeView>, ApiError> {
    let Ok(id) = Uuid::parse_str(&id) else {
        return Err(ApiError::NotFound("Recipe not found.".into()));
    };
    let Some(Json(payload)) = payload else {
        return Err(ApiError::Validation(
            "Missing recipe data in request body.".into(),
        ));
    };

    let recipe = state
        .recipes
        .update_recipe(id, payload.into())
        .await
        .map_err(|e| {
            error!(error = %e, %id, "update_recipe failed");
            ApiError::from(e)
        })?
        .ok_or_else(|| ApiError::NotFound("Recipe not found.".into()))?;

    info!(recipe_id = %recipe.id, editor = %identity.id, "recipe updated");
    Ok(Json(recipe.into()))
}

#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    // unlike reads, a malformed id here is reported as such
    let Ok(id) = Uuid::parse_str(&id) else {
        warn!(%id, "invalid recipe id format for deletion");
        return Err(ApiError::Validation(
            "Invalid recipe id format for deletion.".into(),
        ));
    };

    let deleted = state.recipes.delete_recipe(id).await.map_err(|e| {
        error!(error = %e, %id, "delete_recipe failed");
        ApiError::from(e)
    })?;
    if !deleted {
        return Err(ApiError::NotFound("Recipe not found.".into()));
    }
    info!(recipe_id = %id, editor = %identity.id, "recipe deleted");
    Ok(StatusCode::NO_CONTENT)
}
