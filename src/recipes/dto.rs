use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::jwt::Identity;
use crate::store::recipes::{NewRecipe, Recipe, RecipePatch, PLACEHOLDER_IMAGE};

#[derive(Debug, Deserialize)]
pub struct ListRecipesQuery {
    pub search: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipeRequest {
    #[serde(default)]
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub temperature: Option<String>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub image: Option<String>,
    pub link: Option<String>,
}

impl CreateRecipeRequest {
    /// Applies creation defaults and stamps both owner attribution fields
    /// from the authenticated caller.
    pub fn into_new_recipe(self, name: String, owner: &Identity) -> NewRecipe {
        NewRecipe {
            name,
            description: self.description.unwrap_or_default(),
            category: self.category,
            temperature: self.temperature.unwrap_or_default(),
            prep_time: self.prep_time,
            cook_time: self.cook_time,
            image: self
                .image
                .filter(|i| !i.is_empty())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            link: self.link.unwrap_or_default(),
            owner_id: Some(owner.id),
            owner_email: Some(owner.email.clone()),
        }
    }
}

/// Patch over content fields. Identity fields (`id`, `ownerId`,
/// `ownerEmail`) sent by a client are dropped on deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecipeRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub temperature: Option<String>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub image: Option<String>,
    pub link: Option<String>,
}

impl From<UpdateRecipeRequest> for RecipePatch {
    fn from(req: UpdateRecipeRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            category: req.category,
            temperature: req.temperature,
            prep_time: req.prep_time,
            cook_time: req.cook_time,
            image: req.image,
            link: req.link,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: Option<String>,
    pub temperature: String,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub image: String,
    pub link: String,
    pub owner_id: Option<Uuid>,
    pub owner_email: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_modified: OffsetDateTime,
}

impl From<Recipe> for RecipeView {
    fn from(r: Recipe) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            category: r.category,
            temperature: r.temperature,
            prep_time: r.prep_time,
            cook_time: r.cook_time,
            image: r.image,
            link: r.link,
            owner_id: r.owner_id,
            owner_email: r.owner_email,
            created_at: r.created_at,
            last_modified: r.last_modified,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeListResponse {
    pub recipes: Vec<RecipeView>,
}
