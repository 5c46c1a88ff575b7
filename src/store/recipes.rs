use async_trait::async_trait;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::jwt::Identity;

/// Image URL used when a recipe is created without one.
pub const PLACEHOLDER_IMAGE: &str = "https://theme-assets.getbento.com/sensei/3d11b60.sensei/assets/images/catering-item-placeholder-704x520.png";

/// Stored recipe record. Both owner fields are nullable: records created
/// before ownership was introduced carry neither, and some legacy records
/// carry only an email attribution.
#[derive(Debug, Clone, FromRow)]
pub struct Recipe {
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
    pub created_at: OffsetDateTime,
    pub last_modified: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewRecipe {
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
}

/// Partial update over content fields only. Owner and timestamp fields are
/// deliberately absent: a patch can never reassign a recipe.
#[derive(Debug, Clone, Default)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub temperature: Option<String>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub image: Option<String>,
    pub link: Option<String>,
}

/// Listing filter. All present parts compose conjunctively.
///
/// When `owner` is set, a recipe matches if its `owner_id` equals the
/// caller's id OR its `owner_email` equals the caller's email
/// (case-insensitive). The OR across both attribution fields keeps
/// differently-shaped legacy records visible to their owners.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub owner: Option<Identity>,
}

#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn list_recipes(&self, filter: RecipeFilter) -> anyhow::Result<Vec<Recipe>>;
    async fn create_recipe(&self, new: NewRecipe) -> anyhow::Result<Recipe>;
    async fn get_recipe(&self, id: Uuid) -> anyhow::Result<Option<Recipe>>;
    async fn update_recipe(&self, id: Uuid, patch: RecipePatch)
        -> anyhow::Result<Option<Recipe>>;
    async fn delete_recipe(&self, id: Uuid) -> anyhow::Result<bool>;
}
