use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::recipes::{NewRecipe, Recipe, RecipeFilter, RecipePatch, RecipeStore};
use super::users::{NewUser, User, UserPatch, UserStore};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escape LIKE wildcards so a search term matches literally.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, new: NewUser) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, created_at, last_modified
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at, last_modified
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at, last_modified
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn list_users(&self) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at, last_modified
            FROM users
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn update_user(&self, id: Uuid, patch: UserPatch) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                last_modified = now()
            WHERE id = $1
            RETURNING id, name, email, password_hash, created_at, last_modified
            "#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.email)
        .bind(patch.password_hash)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl RecipeStore for PgStore {
    async fn list_recipes(&self, filter: RecipeFilter) -> anyhow::Result<Vec<Recipe>> {
        let recipes = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, name, description, category, temperature, prep_time, cook_time,
                   image, link, owner_id, owner_email, created_at, last_modified
            FROM recipes
            WHERE ($1::uuid IS NULL OR owner_id = $1 OR lower(owner_email) = lower($2))
              AND ($3::text IS NULL
                   OR name ILIKE $3 OR description ILIKE $3
                   OR category ILIKE $3 OR temperature ILIKE $3)
              AND ($4::text IS NULL OR category = $4)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.owner.as_ref().map(|o| o.id))
        .bind(filter.owner.as_ref().map(|o| o.email.clone()))
        .bind(filter.search.as_deref().map(like_pattern))
        .bind(filter.category)
        .fetch_all(&self.pool)
        .await?;
        Ok(recipes)
    }

    async fn create_recipe(&self, new: NewRecipe) -> anyhow::Result<Recipe> {
        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            INSERT INTO recipes (name, description, category, temperature, prep_time,
                                 cook_time, image, link, owner_id, owner_email)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, name, description, category, temperature, prep_time, cook_time,
                      image, link, owner_id, owner_email, created_at, last_modified
            "#,
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(&new.category)
        .bind(&new.temperature)
        .bind(new.prep_time)
        .bind(new.cook_time)
        .bind(&new.image)
        .bind(&new.link)
        .bind(new.owner_id)
        .bind(&new.owner_email)
        .fetch_one(&self.pool)
        .await?;
        Ok(recipe)
    }

    async fn get_recipe(&self, id: Uuid) -> anyhow::Result<Option<Recipe>> {
        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, name, description, category, temperature, prep_time, cook_time,
                   image, link, owner_id, owner_email, created_at, last_modified
            FROM recipes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(recipe)
    }

    async fn update_recipe(
        &self,
        id: Uuid,
        patch: RecipePatch,
    ) -> anyhow::Result<Option<Recipe>> {
        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            UPDATE recipes
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                temperature = COALESCE($5, temperature),
                prep_time = COALESCE($6, prep_time),
                cook_time = COALESCE($7, cook_time),
                image = COALESCE($8, image),
                link = COALESCE($9, link),
                last_modified = now()
            WHERE id = $1
            RETURNING id, name, description, category, temperature, prep_time, cook_time,
                      image, link, owner_id, owner_email, created_at, last_modified
            "#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.description)
        .bind(patch.category)
        .bind(patch.temperature)
        .bind(patch.prep_time)
        .bind(patch.cook_time)
        .bind(patch.image)
        .bind(patch.link)
        .fetch_optional(&self.pool)
        .await?;
        Ok(recipe)
    }

    async fn delete_recipe(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
