use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::recipes::{NewRecipe, Recipe, RecipeFilter, RecipePatch, RecipeStore};
use super::users::{NewUser, User, UserPatch, UserStore};

/// In-memory store used by the test suite and for running the API without
/// Postgres. Filtering semantics mirror the SQL implementation.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    recipes: RwLock<Vec<Recipe>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(recipe: &Recipe, filter: &RecipeFilter) -> bool {
    if let Some(owner) = &filter.owner {
        let by_id = recipe.owner_id == Some(owner.id);
        let by_email = recipe
            .owner_email
            .as_deref()
            .is_some_and(|e| e.eq_ignore_ascii_case(&owner.email));
        if !by_id && !by_email {
            return false;
        }
    }
    if let Some(term) = &filter.search {
        let term = term.to_lowercase();
        let hit = recipe.name.to_lowercase().contains(&term)
            || recipe.description.to_lowercase().contains(&term)
            || recipe
                .category
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(&term))
            || recipe.temperature.to_lowercase().contains(&term);
        if !hit {
            return false;
        }
    }
    if let Some(category) = &filter.category {
        if recipe.category.as_deref() != Some(category.as_str()) {
            return false;
        }
    }
    true
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, new: NewUser) -> anyhow::Result<User> {
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            created_at: now,
            last_modified: now,
        };
        self.users.write().await.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn get_user(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_users(&self) -> anyhow::Result<Vec<User>> {
        Ok(self.users.read().await.clone())
    }

    async fn update_user(&self, id: Uuid, patch: UserPatch) -> anyhow::Result<Option<User>> {
        let mut users = self.users.write().await;
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(password_hash) = patch.password_hash {
            user.password_hash = password_hash;
        }
        user.last_modified = OffsetDateTime::now_utc();
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn list_recipes(&self, filter: RecipeFilter) -> anyhow::Result<Vec<Recipe>> {
        let recipes = self.recipes.read().await;
        let mut hits: Vec<Recipe> = recipes
            .iter()
            .filter(|r| matches(r, &filter))
            .cloned()
            .collect();
        hits.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(hits)
    }

    async fn create_recipe(&self, new: NewRecipe) -> anyhow::Result<Recipe> {
        let now = OffsetDateTime::now_utc();
        let recipe = Recipe {
            id: Uuid::new_v4(),
            name: new.name,
            description: new.description,
            category: new.category,
            temperature: new.temperature,
            prep_time: new.prep_time,
            cook_time: new.cook_time,
            image: new.image,
            link: new.link,
            owner_id: new.owner_id,
            owner_email: new.owner_email,
            created_at: now,
            last_modified: now,
        };
        self.recipes.write().await.push(recipe.clone());
        Ok(recipe)
    }

    async fn get_recipe(&self, id: Uuid) -> anyhow::Result<Option<Recipe>> {
        let recipes = self.recipes.read().await;
        Ok(recipes.iter().find(|r| r.id == id).cloned())
    }

    async fn update_recipe(
        &self,
        id: Uuid,
        patch: RecipePatch,
    ) -> anyhow::Result<Option<Recipe>> {
        let mut recipes = self.recipes.write().await;
        let Some(recipe) = recipes.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            recipe.name = name;
        }
        if let Some(description) = patch.description {
            recipe.description = description;
        }
        if let Some(category) = patch.category {
            recipe.category = Some(category);
        }
        if let Some(temperature) = patch.temperature {
            recipe.temperature = temperature;
        }
        if let Some(prep_time) = patch.prep_time {
            recipe.prep_time = Some(prep_time);
        }
        if let Some(cook_time) = patch.cook_time {
            recipe.cook_time = Some(cook_time);
        }
        if let Some(image) = patch.image {
            recipe.image = image;
        }
        if let Some(link) = patch.link {
            recipe.link = link;
        }
        recipe.last_modified = OffsetDateTime::now_utc();
        Ok(Some(recipe.clone()))
    }

    async fn delete_recipe(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut recipes = self.recipes.write().await;
        let before = recipes.len();
        recipes.retain(|r| r.id != id);
        Ok(recipes.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::Identity;

    fn seed(owner_id: Option<Uuid>, owner_email: Option<&str>) -> NewRecipe {
        NewRecipe {
            name: "Toast".into(),
            description: String::new(),
            category: None,
            temperature: String::new(),
            prep_time: None,
            cook_time: None,
            image: String::new(),
            link: String::new(),
            owner_id,
            owner_email: owner_email.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn owner_filter_matches_either_attribution_field() {
        let store = MemoryStore::new();
        let caller = Identity {
            id: Uuid::new_v4(),
            email: "cook@example.com".into(),
        };
        store.create_recipe(seed(Some(caller.id), None)).await.unwrap();
        store
            .create_recipe(seed(None, Some("Cook@Example.com")))
            .await
            .unwrap();
        store
            .create_recipe(seed(Some(Uuid::new_v4()), Some("other@example.com")))
            .await
            .unwrap();

        let mine = store
            .list_recipes(RecipeFilter {
                owner: Some(caller.clone()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(mine.len(), 2);

        let all = store.list_recipes(RecipeFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring_across_fields() {
        let store = MemoryStore::new();
        let mut spicy = seed(None, None);
        spicy.name = "Chili con carne".into();
        spicy.temperature = "350F".into();
        store.create_recipe(spicy).await.unwrap();
        store.create_recipe(seed(None, None)).await.unwrap();

        let by_name = store
            .list_recipes(RecipeFilter {
                search: Some("CHILI".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_name.len(), 1);

        let by_temperature = store
            .list_recipes(RecipeFilter {
                search: Some("350".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_temperature.len(), 1);

        let none = store
            .list_recipes(RecipeFilter {
                search: Some("sushi".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn category_filter_is_exact() {
        let store = MemoryStore::new();
        let mut lunch = seed(None, None);
        lunch.category = Some("Lunch".into());
        store.create_recipe(lunch).await.unwrap();
        store.create_recipe(seed(None, None)).await.unwrap();

        let hits = store
            .list_recipes(RecipeFilter {
                category: Some("Lunch".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);

        let misses = store
            .list_recipes(RecipeFilter {
                category: Some("Lun".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(misses.is_empty());
    }

    #[tokio::test]
    async fn patch_leaves_owner_untouched() {
        let store = MemoryStore::new();
        let owner_id = Uuid::new_v4();
        let created = store
            .create_recipe(seed(Some(owner_id), Some("cook@example.com")))
            .await
            .unwrap();

        let updated = store
            .update_recipe(
                created.id,
                RecipePatch {
                    name: Some("Better toast".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Better toast");
        assert_eq!(updated.owner_id, Some(owner_id));
        assert_eq!(updated.owner_email.as_deref(), Some("cook@example.com"));
        assert_eq!(updated.created_at, created.created_at);
    }
}
