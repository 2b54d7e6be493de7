use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Favorite, Recipe};
use crate::store::{FavoriteInsert, FavoriteRepository, RecipeRepository, Store};

#[derive(Debug, Clone, PartialEq)]
pub enum ToggleOutcome {
    Added(Favorite),
    Removed,
}

/// The recipe side of a listed favorite: the full record, or the bare id if
/// the recipe no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum RecipeRef {
    Resolved(Recipe),
    Missing(Uuid),
}

/// A favorite with its recipe resolved, as returned by `GET /favorites`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipe_id: RecipeRef,
    pub created_at: DateTime<Utc>,
}

/// Add the favorite if absent, remove it if present.
///
/// Removal goes first and reports how many rows it deleted, so there is no
/// separate lookup whose answer could go stale. Insertion is insert-if-absent,
/// so two racing toggles still leave at most one row.
pub async fn toggle_favorite(
    store: &dyn Store,
    user: Uuid,
    recipe: Uuid,
) -> Result<ToggleOutcome, AppError> {
    if store.delete_favorite(user, recipe).await? > 0 {
        tracing::info!(user_id = %user, recipe_id = %recipe, "favorite removed");
        return Ok(ToggleOutcome::Removed);
    }

    if store.get_recipe(recipe).await?.is_none() {
        return Err(AppError::NotFound("Recipe not found".to_string()));
    }

    let inserted = store.insert_favorite(user, recipe).await?;
    if matches!(inserted, FavoriteInsert::AlreadyPresent(_)) {
        tracing::debug!(user_id = %user, recipe_id = %recipe, "concurrent toggle already added favorite");
    }
    let favorite = inserted.into_favorite();

    tracing::info!(user_id = %user, recipe_id = %recipe, "favorite added");
    Ok(ToggleOutcome::Added(favorite))
}

pub async fn list_favorites(store: &dyn Store, user: Uuid) -> Result<Vec<FavoriteEntry>, AppError> {
    let rows = store.list_favorites(user).await?;

    Ok(rows
        .into_iter()
        .map(|(favorite, recipe)| {
            let recipe_id = match recipe {
                Some(recipe) => RecipeRef::Resolved(recipe),
                None => {
                    tracing::error!(
                        favorite_id = %favorite.id,
                        recipe_id = %favorite.recipe_id,
                        "favorite references a deleted recipe; cascade delete did not run"
                    );
                    RecipeRef::Missing(favorite.recipe_id)
                }
            };

            FavoriteEntry {
                id: favorite.id,
                user_id: favorite.user_id,
                recipe_id,
                created_at: favorite.created_at,
            }
        })
        .collect())
}

pub async fn remove_favorite(store: &dyn Store, user: Uuid, recipe: Uuid) -> Result<(), AppError> {
    if store.delete_favorite(user, recipe).await? == 0 {
        return Err(AppError::NotFound("Favorite not found".to_string()));
    }

    tracing::info!(user_id = %user, recipe_id = %recipe, "favorite removed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewRecipe;
    use crate::store::MemoryStore;

    async fn seed_recipe(store: &MemoryStore, owner: Uuid) -> Recipe {
        store
            .insert_recipe(NewRecipe {
                user_id: owner,
                name: "Dal".to_string(),
                ingredients: vec!["lentils".to_string(), "cumin".to_string()],
                time_to_cook: "40 min".to_string(),
                steps: vec!["Simmer".to_string()],
                image: Some("/photos/dal".to_string()),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_state() {
        let store = MemoryStore::new();
        let recipe = seed_recipe(&store, Uuid::new_v4()).await;
        let user = Uuid::new_v4();

        let first = toggle_favorite(&store, user, recipe.id).await.unwrap();
        let ToggleOutcome::Added(favorite) = first else {
            panic!("expected Added, got {:?}", first);
        };
        assert_eq!(favorite.user_id, user);
        assert_eq!(favorite.recipe_id, recipe.id);
        assert_eq!(store.favorite_count(), 1);

        let second = toggle_favorite(&store, user, recipe.id).await.unwrap();
        assert_eq!(second, ToggleOutcome::Removed);
        assert_eq!(store.favorite_count(), 0);
    }

    #[tokio::test]
    async fn test_toggle_never_exceeds_one_row() {
        let store = MemoryStore::new();
        let recipe = seed_recipe(&store, Uuid::new_v4()).await;
        let user = Uuid::new_v4();

        for i in 1..=7 {
            toggle_favorite(&store, user, recipe.id).await.unwrap();
            assert_eq!(store.favorite_count(), i % 2);
        }
    }

    #[tokio::test]
    async fn test_toggle_is_per_user() {
        let store = MemoryStore::new();
        let recipe = seed_recipe(&store, Uuid::new_v4()).await;
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());

        toggle_favorite(&store, alice, recipe.id).await.unwrap();
        let outcome = toggle_favorite(&store, bob, recipe.id).await.unwrap();

        assert!(matches!(outcome, ToggleOutcome::Added(_)));
        assert_eq!(store.favorite_count(), 2);
    }

    #[tokio::test]
    async fn test_toggle_missing_recipe() {
        let store = MemoryStore::new();
        let err = toggle_favorite(&store, Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(store.favorite_count(), 0);
    }

    #[tokio::test]
    async fn test_list_resolves_recipes() {
        let store = MemoryStore::new();
        let recipe = seed_recipe(&store, Uuid::new_v4()).await;
        let user = Uuid::new_v4();
        toggle_favorite(&store, user, recipe.id).await.unwrap();

        let entries = list_favorites(&store, user).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].recipe_id, RecipeRef::Resolved(recipe.clone()));

        let json = serde_json::to_value(&entries[0]).unwrap();
        assert_eq!(json["recipeId"]["name"], "Dal");
        assert_eq!(json["userId"], user.to_string());

        assert!(list_favorites(&store, Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_reports_orphan_as_bare_id() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let gone = Uuid::new_v4();
        store.insert_orphan_favorite(user, gone);

        let entries = list_favorites(&store, user).await.unwrap();
        assert_eq!(entries[0].recipe_id, RecipeRef::Missing(gone));

        let json = serde_json::to_value(&entries[0]).unwrap();
        assert_eq!(json["recipeId"], gone.to_string());
    }

    #[tokio::test]
    async fn test_remove() {
        let store = MemoryStore::new();
        let recipe = seed_recipe(&store, Uuid::new_v4()).await;
        let user = Uuid::new_v4();

        let err = remove_favorite(&store, user, recipe.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Favorite not found"));

        toggle_favorite(&store, user, recipe.id).await.unwrap();
        remove_favorite(&store, user, recipe.id).await.unwrap();
        assert_eq!(store.favorite_count(), 0);
    }
}
