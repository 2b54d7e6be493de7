//! In-process store used by tests and by `STORAGE=memory` runs.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{
    FavoriteInsert, FavoriteRepository, MediaStore, RecipeRepository, StoreError, UniqueField,
    UserRepository,
};
use crate::models::{Favorite, NewPhoto, NewRecipe, NewUser, Photo, Recipe, RecipeChanges, User};
use crate::photos::photo_id_from_path;

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    recipes: Vec<Recipe>,
    favorites: Vec<Favorite>,
    photos: HashMap<Uuid, Photo>,
}

/// All tables live behind a single lock, so multi-table writes such as the
/// recipe cascade are atomic to every reader.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
    }

    #[cfg(test)]
    pub fn favorite_count(&self) -> usize {
        self.read().map(|t| t.favorites.len()).unwrap_or_default()
    }

    #[cfg(test)]
    pub fn photo_count(&self) -> usize {
        self.read().map(|t| t.photos.len()).unwrap_or_default()
    }

    /// Poison the table lock so every later operation fails.
    #[cfg(test)]
    pub fn poison(&self) {
        std::thread::scope(|s| {
            let _ = s
                .spawn(|| {
                    let _guard = self.tables.write();
                    panic!("poisoning memory store");
                })
                .join();
        });
    }

    /// Plant a favorite without any checks, to simulate a broken cascade.
    #[cfg(test)]
    pub fn insert_orphan_favorite(&self, user: Uuid, recipe: Uuid) {
        if let Ok(mut tables) = self.write() {
            tables.favorites.push(Favorite {
                id: Uuid::new_v4(),
                user_id: user,
                recipe_id: recipe,
                created_at: Utc::now(),
            });
        }
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.write()?;

        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate(UniqueField::Email));
        }
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::Duplicate(UniqueField::Username));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.read()?.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .read()?
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[async_trait]
impl RecipeRepository for MemoryStore {
    async fn insert_recipe(&self, recipe: NewRecipe) -> Result<Recipe, StoreError> {
        let now = Utc::now();
        let recipe = Recipe {
            id: Uuid::new_v4(),
            user_id: recipe.user_id,
            name: recipe.name,
            ingredients: recipe.ingredients,
            time_to_cook: recipe.time_to_cook,
            steps: recipe.steps,
            image: recipe.image,
            created_at: now,
            updated_at: now,
        };
        self.write()?.recipes.push(recipe.clone());
        Ok(recipe)
    }

    async fn list_recipes(&self) -> Result<Vec<Recipe>, StoreError> {
        Ok(self.read()?.recipes.clone())
    }

    async fn get_recipe(&self, id: Uuid) -> Result<Option<Recipe>, StoreError> {
        Ok(self.read()?.recipes.iter().find(|r| r.id == id).cloned())
    }

    async fn list_recipes_by_owner(&self, owner: Uuid) -> Result<Vec<Recipe>, StoreError> {
        Ok(self
            .read()?
            .recipes
            .iter()
            .filter(|r| r.user_id == owner)
            .cloned()
            .collect())
    }

    async fn update_recipe(
        &self,
        id: Uuid,
        changes: RecipeChanges,
    ) -> Result<Option<Recipe>, StoreError> {
        let mut tables = self.write()?;
        let Some(recipe) = tables.recipes.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };

        if changes.is_empty() {
            return Ok(Some(recipe.clone()));
        }
        if let Some(name) = changes.name {
            recipe.name = name;
        }
        if let Some(ingredients) = changes.ingredients {
            recipe.ingredients = ingredients;
        }
        if let Some(time_to_cook) = changes.time_to_cook {
            recipe.time_to_cook = time_to_cook;
        }
        if let Some(steps) = changes.steps {
            recipe.steps = steps;
        }
        if let Some(image) = changes.image {
            recipe.image = Some(image);
        }
        recipe.updated_at = Utc::now();

        Ok(Some(recipe.clone()))
    }

    async fn delete_recipe_cascade(&self, id: Uuid) -> Result<Option<usize>, StoreError> {
        let mut tables = self.write()?;
        if !tables.recipes.iter().any(|r| r.id == id) {
            return Ok(None);
        }

        let before = tables.favorites.len();
        tables.favorites.retain(|f| f.recipe_id != id);
        let removed = before - tables.favorites.len();

        let Some(index) = tables.recipes.iter().position(|r| r.id == id) else {
            return Ok(Some(removed));
        };
        let recipe = tables.recipes.remove(index);
        if let Some(photo_id) = recipe.image.as_deref().and_then(photo_id_from_path) {
            tables.photos.remove(&photo_id);
        }
        Ok(Some(removed))
    }
}

#[async_trait]
impl FavoriteRepository for MemoryStore {
    async fn insert_favorite(
        &self,
        user: Uuid,
        recipe: Uuid,
    ) -> Result<FavoriteInsert, StoreError> {
        let mut tables = self.write()?;

        if let Some(existing) = tables
            .favorites
            .iter()
            .find(|f| f.user_id == user && f.recipe_id == recipe)
        {
            return Ok(FavoriteInsert::AlreadyPresent(existing.clone()));
        }

        // Mirrors the foreign key on favorites.recipe_id
        if !tables.recipes.iter().any(|r| r.id == recipe) {
            return Err(StoreError::MissingRecipe(recipe));
        }

        let favorite = Favorite {
            id: Uuid::new_v4(),
            user_id: user,
            recipe_id: recipe,
            created_at: Utc::now(),
        };
        tables.favorites.push(favorite.clone());
        Ok(FavoriteInsert::Created(favorite))
    }

    async fn delete_favorite(&self, user: Uuid, recipe: Uuid) -> Result<usize, StoreError> {
        let mut tables = self.write()?;
        let before = tables.favorites.len();
        tables
            .favorites
            .retain(|f| !(f.user_id == user && f.recipe_id == recipe));
        Ok(before - tables.favorites.len())
    }

    async fn list_favorites(
        &self,
        user: Uuid,
    ) -> Result<Vec<(Favorite, Option<Recipe>)>, StoreError> {
        let tables = self.read()?;
        Ok(tables
            .favorites
            .iter()
            .filter(|f| f.user_id == user)
            .map(|f| {
                let recipe = tables.recipes.iter().find(|r| r.id == f.recipe_id).cloned();
                (f.clone(), recipe)
            })
            .collect())
    }
}

#[async_trait]
impl MediaStore for MemoryStore {
    async fn insert_photo(&self, photo: NewPhoto) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        self.write()?.photos.insert(
            id,
            Photo {
                id,
                user_id: photo.user_id,
                content_type: photo.content_type,
                data: photo.data,
                thumbnail: photo.thumbnail,
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn get_photo(&self, id: Uuid) -> Result<Option<Photo>, StoreError> {
        Ok(self.read()?.photos.get(&id).cloned())
    }

    async fn delete_photo(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.write()?.photos.remove(&id).is_some())
    }
}
