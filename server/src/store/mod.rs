//! Storage abstraction for users, recipes, favorites and photos.
//!
//! Handlers and services only see these traits. `PgStore` backs them with
//! PostgreSQL; `MemoryStore` keeps everything in process for tests and
//! database-less runs.

mod memory;
mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Favorite, NewPhoto, NewRecipe, NewUser, Photo, Recipe, RecipeChanges, User};

/// A user column that must be unique across accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
}

impl UniqueField {
    pub fn as_str(&self) -> &'static str {
        match self {
            UniqueField::Username => "username",
            UniqueField::Email => "email",
        }
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} already in use")]
    Duplicate(UniqueField),

    /// A favorite named a recipe that does not exist (or was just deleted).
    #[error("recipe {0} does not exist")]
    MissingRecipe(Uuid),

    #[error("Storage backend failure: {0}")]
    Backend(String),
}

/// Result of inserting a favorite that may already exist.
#[derive(Debug, Clone, PartialEq)]
pub enum FavoriteInsert {
    Created(Favorite),
    /// Another request created the pair first; the surviving row is returned.
    AlreadyPresent(Favorite),
}

impl FavoriteInsert {
    pub fn into_favorite(self) -> Favorite {
        match self {
            FavoriteInsert::Created(f) | FavoriteInsert::AlreadyPresent(f) => f,
        }
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. Fails with `Duplicate` naming the colliding column.
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
}

#[async_trait]
pub trait RecipeRepository: Send + Sync {
    async fn insert_recipe(&self, recipe: NewRecipe) -> Result<Recipe, StoreError>;
    /// All recipes in creation order.
    async fn list_recipes(&self) -> Result<Vec<Recipe>, StoreError>;
    async fn get_recipe(&self, id: Uuid) -> Result<Option<Recipe>, StoreError>;
    async fn list_recipes_by_owner(&self, owner: Uuid) -> Result<Vec<Recipe>, StoreError>;
    /// Apply `changes` and return the updated row, or `None` if the recipe is gone.
    async fn update_recipe(
        &self,
        id: Uuid,
        changes: RecipeChanges,
    ) -> Result<Option<Recipe>, StoreError>;
    /// Delete every favorite referencing the recipe, then the recipe and its
    /// stored photo, as one unit.
    ///
    /// Returns the number of favorites removed, or `None` if the recipe did not exist.
    async fn delete_recipe_cascade(&self, id: Uuid) -> Result<Option<usize>, StoreError>;
}

#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Insert the (user, recipe) pair unless it already exists. Fails with
    /// `MissingRecipe` if the recipe is gone.
    async fn insert_favorite(&self, user: Uuid, recipe: Uuid)
        -> Result<FavoriteInsert, StoreError>;
    /// Delete the (user, recipe) pair, returning how many rows were removed.
    async fn delete_favorite(&self, user: Uuid, recipe: Uuid) -> Result<usize, StoreError>;
    /// The user's favorites with each recipe resolved, oldest first.
    ///
    /// The recipe is `None` only if a favorite outlived its recipe.
    async fn list_favorites(
        &self,
        user: Uuid,
    ) -> Result<Vec<(Favorite, Option<Recipe>)>, StoreError>;
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn insert_photo(&self, photo: NewPhoto) -> Result<Uuid, StoreError>;
    async fn get_photo(&self, id: Uuid) -> Result<Option<Photo>, StoreError>;
    /// Returns whether a photo was removed.
    async fn delete_photo(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Everything the API needs from a storage backend.
pub trait Store: UserRepository + RecipeRepository + FavoriteRepository + MediaStore {}

impl<T> Store for T where T: UserRepository + RecipeRepository + FavoriteRepository + MediaStore {}
