//! PostgreSQL-backed store.
//!
//! Diesel is synchronous, so every query runs on the blocking thread pool with
//! its own pooled connection.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

use super::{
    FavoriteInsert, FavoriteRepository, MediaStore, RecipeRepository, StoreError, UniqueField,
    UserRepository,
};
use crate::db::DbPool;
use crate::models::{
    Favorite, NewFavorite, NewPhoto, NewRecipe, NewUser, Photo, Recipe, RecipeChanges, User,
};
use crate::photos::photo_id_from_path;
use crate::schema::{favorites, photos, recipes, users};

const FAVORITE_INSERT_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn with_conn<T, F>(&self, op: &'static str, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> Result<T, StoreError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let _span = tracing::debug_span!("db.query", op).entered();
            let mut conn = pool.get().map_err(|e| {
                tracing::error!("Failed to get database connection: {}", e);
                StoreError::Backend("Database connection failed".to_string())
            })?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Backend(format!("{} task failed: {}", op, e)))?
    }
}

impl From<DieselError> for StoreError {
    fn from(err: DieselError) -> Self {
        StoreError::Backend(err.to_string())
    }
}

fn map_user_insert_error(err: DieselError) -> StoreError {
    match &err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            match info.constraint_name() {
                Some("users_email_key") => StoreError::Duplicate(UniqueField::Email),
                Some("users_username_key") => StoreError::Duplicate(UniqueField::Username),
                _ => err.into(),
            }
        }
        _ => err.into(),
    }
}

/// Maps the recipe foreign key firing (the recipe was deleted after the
/// existence check) to `MissingRecipe`.
fn map_favorite_insert_error(err: DieselError, recipe: Uuid) -> StoreError {
    match &err {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info)
            if info.constraint_name() == Some("favorites_recipe_id_fkey") =>
        {
            StoreError::MissingRecipe(recipe)
        }
        _ => err.into(),
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        self.with_conn("insert_user", move |conn| {
            diesel::insert_into(users::table)
                .values(&user)
                .returning(User::as_returning())
                .get_result(conn)
                .map_err(map_user_insert_error)
        })
        .await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let email = email.to_string();
        self.with_conn("find_user_by_email", move |conn| {
            Ok(users::table
                .filter(users::email.eq(&email))
                .select(User::as_select())
                .first(conn)
                .optional()?)
        })
        .await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let username = username.to_string();
        self.with_conn("find_user_by_username", move |conn| {
            Ok(users::table
                .filter(users::username.eq(&username))
                .select(User::as_select())
                .first(conn)
                .optional()?)
        })
        .await
    }
}

#[async_trait]
impl RecipeRepository for PgStore {
    async fn insert_recipe(&self, recipe: NewRecipe) -> Result<Recipe, StoreError> {
        self.with_conn("insert_recipe", move |conn| {
            Ok(diesel::insert_into(recipes::table)
                .values(&recipe)
                .returning(Recipe::as_returning())
                .get_result(conn)?)
        })
        .await
    }

    async fn list_recipes(&self) -> Result<Vec<Recipe>, StoreError> {
        self.with_conn("list_recipes", |conn| {
            Ok(recipes::table
                .order((recipes::created_at.asc(), recipes::id.asc()))
                .select(Recipe::as_select())
                .load(conn)?)
        })
        .await
    }

    async fn get_recipe(&self, id: Uuid) -> Result<Option<Recipe>, StoreError> {
        self.with_conn("get_recipe", move |conn| {
            Ok(recipes::table
                .find(id)
                .select(Recipe::as_select())
                .first(conn)
                .optional()?)
        })
        .await
    }

    async fn list_recipes_by_owner(&self, owner: Uuid) -> Result<Vec<Recipe>, StoreError> {
        self.with_conn("list_recipes_by_owner", move |conn| {
            Ok(recipes::table
                .filter(recipes::user_id.eq(owner))
                .order((recipes::created_at.asc(), recipes::id.asc()))
                .select(Recipe::as_select())
                .load(conn)?)
        })
        .await
    }

    async fn update_recipe(
        &self,
        id: Uuid,
        changes: RecipeChanges,
    ) -> Result<Option<Recipe>, StoreError> {
        self.with_conn("update_recipe", move |conn| {
            // Diesel rejects an empty changeset
            if changes.is_empty() {
                return Ok(recipes::table
                    .find(id)
                    .select(Recipe::as_select())
                    .first(conn)
                    .optional()?);
            }

            Ok(diesel::update(recipes::table.find(id))
                .set(&changes)
                .returning(Recipe::as_returning())
                .get_result(conn)
                .optional()?)
        })
        .await
    }

    async fn delete_recipe_cascade(&self, id: Uuid) -> Result<Option<usize>, StoreError> {
        self.with_conn("delete_recipe_cascade", move |conn| {
            let outcome = conn.transaction::<_, DieselError, _>(|conn| {
                // Favorites go first so no favorite ever points at a missing recipe
                let removed =
                    diesel::delete(favorites::table.filter(favorites::recipe_id.eq(id)))
                        .execute(conn)?;

                // NotFound here rolls back: nothing was there to delete
                let image: Option<String> = diesel::delete(recipes::table.find(id))
                    .returning(recipes::image)
                    .get_result(conn)?;

                if let Some(photo_id) = image.as_deref().and_then(photo_id_from_path) {
                    diesel::delete(photos::table.find(photo_id)).execute(conn)?;
                }

                Ok(removed)
            });

            match outcome {
                Ok(removed) => Ok(Some(removed)),
                Err(DieselError::NotFound) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
    }
}

#[async_trait]
impl FavoriteRepository for PgStore {
    async fn insert_favorite(
        &self,
        user: Uuid,
        recipe: Uuid,
    ) -> Result<FavoriteInsert, StoreError> {
        self.with_conn("insert_favorite", move |conn| {
            // A concurrent toggle can delete the conflicting row before it is read back
            for _ in 0..FAVORITE_INSERT_ATTEMPTS {
                let created: Option<Favorite> = diesel::insert_into(favorites::table)
                    .values(&NewFavorite {
                        user_id: user,
                        recipe_id: recipe,
                    })
                    .on_conflict((favorites::user_id, favorites::recipe_id))
                    .do_nothing()
                    .returning(Favorite::as_returning())
                    .get_result(conn)
                    .optional()
                    .map_err(|e| map_favorite_insert_error(e, recipe))?;

                if let Some(favorite) = created {
                    return Ok(FavoriteInsert::Created(favorite));
                }

                let existing = favorites::table
                    .filter(favorites::user_id.eq(user))
                    .filter(favorites::recipe_id.eq(recipe))
                    .select(Favorite::as_select())
                    .first(conn)
                    .optional()?;
                if let Some(favorite) = existing {
                    return Ok(FavoriteInsert::AlreadyPresent(favorite));
                }
            }

            Err(StoreError::Backend(format!(
                "favorite for recipe {} kept changing during insert",
                recipe
            )))
        })
        .await
    }

    async fn delete_favorite(&self, user: Uuid, recipe: Uuid) -> Result<usize, StoreError> {
        self.with_conn("delete_favorite", move |conn| {
            Ok(diesel::delete(
                favorites::table
                    .filter(favorites::user_id.eq(user))
                    .filter(favorites::recipe_id.eq(recipe)),
            )
            .execute(conn)?)
        })
        .await
    }

    async fn list_favorites(
        &self,
        user: Uuid,
    ) -> Result<Vec<(Favorite, Option<Recipe>)>, StoreError> {
        self.with_conn("list_favorites", move |conn| {
            Ok(favorites::table
                .left_join(recipes::table)
                .filter(favorites::user_id.eq(user))
                .order((favorites::created_at.asc(), favorites::id.asc()))
                .select((Favorite::as_select(), Option::<Recipe>::as_select()))
                .load(conn)?)
        })
        .await
    }
}

#[async_trait]
impl MediaStore for PgStore {
    async fn insert_photo(&self, photo: NewPhoto) -> Result<Uuid, StoreError> {
        self.with_conn("insert_photo", move |conn| {
            Ok(diesel::insert_into(photos::table)
                .values(&photo)
                .returning(photos::id)
                .get_result(conn)?)
        })
        .await
    }

    async fn delete_photo(&self, id: Uuid) -> Result<bool, StoreError> {
        self.with_conn("delete_photo", move |conn| {
            Ok(diesel::delete(photos::table.find(id)).execute(conn)? > 0)
        })
        .await
    }

    async fn get_photo(&self, id: Uuid) -> Result<Option<Photo>, StoreError> {
        self.with_conn("get_photo", move |conn| {
            Ok(photos::table
                .find(id)
                .select(Photo::as_select())
                .first(conn)
                .optional()?)
        })
        .await
    }
}
