use uuid::Uuid;

use super::non_blank;
use crate::error::AppError;
use crate::models::{NewPhoto, NewRecipe, Recipe, RecipeChanges};
use crate::photos::processing::process_image;
use crate::photos::{photo_id_from_path, photo_path};
use crate::store::{MediaStore, RecipeRepository, Store};

/// Recipe fields as submitted by a form. Every field is optional here; create
/// and update decide which ones are required.
#[derive(Debug, Clone, Default)]
pub struct RecipeForm {
    pub name: Option<String>,
    /// Comma-separated ingredient list.
    pub ingredients: Option<String>,
    pub time_to_cook: Option<String>,
    /// Period-separated step list.
    pub steps: Option<String>,
    pub image: Option<Vec<u8>>,
}

/// `"eggs, milk, flour"` becomes `["eggs", "milk", "flour"]`.
pub fn parse_ingredients(raw: &str) -> Vec<String> {
    raw.split(',').map(|item| item.trim().to_string()).collect()
}

/// Split on periods, trimming each step and dropping empty segments.
pub fn parse_steps(raw: &str) -> Vec<String> {
    raw.split('.')
        .map(str::trim)
        .filter(|step| !step.is_empty())
        .map(String::from)
        .collect()
}

/// Validate an uploaded image, store it, and return its reference.
async fn store_image(store: &dyn Store, owner: Uuid, data: Vec<u8>) -> Result<String, AppError> {
    let (data, processed) = tokio::task::spawn_blocking(move || {
        let processed = process_image(&data);
        (data, processed)
    })
    .await
    .map_err(|e| AppError::Internal(format!("image processing task failed: {}", e)))?;

    let processed = processed.map_err(AppError::Validation)?;

    let id = store
        .insert_photo(NewPhoto {
            user_id: owner,
            content_type: processed.content_type,
            data,
            thumbnail: processed.thumbnail,
        })
        .await?;

    Ok(photo_path(id))
}

/// Delete a photo no recipe refers to any more. A failure only leaks storage,
/// so it is logged rather than returned.
async fn discard_photo(store: &dyn Store, image: Option<&str>) {
    let Some(photo_id) = image.and_then(photo_id_from_path) else {
        return;
    };

    match store.delete_photo(photo_id).await {
        Ok(true) => tracing::debug!(photo_id = %photo_id, "photo discarded"),
        Ok(false) => {}
        Err(e) => tracing::warn!(photo_id = %photo_id, "Failed to delete photo: {}", e),
    }
}

pub async fn create_recipe(
    store: &dyn Store,
    owner: Uuid,
    form: RecipeForm,
) -> Result<Recipe, AppError> {
    let name = non_blank(form.name);
    let ingredients = non_blank(form.ingredients);
    let time_to_cook = non_blank(form.time_to_cook);
    let steps = non_blank(form.steps);
    let image = form.image.filter(|data| !data.is_empty());

    let (Some(name), Some(ingredients), Some(time_to_cook), Some(steps), Some(image)) =
        (name, ingredients, time_to_cook, steps, image)
    else {
        return Err(AppError::Validation("Missing required fields".to_string()));
    };

    // Text is validated first so a rejected form never leaves a stray photo behind
    let image = store_image(store, owner, image).await?;

    let inserted = store
        .insert_recipe(NewRecipe {
            user_id: owner,
            name,
            ingredients: parse_ingredients(&ingredients),
            time_to_cook,
            steps: parse_steps(&steps),
            image: Some(image.clone()),
        })
        .await;
    let recipe = match inserted {
        Ok(recipe) => recipe,
        Err(e) => {
            discard_photo(store, Some(image.as_str())).await;
            return Err(e.into());
        }
    };

    tracing::info!(recipe_id = %recipe.id, user_id = %owner, "recipe created");
    Ok(recipe)
}

pub async fn list_recipes(store: &dyn Store, query: Option<&str>) -> Result<Vec<Recipe>, AppError> {
    let recipes = store.list_recipes().await?;

    let Some(needle) = query.map(str::trim).filter(|q| !q.is_empty()) else {
        return Ok(recipes);
    };
    let needle = needle.to_lowercase();

    Ok(recipes
        .into_iter()
        .filter(|r| r.name.to_lowercase().contains(&needle))
        .collect())
}

pub async fn get_recipe(store: &dyn Store, id: Uuid) -> Result<Recipe, AppError> {
    store
        .get_recipe(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe not found".to_string()))
}

pub async fn list_owned_recipes(store: &dyn Store, owner: Uuid) -> Result<Vec<Recipe>, AppError> {
    Ok(store.list_recipes_by_owner(owner).await?)
}

/// Load the recipe and make sure `caller` owns it.
async fn owned_recipe(
    store: &dyn Store,
    caller: Uuid,
    id: Uuid,
    action: &str,
) -> Result<Recipe, AppError> {
    let recipe = get_recipe(store, id).await?;

    if recipe.user_id != caller {
        tracing::warn!(recipe_id = %id, user_id = %caller, "rejected {} by non-owner", action);
        return Err(AppError::Forbidden(format!(
            "Unauthorized to {} this recipe",
            action
        )));
    }

    Ok(recipe)
}

/// Replace the supplied fields. Blank or missing fields keep their current
/// value; the image is only replaced when a new one is uploaded.
pub async fn update_recipe(
    store: &dyn Store,
    caller: Uuid,
    id: Uuid,
    form: RecipeForm,
) -> Result<Recipe, AppError> {
    let current = owned_recipe(store, caller, id, "update").await?;

    let image = match form.image.filter(|data| !data.is_empty()) {
        Some(data) => Some(store_image(store, caller, data).await?),
        None => None,
    };

    let changes = RecipeChanges {
        name: non_blank(form.name),
        ingredients: non_blank(form.ingredients).map(|raw| parse_ingredients(&raw)),
        time_to_cook: non_blank(form.time_to_cook),
        steps: non_blank(form.steps).map(|raw| parse_steps(&raw)),
        image: image.clone(),
    };

    let updated = match store.update_recipe(id, changes).await {
        Ok(Some(updated)) => updated,
        // Deleted between the ownership check and the write
        Ok(None) => {
            discard_photo(store, image.as_deref()).await;
            return Err(AppError::NotFound("Recipe not found".to_string()));
        }
        Err(e) => {
            discard_photo(store, image.as_deref()).await;
            return Err(e.into());
        }
    };

    // The old image is unreachable once the new one is saved
    if image.is_some() {
        discard_photo(store, current.image.as_deref()).await;
    }

    tracing::info!(recipe_id = %id, user_id = %caller, "recipe updated");
    Ok(updated)
}

/// Delete a recipe and every favorite pointing at it. Returns how many
/// favorites were removed.
pub async fn delete_recipe(store: &dyn Store, caller: Uuid, id: Uuid) -> Result<usize, AppError> {
    owned_recipe(store, caller, id, "delete").await?;

    let removed = store
        .delete_recipe_cascade(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe not found".to_string()))?;

    tracing::info!(
        recipe_id = %id,
        user_id = %caller,
        favorites_removed = removed,
        "recipe deleted"
    );
    Ok(removed)
}
