use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// A recipe as stored and as returned by the API.
///
/// The owner is serialized as `user` to keep the wire shape clients already use.
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Serialize, ToSchema)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub name: String,
    pub ingredients: Vec<String>,
    pub time_to_cook: String,
    pub steps: Vec<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe {
    pub user_id: Uuid,
    pub name: String,
    pub ingredients: Vec<String>,
    pub time_to_cook: String,
    pub steps: Vec<String>,
    pub image: Option<String>,
}

/// Partial replacement of a recipe's editable fields. `None` leaves the column untouched.
#[derive(AsChangeset, Debug, Clone, Default, PartialEq)]
#[diesel(table_name = crate::schema::recipes)]
pub struct RecipeChanges {
    pub name: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub time_to_cook: Option<String>,
    pub steps: Option<Vec<String>>,
    pub image: Option<String>,
}

impl RecipeChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Serialize, ToSchema)]
#[diesel(table_name = crate::schema::favorites)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipe_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::favorites)]
pub struct NewFavorite {
    pub user_id: Uuid,
    pub recipe_id: Uuid,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::photos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct Photo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content_type: String,
    pub data: Vec<u8>,
    pub thumbnail: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::photos)]
pub struct NewPhoto {
    pub user_id: Uuid,
    pub content_type: String,
    pub data: Vec<u8>,
    pub thumbnail: Vec<u8>,
}
