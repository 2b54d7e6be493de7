pub mod processing;

use uuid::Uuid;

const PHOTO_PATH_PREFIX: &str = "/photos/";

/// Public URL of a stored photo, as kept in `recipes.image`.
pub fn photo_path(id: Uuid) -> String {
    format!("{}{}", PHOTO_PATH_PREFIX, id)
}

/// The stored photo a `recipes.image` value points at, if any.
pub fn photo_id_from_path(path: &str) -> Option<Uuid> {
    path.strip_prefix(PHOTO_PATH_PREFIX)
        .and_then(|id| Uuid::parse_str(id).ok())
}
