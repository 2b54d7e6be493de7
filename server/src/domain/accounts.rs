use std::collections::BTreeMap;

use super::non_blank;
use crate::auth::{hash_password, verify_password, TokenService};
use crate::error::AppError;
use crate::models::{NewUser, User};
use crate::store::{Store, UniqueField, UserRepository};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A freshly issued token and the account it belongs to.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

pub async fn register(
    store: &dyn Store,
    tokens: &TokenService,
    registration: Registration,
) -> Result<Session, AppError> {
    let username = non_blank(registration.username);
    let email = non_blank(registration.email);
    // Passwords are taken verbatim; only emptiness counts as missing
    let password = registration.password.filter(|p| !p.is_empty());

    let (Some(username), Some(email), Some(password)) = (&username, &email, &password) else {
        let fields = BTreeMap::from([
            ("username".to_string(), username.is_none()),
            ("email".to_string(), email.is_none()),
            ("password".to_string(), password.is_none()),
        ]);
        return Err(AppError::MissingFields {
            message: "All fields are required".to_string(),
            fields,
        });
    };

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidField {
            message: format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
            field: "password",
        });
    }

    // Checked up front to name the colliding field; the unique indexes still
    // catch a race between two registrations.
    if store.find_user_by_email(email).await?.is_some() {
        return Err(UniqueField::Email.into());
    }
    if store.find_user_by_username(username).await?.is_some() {
        return Err(UniqueField::Username.into());
    }

    let password = password.clone();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("password hashing task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

    let user = store
        .insert_user(NewUser {
            username: username.clone(),
            email: email.clone(),
            password_hash,
        })
        .await?;

    tracing::info!(user_id = %user.id, "user registered");
    let token = tokens.issue(user.id)?;
    Ok(Session { token, user })
}

pub async fn login(
    store: &dyn Store,
    tokens: &TokenService,
    email: Option<String>,
    password: Option<String>,
) -> Result<Session, AppError> {
    let invalid = || AppError::Validation("Invalid credentials".to_string());

    let (Some(email), Some(password)) = (non_blank(email), password) else {
        return Err(invalid());
    };

    let Some(user) = store.find_user_by_email(&email).await? else {
        return Err(invalid());
    };

    let hash = user.password_hash.clone();
    let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("password check task failed: {}", e)))?;
    if !matches {
        tracing::debug!(user_id = %user.id, "login rejected");
        return Err(invalid());
    }

    let token = tokens.issue(user.id)?;
    Ok(Session { token, user })
}
