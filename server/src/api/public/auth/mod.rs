pub mod login;
pub mod register;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::accounts::Session;
use crate::models::User;

/// The public view of an account. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

/// Returned by both registration and login.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: UserSummary,
}

impl AuthResponse {
    fn from_session(session: Session, message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            token: session.token,
            user: session.user.into(),
        }
    }
}
