use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password: String,
    pub salt: String,
}

/// Public view of a user, safe to return to clients.
#[derive(Debug, Serialize)]
pub struct Profile {
    pub id: i32,
    pub username: String,
    pub email: String,
}

impl From<User> for Profile {
    fn from(user: User) -> Self {
        Profile {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}
