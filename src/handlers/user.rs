use actix_web::web::{Data, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{query, query_as, FromRow, PgPool};

use crate::context::UserInfo;
use crate::error::Error;
use crate::response::Message;

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    id: i32,
    username: String,
    email: String,
    created_at: DateTime<Utc>,
}

pub async fn me(user_info: UserInfo, db: Data<PgPool>) -> Result<Json<Account>, Error> {
    let mut conn = db.acquire().await?;
    let account: Account = query_as("SELECT id, username, email, created_at FROM users WHERE id = $1")
        .bind(user_info.id)
        .fetch_optional(&mut conn)
        .await?
        .ok_or(Error::NotFound("user"))?;
    Ok(Json(account))
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountUpdate {
    username: Option<String>,
    email: Option<String>,
}

pub async fn update(user_info: UserInfo, Json(AccountUpdate { username, email }): Json<AccountUpdate>, db: Data<PgPool>) -> Result<Json<Account>, Error> {
    let mut conn = db.acquire().await?;
    let account: Account = query_as(
        "UPDATE users
        SET username = COALESCE(NULLIF($1, ''), username),
            email = COALESCE(NULLIF($2, ''), email)
        WHERE id = $3
        RETURNING id, username, email, created_at",
    )
    .bind(username)
    .bind(email)
    .bind(user_info.id)
    .fetch_optional(&mut conn)
    .await?
    .ok_or(Error::NotFound("user"))?;
    Ok(Json(account))
}

pub async fn delete_account(user_info: UserInfo, db: Data<PgPool>) -> Result<Json<Message>, Error> {
    let mut conn = db.acquire().await?;
    query("DELETE FROM users WHERE id = $1")
        .bind(user_info.id)
        .execute(&mut conn)
        .await?;
    Ok(Json(Message::new("user deleted")))
}
