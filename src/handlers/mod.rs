pub mod survey;
pub mod user;

use actix_web::http::StatusCode;
use actix_web::web::{Data, Json};
use actix_web::HttpResponse;
use hex::ToHex;
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::{query_as, query_scalar, PgPool};

use crate::error::Error;
use crate::models::user::{Profile, User};
use crate::token::Jwt;

fn hash_password(pass: &str, slt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pass);
    hasher.update(slt);
    hasher.finalize().encode_hex()
}

const SALT_CHARS: &[u8] = b"1234567890abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

fn random_salt() -> String {
    let mut slt = String::new();
    let mut rng = thread_rng();
    for _ in 0..32 {
        let i = rng.gen_range(0..SALT_CHARS.len());
        slt.push(SALT_CHARS[i] as char);
    }
    slt
}

#[derive(Debug, Serialize)]
pub struct Authenticated {
    pub token: String,
    pub user: Profile,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    username: String,
    email: String,
    password: String,
}

pub async fn register(Json(Registration { username, email, password }): Json<Registration>, db: Data<PgPool>, jwt: Data<Jwt>) -> Result<HttpResponse, Error> {
    if username.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
        return Err(Error::Validation("username, email and password are required".into()));
    }
    let mut tx = db.begin().await?;
    let taken: bool = query_scalar("SELECT EXISTS(SELECT id FROM users WHERE email = $1)")
        .bind(&email)
        .fetch_one(&mut tx)
        .await?;
    if taken {
        return Err(Error::Validation("email address already in use".into()));
    }
    let slt = random_salt();
    let (id,): (i32,) = query_as("INSERT INTO users (username, email, password, salt) VALUES ($1, $2, $3, $4) RETURNING id")
        .bind(&username)
        .bind(&email)
        .bind(hash_password(&password, &slt))
        .bind(slt)
        .fetch_one(&mut tx)
        .await?;
    tx.commit().await?;
    let token = jwt.generate(id)?;
    Ok(HttpResponse::build(StatusCode::CREATED).json(Authenticated {
        token,
        user: Profile { id, username, email },
    }))
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    email: String,
    password: String,
}

pub async fn login(Json(Credentials { email, password }): Json<Credentials>, db: Data<PgPool>, jwt: Data<Jwt>) -> Result<Json<Authenticated>, Error> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(Error::Validation("email and password are required".into()));
    }
    let mut conn = db.acquire().await?;
    let user: User = query_as("SELECT id, username, email, password, salt FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&mut conn)
        .await?
        .ok_or(Error::Unauthorized("invalid credentials"))?;
    if hash_password(&password, &user.salt) != user.password {
        return Err(Error::Unauthorized("invalid credentials"));
    }
    let token = jwt.generate(user.id)?;
    Ok(Json(Authenticated {
        token,
        user: user.into(),
    }))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_hash_password_is_deterministic() {
        assert_eq!(hash_password("hunter2", "salt"), hash_password("hunter2", "salt"));
    }

    #[test]
    fn test_hash_password_depends_on_salt() {
        assert_ne!(hash_password("hunter2", "salt a"), hash_password("hunter2", "salt b"));
    }

    #[test]
    fn test_random_salt_shape() {
        let slt = random_salt();
        assert_eq!(slt.len(), 32);
        assert!(slt.bytes().all(|b| SALT_CHARS.contains(&b)));
    }
}
