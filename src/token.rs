use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::ops::Add;

use crate::error::Error;

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: i32,
    pub exp: i64,
}

pub struct Jwt {
    secret: Vec<u8>,
}

impl Jwt {
    pub fn new(secret: Vec<u8>) -> Self {
        Self { secret }
    }

    /// Issues a token which expires one day after issuance.
    pub fn generate(&self, user_id: i32) -> Result<String, Error> {
        let claims = Claims {
            user_id,
            exp: chrono::Utc::now().add(chrono::Duration::days(1)).timestamp(),
        };
        let header = Header::new(Algorithm::HS256);
        let key = EncodingKey::from_secret(&self.secret);
        let token = encode(&header, &claims, &key)?;
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, Error> {
        let key = DecodingKey::from_secret(&self.secret);
        let validation = Validation::new(Algorithm::HS256);
        let data = decode(token, &key, &validation)?;
        Ok(data.claims)
    }
}
