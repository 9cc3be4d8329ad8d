use actix_web::web::Data;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use std::future::{ready, Ready};

use crate::error::Error;
use crate::token::Jwt;

/// The authenticated caller, resolved from the Authorization header.
#[derive(Debug, Clone)]
pub struct UserInfo {
    pub id: i32,
}

impl FromRequest for UserInfo {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(resolve(req))
    }
}

fn resolve(req: &HttpRequest) -> Result<UserInfo, Error> {
    let header = req.headers().get("Authorization").ok_or(Error::Unauthorized("no token in header"))?;
    let header = header.to_str().map_err(|_| Error::Unauthorized("malformed authorization header"))?;
    let token = header.strip_prefix("Bearer ").unwrap_or(header);
    let jwt = req.app_data::<Data<Jwt>>().ok_or(Error::Config("token verifier not configured"))?;
    let claims = jwt.verify(token).map_err(|_| Error::Unauthorized("invalid or expired token"))?;
    Ok(UserInfo { id: claims.user_id })
}
