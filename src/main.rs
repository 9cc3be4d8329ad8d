mod context;
mod error;
mod handlers;
mod models;
mod response;
mod token;

use actix_web::web::{delete, get, post, put, scope, Data, JsonConfig};
use actix_web::HttpServer;
use sqlx::postgres::PgPoolOptions;

use crate::error::Error;
use crate::token::Jwt;

#[actix_web::main]
async fn main() -> Result<(), std::io::Error> {
    dotenv::dotenv().ok();
    env_logger::init();
    let database_url = dotenv::var("DATABASE_URL").expect("environment variable DATABASE_URL not been set");
    let jwt_secret = dotenv::var("JWT_SECRET").expect("environment variable JWT_SECRET not been set");
    let port: u16 = dotenv::var("PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(5000);
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("failed to connect to database");
    HttpServer::new(move || {
        actix_web::App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(Data::new(pool.clone()))
            .app_data(Data::new(Jwt::new(jwt_secret.as_bytes().to_owned())))
            .app_data(JsonConfig::default().error_handler(|err, _| Error::Validation(err.to_string()).into()))
            .service(
                scope("api")
                    .service(
                        scope("auth")
                            .route("register", post().to(handlers::register))
                            .route("login", post().to(handlers::login))
                            .route("me", get().to(handlers::user::me))
                            .route("update", put().to(handlers::user::update))
                            .route("delete", delete().to(handlers::user::delete_account)),
                    )
                    .service(
                        scope("surveys")
                            .route("", get().to(handlers::survey::list))
                            .route("", post().to(handlers::survey::create))
                            .route("user", get().to(handlers::survey::owned))
                            .route("{survey_id}", get().to(handlers::survey::detail))
                            .route("{survey_id}", put().to(handlers::survey::update))
                            .route("{survey_id}", delete().to(handlers::survey::delete_survey))
                            .route("{survey_id}/respond", post().to(handlers::survey::respond))
                            .route("{survey_id}/results", get().to(handlers::survey::results)),
                    ),
            )
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
