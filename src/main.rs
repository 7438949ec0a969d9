pub mod alumnos;
pub mod auth;
pub mod config;
pub mod db;
pub mod err;
pub mod instituciones;
pub mod models;
pub mod pass;
pub mod profesores;
pub mod token;

use axum::handler::Handler;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;

use crate::auth::require_token;
use crate::config::Config;
use crate::err::Error;
use crate::token::TokenKeys;

pub type Payload<T> = Result<Json<T>, Error>;
pub type Created<T> = Result<(StatusCode, Json<T>), Error>;

pub fn proceeds<V>(value: V) -> Payload<V>
where
    V: Serialize,
{
    Ok(Json(value))
}

pub fn creates<V>(value: V) -> Created<V>
where
    V: Serialize,
{
    Ok((StatusCode::CREATED, Json(value)))
}

pub fn breaks<V>(err: Error) -> Result<V, Error> {
    Err(err)
}

/// Reads stay open; every write below goes through `require_token`.
fn router() -> Router {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route(
            "/alumnos",
            get(alumnos::get_alumnos)
                .merge(post(alumnos::create_alumno).route_layer(from_fn(require_token))),
        )
        .route(
            "/alumnos/:id",
            get(alumnos::get_alumno).merge(
                put(alumnos::update_alumno)
                    .delete(alumnos::delete_alumno)
                    .route_layer(from_fn(require_token)),
            ),
        )
        .route(
            "/profesores",
            get(profesores::get_profesores)
                .merge(post(profesores::create_profesor).route_layer(from_fn(require_token))),
        )
        .route(
            "/profesores/:id",
            get(profesores::get_profesor).merge(
                put(profesores::update_profesor)
                    .delete(profesores::delete_profesor)
                    .route_layer(from_fn(require_token)),
            ),
        )
        .route(
            "/instituciones",
            get(instituciones::get_instituciones).merge(
                post(instituciones::create_institucion).route_layer(from_fn(require_token)),
            ),
        )
        .route(
            "/instituciones/:id",
            get(instituciones::get_institucion).merge(
                put(instituciones::update_institucion)
                    .delete(instituciones::delete_institucion)
                    .route_layer(from_fn(require_token)),
            ),
        )
        .fallback(err::handler404.into_service())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    db::prepare_db(&pool).await?;

    let keys = TokenKeys::new(&config.jwt_secret, config.token_ttl_secs);
    let app = router().layer(Extension(pool)).layer(Extension(keys));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    log::info!("Starting Escuela HTTP Server on http://{}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
