#[macro_use]
extern crate diesel;
#[macro_use]
extern crate log;

pub mod database;
pub mod error;
pub mod models;
pub mod precommit;
pub mod routes;
pub mod schema;
pub mod settings;

use actix_web::web;
use crate::database::{build_connection_pool, init_schema, DbPool};
use crate::error::{DatabaseError, RequestError};
use crate::settings::Settings;

pub struct AppState {
    pub connection_pool: DbPool,
    pub settings: Settings,
}

/// Builds the connection pool and makes sure the ratings table exists.
pub fn build_app_state(settings: Settings) -> Result<web::Data<AppState>, DatabaseError> {
    let connection_pool = build_connection_pool(&settings.database)?;
    let mut connection = connection_pool
        .get()
        .map_err(|_| DatabaseError::ConnectionError)?;
    init_schema(&mut connection).map_err(DatabaseError::DieselOperationError)?;
    debug!("Schema ready in {}", &settings.database.url);
    Ok(web::Data::new(AppState {
        connection_pool,
        settings,
    }))
}

/// Registers state, body limits and all routes. Shared by the server and the tests.
pub fn configure(cfg: &mut web::ServiceConfig, state: &web::Data<AppState>) {
    let json_config = web::JsonConfig::default()
        .limit(state.settings.server.maxpayload)
        .error_handler(|err, _req| RequestError::MalformedBody(err.to_string()).into());

    cfg.app_data(state.clone())
        .app_data(json_config)
        .service(routes::assets::favicon)
        .service(routes::ratings::list_ratings)
        .service(routes::ratings::post_rating);
}
