#[macro_use]
extern crate log;

use actix_web::middleware::{Compress, Logger};
use actix_web::{App, HttpServer};
use std::io;
use yong_backend::error::ConfigurationError;
use yong_backend::settings::Settings;
use yong_backend::{build_app_state, configure};

#[actix_web::main]
async fn main() -> io::Result<()> {
    let settings = Settings::init()
        .map_err(|err| ConfigurationError::SettingsInitializationError(err.to_string()))
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

    env_logger::builder().parse_filters(&settings.logging.level).init();
    info!("Yong is starting up in {:?} mode", &settings.server.runmode);

    let bind_address = settings.bind_address();
    let state = build_app_state(settings)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))?;

    info!("Listening on {}", &bind_address);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Compress::default())
            .configure(|cfg| configure(cfg, &state))
    })
        .bind(&bind_address)?
        .run()
        .await
}
