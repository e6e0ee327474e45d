use actix_web::{HttpResponse, Error, web, get};
use actix_web::error::ErrorInternalServerError;
use std::fs;
use crate::AppState;

#[get("/favicon.ico")]
pub async fn favicon(data: web::Data<AppState>) -> Result<HttpResponse, Error> {
    let path = data.settings.server.faviconpath.clone();
    let icon = web::block(move || fs::read(path))
        .await
        .map_err(ErrorInternalServerError)?;
    match icon {
        Ok(bytes) => Ok(HttpResponse::Ok().content_type("image/x-icon").body(bytes)),
        Err(err) => {
            debug!("Cannot serve favicon from {}: {}", &data.settings.server.faviconpath, err);
            Ok(HttpResponse::NotFound().finish())
        }
    }
}
