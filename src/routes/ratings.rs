use actix_web::{HttpResponse, Error, web, get, post, mime};
use actix_web::http::header::Accept;
use serde_json::Value;
use crate::AppState;
use crate::database::{find_ratings, insert_rating};
use crate::error::{DatabaseError, RequestError};
use crate::models::{ListQuery, PostResponse, Rating, RatingPayload};
use crate::routes::page::render_board;

//TODO anyone who knows a secret can post to its board, add rate limiting per client

#[get("/{secret:[A-Za-z0-9]+}")]
pub async fn list_ratings(data: web::Data<AppState>, secret: web::Path<String>, query: web::Query<ListQuery>,
                          accept: Option<web::Header<Accept>>) -> Result<HttpResponse, Error> {
    let order_by = query.order()?;
    let secret = secret.into_inner();
    let wants_html = accept.map_or(false, |accept| accept.preference() == mime::TEXT_HTML);
    debug!("Listing board {} ordered by {:?}", &secret, order_by);

    let mut connection = data.connection_pool
        .get()
        .map_err(|_| DatabaseError::ConnectionError)?;

    //web::block() is used to offload the blocking DB operations without blocking the server thread.
    let board = secret.clone();
    let ratings: Vec<Rating> = web::block(move || find_ratings(&mut connection, &board, order_by))
        .await
        .map_err(|_| DatabaseError::ExecutionError)?
        .map_err(DatabaseError::DieselOperationError)?;

    if wants_html {
        Ok(HttpResponse::Ok()
            .content_type(mime::TEXT_HTML_UTF_8)
            .body(render_board(&secret, &ratings)))
    } else {
        Ok(HttpResponse::Ok().json(ratings))
    }
}

#[post("/{secret:[A-Za-z0-9]+}")]
pub async fn post_rating(data: web::Data<AppState>, secret: web::Path<String>, payload: web::Json<Value>)
                         -> Result<HttpResponse, Error> {
    let body = payload.into_inner();
    debug!("Posting to board {}: {}", secret.as_str(), &body);

    let rating = serde_json::from_value::<RatingPayload>(body.clone())
        .map_err(|err| RequestError::MalformedBody(err.to_string()))?
        .validate(&secret)?;

    let mut connection = data.connection_pool
        .get()
        .map_err(|_| DatabaseError::ConnectionError)?;

    web::block(move || insert_rating(&mut connection, &rating))
        .await
        .map_err(|_| DatabaseError::ExecutionError)?
        .map_err(DatabaseError::DieselOperationError)?;

    Ok(HttpResponse::Ok().json(PostResponse {
        success: true,
        data: body,
    }))
}
