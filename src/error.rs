use derive_more::Display;
use actix_web::{ResponseError, HttpResponse};
use actix_web::http::StatusCode;

#[derive(Debug, Display)]
pub enum DatabaseError {
    #[display(fmt = "Could not acquire data base connection from pool")]
    ConnectionError,
    #[display(fmt = "Encountered the following Diesel operation error: {}", _0)]
    DieselOperationError(diesel::result::Error),
    #[display(fmt = "Problem with Actix threadpool")]
    ExecutionError,
    #[display(fmt = "Could not create the data base connection pool: {}", _0)]
    PoolInitializationError(String),
}

impl ResponseError for DatabaseError {
    fn error_response(&self) -> HttpResponse {
        error!("{}", self);
        HttpResponse::InternalServerError().finish()
    }
}

/// Problems with what the client sent. The message is returned as the body.
#[derive(Debug, Display, PartialEq)]
pub enum RequestError {
    #[display(fmt = "Cannot order by '{}', expected one of: who, url, mark, cats, desc", _0)]
    UnknownOrderColumn(String),
    #[display(fmt = "Field '{}' is missing or empty", _0)]
    MissingField(&'static str),
    #[display(fmt = "Field 'mark' must be an integer, got {}", _0)]
    InvalidMark(String),
    #[display(fmt = "Secret '{}' may only contain ASCII letters and digits", _0)]
    InvalidSecret(String),
    #[display(fmt = "Malformed request body: {}", _0)]
    MalformedBody(String),
}

impl ResponseError for RequestError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        debug!("Rejected request: {}", self);
        HttpResponse::BadRequest().body(self.to_string())
    }
}

#[derive(Debug, Display)]
pub enum ConfigurationError {
    #[display(fmt = "Error while constructing settings from file and environment: {}", _0)]
    SettingsInitializationError(String)
}

impl std::error::Error for ConfigurationError {}
