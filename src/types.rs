use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub const CAFE_ADDED: &str = "Successfully added the new cafe.";
pub const CAFE_UPDATED: &str = "Successfully Updated.";
pub const CAFE_DELETED: &str = "Cafe Deleted Successfully";
pub const LOCATION_NOT_FOUND: &str = "Cafe at provided location hasn't been found. ";
pub const CAFE_NOT_FOUND: &str = "Cafe is not presented yet in our database do you wanna add it? \
    if yes please make sure to use proper URL. ";
pub const DELETE_REJECTED: &str =
    "Please make sure that API key is correct as well as id of a cafe you asked to delete";
pub const NO_CAFES: &str = "There are no cafes in the database yet.";

/// Errors that abort startup before the server binds.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to initialize connection pool: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("Failed to prepare database schema: {0}")]
    Schema(#[from] diesel::result::Error),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Store faults raised while serving a request. Never retried, always a 500.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Database worker unavailable: {0}")]
    Mailbox(#[from] actix::MailboxError),
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        tracing::error!(error = %self, "request failed");
        HttpResponse::InternalServerError().json(json!({ "error": "Internal server error" }))
    }
}
