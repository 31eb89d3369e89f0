//! HTTP handlers and route configuration.

mod categories;
mod health;
mod posts;
mod uploads;


use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, ResponseError, error, web};

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health::health_check))
                .service(
                    web::scope("/categories")
                        .route("", web::get().to(categories::list))
                        .route("", web::post().to(categories::create))
                        .route("/slug/{slug}", web::get().to(categories::get_by_slug))
                        .route("/{id}", web::get().to(categories::get_by_id))
                        .route("/{id}", web::patch().to(categories::update))
                        .route("/{id}", web::delete().to(categories::delete)),
                )
                .service(
                    web::scope("/posts")
                        .route("", web::get().to(posts::list))
                        .route("", web::post().to(posts::create))
                        .route("/recent", web::get().to(posts::recent))
                        .route("/slug/{slug}", web::get().to(posts::get_by_slug))
                        .route("/{id}", web::get().to(posts::get_by_id))
                        .route("/{id}", web::patch().to(posts::update))
                        .route("/{id}", web::delete().to(posts::delete)),
                )
                .route("/uploads/images", web::post().to(uploads::upload_image)),
        );
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        let response = match &err {
            JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
                AppError::PayloadTooLarge(err.to_string())
            }
            _ => AppError::BadRequest(err.to_string()),
        }
        .error_response();
        error::InternalError::from_response(err, response).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req: &HttpRequest| {
        let response = AppError::BadRequest(err.to_string()).error_response();
        error::InternalError::from_response(err, response).into()
    })
}

/// A malformed path segment (e.g. `/api/posts/abc`) names no resource.
fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, req: &HttpRequest| {
        let response =
            AppError::NotFound(format!("No resource at {}", req.path())).error_response();
        error::InternalError::from_response(err, response).into()
    })
}
