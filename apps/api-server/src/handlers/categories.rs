//! Category handlers.

use actix_web::{HttpResponse, web};

use quill_core::domain::{CategoryPatch, CreateCategory};
use quill_shared::dto::{CreateCategoryRequest, UpdateCategoryRequest};
use quill_shared::{ApiResponse, DeleteResponse};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/categories
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state.services.categories.list().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(categories)))
}

/// GET /api/categories/{id}
pub async fn get_by_id(state: web::Data<AppState>, id: web::Path<i32>) -> AppResult<HttpResponse> {
    let category = state.services.categories.get_by_id(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(category)))
}

/// GET /api/categories/slug/{slug}
pub async fn get_by_slug(
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> AppResult<HttpResponse> {
    let category = state.services.categories.get_by_slug(&slug).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(category)))
}

/// POST /api/categories
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreateCategoryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let category = state
        .services
        .categories
        .create(CreateCategory {
            name: req.name,
            description: req.description,
        })
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(category)))
}

/// PATCH /api/categories/{id}
pub async fn update(
    state: web::Data<AppState>,
    id: web::Path<i32>,
    body: web::Json<UpdateCategoryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let category = state
        .services
        .categories
        .update(
            id.into_inner(),
            CategoryPatch {
                name: req.name,
                description: req.description,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(category)))
}

/// DELETE /api/categories/{id}
pub async fn delete(state: web::Data<AppState>, id: web::Path<i32>) -> AppResult<HttpResponse> {
    let id = state.services.categories.delete(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(DeleteResponse::deleted(id)))
}
