//! Post handlers.

use actix_web::{HttpResponse, web};

use quill_core::domain::{CreatePost, PostListFilter, PostPatch};
use quill_shared::dto::{CreatePostRequest, ListPostsQuery, RecentPostsQuery, UpdatePostRequest};
use quill_shared::{ApiResponse, DeleteResponse};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts?published=&page=&limit=
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let page = state
        .services
        .posts
        .list(PostListFilter {
            published: query.published,
            page: query.page,
            limit: query.limit,
        })
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(page)))
}

/// GET /api/posts/recent?published=&limit=
pub async fn recent(
    state: web::Data<AppState>,
    query: web::Query<RecentPostsQuery>,
) -> AppResult<HttpResponse> {
    let posts = state
        .services
        .posts
        .recent(query.published, query.limit)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(posts)))
}

/// GET /api/posts/{id}
pub async fn get_by_id(state: web::Data<AppState>, id: web::Path<i32>) -> AppResult<HttpResponse> {
    let post = state.services.posts.get_by_id(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// GET /api/posts/slug/{slug}
pub async fn get_by_slug(
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.services.posts.get_by_slug(&slug).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let post = state.services.posts.create(to_create(body.into_inner())).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(post)))
}

/// PATCH /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    id: web::Path<i32>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .services
        .posts
        .update(id.into_inner(), to_patch(body.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// DELETE /api/posts/{id}
pub async fn delete(state: web::Data<AppState>, id: web::Path<i32>) -> AppResult<HttpResponse> {
    let id = state.services.posts.delete(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(DeleteResponse::deleted(id)))
}

fn to_create(req: CreatePostRequest) -> CreatePost {
    CreatePost {
        title: req.title,
        content: req.content,
        image_url: req.image_url,
        published: req.published,
        category_ids: req.category_ids,
    }
}

fn to_patch(req: UpdatePostRequest) -> PostPatch {
    PostPatch {
        title: req.title,
        content: req.content,
        image_url: req.image_url,
        published: req.published,
        category_ids: req.category_ids,
    }
}
