//! Post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blog_core::domain::Post;
use blog_shared::dto::{PostRequest, PostResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

pub(super) fn post_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title,
        text: post.text,
        date: post.date,
        theme_id: post.theme_id,
    }
}

fn post_list(posts: Vec<Post>) -> Vec<PostResponse> {
    posts.into_iter().map(post_response).collect()
}

/// GET /api/posts
pub async fn list(_identity: Identity, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.find_all().await?;

    Ok(HttpResponse::Ok().json(post_list(posts)))
}

/// GET /api/posts/{id}
pub async fn get(
    _identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.posts.find_by_id(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// GET /api/posts/title/{fragment}
pub async fn search(
    _identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let posts = state
        .posts
        .find_by_title_containing(&path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(post_list(posts)))
}

/// POST /api/posts
pub async fn create(
    _identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let post = state.posts.create(req.title, req.text, req.theme_id).await?;

    Ok(HttpResponse::Created().json(post_response(post)))
}

/// PUT /api/posts/{id}
pub async fn update(
    _identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    // `date` is re-stamped by the store
    let post = Post {
        id: path.into_inner(),
        title: req.title,
        text: req.text,
        date: blog_core::domain::now(),
        theme_id: req.theme_id,
    };
    let post = state.posts.update(post).await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.posts.delete(id).await?;
    tracing::info!(post_id = %id, by = %identity.user_id, "Post removed via API");

    Ok(HttpResponse::NoContent().finish())
}
