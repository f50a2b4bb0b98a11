//! Theme handlers. Responses embed each theme's posts.

use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blog_core::domain::Theme;
use blog_shared::dto::{PostResponse, ThemeRequest, ThemeResponse};

use super::posts::post_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Attach posts to themes with a single post query.
async fn with_posts(state: &AppState, themes: Vec<Theme>) -> AppResult<Vec<ThemeResponse>> {
    let ids: Vec<Uuid> = themes.iter().map(|t| t.id).collect();
    let posts = state.posts.find_by_theme_ids(&ids).await?;

    let mut by_theme: HashMap<Uuid, Vec<PostResponse>> = HashMap::new();
    for post in posts {
        if let Some(theme_id) = post.theme_id {
            by_theme.entry(theme_id).or_default().push(post_response(post));
        }
    }

    Ok(themes
        .into_iter()
        .map(|theme| ThemeResponse {
            posts: by_theme.remove(&theme.id).unwrap_or_default(),
            id: theme.id,
            description: theme.description,
        })
        .collect())
}

async fn single_with_posts(state: &AppState, theme: Theme) -> AppResult<ThemeResponse> {
    let id = theme.id;
    let description = theme.description.clone();
    let mut responses = with_posts(state, vec![theme]).await?;

    Ok(responses.pop().unwrap_or(ThemeResponse {
        id,
        description,
        posts: Vec::new(),
    }))
}

/// GET /api/themes
pub async fn list(_identity: Identity, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let themes = state.themes.find_all().await?;

    Ok(HttpResponse::Ok().json(with_posts(&state, themes).await?))
}

/// GET /api/themes/{id}
pub async fn get(
    _identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let theme = state.themes.find_by_id(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(single_with_posts(&state, theme).await?))
}

/// GET /api/themes/description/{fragment}
pub async fn search(
    _identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let themes = state
        .themes
        .find_by_description_containing(&path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(with_posts(&state, themes).await?))
}

/// POST /api/themes
pub async fn create(
    _identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<ThemeRequest>,
) -> AppResult<HttpResponse> {
    let theme = state.themes.create(body.into_inner().description).await?;

    Ok(HttpResponse::Created().json(ThemeResponse {
        id: theme.id,
        description: theme.description,
        posts: Vec::new(),
    }))
}

/// PUT /api/themes/{id}
pub async fn update(
    _identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<ThemeRequest>,
) -> AppResult<HttpResponse> {
    let theme = Theme {
        id: path.into_inner(),
        description: body.into_inner().description,
    };
    let theme = state.themes.update(theme).await?;

    Ok(HttpResponse::Ok().json(single_with_posts(&state, theme).await?))
}

/// DELETE /api/themes/{id} - removes the theme's posts too.
pub async fn delete(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let removed_posts = state.themes.delete(id).await?;
    tracing::info!(theme_id = %id, removed_posts, by = %identity.user_id, "Theme removed via API");

    Ok(HttpResponse::NoContent().finish())
}
