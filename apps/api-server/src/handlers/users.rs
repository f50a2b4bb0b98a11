//! User registration, login and profile handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blog_core::UserInput;
use blog_core::domain::User;
use blog_shared::dto::{LoginRequest, LoginResponse, UserRequest, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn user_response(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        photo: user.photo,
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

fn user_input(req: UserRequest) -> UserInput {
    UserInput {
        name: req.name,
        email: req.email,
        password: req.password,
        photo: req.photo,
    }
}

/// POST /api/users/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<UserRequest>,
) -> AppResult<HttpResponse> {
    let user = state.users.register(user_input(body.into_inner())).await?;

    Ok(HttpResponse::Created().json(user_response(user)))
}

/// POST /api/users/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state.users.authenticate(&req.email, &req.password).await?;

    let token = state
        .tokens
        .generate_token(user.id, &user.email)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        user: user_response(user),
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
    }))
}

/// GET /api/users
pub async fn list(_identity: Identity, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let users = state.users.find_all().await?;

    Ok(HttpResponse::Ok().json(users.into_iter().map(user_response).collect::<Vec<_>>()))
}

/// GET /api/users/{id}
pub async fn get(
    _identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let user = state.users.find_by_id(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(user_response(user)))
}

/// PUT /api/users/{id}
pub async fn update(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UserRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    tracing::debug!(user_id = %id, by = %identity.user_id, "Updating user");

    let user = state.users.update(id, user_input(body.into_inner())).await?;

    Ok(HttpResponse::Ok().json(user_response(user)))
}
