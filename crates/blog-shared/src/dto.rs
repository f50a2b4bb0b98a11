//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of register and profile update requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub photo: Option<String>,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A user's public information. Never carries the password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Successful login: the user plus a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Body of theme create and update requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeRequest {
    pub description: String,
}

/// A theme together with the posts filed under it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeResponse {
    pub id: Uuid,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub posts: Vec<PostResponse>,
}

/// Body of post create and update requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRequest {
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub theme_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub date: DateTime<Utc>,
    pub theme_id: Option<Uuid>,
}
