use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::{Value, json};

use blog_core::UserInput;
use blog_core::domain::User;
use blog_infra::{Argon2PasswordService, JwtConfig, JwtTokenService};

use super::configure_routes;
use crate::state::AppState;

const ROOT_EMAIL: &str = "root@email.com";
const ROOT_PASSWORD: &str = "rootroot";

async fn seeded_state() -> (AppState, User) {
    let tokens = Arc::new(JwtTokenService::new(JwtConfig {
        secret: "test-secret".to_string(),
        ..JwtConfig::default()
    }));
    let passwords = Arc::new(Argon2PasswordService::with_params(8, 1, 1).unwrap());
    let state = AppState::in_memory(tokens, passwords);

    let root = state
        .users
        .register(UserInput {
            name: "Root".to_string(),
            email: ROOT_EMAIL.to_string(),
            password: ROOT_PASSWORD.to_string(),
            photo: None,
        })
        .await
        .unwrap();

    (state, root)
}

fn basic_auth() -> (header::HeaderName, String) {
    let encoded = STANDARD.encode(format!("{ROOT_EMAIL}:{ROOT_PASSWORD}"));
    (header::AUTHORIZATION, format!("Basic {encoded}"))
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_register_returns_created_user_without_password() {
    let (state, _) = seeded_state().await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/users/register")
        .set_json(json!({
            "name": "Paulo Antunes",
            "email": "paulo_antunes@email.com.br",
            "password": "13465278",
            "photo": "https://i.imgur.com/JR7kUFU.jpg"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "Paulo Antunes");
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[actix_web::test]
async fn test_register_duplicate_email_is_rejected() {
    let (state, _) = seeded_state().await;
    let app = app!(state);

    let body = json!({
        "name": "Maria da Silva",
        "email": "maria_silva@email.com.br",
        "password": "13465278"
    });

    let first = test::TestRequest::post()
        .uri("/api/users/register")
        .set_json(&body)
        .to_request();
    assert_eq!(test::call_service(&app, first).await.status(), StatusCode::CREATED);

    let second = test::TestRequest::post()
        .uri("/api/users/register")
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, second).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let problem: Value = test::read_body_json(resp).await;
    assert_eq!(problem["status"], 400);
}

#[actix_web::test]
async fn test_protected_routes_require_credentials() {
    let (state, _) = seeded_state().await;
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/users").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));

    let req = test::TestRequest::get()
        .uri("/api/users")
        .insert_header(basic_auth())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let users: Value = test::read_body_json(resp).await;
    assert_eq!(users.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn test_login_issues_usable_bearer_token() {
    let (state, root) = seeded_state().await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/users/login")
        .set_json(json!({ "email": ROOT_EMAIL, "password": ROOT_PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let login: Value = test::read_body_json(resp).await;
    assert_eq!(login["token_type"], "Bearer");
    assert_eq!(login["id"], root.id.to_string());
    let token = login["access_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/api/users/{}", root.id))
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let user: Value = test::read_body_json(resp).await;
    assert_eq!(user["email"], ROOT_EMAIL);
}

#[actix_web::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let (state, _) = seeded_state().await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/users/login")
        .set_json(json!({ "email": ROOT_EMAIL, "password": "not-the-password" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let wrong = STANDARD.encode(format!("{ROOT_EMAIL}:not-the-password"));
    let req = test::TestRequest::get()
        .uri("/api/users")
        .insert_header((header::AUTHORIZATION, format!("Basic {wrong}")))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_update_user_keeps_id_and_creation_time() {
    let (state, _) = seeded_state().await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/users/register")
        .set_json(json!({
            "name": "Juliana Andrews",
            "email": "juliana_andrews@email.com.br",
            "password": "juliana123"
        }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/api/users/{id}"))
        .insert_header(basic_auth())
        .set_json(json!({
            "name": "Juliana Andrews Ramos",
            "email": "juliana_ramos@email.com.br",
            "password": "juliana123"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["name"], "Juliana Andrews Ramos");
    assert_eq!(updated["created_at"], created["created_at"]);
    assert_ne!(updated["updated_at"], created["updated_at"]);
}

#[actix_web::test]
async fn test_unknown_and_malformed_ids() {
    let (state, _) = seeded_state().await;
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{}", uuid::Uuid::new_v4()))
        .insert_header(basic_auth())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/themes/not-a-uuid")
        .insert_header(basic_auth())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let problem: Value = test::read_body_json(resp).await;
    assert_eq!(problem["title"], "Bad Request");
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let (state, _) = seeded_state().await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/themes")
        .insert_header(basic_auth())
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"description\": ")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_theme_description_starting_with_digit_is_rejected() {
    let (state, _) = seeded_state().await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/themes")
        .insert_header(basic_auth())
        .set_json(json!({ "description": "2024 retrospective" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_post_with_unknown_theme_is_rejected() {
    let (state, _) = seeded_state().await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(basic_auth())
        .set_json(json!({
            "title": "Orphan post",
            "text": "This theme does not exist",
            "theme_id": uuid::Uuid::new_v4()
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_deleting_theme_removes_its_posts() {
    let (state, _) = seeded_state().await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/themes")
        .insert_header(basic_auth())
        .set_json(json!({ "description": "Educação" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let theme: Value = test::read_body_json(resp).await;
    let theme_id = theme["id"].as_str().unwrap().to_string();

    let mut post_ids = Vec::new();
    for title in ["Primeira aula", "Segunda aula"] {
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(basic_auth())
            .set_json(json!({
                "title": title,
                "text": "Conteúdo da aula",
                "theme_id": theme_id
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let post: Value = test::read_body_json(resp).await;
        post_ids.push(post["id"].as_str().unwrap().to_string());
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/themes/{theme_id}"))
        .insert_header(basic_auth())
        .to_request();
    let with_posts: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(with_posts["posts"].as_array().map(Vec::len), Some(2));

    let req = test::TestRequest::delete()
        .uri(&format!("/api/themes/{theme_id}"))
        .insert_header(basic_auth())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    for id in post_ids {
        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{id}"))
            .insert_header(basic_auth())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    let req = test::TestRequest::delete()
        .uri(&format!("/api/themes/{theme_id}"))
        .insert_header(basic_auth())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_search_decodes_fragment_and_ignores_case() {
    let (state, _) = seeded_state().await;
    state.themes.create("EDUCAÇÃO".to_string()).await.unwrap();
    state.themes.create("Esportes".to_string()).await.unwrap();
    let app = app!(state);

    // "ação"
    let req = test::TestRequest::get()
        .uri("/api/themes/description/a%C3%A7%C3%A3o")
        .insert_header(basic_auth())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let themes: Value = test::read_body_json(resp).await;
    let themes = themes.as_array().unwrap();
    assert_eq!(themes.len(), 1);
    assert_eq!(themes[0]["description"], "EDUCAÇÃO");
}

#[actix_web::test]
async fn test_update_post_restamps_date() {
    let (state, _) = seeded_state().await;
    let post = state
        .posts
        .create("Rascunho".to_string(), "Texto inicial".to_string(), None)
        .await
        .unwrap();
    let app = app!(state);

    let req = test::TestRequest::put()
        .uri(&format!("/api/posts/{}", post.id))
        .insert_header(basic_auth())
        .set_json(json!({ "title": "Publicado", "text": "Texto revisado" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let updated: blog_shared::dto::PostResponse = test::read_body_json(resp).await;
    assert_eq!(updated.id, post.id);
    assert_eq!(updated.title, "Publicado");
    assert!(updated.date > post.date);

    let req = test::TestRequest::get()
        .uri("/api/posts/title/PUBLIC")
        .insert_header(basic_auth())
        .to_request();
    let found: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(found.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn test_health_reports_memory_storage() {
    let (state, _) = seeded_state().await;
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let health: Value = test::read_body_json(resp).await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["storage"], "memory");
}
