//! HTTP handlers and route configuration.

mod health;
mod posts;
mod themes;
mod users;

#[cfg(test)]
mod tests;

use actix_web::web;

use crate::middleware::error::{json_config, path_config};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).app_data(path_config()).service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            // register and login are public; every other route extracts an Identity
            .service(
                web::scope("/users")
                    .route("/register", web::post().to(users::register))
                    .route("/login", web::post().to(users::login))
                    .route("", web::get().to(users::list))
                    .route("/{id}", web::get().to(users::get))
                    .route("/{id}", web::put().to(users::update)),
            )
            .service(
                web::scope("/themes")
                    .route("", web::get().to(themes::list))
                    .route("", web::post().to(themes::create))
                    .route("/description/{fragment}", web::get().to(themes::search))
                    .route("/{id}", web::get().to(themes::get))
                    .route("/{id}", web::put().to(themes::update))
                    .route("/{id}", web::delete().to(themes::delete)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list))
                    .route("", web::post().to(posts::create))
                    .route("/title/{fragment}", web::get().to(posts::search))
                    .route("/{id}", web::get().to(posts::get))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::delete().to(posts::delete)),
            ),
    );
}
