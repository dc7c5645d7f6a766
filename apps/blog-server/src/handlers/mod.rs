//! HTTP handlers and route configuration.

mod accounts;
mod auth;
mod health;
mod media;
mod posts;


use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(posts::index))
        .service(
            web::scope("/posts")
                .route("/", web::get().to(posts::post_list))
                .route("/new/", web::get().to(posts::post_new_form))
                .route("/new/", web::post().to(posts::post_new))
                .route("/{id}/", web::get().to(posts::post_detail))
                .route("/{id}/", web::post().to(posts::post_comment))
                .route("/{id}/edit/", web::get().to(posts::post_edit_form))
                .route("/{id}/edit/", web::post().to(posts::post_edit)),
        )
        .service(
            web::scope("/accounts")
                .route("/login/", web::get().to(accounts::login_form))
                .route("/login/", web::post().to(accounts::login))
                .route("/logout/", web::post().to(accounts::logout)),
        )
        .route("/media/{path:.*}", web::get().to(media::serve))
        .service(
            web::scope("/api")
                // Public routes
                .route("/health", web::get().to(health::health_check))
                // Auth routes
                .service(
                    web::scope("/auth")
                        .route("/login", web::post().to(auth::login))
                        .route("/me", web::get().to(auth::me)),
                ),
        );
}
