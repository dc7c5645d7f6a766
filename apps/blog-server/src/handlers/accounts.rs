//! Browser sign-in and sign-out.

use actix_web::{
    HttpResponse,
    cookie::{Cookie, SameSite, time::Duration},
    http::header,
    web,
};
use serde::Serialize;

use blog_shared::dto::{LoginForm, NextQuery};

use crate::middleware::auth::{AUTH_COOKIE, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

const DEFAULT_NEXT: &str = "/posts/";

#[derive(Serialize)]
struct LoginPage<'a> {
    username: &'a str,
    next: &'a str,
    error: Option<&'a str>,
}

/// Only same-site absolute paths are followed after login.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => DEFAULT_NEXT,
    }
}

/// GET /accounts/login/
pub async fn login_form(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    query: web::Query<NextQuery>,
) -> AppResult<HttpResponse> {
    let page = LoginPage {
        username: "",
        next: safe_next(query.next.as_deref()),
        error: None,
    };
    state
        .renderer
        .render("login.html", &page, identity.identity())
}

/// POST /accounts/login/
pub async fn login(
    state: web::Data<AppState>,
    form: web::Form<LoginForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let next = safe_next(form.next.as_deref());

    let user = state.users.find_by_username(form.username.trim()).await?;
    let verified = match &user {
        Some(user) => state.passwords.verify(&form.password, &user.password_hash)?,
        None => false,
    };

    let Some(user) = user.filter(|_| verified) else {
        tracing::info!(username = %form.username, "Failed sign-in");
        let page = LoginPage {
            username: &form.username,
            next,
            error: Some("Please enter a correct username and password."),
        };
        return state.renderer.render("login.html", &page, None);
    };

    let token = state.tokens.generate_token(user.id, &user.username)?;
    let cookie = Cookie::build(AUTH_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(state.tokens.expiration_seconds()))
        .finish();

    tracing::info!(user_id = %user.id, "Signed in");
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, next.to_string()))
        .cookie(cookie)
        .finish())
}

/// POST /accounts/logout/
pub async fn logout() -> HttpResponse {
    let mut cookie = Cookie::build(AUTH_COOKIE, "").path("/").finish();
    cookie.make_removal();

    HttpResponse::Found()
        .insert_header((header::LOCATION, DEFAULT_NEXT))
        .cookie(cookie)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::safe_next;

    #[test]
    fn test_next_must_stay_on_site() {
        assert_eq!(safe_next(Some("/posts/new/")), "/posts/new/");
        assert_eq!(safe_next(Some("//evil.example/")), "/posts/");
        assert_eq!(safe_next(Some("https://evil.example/")), "/posts/");
        assert_eq!(safe_next(None), "/posts/");
    }
}
