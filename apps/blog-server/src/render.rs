//! HTML rendering with Tera templates.

use std::sync::Arc;

use actix_web::HttpResponse;
use actix_web::http::header::ContentType;
use serde::Serialize;
use tera::{Context, Tera};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};

/// Compiled template set, cheap to clone.
#[derive(Clone)]
pub struct Renderer {
    tera: Arc<Tera>,
}

impl Renderer {
    /// Load every `*.html` template below `dir`.
    pub fn from_dir(dir: &str) -> Result<Self, tera::Error> {
        let tera = Tera::new(&format!("{}/**/*.html", dir.trim_end_matches('/')))?;
        tracing::debug!(
            templates = tera.get_template_names().count(),
            "Templates loaded"
        );
        Ok(Self {
            tera: Arc::new(tera),
        })
    }

    /// Render `template` with the fields of `model` plus the signed-in user.
    pub fn render<T: Serialize>(
        &self,
        template: &str,
        model: &T,
        identity: Option<&Identity>,
    ) -> AppResult<HttpResponse> {
        let mut context = Context::from_serialize(model)
            .map_err(|e| AppError::Internal(format!("template context: {}", e)))?;
        context.insert("user", &identity.map(|i| i.username.as_str()));

        let body = self
            .tera
            .render(template, &context)
            .map_err(|e| AppError::Internal(format!("rendering {}: {:?}", template, e)))?;

        Ok(HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(body))
    }
}
