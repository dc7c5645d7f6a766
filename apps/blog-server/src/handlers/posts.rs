//! Blog pages: post list, post detail with comments, create and edit.

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, http::header, web};
use futures::StreamExt;
use uuid::Uuid;

use blog_core::forms::{CommentForm, PostForm, PostSubmission, Upload};
use blog_core::DomainError;
use blog_core::service::{Page, PostEditView};

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Largest accepted attachment.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Largest accepted text field.
const MAX_FIELD_BYTES: usize = 64 * 1024;

fn post_path(id: Uuid) -> String {
    format!("/posts/{}/", id)
}

fn see_other(location: String) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// GET /
pub async fn index() -> HttpResponse {
    see_other("/posts/".to_string())
}

/// GET /posts/
pub async fn post_list(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let view = state.content.list_published(state.clock.now()).await?;
    state
        .renderer
        .render("post_list.html", &view, identity.identity())
}

async fn show_post(
    req: &HttpRequest,
    state: &AppState,
    identity: &OptionalIdentity,
    id: Uuid,
    submission: Option<CommentForm>,
) -> AppResult<HttpResponse> {
    let post_url = req.full_url().to_string();
    let page = state
        .content
        .view_post(id, submission, state.clock.now(), &post_url)
        .await?;

    match page {
        Page::RedirectToPost(id) => Ok(see_other(post_path(id))),
        Page::Render(view) => state
            .renderer
            .render("post_detail.html", &view, identity.identity()),
    }
}

/// GET /posts/{id}/
pub async fn post_detail(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    show_post(&req, &state, &identity, path.into_inner(), None).await
}

/// POST /posts/{id}/ - submit a comment.
pub async fn post_comment(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    show_post(
        &req,
        &state,
        &identity,
        path.into_inner(),
        Some(form.into_inner()),
    )
    .await
}

fn edit_response(
    req: &HttpRequest,
    state: &AppState,
    identity: &OptionalIdentity,
    page: Result<Page<PostEditView>, DomainError>,
) -> AppResult<HttpResponse> {
    let here = req
        .uri()
        .path_and_query()
        .map_or(req.path(), |pq| pq.as_str());
    match page.map_err(|e| AppError::for_page(e, here))? {
        Page::RedirectToPost(id) => Ok(see_other(post_path(id))),
        Page::Render(view) => state
            .renderer
            .render("post_edit.html", &view, identity.identity()),
    }
}

/// GET /posts/new/
pub async fn post_new_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let actor = identity.actor();
    let page = state
        .content
        .create_post(actor.as_ref(), None, state.clock.now())
        .await;
    edit_response(&req, &state, &identity, page)
}

/// POST /posts/new/
pub async fn post_new(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let actor = identity.actor();
    let submission = match actor {
        Some(_) => Some(read_submission(payload).await?),
        None => None,
    };
    let page = state
        .content
        .create_post(actor.as_ref(), submission, state.clock.now())
        .await;
    edit_response(&req, &state, &identity, page)
}

/// GET /posts/{id}/edit/
pub async fn post_edit_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let actor = identity.actor();
    let page = state
        .content
        .edit_post(actor.as_ref(), path.into_inner(), None, state.clock.now())
        .await;
    edit_response(&req, &state, &identity, page)
}

/// POST /posts/{id}/edit/
pub async fn post_edit(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let actor = identity.actor();
    let submission = match actor {
        Some(_) => Some(read_submission(payload).await?),
        None => None,
    };
    let page = state
        .content
        .edit_post(
            actor.as_ref(),
            path.into_inner(),
            submission,
            state.clock.now(),
        )
        .await;
    edit_response(&req, &state, &identity, page)
}

/// Collect the `title`, `content` and optional `file` parts of a post form.
async fn read_submission(mut payload: Multipart) -> AppResult<PostSubmission> {
    let mut form = PostForm::default();
    let mut upload = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| AppError::BadRequest(format!("multipart: {}", e)))?;

        let name = field.name().unwrap_or_default().to_string();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let limit = if name == "file" {
            MAX_UPLOAD_BYTES
        } else {
            MAX_FIELD_BYTES
        };

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::BadRequest(format!("multipart: {}", e)))?;
            if bytes.len() + chunk.len() > limit {
                return Err(AppError::BadRequest(format!(
                    "field '{}' exceeds {} bytes",
                    name, limit
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        match name.as_str() {
            "title" => form.title = String::from_utf8_lossy(&bytes).into_owned(),
            "content" => form.content = String::from_utf8_lossy(&bytes).into_owned(),
            // Browsers send an empty part when no file was chosen.
            "file" => {
                if let Some(file_name) = file_name.filter(|n| !n.is_empty()) {
                    if !bytes.is_empty() {
                        upload = Some(Upload { file_name, bytes });
                    }
                }
            }
            other => tracing::debug!(field = other, "Ignoring unknown form field"),
        }
    }

    Ok(PostSubmission { form, upload })
}
