//! Serves uploaded attachments.
//!
//! Uploads share the blog's origin, so they are always sent as downloads
//! with `nosniff`, and only a few raster image types keep their own
//! content type. Everything else is `application/octet-stream`.

use actix_web::{
    HttpResponse,
    http::header::{
        self, ContentDisposition, DispositionParam, DispositionType, HeaderValue,
    },
    web,
};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Types a browser will only ever treat as images.
const INLINE_SAFE_TYPES: &[&str] = &["image/png", "image/jpeg", "image/gif", "image/webp"];

fn served_content_type(file: &std::path::Path) -> mime_guess::Mime {
    let guessed = mime_guess::from_path(file).first_or_octet_stream();
    if INLINE_SAFE_TYPES.contains(&guessed.essence_str()) {
        guessed
    } else {
        mime_guess::mime::APPLICATION_OCTET_STREAM
    }
}

/// GET /media/{path}
pub async fn serve(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let reference = path.into_inner();
    let not_found = || AppError::NotFound(format!("File {} not found", reference));

    let file = state.media.resolve(&reference).ok_or_else(not_found)?;
    let bytes = match tokio::fs::read(&file).await {
        Ok(bytes) => bytes,
        Err(e)
            if matches!(
                e.kind(),
                std::io::ErrorKind::NotFound | std::io::ErrorKind::IsADirectory
            ) =>
        {
            return Err(not_found());
        }
        Err(e) => return Err(AppError::Internal(format!("reading {}: {}", file.display(), e))),
    };

    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string());

    Ok(HttpResponse::Ok()
        .content_type(served_content_type(&file).as_ref())
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file_name)],
        })
        .insert_header((
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .body(bytes))
}
