// src/api/handlers/convert.rs
use crate::api::AppState;
use crate::errors::ErrorKind;
use crate::models::Submission;
use crate::runner;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, Result, web};
use serde::Serialize;
use uuid::Uuid;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,
}

pub async fn convert(
    state: web::Data<AppState>,
    req: web::Json<Submission>,
) -> Result<HttpResponse> {
    let request_id = Uuid::new_v4();
    let submission = req.into_inner();
    log::info!(
        "[{request_id}] convert request: {} bytes, font_size {:?}",
        submission.code.as_deref().map_or(0, str::len),
        submission.font_size
    );

    match runner::convert(&state.config, &submission).await {
        Ok(artifact) => {
            log::info!("[{request_id}] returning {}", artifact.filename);
            let disposition = ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(artifact.filename.clone())],
            };
            Ok(HttpResponse::Ok()
                .content_type(artifact.media_type)
                .insert_header(disposition)
                .body(artifact.bytes))
        }
        Err(e) => {
            log::warn!("[{request_id}] conversion failed: {e}");
            let kind = e.kind();
            let response = ErrorResponse {
                error: e.to_string(),
                kind: kind.as_str(),
            };
            let http = match kind {
                ErrorKind::BadInput => HttpResponse::BadRequest().json(response),
                ErrorKind::ExecutionTimeout => HttpResponse::RequestTimeout().json(response),
                ErrorKind::InternalFailure => HttpResponse::InternalServerError().json(response),
            };
            Ok(http)
        }
    }
}
