use crate::auth::auth::AuthUser;
use crate::storage::FileStore;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct UploadQuery {
    /// Original filename; only its extension is kept
    #[schema(example = "medical-certificate.pdf")]
    pub filename: String,
}

/// Upload one attachment blob; the returned reference goes into a leave
/// request's attachment list
#[utoipa::path(
    post,
    path = "/api/v1/files",
    params(UploadQuery),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 201, description = "Stored file reference", body = Object, example = json!({
            "file_ref": "0b5c7f2e-4e1a-4b8a-9c33-7f0d2a1c9b10.pdf"
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Files"
)]
pub async fn upload_file(
    _auth: AuthUser,
    store: web::Data<FileStore>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> actix_web::Result<impl Responder> {
    let file_ref = store.save(&query.filename, &body).map_err(|e| {
        error!(error = %e, filename = %query.filename, "Attachment store failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(json!({ "file_ref": file_ref })))
}
