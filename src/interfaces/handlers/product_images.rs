use std::fmt::Display;

use actix_multipart::Multipart;
use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};

use crate::{
    constants::MAX_UPLOAD_SIZE,
    entities::product::ImageUploadResponse,
    errors::{UploadError, UploadErrorCode},
    interfaces::body_limit::LimitedBody,
    repositories::{product::ProductRepository, storage::StorageBackend},
    use_cases::{extractors::CurrentUser, product_image::ProductImageHandler},
    utils::request_log::{log_handler_error, log_handler_success, RequestMeta},
    AppState,
};

const UPLOAD_SUCCESS_MESSAGE: &str = "Image uploaded successfully";
const UPDATE_SUCCESS_MESSAGE: &str = "Product image updated successfully";

/// Status and client-facing message for an upload failure.
///
/// 5xx responses never carry the underlying cause.
pub fn upload_error_status(err: &UploadError) -> (StatusCode, String) {
    match err.code {
        UploadErrorCode::MissingProductId
        | UploadErrorCode::InvalidForm
        | UploadErrorCode::InvalidImage => (StatusCode::BAD_REQUEST, err.message.clone()),
        UploadErrorCode::NotFound => (StatusCode::NOT_FOUND, err.message.clone()),
        UploadErrorCode::FileSaveFailed => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to upload image".to_string())
        }
        UploadErrorCode::DbError => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to update product image".to_string())
        }
        UploadErrorCode::Internal => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
        }
    }
}

fn handle_upload_error(meta: &RequestMeta, operation: &str, err: UploadError) -> HttpResponse {
    let (status, message) = upload_error_status(&err);
    let log_message = format!("{} ({})", err.message, err.code);

    let cause = err.cause.as_ref().map(|c| c as &dyn Display);
    log_handler_error(meta, operation, &log_message, cause);

    HttpResponse::build(status).json(serde_json::json!({"error": message}))
}

/// Caps the raw body before anything parses it.
fn limited_form(req: &HttpRequest, payload: web::Payload) -> Multipart {
    Multipart::new(req.headers(), LimitedBody::new(payload, MAX_UPLOAD_SIZE))
}

async fn upload_with<R, S>(
    images: &ProductImageHandler<R, S>,
    state: &AppState,
    req: &HttpRequest,
    user: CurrentUser,
    payload: web::Payload,
    operation: &str,
) -> HttpResponse
where
    R: ProductRepository,
    S: StorageBackend,
{
    let meta = RequestMeta::from_request(req, state.trust_x_forwarded_for);

    match images.upload_product_image(&user.0, limited_form(req, payload)).await {
        Ok(image_url) => {
            log_handler_success(&meta, operation, UPLOAD_SUCCESS_MESSAGE);
            HttpResponse::Ok().json(ImageUploadResponse::new(UPLOAD_SUCCESS_MESSAGE, image_url))
        }
        Err(e) => handle_upload_error(&meta, operation, e),
    }
}

async fn update_with<R, S>(
    images: &ProductImageHandler<R, S>,
    state: &AppState,
    req: &HttpRequest,
    user: CurrentUser,
    payload: web::Payload,
    operation: &str,
) -> HttpResponse
where
    R: ProductRepository,
    S: StorageBackend,
{
    let meta = RequestMeta::from_request(req, state.trust_x_forwarded_for);

    let Some(product_id) = state.route_params.param(req, "id") else {
        return handle_upload_error(&meta, operation, UploadError::missing_product_id());
    };

    match images
        .update_product_image(&product_id, &user.0, limited_form(req, payload))
        .await
    {
        Ok(image_url) => {
            log_handler_success(&meta, operation, UPDATE_SUCCESS_MESSAGE);
            HttpResponse::Ok().json(ImageUploadResponse::new(UPDATE_SUCCESS_MESSAGE, image_url))
        }
        Err(e) => handle_upload_error(&meta, operation, e),
    }
}

fn s3_not_configured(state: &AppState, req: &HttpRequest, operation: &str) -> HttpResponse {
    let meta = RequestMeta::from_request(req, state.trust_x_forwarded_for);
    handle_upload_error(
        &meta,
        operation,
        UploadError::new(UploadErrorCode::Internal, "S3 storage is not configured"),
    )
}

pub async fn upload_product_image(
    req: HttpRequest,
    state: web::Data<AppState>,
    user: CurrentUser,
    payload: web::Payload,
) -> HttpResponse {
    upload_with(&state.local_images, &state, &req, user, payload, "upload_product_image").await
}

pub async fn update_product_image(
    req: HttpRequest,
    state: web::Data<AppState>,
    user: CurrentUser,
    payload: web::Payload,
) -> HttpResponse {
    update_with(&state.local_images, &state, &req, user, payload, "update_product_image").await
}

pub async fn upload_product_image_s3(
    req: HttpRequest,
    state: web::Data<AppState>,
    user: CurrentUser,
    payload: web::Payload,
) -> HttpResponse {
    const OPERATION: &str = "upload_product_image_s3";
    match &state.s3_images {
        Some(images) => upload_with(images, &state, &req, user, payload, OPERATION).await,
        None => s3_not_configured(&state, &req, OPERATION),
    }
}

pub async fn update_product_image_s3(
    req: HttpRequest,
    state: web::Data<AppState>,
    user: CurrentUser,
    payload: web::Payload,
) -> HttpResponse {
    const OPERATION: &str = "update_product_image_s3";
    match &state.s3_images {
        Some(images) => update_with(images, &state, &req, user, payload, OPERATION).await,
        None => s3_not_configured(&state, &req, OPERATION),
    }
}
