use super::{session::SessionUser, AppState};
use crate::{
    error::ThumbnailError,
    models::{
        GenerateThumbnailRequest, GenerateThumbnailResponse, GenerationFailedResponse,
        MessageResponse, ThumbnailListResponse, ThumbnailResponse,
    },
};
use actix_web::{web, HttpResponse, ResponseError};
use serde_json::json;

pub async fn generate_thumbnail(
    state: web::Data<AppState>,
    user: SessionUser,
    body: web::Json<GenerateThumbnailRequest>,
) -> HttpResponse {
    match state.service.generate(user.id(), body.into_inner()).await {
        Ok(thumbnail) => HttpResponse::Ok().json(GenerateThumbnailResponse {
            message: "Thumbnail generated".to_string(),
            thumbnail,
        }),
        Err(failed) => HttpResponse::build(failed.error.status_code()).json(
            GenerationFailedResponse {
                message: failed.error.summary().to_string(),
                thumbnail: failed.thumbnail,
                error: failed.error.to_string(),
            },
        ),
    }
}

pub async fn list_thumbnails(
    state: web::Data<AppState>,
    user: SessionUser,
) -> Result<HttpResponse, ThumbnailError> {
    let thumbnails = state.service.list(user.id()).await?;
    Ok(HttpResponse::Ok().json(ThumbnailListResponse { thumbnails }))
}

pub async fn get_thumbnail(
    state: web::Data<AppState>,
    user: SessionUser,
    id: web::Path<String>,
) -> Result<HttpResponse, ThumbnailError> {
    let thumbnail = state.service.get(user.id(), &id).await?;
    Ok(HttpResponse::Ok().json(ThumbnailResponse { thumbnail }))
}

pub async fn delete_thumbnail(
    state: web::Data<AppState>,
    user: SessionUser,
    id: web::Path<String>,
) -> Result<HttpResponse, ThumbnailError> {
    state.service.delete(user.id(), &id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Thumbnail deleted successfully".to_string(),
    }))
}

pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    let store = state.service.records();
    let healthy = store.health_check().await.unwrap_or(false);
    HttpResponse::Ok().json(json!({
        "status": if healthy { "ok" } else { "degraded" },
        "store": store.backend_name(),
    }))
}
