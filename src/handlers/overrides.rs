use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::OverrideService;
use crate::utils::jwt::AuthUser;

fn auth_user(req: &HttpRequest) -> AppResult<AuthUser> {
    req.extensions()
        .get::<AuthUser>()
        .copied()
        .ok_or_else(|| AppError::AuthError("Missing authentication context".to_string()))
}

#[utoipa::path(
    post,
    path = "/overrides",
    tag = "override",
    request_body = NewPriceOverride,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Override recorded", body = PriceOverrideApiResponse),
        (status = 400, description = "Invalid dates or empty override"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Room does not belong to the caller")
    )
)]
pub async fn create_override(
    override_service: web::Data<OverrideService>,
    req: HttpRequest,
    request: web::Json<NewPriceOverride>,
) -> Result<HttpResponse> {
    let user = auth_user(&req)?;
    match override_service
        .add_override(user.id, request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/overrides",
    tag = "override",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Overrides recorded by the caller, newest first"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_overrides(
    override_service: web::Data<OverrideService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user = auth_user(&req)?;
    match override_service.get_overrides(user.id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/overrides/{id}",
    tag = "override",
    params(
        ("id" = i64, Path, description = "Override id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Override deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Override belongs to another owner"),
        (status = 404, description = "Override not found")
    )
)]
pub async fn delete_override(
    override_service: web::Data<OverrideService>,
    req: HttpRequest,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = auth_user(&req)?;
    match override_service.delete_override(&user, id.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Override deleted"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn overrides_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/overrides")
            .route("", web::post().to(create_override))
            .route("", web::get().to(get_overrides))
            .route("/{id}", web::delete().to(delete_override)),
    );
}
