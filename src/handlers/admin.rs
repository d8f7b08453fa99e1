use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::entities::SeasonRequestStatus;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::{OverrideService, ReconciliationService, SeasonRequestService};
use crate::utils::jwt::AuthUser;

fn require_admin(req: &HttpRequest) -> AppResult<AuthUser> {
    let user = req
        .extensions()
        .get::<AuthUser>()
        .copied()
        .ok_or_else(|| AppError::AuthError("Missing authentication context".to_string()))?;
    if !user.role.is_admin() {
        return Err(AppError::Forbidden);
    }
    Ok(user)
}

#[utoipa::path(
    get,
    path = "/admin/overrides",
    tag = "admin",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Items per page"),
        ("client_name" = Option<String>, Query, description = "Filter by client name, partial match"),
        ("room_id" = Option<i64>, Query, description = "Filter by room"),
        ("price" = Option<i32>, Query, description = "Filter by exact price"),
        ("min_stay" = Option<i32>, Query, description = "Filter by exact minimum stay"),
        ("created_from" = Option<String>, Query, description = "Created on or after (yyyy-MM-dd)"),
        ("created_to" = Option<String>, Query, description = "Created on or before (yyyy-MM-dd)")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Overrides across all clients, newest first"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not an administrator")
    )
)]
pub async fn get_all_overrides(
    override_service: web::Data<OverrideService>,
    req: HttpRequest,
    query: web::Query<AdminOverrideQuery>,
) -> Result<HttpResponse> {
    require_admin(&req)?;
    match override_service.get_all_admin(&query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/season-requests",
    tag = "admin",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Items per page"),
        ("status" = Option<SeasonRequestStatus>, Query, description = "Filter by status"),
        ("season_year" = Option<i32>, Query, description = "Filter by season year"),
        ("room_id" = Option<i64>, Query, description = "Filter by room"),
        ("client_name" = Option<String>, Query, description = "Filter by client name, partial match"),
        ("needs_reconciliation" = Option<bool>, Query, description = "Only requests flagged for reconciliation")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Season requests across all clients, newest first"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not an administrator")
    )
)]
pub async fn get_all_season_requests(
    season_request_service: web::Data<SeasonRequestService>,
    req: HttpRequest,
    query: web::Query<AdminSeasonRequestQuery>,
) -> Result<HttpResponse> {
    require_admin(&req)?;
    match season_request_service.list_admin(&query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/season-requests/{id}",
    tag = "admin",
    request_body = UpdateSeasonRequestItems,
    params(
        ("id" = i64, Path, description = "Season request id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Items replaced on the pending request", body = SeasonRequestApiResponse),
        (status = 400, description = "Invalid pricing items"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not an administrator"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request is no longer pending")
    )
)]
pub async fn update_season_request(
    season_request_service: web::Data<SeasonRequestService>,
    req: HttpRequest,
    id: web::Path<i64>,
    request: web::Json<UpdateSeasonRequestItems>,
) -> Result<HttpResponse> {
    require_admin(&req)?;
    match season_request_service
        .update_items(id.into_inner(), request.into_inner().items)
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
    post,
    path = "/admin/season-requests/{id}/reject",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "Season request id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Request rejected", body = SeasonRequestApiResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not an administrator"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request is no longer pending")
    )
)]
pub async fn reject_season_request(
    season_request_service: web::Data<SeasonRequestService>,
    req: HttpRequest,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    require_admin(&req)?;
    match season_request_service.reject_request(id.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/season-requests/{id}/apply",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "Season request id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Prices pushed to the channel manager and request marked done", body = ApplySeasonRequestApiResponse),
        (status = 400, description = "Room has no channel manager room type"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not an administrator"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request is no longer pending"),
        (status = 502, description = "Channel manager rejected the push")
    )
)]
pub async fn apply_season_request(
    reconciliation_service: web::Data<ReconciliationService>,
    req: HttpRequest,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    require_admin(&req)?;
    match reconciliation_service.apply_request(id.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/overrides", web::get().to(get_all_overrides))
            .route("/season-requests", web::get().to(get_all_season_requests))
            .route("/season-requests/{id}", web::put().to(update_season_request))
            .route(
                "/season-requests/{id}/reject",
                web::post().to(reject_season_request),
            )
            .route(
                "/season-requests/{id}/apply",
                web::post().to(apply_season_request),
            ),
    );
}
