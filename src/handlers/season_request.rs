use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::entities::SeasonRequestStatus;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::SeasonRequestService;
use crate::utils::jwt::AuthUser;

fn auth_user(req: &HttpRequest) -> AppResult<AuthUser> {
    req.extensions()
        .get::<AuthUser>()
        .copied()
        .ok_or_else(|| AppError::AuthError("Missing authentication context".to_string()))
}

#[utoipa::path(
    post,
    path = "/season-requests",
    tag = "season_request",
    request_body = CreateSeasonPricingRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Request submitted for validation", body = SeasonRequestApiResponse),
        (status = 400, description = "Invalid year, room or pricing items"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Room does not belong to the caller"),
        (status = 409, description = "A request for this room and season already exists")
    )
)]
pub async fn create_season_request(
    season_request_service: web::Data<SeasonRequestService>,
    req: HttpRequest,
    request: web::Json<CreateSeasonPricingRequest>,
) -> Result<HttpResponse> {
    let user = auth_user(&req)?;
    match season_request_service
        .create_request(user.id, request.into_inner())
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
    path = "/season-requests",
    tag = "season_request",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Items per page"),
        ("status" = Option<SeasonRequestStatus>, Query, description = "Filter by status"),
        ("season_year" = Option<i32>, Query, description = "Filter by season year")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's season requests, newest first"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_season_requests(
    season_request_service: web::Data<SeasonRequestService>,
    req: HttpRequest,
    query: web::Query<SeasonRequestQuery>,
) -> Result<HttpResponse> {
    let user = auth_user(&req)?;
    match season_request_service.list_requests(user.id, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/season-requests/{id}",
    tag = "season_request",
    params(
        ("id" = i64, Path, description = "Season request id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Season request detail", body = SeasonRequestApiResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Request belongs to another owner"),
        (status = 404, description = "Request not found")
    )
)]
pub async fn get_season_request(
    season_request_service: web::Data<SeasonRequestService>,
    req: HttpRequest,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = auth_user(&req)?;
    match season_request_service
        .get_request(&user, id.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn season_request_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/season-requests")
            .route("", web::post().to(create_season_request))
            .route("", web::get().to(get_season_requests))
            .route("/{id}", web::get().to(get_season_request)),
    );
}
