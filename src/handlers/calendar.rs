use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::CalendarService;
use crate::utils::jwt::AuthUser;

fn auth_user(req: &HttpRequest) -> AppResult<AuthUser> {
    req.extensions()
        .get::<AuthUser>()
        .copied()
        .ok_or_else(|| AppError::AuthError("Missing authentication context".to_string()))
}

#[utoipa::path(
    get,
    path = "/calendar/prices",
    tag = "calendar",
    params(
        ("room_ids" = String, Query, description = "Comma separated room ids, e.g. 3,4"),
        ("date_from" = String, Query, description = "First day of the grid (yyyy-MM-dd)"),
        ("date_to" = String, Query, description = "Last day of the grid (yyyy-MM-dd)")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Live per-day prices pulled from the channel manager"),
        (status = 400, description = "Invalid room ids or date range"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "None of the rooms belong to the caller")
    )
)]
pub async fn get_price_grid(
    calendar_service: web::Data<CalendarService>,
    req: HttpRequest,
    query: web::Query<CalendarQuery>,
) -> Result<HttpResponse> {
    let user = auth_user(&req)?;
    match calendar_service.price_grid(user.id, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn calendar_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/calendar").route("/prices", web::get().to(get_price_grid)));
}
