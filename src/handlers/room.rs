use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::error::{AppError, AppResult};
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
    path = "/rooms",
    tag = "room",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Rooms owned by the caller"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_rooms(
    calendar_service: web::Data<CalendarService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user = auth_user(&req)?;
    match calendar_service.list_rooms(user.id).await {
        Ok(rooms) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": rooms
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn room_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/rooms").route("", web::get().to(get_rooms)));
}
