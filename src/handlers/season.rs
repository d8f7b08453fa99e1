use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::models::*;
use crate::services::SeasonCalendarService;

#[utoipa::path(
    get,
    path = "/seasons/{year}/periods",
    tag = "season",
    params(
        ("year" = i32, Path, description = "Season year, e.g. 2026")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Season calendar for the year", body = SeasonCalendarApiResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No calendar published for that year")
    )
)]
pub async fn get_periods(
    season_service: web::Data<SeasonCalendarService>,
    year: web::Path<i32>,
) -> Result<HttpResponse> {
    match season_service.load_year(year.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/seasons/{year}/suggestions",
    tag = "season",
    params(
        ("year" = i32, Path, description = "Season year, e.g. 2026"),
        ("base_min" = Option<i32>, Query, description = "Room base minimum price"),
        ("base_standard" = Option<i32>, Query, description = "Room base standard price"),
        ("base_max" = Option<i32>, Query, description = "Room base maximum price")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Season periods with suggested prices and minimum stays"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No calendar published for that year")
    )
)]
pub async fn get_suggestions(
    season_service: web::Data<SeasonCalendarService>,
    year: web::Path<i32>,
    query: web::Query<SuggestionQuery>,
) -> Result<HttpResponse> {
    match season_service
        .load_suggestions(year.into_inner(), &query)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn season_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/seasons")
            .route("/{year}/periods", web::get().to(get_periods))
            .route("/{year}/suggestions", web::get().to(get_suggestions)),
    );
}
