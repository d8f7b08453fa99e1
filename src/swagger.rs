use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{SeasonPricingItem, SeasonRequestStatus};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::season::get_periods,
        handlers::season::get_suggestions,
        handlers::room::get_rooms,
        handlers::calendar::get_price_grid,
        handlers::overrides::create_override,
        handlers::overrides::get_overrides,
        handlers::overrides::delete_override,
        handlers::season_request::create_season_request,
        handlers::season_request::get_season_requests,
        handlers::season_request::get_season_request,
        handlers::admin::get_all_overrides,
        handlers::admin::get_all_season_requests,
        handlers::admin::update_season_request,
        handlers::admin::reject_season_request,
        handlers::admin::apply_season_request,
    ),
    components(
        schemas(
            SeasonPeriodResponse,
            SeasonCsvIssue,
            SeasonCalendarResponse,
            SuggestionQuery,
            SeasonSuggestionResponse,
            SeasonSuggestionsResponse,
            RoomResponse,
            CalendarQuery,
            DayPrice,
            RoomPriceCalendar,
            PriceCalendarResponse,
            NewPriceOverride,
            PriceOverrideResponse,
            AdminOverrideQuery,
            AdminPriceOverrideResponse,
            SeasonPricingItem,
            SeasonRequestStatus,
            CreateSeasonPricingRequest,
            UpdateSeasonRequestItems,
            SeasonRequestQuery,
            AdminSeasonRequestQuery,
            SeasonRequestResponse,
            AdminSeasonRequestResponse,
            ApplySeasonRequestResponse,
            ApiError,
            SeasonCalendarApiResponse,
            SeasonRequestApiResponse,
            ApplySeasonRequestApiResponse,
            PriceOverrideApiResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "season", description = "Season calendar API"),
        (name = "room", description = "Room listing API"),
        (name = "calendar", description = "Live price calendar API"),
        (name = "override", description = "Price override API"),
        (name = "season_request", description = "Season pricing request API"),
        (name = "admin", description = "Back office API"),
    ),
    info(
        title = "Kerelia Backend API",
        version = "1.0.0",
        description = "Kerelia season pricing and channel manager REST API documentation",
        contact(
            name = "API Support",
            email = "dev@kerelia.fr"
        )
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
