use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::price_override::PriceOverrideResponse;
use crate::models::season::SeasonCalendarResponse;
use crate::models::season_request::{ApplySeasonRequestResponse, SeasonRequestResponse};

/// Response envelope shared by every endpoint: `{success, data}` on the
/// happy path, `{success: false, error}` otherwise.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[aliases(
    SeasonCalendarApiResponse = ApiResponse<SeasonCalendarResponse>,
    SeasonRequestApiResponse = ApiResponse<SeasonRequestResponse>,
    ApplySeasonRequestApiResponse = ApiResponse<ApplySeasonRequestResponse>,
    PriceOverrideApiResponse = ApiResponse<PriceOverrideResponse>
)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}
