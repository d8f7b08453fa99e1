use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CalendarQuery {
    /// Comma-separated room ids, e.g. `room_ids=3,5,9`.
    pub room_ids: String,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DayPrice {
    pub date: NaiveDate,
    pub price: Option<f64>,
    pub closed: Option<bool>,
    pub min_stay: Option<i32>,
}

/// One room's slice of the price grid. `error` is set when the
/// channel-manager fetch for this room failed; the other rooms still
/// come back populated.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoomPriceCalendar {
    pub room_id: i64,
    pub room_name: String,
    pub days: Vec<DayPrice>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PriceCalendarResponse {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub rooms: Vec<RoomPriceCalendar>,
}
