use crate::entities::price_override_entity;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Owner request to push a one-off price/closure range to the channel
/// manager. At least one of the effect fields must be set.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NewPriceOverride {
    #[schema(example = 3)]
    pub room_id: i64,
    #[schema(example = "2026-07-11")]
    pub start_date: NaiveDate,
    #[schema(example = "2026-07-18")]
    pub end_date: NaiveDate,
    #[schema(example = 149)]
    pub price: Option<i32>,
    pub closed: Option<bool>,
    #[schema(example = 2)]
    pub min_stay: Option<i32>,
    pub closed_on_arrival: Option<bool>,
    pub closed_on_departure: Option<bool>,
}

impl NewPriceOverride {
    pub fn has_effect(&self) -> bool {
        self.price.is_some()
            || self.closed.is_some()
            || self.min_stay.is_some()
            || self.closed_on_arrival.is_some()
            || self.closed_on_departure.is_some()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PriceOverrideResponse {
    pub id: i64,
    pub room_id: i64,
    pub room_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: Option<i32>,
    pub closed: Option<bool>,
    pub min_stay: Option<i32>,
    pub closed_on_arrival: Option<bool>,
    pub closed_on_departure: Option<bool>,
    pub batch_id: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<price_override_entity::Model> for PriceOverrideResponse {
    fn from(m: price_override_entity::Model) -> Self {
        Self {
            id: m.id,
            room_id: m.room_id,
            room_name: m.room_name,
            start_date: m.start_date,
            end_date: m.end_date,
            price: m.price,
            closed: m.closed,
            min_stay: m.min_stay,
            closed_on_arrival: m.closed_on_arrival,
            closed_on_departure: m.closed_on_departure,
            batch_id: m.batch_id,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminOverrideQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Case-insensitive substring match on the owner's full name.
    pub client_name: Option<String>,
    pub room_id: Option<i64>,
    pub price: Option<i32>,
    pub min_stay: Option<i32>,
    pub created_from: Option<NaiveDate>,
    pub created_to: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminPriceOverrideResponse {
    pub id: i64,
    pub user_id: i64,
    pub client_name: Option<String>,
    pub room_id: i64,
    pub room_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: Option<i32>,
    pub closed: Option<bool>,
    pub min_stay: Option<i32>,
    pub closed_on_arrival: Option<bool>,
    pub closed_on_departure: Option<bool>,
    pub batch_id: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
}

impl AdminPriceOverrideResponse {
    pub fn from_model(m: price_override_entity::Model, client_name: Option<String>) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            client_name,
            room_id: m.room_id,
            room_name: m.room_name,
            start_date: m.start_date,
            end_date: m.end_date,
            price: m.price,
            closed: m.closed,
            min_stay: m.min_stay,
            closed_on_arrival: m.closed_on_arrival,
            closed_on_departure: m.closed_on_departure,
            batch_id: m.batch_id,
            created_at: m.created_at,
        }
    }
}
