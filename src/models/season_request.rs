use crate::entities::{SeasonPricingItem, SeasonRequestStatus, season_price_request_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateSeasonPricingRequest {
    #[schema(example = 2026)]
    pub season_year: i32,
    #[schema(example = 3)]
    pub room_id: i64,
    pub items: Vec<SeasonPricingItem>,
    /// Set when the owner knowingly re-submits a season that was
    /// already applied; the new request will supersede the old one.
    #[serde(default)]
    pub resubmission: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateSeasonRequestItems {
    pub items: Vec<SeasonPricingItem>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SeasonRequestQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<SeasonRequestStatus>,
    pub season_year: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminSeasonRequestQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<SeasonRequestStatus>,
    pub season_year: Option<i32>,
    pub room_id: Option<i64>,
    /// Case-insensitive substring match on the owner's full name.
    pub client_name: Option<String>,
    pub needs_reconciliation: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SeasonRequestResponse {
    pub id: i64,
    pub user_id: i64,
    pub season_year: i32,
    pub room_id: i64,
    pub room_name: String,
    pub items: Vec<SeasonPricingItem>,
    pub status: SeasonRequestStatus,
    pub supersedes_id: Option<i64>,
    pub needs_reconciliation: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<season_price_request_entity::Model> for SeasonRequestResponse {
    fn from(m: season_price_request_entity::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            season_year: m.season_year,
            room_id: m.room_id,
            room_name: m.room_name,
            items: m.items.0,
            status: m.status,
            supersedes_id: m.supersedes_id,
            needs_reconciliation: m.needs_reconciliation,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminSeasonRequestResponse {
    pub id: i64,
    pub user_id: i64,
    pub client_name: Option<String>,
    pub season_year: i32,
    pub room_id: i64,
    pub room_name: String,
    pub items: Vec<SeasonPricingItem>,
    pub status: SeasonRequestStatus,
    pub supersedes_id: Option<i64>,
    pub needs_reconciliation: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl AdminSeasonRequestResponse {
    pub fn from_model(
        m: season_price_request_entity::Model,
        client_name: Option<String>,
    ) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            client_name,
            season_year: m.season_year,
            room_id: m.room_id,
            room_name: m.room_name,
            items: m.items.0,
            status: m.status,
            supersedes_id: m.supersedes_id,
            needs_reconciliation: m.needs_reconciliation,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Outcome of an admin apply: what was pushed and under which batch.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApplySeasonRequestResponse {
    pub request: SeasonRequestResponse,
    pub batch_id: Uuid,
    pub blocks_pushed: usize,
}
