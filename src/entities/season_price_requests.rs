use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter, FromJsonQueryResult};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "season_request_status"
)]
#[serde(rename_all = "snake_case")]
pub enum SeasonRequestStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "done")]
    Done,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl std::fmt::Display for SeasonRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeasonRequestStatus::Pending => write!(f, "pending"),
            SeasonRequestStatus::Done => write!(f, "done"),
            SeasonRequestStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// One priced period inside a season request. Dates travel as ISO
/// `yyyy-MM-dd` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct SeasonPricingItem {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub period_type: String,
    pub season: String,
    pub price: Option<i32>,
    pub min_stay: Option<i32>,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub closed_on_arrival: bool,
    #[serde(default)]
    pub closed_on_departure: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromJsonQueryResult)]
pub struct SeasonPricingItems(pub Vec<SeasonPricingItem>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "season_price_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub season_year: i32,
    pub room_id: i64,
    pub room_name: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub items: SeasonPricingItems,
    pub status: SeasonRequestStatus,
    /// When a done request is resubmitted and re-applied, the new one
    /// records which request it replaced.
    pub supersedes_id: Option<i64>,
    /// Set when the channel manager accepted the push but the local
    /// bookkeeping failed; flagged rows need an operator check.
    pub needs_reconciliation: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
