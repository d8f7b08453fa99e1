use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;

/// Append-only trace of every price/closure push. Rows are inserted and
/// occasionally deleted, never updated; reverting a range means pushing
/// a new row. Current nightly state lives in the channel manager.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "price_overrides")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub room_id: i64,
    pub room_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: Option<i32>,
    pub closed: Option<bool>,
    pub min_stay: Option<i32>,
    pub closed_on_arrival: Option<bool>,
    pub closed_on_departure: Option<bool>,
    /// Groups the rows written by one admin apply of a season request.
    pub batch_id: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
