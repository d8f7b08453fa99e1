use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Read-only mirror of the booking system's room listing.
/// `cm_room_type_id` stays text because the upstream listing is
/// stringly-typed; it must parse to a positive integer before any
/// channel-manager call.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub cm_room_type_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    /// The numeric channel-manager room type, when the mirror carries a
    /// usable one.
    pub fn channel_room_type_id(&self) -> Option<i64> {
        self.cm_room_type_id
            .as_deref()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
