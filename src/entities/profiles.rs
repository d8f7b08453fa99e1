use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Read-only mirror of the platform's auth profiles. Rows are synced by
/// the main platform; this backend only reads them.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
    pub full_name: String,
    pub email: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
