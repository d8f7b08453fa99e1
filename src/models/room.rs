use crate::entities::room_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoomResponse {
    pub id: i64,
    pub name: String,
    /// Present when the room is mapped to a channel-manager room type.
    pub cm_room_type_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<room_entity::Model> for RoomResponse {
    fn from(m: room_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            cm_room_type_id: m.cm_room_type_id,
            created_at: m.created_at,
        }
    }
}
