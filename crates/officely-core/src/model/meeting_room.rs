// ── Meeting room domain type ──

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;
use super::equipment::Equipment;
use super::{Entity, EntityKind};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeetingRoom {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i32>,
    /// Bookings of this room start out pending rather than approved.
    pub requires_approval: bool,
    pub equipment: Vec<Equipment>,
}

impl Entity for MeetingRoom {
    const KIND: EntityKind = EntityKind::MeetingRoom;

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}
