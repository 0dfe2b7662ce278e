// ── Equipment domain type ──

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;
use super::meeting_room::MeetingRoom;
use super::{Entity, EntityKind};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Equipment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_available: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub meeting_rooms: Vec<MeetingRoom>,
}

impl Entity for Equipment {
    const KIND: EntityKind = EntityKind::Equipment;

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}
