// ── Booking request domain type ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::employee::Employee;
use super::entity_id::EntityId;
use super::meeting_room::MeetingRoom;
use super::status::RequestStatus;
use super::{Entity, EntityKind};

/// A reservation of a meeting room for a time range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RequestStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    pub invited_users: Vec<Employee>,
    /// The organizer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee: Option<Employee>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_room: Option<MeetingRoom>,
}

impl Entity for BookingRequest {
    const KIND: EntityKind = EntityKind::BookingRequest;

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn label(&self) -> String {
        let id = self.id.map(|id| format!("#{id}")).unwrap_or_default();
        match (&self.meeting_room, self.start_time) {
            (Some(room), Some(start)) => {
                format!("{id} {} @ {}", room.name, start.format("%Y-%m-%d %H:%M"))
            }
            (Some(room), None) => format!("{id} {}", room.name),
            _ => id,
        }
    }

    fn prepare_create(&mut self) {
        self.status = Some(RequestStatus::Pending);
    }
}
