// ── Domain model ──
//
// Canonical record types exchanged with the backend. Relations are carried
// as nested references; the backend fills in as much of each reference as
// its DTO mapping exposes, so every field tolerates absence on input.

mod account;
mod attachment;
mod booking;
mod employee;
mod entity_id;
mod equipment;
mod meeting_room;
mod status;
mod vacation;

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use strum::{Display, EnumIter, EnumString};

use officely_api::paths;

pub use account::{Account, Authority};
pub use attachment::Attachment;
pub use booking::BookingRequest;
pub use employee::{DepartmentType, Employee, UserRef};
pub use entity_id::EntityId;
pub use equipment::Equipment;
pub use meeting_room::MeetingRoom;
pub use status::{Decision, RequestStatus};
pub use vacation::{VacationRequest, VacationType};

/// The six record types served by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum EntityKind {
    Employee,
    MeetingRoom,
    Equipment,
    BookingRequest,
    VacationRequest,
    Attachment,
}

impl EntityKind {
    /// Collection path, relative to the backend root.
    pub fn path(self) -> &'static str {
        match self {
            Self::Employee => paths::EMPLOYEES,
            Self::MeetingRoom => paths::MEETING_ROOMS,
            Self::Equipment => paths::EQUIPMENT,
            Self::BookingRequest => paths::BOOKING_REQUESTS,
            Self::VacationRequest => paths::VACATION_REQUESTS,
            Self::Attachment => paths::ATTACHMENTS,
        }
    }

    /// Path of the caller's own subset, for kinds that have one.
    pub fn own_path(self) -> Option<&'static str> {
        match self {
            Self::BookingRequest => Some(paths::MY_BOOKING_REQUESTS),
            Self::VacationRequest => Some(paths::MY_VACATION_REQUESTS),
            _ => None,
        }
    }

    /// Whether list refreshes depend on the caller's granted roles.
    pub fn is_role_sensitive(self) -> bool {
        self.own_path().is_some()
    }

    /// Human-readable singular name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::MeetingRoom => "meeting room",
            Self::Equipment => "equipment",
            Self::BookingRequest => "booking request",
            Self::VacationRequest => "vacation request",
            Self::Attachment => "attachment",
        }
    }
}

/// A record type with its own REST collection.
pub trait Entity:
    Clone + fmt::Debug + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const KIND: EntityKind;

    fn id(&self) -> Option<EntityId>;

    /// Short text identifying the record in selection lists and tables.
    fn label(&self) -> String;

    /// Adjust a record about to be created. Workflow records always enter
    /// the backend as pending, whatever status the caller supplied.
    fn prepare_create(&mut self) {}
}

/// Label of an optional reference, or an empty string.
pub fn ref_label<T: Entity>(reference: Option<&T>) -> String {
    reference.map(Entity::label).unwrap_or_default()
}
