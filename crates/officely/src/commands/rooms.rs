//! Meeting room command handlers.

use tabled::Tabled;

use officely_core::{Entity, MeetingRoom, Office};

use crate::cli::{GlobalOpts, RoomsArgs};
use crate::error::CliError;
use crate::output;

use super::resource::{self, Presenter};
use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct RoomRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Capacity")]
    capacity: String,
    #[tabled(rename = "Approval")]
    approval: String,
    #[tabled(rename = "Equipment")]
    equipment: String,
}

fn equipment_names(room: &MeetingRoom) -> String {
    room.equipment
        .iter()
        .map(Entity::label)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<&MeetingRoom> for RoomRow {
    fn from(r: &MeetingRoom) -> Self {
        Self {
            id: r.id.map(|id| id.to_string()).unwrap_or_default(),
            name: r.name.clone(),
            capacity: r.capacity.map(|c| c.to_string()).unwrap_or_default(),
            approval: util::yes_no(r.requires_approval),
            equipment: equipment_names(r),
        }
    }
}

impl Presenter for MeetingRoom {
    type Row = RoomRow;

    fn row(record: &Self, _color: bool) -> RoomRow {
        RoomRow::from(record)
    }

    fn detail(r: &Self, _color: bool) -> String {
        output::detail(&[
            ("ID", r.id.map(|id| id.to_string()).unwrap_or_default()),
            ("Name", r.name.clone()),
            ("Capacity", r.capacity.map(|c| c.to_string()).unwrap_or_default()),
            ("Requires approval", util::yes_no(r.requires_approval)),
            ("Equipment", equipment_names(r)),
        ])
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(office: &Office, args: RoomsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    resource::handle::<MeetingRoom>(office, args.command, global).await
}
