//! Equipment command handlers.

use tabled::Tabled;

use officely_core::{Equipment, Office};

use crate::cli::{EquipmentArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::resource::{self, Presenter};
use super::util;

#[derive(Tabled)]
pub struct EquipmentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Available")]
    available: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl Presenter for Equipment {
    type Row = EquipmentRow;

    fn row(e: &Self, _color: bool) -> EquipmentRow {
        EquipmentRow {
            id: e.id.map(|id| id.to_string()).unwrap_or_default(),
            name: e.name.clone(),
            available: util::yes_no(e.is_available),
            description: e.description.clone().unwrap_or_default(),
        }
    }

    fn detail(e: &Self, _color: bool) -> String {
        output::detail(&[
            ("ID", e.id.map(|id| id.to_string()).unwrap_or_default()),
            ("Name", e.name.clone()),
            ("Available", util::yes_no(e.is_available)),
            ("Description", e.description.clone().unwrap_or_default()),
        ])
    }
}

pub async fn handle(
    office: &Office,
    args: EquipmentArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    resource::handle::<Equipment>(office, args.command, global).await
}
