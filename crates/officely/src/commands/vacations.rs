//! Vacation request command handlers.

use tabled::Tabled;

use officely_core::model::ref_label;
use officely_core::{Decision, EntityId, Office, Reviewable, VacationRequest};

use crate::cli::{GlobalOpts, VacationsArgs, VacationsCommand};
use crate::error::CliError;
use crate::output;

use super::resource::{self, Presenter};
use super::util;

#[derive(Tabled)]
pub struct VacationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Employee")]
    employee: String,
    #[tabled(rename = "From")]
    start: String,
    #[tabled(rename = "To")]
    end: String,
    #[tabled(rename = "Days")]
    days: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "ACTIONS")]
    actions: String,
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl Presenter for VacationRequest {
    type Row = VacationRow;

    fn row(v: &Self, color: bool) -> VacationRow {
        VacationRow {
            id: optional(v.id),
            employee: ref_label(v.employee.as_ref()),
            start: optional(v.start_date),
            end: optional(v.end_date),
            days: optional(v.days()),
            kind: optional(v.vacation_type),
            status: output::status_cell(v.status(), color),
            actions: output::actions_cell(v),
        }
    }

    fn detail(v: &Self, color: bool) -> String {
        let attachments = v
            .attachments
            .iter()
            .map(|a| a.name.clone())
            .collect::<Vec<_>>()
            .join(", ");
        output::detail(&[
            ("ID", optional(v.id)),
            ("Employee", ref_label(v.employee.as_ref())),
            ("From", optional(v.start_date)),
            ("To", optional(v.end_date)),
            ("Days", optional(v.days())),
            ("Type", optional(v.vacation_type)),
            ("Reason", v.reason.clone().unwrap_or_default()),
            ("Status", output::status_cell(v.status(), color)),
            ("Actions", output::actions_cell(v)),
            ("Attachments", attachments),
            ("Created", util::local_time(v.created_at)),
            ("Updated", util::local_time(v.updated_at)),
        ])
    }
}

pub async fn handle(
    office: &Office,
    args: VacationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        VacationsCommand::Common(cmd) => {
            resource::handle::<VacationRequest>(office, cmd, global).await
        }
        VacationsCommand::Mine(list) => {
            resource::list::<VacationRequest>(office, &list, true, global).await
        }
        VacationsCommand::Approve { id } => {
            resource::review::<VacationRequest>(office, EntityId(id), Decision::Approve, global)
                .await
        }
        VacationsCommand::Reject { id } => {
            resource::review::<VacationRequest>(office, EntityId(id), Decision::Reject, global)
                .await
        }
    }
}
