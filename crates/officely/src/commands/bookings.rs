//! Booking request command handlers.

use tabled::Tabled;

use officely_core::model::ref_label;
use officely_core::{
    BookingRequest, Decision, Entity, EntityId, Office, PageRequest, Reviewable, total_pages,
};

use crate::cli::{BookingsArgs, BookingsCommand, GlobalOpts, ListArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::resource::{self, Presenter};
use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct BookingRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Organizer")]
    organizer: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "ACTIONS")]
    actions: String,
}

fn invited(b: &BookingRequest) -> String {
    b.invited_users
        .iter()
        .map(Entity::label)
        .collect::<Vec<_>>()
        .join(", ")
}

impl Presenter for BookingRequest {
    type Row = BookingRow;

    fn row(b: &Self, color: bool) -> BookingRow {
        BookingRow {
            id: b.id.map(|id| id.to_string()).unwrap_or_default(),
            room: ref_label(b.meeting_room.as_ref()),
            start: util::local_time(b.start_time),
            end: util::local_time(b.end_time),
            organizer: ref_label(b.employee.as_ref()),
            status: output::status_cell(b.status(), color),
            actions: output::actions_cell(b),
        }
    }

    fn detail(b: &Self, color: bool) -> String {
        output::detail(&[
            ("ID", b.id.map(|id| id.to_string()).unwrap_or_default()),
            ("Room", ref_label(b.meeting_room.as_ref())),
            ("Start", util::local_time(b.start_time)),
            ("End", util::local_time(b.end_time)),
            ("Purpose", b.purpose.clone().unwrap_or_default()),
            ("Organizer", ref_label(b.employee.as_ref())),
            ("Invited", invited(b)),
            ("Status", output::status_cell(b.status(), color)),
            ("Actions", output::actions_cell(b)),
            ("Created", util::local_time(b.created_at)),
            ("Updated", util::local_time(b.updated_at)),
        ])
    }
}

// ── Invitations ─────────────────────────────────────────────────────

async fn invitations(office: &Office, args: &ListArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let view = office.invitations();
    let size = args.size.unwrap_or(office.config().page_size);
    let mut request = PageRequest {
        page: args.page - 1,
        size,
        sort: Some(util::parse_sort(&args.sort)?),
    };

    let first = view.load(&request).await?;
    let total = first.total;
    let mut records = first.items;
    if args.all {
        let bar = util::spinner("Fetching invitations", global);
        while u64::from(request.page) + 1 < total_pages(total, size) {
            request.page += 1;
            records.extend(view.load(&request).await?.items);
        }
        bar.finish_and_clear();
    }

    let format = global.format();
    let color = output::should_color(&global.color_mode());
    let out = output::render_list(
        &format,
        &records,
        |b| BookingRequest::row(b, color),
        |b| b.id.map(|id| id.to_string()).unwrap_or_default(),
    )?;
    output::print_output(&out, global.quiet);
    if format == OutputFormat::Table && !args.all {
        output::notice(
            &format!(
                "Page {} of {}, {total} total",
                args.page,
                total_pages(total, size).max(1)
            ),
            global.quiet,
        );
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    office: &Office,
    args: BookingsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        BookingsCommand::Common(cmd) => resource::handle::<BookingRequest>(office, cmd, global).await,
        BookingsCommand::Mine(list) => {
            resource::list::<BookingRequest>(office, &list, true, global).await
        }
        BookingsCommand::Invitations(list) => invitations(office, &list, global).await,
        BookingsCommand::Approve { id } => {
            resource::review::<BookingRequest>(office, EntityId(id), Decision::Approve, global)
                .await
        }
        BookingsCommand::Reject { id } => {
            resource::review::<BookingRequest>(office, EntityId(id), Decision::Reject, global).await
        }
    }
}
