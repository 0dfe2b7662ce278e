//! Attachment command handlers.

use tabled::Tabled;

use officely_core::{Attachment, Office};

use crate::cli::{AttachmentsArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::resource::{self, Presenter};
use super::util;

#[derive(Tabled)]
pub struct AttachmentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    content_type: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Vacation")]
    vacation: String,
}

fn vacation_id(a: &Attachment) -> String {
    a.vacation_request
        .as_ref()
        .and_then(|v| v.id)
        .map(|id| id.to_string())
        .unwrap_or_default()
}

impl Presenter for Attachment {
    type Row = AttachmentRow;

    fn row(a: &Self, _color: bool) -> AttachmentRow {
        AttachmentRow {
            id: a.id.map(|id| id.to_string()).unwrap_or_default(),
            name: a.name.clone(),
            content_type: a.content_type.clone().unwrap_or_default(),
            size: a.file_size.map(|s| s.to_string()).unwrap_or_default(),
            vacation: vacation_id(a),
        }
    }

    fn detail(a: &Self, _color: bool) -> String {
        output::detail(&[
            ("ID", a.id.map(|id| id.to_string()).unwrap_or_default()),
            ("Name", a.name.clone()),
            ("URL", a.url.clone()),
            ("Type", a.content_type.clone().unwrap_or_default()),
            ("Size (bytes)", a.file_size.map(|s| s.to_string()).unwrap_or_default()),
            ("Uploaded", util::local_time(a.uploaded_at)),
            ("Vacation request", vacation_id(a)),
        ])
    }
}

pub async fn handle(
    office: &Office,
    args: AttachmentsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    resource::handle::<Attachment>(office, args.command, global).await
}
