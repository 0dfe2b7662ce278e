//! Handlers shared by every record type: list, get, create, update,
//! delete, count and fields.

use tabled::Tabled;

use officely_core::{
    CoreError, Decision, EntityId, FieldKind, FormMode, Office, PaginationState, Resource,
    Reviewable,
};

use crate::cli::{FieldArgs, GlobalOpts, ListArgs, OutputFormat, ResourceCommand};
use crate::error::{CliError, command_for};
use crate::output;

use super::util;

/// How one record type shows up in tables and detail views.
pub trait Presenter: Resource {
    type Row: Tabled;

    fn row(record: &Self, color: bool) -> Self::Row;

    fn detail(record: &Self, color: bool) -> String;
}

// ── Dispatch ────────────────────────────────────────────────────────

pub async fn handle<T: Presenter>(
    office: &Office,
    cmd: ResourceCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        ResourceCommand::List(args) => list::<T>(office, &args, false, global).await,
        ResourceCommand::Get { id } => {
            let record = office.service::<T>().get(EntityId(id)).await?;
            show(&record, global)
        }
        ResourceCommand::Create(fields) => save::<T>(office, FormMode::Create, &fields, global).await,
        ResourceCommand::Update { id, fields } => {
            save::<T>(office, FormMode::Edit(EntityId(id)), &fields, global).await
        }
        ResourceCommand::Delete { id } => delete::<T>(office, EntityId(id), global).await,
        ResourceCommand::Count => {
            let count = office.service::<T>().count().await?;
            let out = output::render_single(
                &global.format(),
                &count,
                u64::to_string,
                u64::to_string,
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
        ResourceCommand::Fields => fields::<T>(global),
    }
}

// ── Reads ───────────────────────────────────────────────────────────

/// One page (or with `--all`, every page) of the collection, or of the
/// caller's own records when `own` is set.
pub async fn list<T: Presenter>(
    office: &Office,
    args: &ListArgs,
    own: bool,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let sort = util::parse_sort(&args.sort)?;
    let mut state =
        PaginationState::default().with_page_size(args.size.unwrap_or(office.config().page_size));
    state.sort = sort.field;
    state.order = sort.direction;
    state.set_page(args.page);

    let mut list = office.list::<T>().with_state(state);
    if own {
        list = list.own();
    }

    let format = global.format();
    let color = output::should_color(&global.color_mode());
    let page = list.mount().await?;

    let records = if args.all {
        let bar = util::spinner(&format!("Fetching {} records", T::KIND.label()), global);
        let mut records = page.items;
        while list.has_next_page() {
            let next = list.pagination().active_page + 1;
            bar.set_message(format!("Fetching page {next} of {}", list.total_pages()));
            records.extend(list.go_to_page(next).await?.items);
        }
        bar.finish_and_clear();
        records
    } else {
        page.items
    };

    let out = output::render_list(
        &format,
        &records,
        |r| T::row(r, color),
        |r| r.id().map(|id| id.to_string()).unwrap_or_default(),
    )?;
    output::print_output(&out, global.quiet);

    if format == OutputFormat::Table && !args.all {
        let pagination = list.pagination();
        let mut footer = format!(
            "Page {} of {}, {} total",
            pagination.active_page,
            list.total_pages().max(1),
            list.entities().total_items
        );
        if list.has_next_page() {
            footer.push_str(&format!(" (next: --page {})", pagination.active_page + 1));
        }
        output::notice(&footer, global.quiet);
    }
    Ok(())
}

pub fn show<T: Presenter>(record: &T, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color_mode());
    let out = output::render_single(
        &global.format(),
        record,
        |r| T::detail(r, color),
        |r| r.id().map(|id| id.to_string()).unwrap_or_default(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Writes ──────────────────────────────────────────────────────────

/// Mount the form, apply the given values and submit it.
async fn save<T: Presenter>(
    office: &Office,
    mode: FormMode,
    fields: &FieldArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let values = util::collect_fields(fields)?;
    if values.is_empty() && matches!(mode, FormMode::Edit(_)) {
        return Err(CliError::Validation {
            field: "set".into(),
            reason: "nothing to change; pass --set FIELD=VALUE".into(),
        });
    }

    let bar = util::spinner("Loading form", global);
    let mounted = office.form::<T>(mode, util::local_offset()).await;
    bar.finish_and_clear();
    let mut form = mounted?;

    for (field, value) in values {
        form.set(&field, value).map_err(form_error::<T>)?;
    }
    let submitted = form.submit().await.map_err(form_error::<T>)?;

    let verb = match mode {
        FormMode::Create => "created",
        FormMode::Edit(_) => "updated",
    };
    output::notice(
        &format!(
            "{} {} {verb}",
            util::capitalize(T::KIND.label()),
            submitted
                .record
                .id()
                .map(|id| id.to_string())
                .unwrap_or_default()
        ),
        global.quiet,
    );
    show(&submitted.record, global)
}

async fn delete<T: Presenter>(
    office: &Office,
    id: EntityId,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let label = T::KIND.label();
    if !util::confirm(&format!("Delete {label} {id}?"), global.yes)? {
        output::notice("Aborted", global.quiet);
        return Ok(());
    }
    office.service::<T>().remove(id).await?;
    output::notice(&format!("{} {id} deleted", util::capitalize(label)), global.quiet);
    Ok(())
}

/// Approve or reject a pending request.
pub async fn review<T: Presenter + Reviewable>(
    office: &Office,
    id: EntityId,
    decision: Decision,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let record = office.service::<T>().review_by_id(id, decision).await?;
    output::notice(
        &format!(
            "{} {id} {}",
            util::capitalize(T::KIND.label()),
            decision.target().to_string().to_lowercase()
        ),
        global.quiet,
    );
    show(&record, global)
}

/// Form validation failures point at `officely <cmd> fields`.
fn form_error<T: Resource>(err: CoreError) -> CliError {
    match err {
        CoreError::Validation(errors) => CliError::InvalidRecord {
            details: errors.to_string(),
            hint: format!(
                "Run: officely {} fields to see accepted fields and formats",
                command_for(T::KIND)
            ),
        },
        other => other.into(),
    }
}

// ── Field reference ─────────────────────────────────────────────────

#[derive(Clone, Tabled, serde::Serialize)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Label")]
    label: &'static str,
    #[tabled(rename = "Required")]
    required: String,
    #[tabled(rename = "Format")]
    format: String,
}

fn describe(kind: &FieldKind) -> String {
    match kind {
        FieldKind::Text { max_len: Some(n) } => format!("text, up to {n} characters"),
        FieldKind::Text { max_len: None } => "text".into(),
        FieldKind::Email => "e-mail address".into(),
        FieldKind::Integer { min: Some(min) } => format!("whole number >= {min}"),
        FieldKind::Integer { min: None } => "whole number".into(),
        FieldKind::Flag => "true / false".into(),
        FieldKind::DateTime => "YYYY-MM-DDTHH:MM, local time".into(),
        FieldKind::Date => "YYYY-MM-DD".into(),
        FieldKind::Choice(options) => format!("one of {}", options.join(", ")),
        FieldKind::Reference(kind) => format!("{} id", kind.label()),
        FieldKind::References(kind) => format!("comma-separated {} ids", kind.label()),
    }
}

fn fields<T: Presenter>(global: &GlobalOpts) -> Result<(), CliError> {
    let rows: Vec<FieldRow> = T::fields()
        .iter()
        .map(|spec| FieldRow {
            field: spec.name,
            label: spec.label,
            required: util::yes_no(spec.required),
            format: describe(&spec.kind),
        })
        .collect();
    let out = output::render_list(
        &global.format(),
        &rows,
        FieldRow::clone,
        |r| r.field.to_owned(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
