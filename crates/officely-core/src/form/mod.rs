// ── Entity form controller ──
//
// A form is a map of field name → text. Editing starts from a fetched
// record, creating from defaults; submitting converts the text back into
// a record (resolving references against the related lists) and sends it
// through the request layer.

mod coerce;
mod entities;
mod validate;

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use indexmap::IndexMap;
use tracing::debug;

use crate::error::CoreError;
use crate::model::{
    Account, Employee, Entity, EntityId, EntityKind, Equipment, MeetingRoom, VacationRequest,
};
use crate::service::EntityService;

pub use coerce::{
    DATE_FORMAT, DATETIME_FORMAT, date_to_display, display_to_instant, instant_to_display,
    parse_display_date, parse_display_instant, parse_flag, resolve_reference,
    resolve_references,
};
pub use validate::{EMAIL_MAX_LEN, FieldError, ValidationErrors, validate};

/// Field name → display text, in declaration order.
pub type FormValues = IndexMap<String, String>;

/// How a field's text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text { max_len: Option<usize> },
    Email,
    Integer { min: Option<i64> },
    Flag,
    /// Local date and time, minute precision.
    DateTime,
    Date,
    Choice(&'static [&'static str]),
    /// One record id out of a related list.
    Reference(EntityKind),
    /// Comma-separated record ids out of a related list.
    References(EntityKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
        }
    }

    pub const fn text(name: &'static str, label: &'static str, max_len: Option<usize>) -> Self {
        Self::new(name, label, FieldKind::Text { max_len })
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(EntityId),
}

/// Records the selection fields of a form choose from.
#[derive(Debug, Clone, Default)]
pub struct RelatedLists {
    pub employees: Vec<Employee>,
    pub meeting_rooms: Vec<MeetingRoom>,
    pub equipment: Vec<Equipment>,
    pub vacation_requests: Vec<VacationRequest>,
}

/// Everything besides the values that converting a form depends on.
#[derive(Debug, Clone)]
pub struct FormContext {
    pub related: RelatedLists,
    pub account: Option<Arc<Account>>,
    pub now: DateTime<Utc>,
    /// Zone the display values are written in.
    pub offset: FixedOffset,
}

impl FormContext {
    pub fn new(related: RelatedLists, account: Option<Arc<Account>>, offset: FixedOffset) -> Self {
        Self {
            related,
            account,
            now: Utc::now(),
            offset,
        }
    }

    #[must_use]
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// The employee record linked to the signed-in account.
    pub fn current_employee(&self) -> Option<&Employee> {
        let login = self.account.as_ref()?.login.as_str();
        self.related
            .employees
            .iter()
            .find(|e| e.login() == Some(login))
    }
}

/// One entry of a selection field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub id: EntityId,
    pub label: String,
}

impl SelectOption {
    pub(crate) fn of<T: Entity>(records: &[T]) -> Vec<Self> {
        records
            .iter()
            .filter_map(|r| {
                r.id().map(|id| Self {
                    id,
                    label: r.label(),
                })
            })
            .collect()
    }
}

/// Conversion between a record and its form.
pub trait EntityForm: Entity {
    /// Kinds whose lists fill this form's selection fields.
    const RELATED: &'static [EntityKind];

    fn fields() -> &'static [FieldSpec];

    /// Values of a blank "new" form.
    fn defaults(ctx: &FormContext) -> FormValues {
        Self::default().to_values(ctx)
    }

    fn to_values(&self, ctx: &FormContext) -> FormValues;

    /// Build a record from `values`. Fields the form does not show are
    /// carried over from `base`.
    fn from_values(
        values: &FormValues,
        base: Option<&Self>,
        ctx: &FormContext,
    ) -> Result<Self, CoreError>;

    fn options(_field: &str, _ctx: &FormContext) -> Vec<SelectOption> {
        Vec::new()
    }
}

/// Where a successful submit leads.
#[derive(Debug, Clone, PartialEq)]
pub struct Submitted<T> {
    pub record: T,
    pub navigate_to: String,
}

/// Drives one create or edit form.
pub struct FormController<T: EntityForm> {
    service: Arc<EntityService<T>>,
    mode: FormMode,
    base: Option<T>,
    ctx: FormContext,
    values: FormValues,
}

impl<T: EntityForm> FormController<T> {
    /// Load the record being edited (if any) and pre-populate the values.
    pub async fn mount(
        service: Arc<EntityService<T>>,
        ctx: FormContext,
        mode: FormMode,
    ) -> Result<Self, CoreError> {
        let base = match mode {
            FormMode::Create => {
                service.reset();
                None
            }
            FormMode::Edit(id) => Some(service.get(id).await?),
        };
        Ok(Self::with_base(service, ctx, mode, base))
    }

    /// Build from an already loaded record.
    pub fn with_base(
        service: Arc<EntityService<T>>,
        ctx: FormContext,
        mode: FormMode,
        base: Option<T>,
    ) -> Self {
        let values = match &base {
            Some(record) => record.to_values(&ctx),
            None => T::defaults(&ctx),
        };
        Self {
            service,
            mode,
            base,
            ctx,
            values,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn base(&self) -> Option<&T> {
        self.base.as_ref()
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn context(&self) -> &FormContext {
        &self.ctx
    }

    pub fn options(&self, field: &str) -> Vec<SelectOption> {
        T::options(field, &self.ctx)
    }

    /// Change one field. Only fields the form declares are accepted.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> Result<(), CoreError> {
        let spec = T::fields()
            .iter()
            .find(|f| f.name == field || f.name.eq_ignore_ascii_case(field))
            .ok_or_else(|| CoreError::UnknownField {
                entity_type: T::KIND,
                field: field.to_owned(),
            })?;
        self.values.insert(spec.name.to_owned(), value.into());
        Ok(())
    }

    /// Validate the values and turn them into the record to send.
    pub fn build(&self) -> Result<T, CoreError> {
        validate(T::fields(), &self.values).map_err(CoreError::Validation)?;
        let record = T::from_values(&self.values, self.base.as_ref(), &self.ctx)?;
        debug!(kind = %T::KIND, mode = ?self.mode, "form built");
        Ok(record)
    }

    /// Create or update, then point back at the list.
    pub async fn submit(&self) -> Result<Submitted<T>, CoreError> {
        let record = self.build()?;
        let record = match self.mode {
            FormMode::Create => self.service.create(&record).await?,
            FormMode::Edit(_) => self.service.update(&record).await?,
        };
        Ok(Submitted {
            record,
            navigate_to: format!("/{}", T::KIND),
        })
    }
}
