// ── Per-entity form definitions ──

use super::coerce::{
    Reader, date_to_display, instant_to_display, reference_to_display, references_to_display,
};
use super::{EntityForm, FieldKind, FieldSpec, FormContext, FormValues, SelectOption};
use crate::error::CoreError;
use crate::model::{
    Attachment, BookingRequest, DepartmentType, Employee, EntityKind, Equipment, MeetingRoom,
    RequestStatus, VacationRequest, VacationType,
};

const NAME_MAX_LEN: Option<usize> = Some(100);

fn values<const N: usize>(pairs: [(&str, String); N]) -> FormValues {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect()
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

// ── Employee ─────────────────────────────────────────────────────────

impl EntityForm for Employee {
    const RELATED: &'static [EntityKind] = &[];

    fn fields() -> &'static [FieldSpec] {
        const FIELDS: &[FieldSpec] = &[
            FieldSpec::text("name", "Name", NAME_MAX_LEN).required(),
            FieldSpec::new("email", "E-mail", FieldKind::Email).required(),
            FieldSpec::new("userRole", "Department", FieldKind::Choice(&["EMPLOYEE", "HR"])),
            FieldSpec::new("createdAt", "Created", FieldKind::DateTime),
            FieldSpec::new(
                "vacationBalance",
                "Vacation days",
                FieldKind::Integer { min: Some(0) },
            ),
        ];
        FIELDS
    }

    fn defaults(ctx: &FormContext) -> FormValues {
        let mut values = Self::default().to_values(ctx);
        values.insert("userRole".into(), DepartmentType::Employee.to_string());
        values.insert("createdAt".into(), instant_to_display(Some(ctx.now), ctx.offset));
        values
    }

    fn to_values(&self, ctx: &FormContext) -> FormValues {
        values([
            ("name", self.name.clone()),
            ("email", self.email.clone()),
            ("userRole", optional(self.user_role)),
            ("createdAt", instant_to_display(self.created_at, ctx.offset)),
            ("vacationBalance", optional(self.vacation_balance)),
        ])
    }

    fn from_values(
        values: &FormValues,
        base: Option<&Self>,
        ctx: &FormContext,
    ) -> Result<Self, CoreError> {
        let mut reader = Reader::new(values, ctx.offset);
        let mut record = base.cloned().unwrap_or_default();
        record.name = reader.string("name");
        record.email = reader.string("email");
        record.user_role = reader.choice("userRole");
        record.created_at = reader.instant("createdAt", base.and_then(|b| b.created_at));
        record.vacation_balance = reader.number("vacationBalance");
        reader.finish(record)
    }
}

// ── Meeting room ─────────────────────────────────────────────────────

impl EntityForm for MeetingRoom {
    const RELATED: &'static [EntityKind] = &[EntityKind::Equipment];

    fn fields() -> &'static [FieldSpec] {
        const FIELDS: &[FieldSpec] = &[
            FieldSpec::text("name", "Name", NAME_MAX_LEN).required(),
            FieldSpec::new("capacity", "Capacity", FieldKind::Integer { min: Some(1) }),
            FieldSpec::new("requiresApproval", "Requires approval", FieldKind::Flag),
            FieldSpec::new(
                "equipment",
                "Equipment",
                FieldKind::References(EntityKind::Equipment),
            ),
        ];
        FIELDS
    }

    fn to_values(&self, _ctx: &FormContext) -> FormValues {
        values([
            ("name", self.name.clone()),
            ("capacity", optional(self.capacity)),
            ("requiresApproval", self.requires_approval.to_string()),
            ("equipment", references_to_display(&self.equipment)),
        ])
    }

    fn from_values(
        values: &FormValues,
        base: Option<&Self>,
        ctx: &FormContext,
    ) -> Result<Self, CoreError> {
        let mut reader = Reader::new(values, ctx.offset);
        let mut record = base.cloned().unwrap_or_default();
        record.name = reader.string("name");
        record.capacity = reader.number("capacity");
        record.requires_approval = reader.flag("requiresApproval");
        record.equipment = reader.references(
            "equipment",
            base.map_or(&[][..], |b| &b.equipment),
            &ctx.related.equipment,
        );
        reader.finish(record)
    }

    fn options(field: &str, ctx: &FormContext) -> Vec<SelectOption> {
        match field {
            "equipment" => SelectOption::of(&ctx.related.equipment),
            _ => Vec::new(),
        }
    }
}

// ── Equipment ────────────────────────────────────────────────────────

impl EntityForm for Equipment {
    const RELATED: &'static [EntityKind] = &[];

    fn fields() -> &'static [FieldSpec] {
        const FIELDS: &[FieldSpec] = &[
            FieldSpec::text("name", "Name", NAME_MAX_LEN).required(),
            FieldSpec::text("description", "Description", None),
            FieldSpec::new("isAvailable", "Available", FieldKind::Flag),
        ];
        FIELDS
    }

    fn to_values(&self, _ctx: &FormContext) -> FormValues {
        values([
            ("name", self.name.clone()),
            ("description", self.description.clone().unwrap_or_default()),
            ("isAvailable", self.is_available.to_string()),
        ])
    }

    fn from_values(
        values: &FormValues,
        base: Option<&Self>,
        ctx: &FormContext,
    ) -> Result<Self, CoreError> {
        let mut reader = Reader::new(values, ctx.offset);
        let mut record = base.cloned().unwrap_or_default();
        record.name = reader.string("name");
        record.description = reader.text("description");
        record.is_available = reader.flag("isAvailable");
        reader.finish(record)
    }
}

// ── Booking request ──────────────────────────────────────────────────

/// Employees the signed-in user can invite: everyone but themselves.
fn invitable(ctx: &FormContext) -> Vec<Employee> {
    let me = ctx.current_employee().and_then(|e| e.id);
    ctx.related
        .employees
        .iter()
        .filter(|e| me.is_none() || e.id != me)
        .cloned()
        .collect()
}

impl EntityForm for BookingRequest {
    const RELATED: &'static [EntityKind] = &[EntityKind::MeetingRoom, EntityKind::Employee];

    fn fields() -> &'static [FieldSpec] {
        const FIELDS: &[FieldSpec] = &[
            FieldSpec::new("startTime", "Start", FieldKind::DateTime).required(),
            FieldSpec::new("endTime", "End", FieldKind::DateTime).required(),
            FieldSpec::text("purpose", "Purpose", Some(500)),
            FieldSpec::new(
                "meetingRoom",
                "Room",
                FieldKind::Reference(EntityKind::MeetingRoom),
            )
            .required(),
            FieldSpec::new(
                "invitedUsers",
                "Invited",
                FieldKind::References(EntityKind::Employee),
            ),
        ];
        FIELDS
    }

    fn to_values(&self, ctx: &FormContext) -> FormValues {
        values([
            ("startTime", instant_to_display(self.start_time, ctx.offset)),
            ("endTime", instant_to_display(self.end_time, ctx.offset)),
            ("purpose", self.purpose.clone().unwrap_or_default()),
            ("meetingRoom", reference_to_display(self.meeting_room.as_ref())),
            ("invitedUsers", references_to_display(&self.invited_users)),
        ])
    }

    fn from_values(
        values: &FormValues,
        base: Option<&Self>,
        ctx: &FormContext,
    ) -> Result<Self, CoreError> {
        let mut reader = Reader::new(values, ctx.offset);
        let mut record = base.cloned().unwrap_or_default();
        record.start_time = reader.instant("startTime", base.and_then(|b| b.start_time));
        record.end_time = reader.instant("endTime", base.and_then(|b| b.end_time));
        record.purpose = reader.text("purpose");
        record.meeting_room = reader.reference(
            "meetingRoom",
            base.and_then(|b| b.meeting_room.as_ref()),
            &ctx.related.meeting_rooms,
        );
        record.invited_users = reader.references(
            "invitedUsers",
            base.map_or(&[][..], |b| &b.invited_users),
            &invitable(ctx),
        );

        if let (Some(start), Some(end)) = (record.start_time, record.end_time) {
            if start >= end {
                reader.error("endTime", "must be after the start time");
            }
        }

        if base.is_none() {
            record.status = Some(RequestStatus::Pending);
            record.created_at = Some(ctx.now);
            match ctx.current_employee() {
                Some(me) => record.employee = Some(me.clone()),
                None => reader.error(
                    "employee",
                    "no employee record is linked to the signed-in account",
                ),
            }
        }
        reader.finish(record)
    }

    fn options(field: &str, ctx: &FormContext) -> Vec<SelectOption> {
        match field {
            "meetingRoom" => SelectOption::of(&ctx.related.meeting_rooms),
            "invitedUsers" => SelectOption::of(&invitable(ctx)),
            _ => Vec::new(),
        }
    }
}

// ── Vacation request ─────────────────────────────────────────────────

impl EntityForm for VacationRequest {
    const RELATED: &'static [EntityKind] = &[EntityKind::Employee];

    fn fields() -> &'static [FieldSpec] {
        const FIELDS: &[FieldSpec] = &[
            FieldSpec::new("startDate", "From", FieldKind::Date).required(),
            FieldSpec::new("endDate", "To", FieldKind::Date).required(),
            FieldSpec::new("type", "Type", FieldKind::Choice(&["ANNUAL", "SICK"])).required(),
            FieldSpec::text("reason", "Reason", None),
            // Ignored on create: the owner is the signed-in employee.
            FieldSpec::new(
                "employee",
                "Employee",
                FieldKind::Reference(EntityKind::Employee),
            ),
        ];
        FIELDS
    }

    fn defaults(ctx: &FormContext) -> FormValues {
        let mut values = Self::default().to_values(ctx);
        values.insert("type".into(), VacationType::Annual.to_string());
        values.insert("employee".into(), reference_to_display(ctx.current_employee()));
        values
    }

    fn to_values(&self, _ctx: &FormContext) -> FormValues {
        values([
            ("startDate", date_to_display(self.start_date)),
            ("endDate", date_to_display(self.end_date)),
            ("type", optional(self.vacation_type)),
            ("reason", self.reason.clone().unwrap_or_default()),
            ("employee", reference_to_display(self.employee.as_ref())),
        ])
    }

    fn from_values(
        values: &FormValues,
        base: Option<&Self>,
        ctx: &FormContext,
    ) -> Result<Self, CoreError> {
        let mut reader = Reader::new(values, ctx.offset);
        let mut record = base.cloned().unwrap_or_default();
        record.start_date = reader.date("startDate");
        record.end_date = reader.date("endDate");
        record.vacation_type = reader.choice("type");
        record.reason = reader.text("reason");

        if let (Some(start), Some(end)) = (record.start_date, record.end_date) {
            if start > end {
                reader.error("endDate", "must not be before the start date");
            }
        }
        match base {
            Some(stored) => {
                record.employee = reader.reference(
                    "employee",
                    stored.employee.as_ref(),
                    &ctx.related.employees,
                );
                if values.get("employee").is_none_or(|v| v.trim().is_empty()) {
                    reader.error("employee", "is required");
                }
            }
            None => {
                record.status = Some(RequestStatus::Pending);
                record.created_at = Some(ctx.now);
                match ctx.current_employee() {
                    Some(me) => record.employee = Some(me.clone()),
                    None => reader.error(
                        "employee",
                        "no employee record is linked to the signed-in account",
                    ),
                }
            }
        }
        reader.finish(record)
    }

    fn options(field: &str, ctx: &FormContext) -> Vec<SelectOption> {
        match field {
            "employee" => SelectOption::of(&ctx.related.employees),
            _ => Vec::new(),
        }
    }
}

// ── Attachment ───────────────────────────────────────────────────────

impl EntityForm for Attachment {
    const RELATED: &'static [EntityKind] = &[EntityKind::VacationRequest];

    fn fields() -> &'static [FieldSpec] {
        const FIELDS: &[FieldSpec] = &[
            FieldSpec::text("name", "File name", Some(255)).required(),
            FieldSpec::text("url", "URL", Some(2048)).required(),
            FieldSpec::new("fileSize", "Size (bytes)", FieldKind::Integer { min: Some(0) }),
            FieldSpec::text("contentType", "Content type", Some(100)),
            FieldSpec::new("uploadedAt", "Uploaded", FieldKind::DateTime),
            FieldSpec::new(
                "vacationRequest",
                "Vacation request",
                FieldKind::Reference(EntityKind::VacationRequest),
            )
            .required(),
        ];
        FIELDS
    }

    fn defaults(ctx: &FormContext) -> FormValues {
        let mut values = Self::default().to_values(ctx);
        values.insert("uploadedAt".into(), instant_to_display(Some(ctx.now), ctx.offset));
        values
    }

    fn to_values(&self, ctx: &FormContext) -> FormValues {
        values([
            ("name", self.name.clone()),
            ("url", self.url.clone()),
            ("fileSize", optional(self.file_size)),
            ("contentType", self.content_type.clone().unwrap_or_default()),
            ("uploadedAt", instant_to_display(self.uploaded_at, ctx.offset)),
            (
                "vacationRequest",
                reference_to_display(self.vacation_request.as_deref()),
            ),
        ])
    }

    fn from_values(
        values: &FormValues,
        base: Option<&Self>,
        ctx: &FormContext,
    ) -> Result<Self, CoreError> {
        let mut reader = Reader::new(values, ctx.offset);
        let mut record = base.cloned().unwrap_or_default();
        record.name = reader.string("name");
        record.url = reader.string("url");
        record.file_size = reader.number("fileSize");
        record.content_type = reader.text("contentType");
        record.uploaded_at = reader.instant("uploadedAt", base.and_then(|b| b.uploaded_at));
        record.vacation_request = reader
            .reference(
                "vacationRequest",
                base.and_then(|b| b.vacation_request.as_deref()),
                &ctx.related.vacation_requests,
            )
            .map(Box::new);
        reader.finish(record)
    }

    fn options(field: &str, ctx: &FormContext) -> Vec<SelectOption> {
        match field {
            "vacationRequest" => SelectOption::of(&ctx.related.vacation_requests),
            _ => Vec::new(),
        }
    }
}
