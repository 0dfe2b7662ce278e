// ── Vacation request domain type ──

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::attachment::Attachment;
use super::employee::Employee;
use super::entity_id::EntityId;
use super::status::RequestStatus;
use super::{Entity, EntityKind};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum VacationType {
    #[default]
    Annual,
    Sick,
}

/// An employee's leave request. Dates are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VacationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub vacation_type: Option<VacationType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RequestStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee: Option<Employee>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl VacationRequest {
    /// Number of calendar days covered, counting both ends.
    pub fn days(&self) -> Option<i64> {
        let (start, end) = (self.start_date?, self.end_date?);
        Some((end - start).num_days() + 1)
    }
}

impl Entity for VacationRequest {
    const KIND: EntityKind = EntityKind::VacationRequest;

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn label(&self) -> String {
        let id = self.id.map(|id| format!("#{id}")).unwrap_or_default();
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => format!("{id} {start}..{end}"),
            _ => id,
        }
    }

    fn prepare_create(&mut self) {
        self.status = Some(RequestStatus::Pending);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_are_inclusive() {
        let request = VacationRequest {
            start_date: NaiveDate::from_ymd_opt(2025, 3, 3),
            end_date: NaiveDate::from_ymd_opt(2025, 3, 7),
            ..VacationRequest::default()
        };
        assert_eq!(request.days(), Some(5));
        assert_eq!(VacationRequest::default().days(), None);
    }
}
