// ── Employee domain type ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::booking::BookingRequest;
use super::entity_id::EntityId;
use super::{Entity, EntityKind};

/// Department an employee belongs to. HR staff review requests.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum DepartmentType {
    #[default]
    Employee,
    Hr,
}

/// The login account an employee record is attached to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Employee {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_role: Option<DepartmentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Remaining vacation days. Deducted by the backend on approval.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vacation_balance: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub invitations: Vec<BookingRequest>,
}

impl Employee {
    pub fn login(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.login.as_deref())
    }
}

impl Entity for Employee {
    const KIND: EntityKind = EntityKind::Employee;

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn label(&self) -> String {
        if self.name.is_empty() {
            self.id.map(|id| format!("#{id}")).unwrap_or_default()
        } else {
            self.name.clone()
        }
    }
}
