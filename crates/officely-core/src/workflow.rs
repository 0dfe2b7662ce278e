// ── Approval workflow ──
//
// Booking and vacation requests are approved or rejected by writing the
// whole record back with a new status. There is no dedicated endpoint.

use chrono::{DateTime, Utc};

use crate::error::CoreError;
use crate::model::{BookingRequest, Decision, Entity, RequestStatus, VacationRequest};

/// A record carrying a [`RequestStatus`].
pub trait Reviewable: Entity {
    /// Current status. Records the backend returned without one count as
    /// pending.
    fn status(&self) -> RequestStatus;
    fn set_status(&mut self, status: RequestStatus);
    fn set_updated_at(&mut self, at: DateTime<Utc>);
}

impl Reviewable for BookingRequest {
    fn status(&self) -> RequestStatus {
        self.status.unwrap_or_default()
    }

    fn set_status(&mut self, status: RequestStatus) {
        self.status = Some(status);
    }

    fn set_updated_at(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }
}

impl Reviewable for VacationRequest {
    fn status(&self) -> RequestStatus {
        self.status.unwrap_or_default()
    }

    fn set_status(&mut self, status: RequestStatus) {
        self.status = Some(status);
    }

    fn set_updated_at(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }
}

/// Decisions a reviewer may take on `record`; empty once it is decided.
pub fn available_actions<T: Reviewable>(record: &T) -> &'static [Decision] {
    match record.status() {
        RequestStatus::Pending => &[Decision::Approve, Decision::Reject],
        RequestStatus::Approved | RequestStatus::Rejected => &[],
    }
}

/// The record as it should be written back after `decision`.
pub fn transition<T: Reviewable>(
    record: &T,
    decision: Decision,
    now: DateTime<Utc>,
) -> Result<T, CoreError> {
    let from = record.status();
    let to = decision.target();
    if !from.can_transition_to(to) {
        return Err(CoreError::InvalidTransition { from, to });
    }
    let mut next = record.clone();
    next.set_status(to);
    next.set_updated_at(now);
    Ok(next)
}
