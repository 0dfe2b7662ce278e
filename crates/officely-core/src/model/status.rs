// ── Approval status shared by booking and vacation requests ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// `PENDING → APPROVED | REJECTED`. Both outcomes are terminal.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Whether the workflow allows moving from `self` to `next`.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved | Self::Rejected)
        )
    }
}

/// The reviewer's verdict on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn target(self) -> RequestStatus {
        match self {
            Self::Approve => RequestStatus::Approved,
            Self::Reject => RequestStatus::Rejected,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn only_pending_moves() {
        for from in RequestStatus::iter() {
            for to in RequestStatus::iter() {
                let allowed = from == RequestStatus::Pending && to != RequestStatus::Pending;
                assert_eq!(from.can_transition_to(to), allowed, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn wire_names() {
        assert_eq!(
            serde_json::to_string(&RequestStatus::Approved).unwrap(),
            "\"APPROVED\""
        );
        assert_eq!("rejected".parse::<RequestStatus>().unwrap(), RequestStatus::Rejected);
        assert_eq!(RequestStatus::Pending.to_string(), "PENDING");
    }
}
