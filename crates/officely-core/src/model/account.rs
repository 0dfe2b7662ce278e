// ── Authenticated account ──

use serde::{Deserialize, Serialize};

/// Granted authorities the client cares about.
pub struct Authority;

impl Authority {
    pub const ADMIN: &'static str = "ROLE_ADMIN";
    pub const HR: &'static str = "ROLE_HR";
    pub const USER: &'static str = "ROLE_USER";
}

/// The caller, as reported by `GET /api/account`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Account {
    pub login: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub activated: bool,
    pub authorities: Vec<String>,
}

impl Account {
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }

    pub fn has_any_authority(&self, authorities: &[&str]) -> bool {
        authorities.iter().any(|a| self.has_authority(a))
    }

    /// Reviewers see every request instead of only their own.
    pub fn is_reviewer(&self) -> bool {
        self.has_any_authority(&[Authority::ADMIN, Authority::HR])
    }

    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            _ => self.login.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(authorities: &[&str]) -> Account {
        Account {
            login: "alice".into(),
            authorities: authorities.iter().map(|a| (*a).to_owned()).collect(),
            ..Account::default()
        }
    }

    #[test]
    fn reviewers() {
        assert!(account(&[Authority::USER, Authority::ADMIN]).is_reviewer());
        assert!(account(&[Authority::HR]).is_reviewer());
        assert!(!account(&[Authority::USER]).is_reviewer());
        assert!(!Account::default().is_reviewer());
    }
}
