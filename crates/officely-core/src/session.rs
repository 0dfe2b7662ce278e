// ── Authenticated session ──
//
// Who the caller is decides which list a role-sensitive refresh re-runs.
// The account is swapped atomically when it is (re)loaded.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::model::Account;

/// The caller's identity as last reported by the backend.
#[derive(Default)]
pub struct Session {
    account: ArcSwapOption<Account>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_account(account: Account) -> Self {
        let session = Self::default();
        session.set_account(Some(account));
        session
    }

    pub fn set_account(&self, account: Option<Account>) {
        self.account.store(account.map(Arc::new));
    }

    pub fn account(&self) -> Option<Arc<Account>> {
        self.account.load_full()
    }

    pub fn login(&self) -> Option<String> {
        self.account().map(|a| a.login.clone())
    }

    /// Reviewers (admins and HR) see every request.
    pub fn is_reviewer(&self) -> bool {
        self.account().is_some_and(|a| a.is_reviewer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Authority;

    #[test]
    fn anonymous_is_not_a_reviewer() {
        let session = Session::anonymous();
        assert!(!session.is_reviewer());
        assert_eq!(session.login(), None);
    }

    #[test]
    fn account_swap() {
        let session = Session::with_account(Account {
            login: "hr".into(),
            authorities: vec![Authority::HR.into()],
            ..Account::default()
        });
        assert!(session.is_reviewer());
        session.set_account(None);
        assert!(!session.is_reviewer());
    }
}
