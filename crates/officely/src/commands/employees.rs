//! Employee command handlers.

use tabled::Tabled;

use officely_core::{Employee, Office};

use crate::cli::{EmployeesArgs, EmployeesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::resource::{self, Presenter};
use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct EmployeeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "E-mail")]
    email: String,
    #[tabled(rename = "Department")]
    department: String,
    #[tabled(rename = "Vacation days")]
    balance: String,
}

impl From<&Employee> for EmployeeRow {
    fn from(e: &Employee) -> Self {
        Self {
            id: e.id.map(|id| id.to_string()).unwrap_or_default(),
            name: e.name.clone(),
            email: e.email.clone(),
            department: e.user_role.map(|r| r.to_string()).unwrap_or_default(),
            balance: e.vacation_balance.map(|b| b.to_string()).unwrap_or_default(),
        }
    }
}

impl Presenter for Employee {
    type Row = EmployeeRow;

    fn row(record: &Self, _color: bool) -> EmployeeRow {
        EmployeeRow::from(record)
    }

    fn detail(e: &Self, _color: bool) -> String {
        output::detail(&[
            ("ID", e.id.map(|id| id.to_string()).unwrap_or_default()),
            ("Name", e.name.clone()),
            ("E-mail", e.email.clone()),
            ("Department", e.user_role.map(|r| r.to_string()).unwrap_or_default()),
            ("Login", e.login().unwrap_or_default().to_owned()),
            (
                "Vacation days",
                e.vacation_balance.map(|b| b.to_string()).unwrap_or_default(),
            ),
            ("Created", util::local_time(e.created_at)),
        ])
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    office: &Office,
    args: EmployeesArgs,
    global: &GlobalOpts,
    profile: &str,
) -> Result<(), CliError> {
    match args.command {
        EmployeesCommand::Common(cmd) => resource::handle::<Employee>(office, cmd, global).await,
        EmployeesCommand::Me => me(office, global, profile).await,
    }
}

/// The signed-in user's own employee record.
async fn me(office: &Office, global: &GlobalOpts, profile: &str) -> Result<(), CliError> {
    let Some(login) = office.session().login() else {
        return Err(CliError::AuthFailed {
            message: "no token configured; requests are anonymous".into(),
            profile: profile.to_owned(),
        });
    };
    let employee = office
        .my_employee()
        .await?
        .ok_or_else(|| CliError::NotFound {
            resource_type: "employee for login".into(),
            identifier: login,
            list_command: "employees".into(),
        })?;
    resource::show(&employee, global)
}
