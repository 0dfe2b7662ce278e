//! `whoami`: the account the token belongs to.

use officely_core::{Account, Office};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

fn detail(a: &Account) -> String {
    output::detail(&[
        ("Login", a.login.clone()),
        ("Name", a.display_name()),
        ("E-mail", a.email.clone().unwrap_or_default()),
        ("Roles", a.authorities.join(", ")),
        ("Reviewer", util::yes_no(a.is_reviewer())),
    ])
}

pub fn handle(office: &Office, global: &GlobalOpts, profile: &str) -> Result<(), CliError> {
    let Some(account) = office.session().account() else {
        return Err(CliError::AuthFailed {
            message: "no token configured; requests are anonymous".into(),
            profile: profile.to_owned(),
        });
    };
    let out = output::render_single(&global.format(), account.as_ref(), detail, |a| {
        a.login.clone()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
