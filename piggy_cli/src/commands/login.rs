use anyhow::Result;
use clap::Args;
use piggy_lib::types::Credentials;
use piggy_lib::{validation, FileStore, PiggyError, Session};

use crate::output::{print_ok_json, print_problem, OutputFormat};

#[derive(Args)]
pub struct LoginArgs {
    /// Tenancy name
    #[arg(long)]
    pub tenancy: String,

    /// Username or email address
    #[arg(long)]
    pub user: String,

    /// Password
    #[arg(long)]
    pub password: String,
}

pub async fn run(
    args: &LoginArgs,
    session: &Session<FileStore>,
    format: &OutputFormat,
) -> Result<()> {
    let tenancy =
        validation::sanitize_text("--tenancy", &args.tenancy, validation::MAX_TEXT_LENGTH)?;
    let user = validation::sanitize_text("--user", &args.user, validation::MAX_TEXT_LENGTH)?;
    if args.password.is_empty() {
        return Err(PiggyError::InvalidInput("password is empty".to_string()).into());
    }
    let credentials = Credentials::new(tenancy, user, args.password.as_str());

    match session.login(&credentials).await {
        Ok(_) => {
            report_saved(session, format, "logged in");
            Ok(())
        }
        Err(PiggyError::Api(problem)) => Err(print_problem(problem, format)),
        Err(e) => Err(e.into()),
    }
}

pub fn run_logout(session: &Session<FileStore>, format: &OutputFormat) -> Result<()> {
    session.logout()?;
    report_saved(session, format, "logged out");
    Ok(())
}

fn report_saved(session: &Session<FileStore>, format: &OutputFormat, action: &str) {
    let path = session.store().path().display().to_string();
    match format {
        OutputFormat::Json => print_ok_json("store", &path),
        _ => println!("{} (token store: {})", action, path),
    }
}
