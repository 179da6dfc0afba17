use anyhow::{bail, Result};
use chrono::Utc;
use clap::Args;
use piggy_lib::types::TransactionQuery;
use piggy_lib::{recent_query, validation, FileStore, Problem, Session};

use crate::output::{
    print_ok_json, print_problem, print_sections_csv, print_sections_markdown,
    print_sections_table, OutputFormat,
};

#[derive(Args)]
pub struct TransactionsArgs {
    /// Transaction type filter sent to the service
    #[arg(long = "type", default_value = "tenant")]
    pub kind: String,

    /// Only show transactions of this account
    #[arg(long)]
    pub account_id: Option<String>,

    /// Start date (YYYY-MM-DD); defaults to two months ago
    #[arg(long)]
    pub from: Option<String>,

    /// End date (YYYY-MM-DD); defaults to the end of this month
    #[arg(long)]
    pub to: Option<String>,
}

pub async fn run(
    args: &TransactionsArgs,
    session: &Session<FileStore>,
    format: &OutputFormat,
) -> Result<()> {
    let query = build_query(args)?;

    match session.recent_transactions(&query).await {
        Ok(sections) => {
            match format {
                OutputFormat::Table => print_sections_table(&sections),
                OutputFormat::Json => print_ok_json("sections", &sections),
                OutputFormat::Csv => print_sections_csv(&sections)?,
                OutputFormat::Markdown => print_sections_markdown(&sections),
            }
            Ok(())
        }
        Err(Problem::Unauthorized) => {
            let err = print_problem(Problem::Unauthorized, format);
            Err(err.context("the stored token was refused; run `piggy login` first"))
        }
        Err(problem) => Err(print_problem(problem, format)),
    }
}

fn build_query(args: &TransactionsArgs) -> Result<TransactionQuery> {
    let kind = validation::sanitize_text("--type", &args.kind, validation::MAX_TEXT_LENGTH)?;
    let account_id = match &args.account_id {
        Some(id) => Some(validation::sanitize_text(
            "--account-id",
            id,
            validation::MAX_TEXT_LENGTH,
        )?),
        None => None,
    };

    let query = match (&args.from, &args.to) {
        (None, None) => return Ok(recent_query(&kind, account_id.as_deref(), Utc::now())),
        (Some(from), Some(to)) => {
            let from = validation::validate_date(from)?;
            let to = validation::validate_date(to)?;
            validation::validate_date_range(from, to)?;
            TransactionQuery::new(
                kind,
                validation::day_start_iso(from),
                validation::day_end_iso(to),
            )
        }
        _ => bail!("--from and --to must be given together"),
    };

    Ok(match account_id {
        Some(id) => query.with_account_id(id),
        None => query,
    })
}
