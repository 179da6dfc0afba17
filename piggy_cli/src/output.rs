use anyhow::{bail, Result};
use piggy_lib::types::{Repo, TransactionItem};
use piggy_lib::{Problem, TransactionSection};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(match raw.trim().to_lowercase().as_str() {
            "table" => OutputFormat::Table,
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            "markdown" | "md" => OutputFormat::Markdown,
            other => bail!(
                "unknown output format '{}'. Valid values: table, json, csv, markdown",
                other
            ),
        })
    }
}

#[derive(Tabled, Serialize)]
struct RepoRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Owner")]
    #[serde(rename = "Owner")]
    owner: String,
}

#[derive(Tabled, Serialize)]
struct TransactionRow {
    #[tabled(rename = "Date")]
    #[serde(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    #[serde(rename = "Description")]
    description: String,
    #[tabled(rename = "Account")]
    #[serde(rename = "Account")]
    account: String,
    #[tabled(rename = "Amount")]
    #[serde(rename = "Amount")]
    amount: String,
}

// -- Row builders --

fn build_repo_row(repo: &Repo) -> RepoRow {
    RepoRow {
        id: repo.id,
        name: repo.name.clone(),
        owner: repo.owner.clone(),
    }
}

fn build_transaction_rows(date: &str, items: &[TransactionItem]) -> Vec<TransactionRow> {
    items
        .iter()
        .map(|t| TransactionRow {
            date: date.to_string(),
            description: t.description().unwrap_or_default().to_string(),
            account: t.account_name().unwrap_or_default().to_string(),
            amount: t
                .amount_in_default_currency()
                .map(format_amount)
                .unwrap_or_default(),
        })
        .collect()
}

fn build_section_rows(sections: &[TransactionSection]) -> Vec<TransactionRow> {
    sections
        .iter()
        .flat_map(|s| build_transaction_rows(&s.title, &s.data))
        .collect()
}

fn section_header(section: &TransactionSection) -> String {
    format!("{}  (total {})", section.title, section.total_amount)
}

// -- Repo output --

pub fn print_repo(repo: &Repo, format: &OutputFormat) -> Result<()> {
    let rows = vec![build_repo_row(repo)];
    match format {
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        OutputFormat::Markdown => {
            let mut table = Table::new(rows);
            table.with(Style::markdown());
            println!("{}", table);
        }
        _ => println!("{}", Table::new(rows)),
    }
    Ok(())
}

// -- Section output --

pub fn print_sections_table(sections: &[TransactionSection]) {
    if sections.is_empty() {
        println!("No transactions.");
        return;
    }
    for section in sections {
        println!("{}", section_header(section));
        println!("{}", Table::new(build_transaction_rows(&section.title, &section.data)));
    }
}

pub fn print_sections_markdown(sections: &[TransactionSection]) {
    for section in sections {
        println!("### {}\n", section_header(section));
        let mut table = Table::new(build_transaction_rows(&section.title, &section.data));
        table.with(Style::markdown());
        println!("{}\n", table);
    }
}

pub fn print_sections_csv(sections: &[TransactionSection]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_section_rows(sections) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// -- JSON output --

/// Prints `{"kind": "ok", <key>: <payload>}`.
pub fn print_ok_json<T: Serialize>(key: &str, payload: &T) {
    match ok_json(key, payload) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

fn ok_json<T: Serialize>(key: &str, payload: &T) -> serde_json::Result<String> {
    let mut body = serde_json::Map::new();
    body.insert("kind".to_string(), serde_json::Value::from("ok"));
    body.insert(key.to_string(), serde_json::to_value(payload)?);
    serde_json::to_string_pretty(&body)
}

/// Reports a problem (as `{"kind": ...}` on stdout in JSON mode) and turns it
/// into the error the command exits with.
pub fn print_problem(problem: Problem, format: &OutputFormat) -> anyhow::Error {
    if *format == OutputFormat::Json {
        match serde_json::to_string_pretty(&problem) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
        }
    }
    anyhow::Error::new(problem)
}

fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}
