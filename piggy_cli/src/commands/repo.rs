use anyhow::Result;
use clap::Args;
use piggy_lib::{validation, FileStore, Session};

use crate::output::{print_ok_json, print_problem, print_repo, OutputFormat};

#[derive(Args)]
pub struct RepoArgs {
    /// Repository as owner/name (e.g. octocat/Hello-World)
    pub repo: String,
}

pub async fn run(
    args: &RepoArgs,
    session: &Session<FileStore>,
    format: &OutputFormat,
) -> Result<()> {
    let repo = validation::validate_repo(&args.repo)?;

    match session.get_repo(&repo).await {
        Ok(found) => {
            match format {
                OutputFormat::Json => print_ok_json("repo", &found),
                _ => print_repo(&found, format)?,
            }
            Ok(())
        }
        Err(problem) => Err(print_problem(problem, format)),
    }
}
