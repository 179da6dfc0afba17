use chrono::NaiveDate;

use crate::error::PiggyError;

pub const MAX_TEXT_LENGTH: usize = 256;
pub const MAX_REPO_PART_LENGTH: usize = 100;

/// Clean a free-text CLI value such as a tenancy name or login: drop control
/// characters, trim, and require 1..=`max_len` bytes. `field` names the value
/// in the error message.
pub fn sanitize_text(field: &str, input: &str, max_len: usize) -> Result<String, PiggyError> {
    let cleaned: String = input.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Err(PiggyError::InvalidInput(format!("{} must not be empty", field)));
    }
    if cleaned.len() > max_len {
        return Err(PiggyError::InvalidInput(format!(
            "{} is longer than {} bytes",
            field, max_len
        )));
    }
    Ok(cleaned.to_string())
}

/// Validate a repository identifier of the form `owner/name`.
pub fn validate_repo(input: &str) -> Result<String, PiggyError> {
    let trimmed = input.trim();
    let parts: Vec<&str> = trimmed.split('/').collect();
    let valid = parts.len() == 2
        && parts.iter().all(|part| {
            !part.is_empty()
                && *part != "."
                && *part != ".."
                && part.len() <= MAX_REPO_PART_LENGTH
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        });
    if !valid {
        return Err(PiggyError::InvalidInput(format!(
            "invalid repository '{}'. Expected owner/name (e.g., octocat/Hello-World)",
            trimmed
        )));
    }
    Ok(trimmed.to_string())
}

/// Parse one end of a transaction window given as `YYYY-MM-DD`.
pub fn validate_date(input: &str) -> Result<NaiveDate, PiggyError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        PiggyError::InvalidInput(format!(
            "transaction window date '{}' is not a calendar date in YYYY-MM-DD form",
            trimmed
        ))
    })
}

/// Validate that `from` is not after `to`.
pub fn validate_date_range(from: NaiveDate, to: NaiveDate) -> Result<(), PiggyError> {
    if from > to {
        return Err(PiggyError::InvalidInput(format!(
            "start date {} is after end date {}",
            from, to
        )));
    }
    Ok(())
}

/// Midnight UTC at the start of `date`, as used in transaction queries.
pub fn day_start_iso(date: NaiveDate) -> String {
    format!("{}T00:00:00.000Z", date.format("%Y-%m-%d"))
}

/// Last millisecond of `date` in UTC.
pub fn day_end_iso(date: NaiveDate) -> String {
    format!("{}T23:59:59.999Z", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_control_chars_and_trims() {
        assert_eq!(sanitize_text("tenancy", "  ten\x07ant \n", 50).unwrap(), "tenant");
    }

    #[test]
    fn sanitize_rejects_empty_and_oversized() {
        let err = sanitize_text("login", " \t\n", 50).unwrap_err();
        assert!(err.to_string().contains("login must not be empty"));
        let err = sanitize_text("tenancy", &"a".repeat(51), 50).unwrap_err();
        assert!(err.to_string().contains("tenancy is longer than 50 bytes"));
    }

    #[test]
    fn date_error_names_the_window() {
        let err = validate_date("tomorrow").unwrap_err();
        assert!(err.to_string().contains("transaction window date 'tomorrow'"));
    }

    #[test]
    fn repo_accepts_owner_and_name() {
        assert_eq!(validate_repo(" octocat/Hello-World ").unwrap(), "octocat/Hello-World");
        assert_eq!(validate_repo("rust-lang/rust.vim").unwrap(), "rust-lang/rust.vim");
    }

    #[test]
    fn repo_rejects_bad_shapes() {
        let inputs = [
            "octocat",
            "octocat/",
            "/repo",
            "a/b/c",
            "a b/c",
            "a/b?x=1",
            "octocat/..",
            "./repo",
            "octocat/.",
        ];
        for input in inputs {
            let err = validate_repo(input).unwrap_err();
            assert!(matches!(err, PiggyError::InvalidInput(_)), "input {}", input);
        }
    }

    #[test]
    fn date_parsing() {
        assert_eq!(
            validate_date("2024-03-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
        assert!(validate_date("15/03/2024").is_err());
        assert!(validate_date("2024-02-30").is_err());
    }

    #[test]
    fn date_range_order() {
        let a = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert!(validate_date_range(a, b).is_ok());
        assert!(validate_date_range(a, a).is_ok());
        assert!(validate_date_range(b, a).is_err());
    }

    #[test]
    fn day_bounds() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(day_start_iso(d), "2024-03-05T00:00:00.000Z");
        assert_eq!(day_end_iso(d), "2024-03-05T23:59:59.999Z");
    }
}
