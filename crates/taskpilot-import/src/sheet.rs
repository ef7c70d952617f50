//! Spreadsheet URL normalization and header-keyed row parsing.

use taskpilot_core::{Priority, Task};
use thiserror::Error;
use tracing::debug;

/// Import errors.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The URL is not a recognized spreadsheet source.
    #[error("{0}")]
    InvalidUrl(String),

    /// Fetching the sheet failed.
    #[error("could not fetch sheet: {0}")]
    Fetch(String),

    /// The fetched data could not be parsed as CSV/TSV.
    #[error("could not parse sheet: {0}")]
    Parse(String),
}

/// Field delimiter of the fetched data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
        }
    }
}

/// Recognize a spreadsheet source URL and rewrite it to a direct CSV/TSV
/// export link where needed.
///
/// Accepted forms:
/// - Google Sheets sharing links (`.../edit#gid=N`), rewritten to the CSV
///   export endpoint;
/// - published Google Sheets links (`/pub?...output=csv` or `output=tsv`);
/// - direct `.csv`, `.tsv` or `.txt` links.
pub fn normalize_sheet_url(url: &str) -> Result<(String, Delimiter), ImportError> {
    let url = url.trim();

    if url.contains("/edit#gid=") {
        let sheet_id = url
            .split("/d/")
            .nth(1)
            .and_then(|rest| rest.split('/').next())
            .filter(|id| !id.is_empty());
        let gid = url
            .split("gid=")
            .nth(1)
            .map(|rest| rest.chars().take_while(|c| c.is_ascii_digit()).collect::<String>())
            .filter(|gid| !gid.is_empty());
        return match (sheet_id, gid) {
            (Some(sheet_id), Some(gid)) => Ok((
                format!(
                    "https://docs.google.com/spreadsheets/d/{}/export?format=csv&gid={}",
                    sheet_id, gid
                ),
                Delimiter::Comma,
            )),
            _ => Err(ImportError::InvalidUrl(
                "Invalid Google Sheet sharing URL. Please ensure it is a valid Google Sheet link."
                    .to_string(),
            )),
        };
    }

    if url.contains("/pub?") {
        if url.contains("output=tsv") {
            return Ok((url.to_string(), Delimiter::Tab));
        }
        if url.contains("output=csv") {
            return Ok((url.to_string(), Delimiter::Comma));
        }
    }

    if url.ends_with(".tsv") {
        return Ok((url.to_string(), Delimiter::Tab));
    }
    if url.ends_with(".csv") || url.ends_with(".txt") {
        return Ok((url.to_string(), Delimiter::Comma));
    }

    Err(ImportError::InvalidUrl(
        "Please provide a direct public CSV/TSV link or a Google Sheet sharing link.".to_string(),
    ))
}

/// Parse header-keyed rows into tasks.
///
/// Expected headers: `Task Name`, `Description`, `Estimated Duration`,
/// `Due Date`, `Dependencies`, `Priority`. Rows without a task name are
/// dropped; a malformed duration falls back to 0 and an unknown priority to
/// Medium, mirroring how lenient the rest of the pipeline is about
/// externally supplied data.
pub fn parse_tabular(data: &str, delimiter: Delimiter) -> Result<Vec<Task>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| ImportError::Parse(e.to_string()))?
        .clone();
    let column = |name: &str| headers.iter().position(|h| h == name);

    let name_col = column("Task Name");
    let description_col = column("Description");
    let duration_col = column("Estimated Duration");
    let due_col = column("Due Date");
    let dependencies_col = column("Dependencies");
    let priority_col = column("Priority");

    let field = |record: &csv::StringRecord, col: Option<usize>| -> String {
        col.and_then(|i| record.get(i)).unwrap_or("").to_string()
    };

    let mut tasks = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ImportError::Parse(e.to_string()))?;

        let task_name = field(&record, name_col);
        if task_name.is_empty() {
            continue;
        }

        tasks.push(Task {
            task_name,
            description: field(&record, description_col),
            estimated_duration: field(&record, duration_col).parse().unwrap_or(0.0),
            due_date: field(&record, due_col),
            dependencies: field(&record, dependencies_col),
            priority: field(&record, priority_col)
                .parse()
                .unwrap_or(Priority::Medium),
        });
    }

    debug!(count = tasks.len(), "parsed tasks from tabular data");
    Ok(tasks)
}

/// Fetch a spreadsheet URL and parse it into tasks.
pub async fn fetch_tasks(url: &str) -> Result<Vec<Task>, ImportError> {
    let (final_url, delimiter) = normalize_sheet_url(url)?;

    let response = reqwest::get(&final_url)
        .await
        .map_err(|e| ImportError::Fetch(e.to_string()))?;
    if !response.status().is_success() {
        return Err(ImportError::Fetch(format!(
            "HTTP {} - could not fetch the sheet. Make sure it is publicly accessible.",
            response.status()
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| ImportError::Fetch(e.to_string()))?;
    parse_tabular(&body, delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sharing_url_is_rewritten_to_export() {
        let (url, delimiter) = normalize_sheet_url(
            "https://docs.google.com/spreadsheets/d/abc123/edit#gid=42",
        )
        .unwrap();
        assert_eq!(
            url,
            "https://docs.google.com/spreadsheets/d/abc123/export?format=csv&gid=42"
        );
        assert_eq!(delimiter, Delimiter::Comma);
    }

    #[test]
    fn test_published_tsv_url_passes_through() {
        let source = "https://docs.google.com/spreadsheets/d/e/xyz/pub?output=tsv";
        let (url, delimiter) = normalize_sheet_url(source).unwrap();
        assert_eq!(url, source);
        assert_eq!(delimiter, Delimiter::Tab);
    }

    #[test]
    fn test_direct_csv_url_passes_through() {
        let (_, delimiter) = normalize_sheet_url("https://example.com/tasks.csv").unwrap();
        assert_eq!(delimiter, Delimiter::Comma);
    }

    #[test]
    fn test_unrecognized_url_is_rejected() {
        assert!(normalize_sheet_url("https://example.com/tasks.html").is_err());
        assert!(normalize_sheet_url("https://docs.google.com/spreadsheets/d//edit#gid=").is_err());
    }

    #[test]
    fn test_parse_header_keyed_rows() {
        let data = "Task Name,Description,Estimated Duration,Due Date,Dependencies,Priority\n\
                    Design,Mockups,4,2025-08-01,,High\n\
                    Build,,16,2025-08-10,Design,Medium\n";
        let tasks = parse_tabular(data, Delimiter::Comma).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].task_name, "Design");
        assert_eq!(tasks[0].estimated_duration, 4.0);
        assert_eq!(tasks[0].priority, Priority::High);
        assert_eq!(tasks[1].dependencies, "Design");
    }

    #[test]
    fn test_rows_without_task_name_are_dropped() {
        let data = "Task Name,Estimated Duration,Due Date\n\
                    ,4,2025-08-01\n\
                    Real,2,2025-08-02\n";
        let tasks = parse_tabular(data, Delimiter::Comma).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].task_name, "Real");
    }

    #[test]
    fn test_malformed_fields_fall_back() {
        let data = "Task Name,Estimated Duration,Priority\n\
                    Odd,lots,Urgent\n";
        let tasks = parse_tabular(data, Delimiter::Comma).unwrap();
        assert_eq!(tasks[0].estimated_duration, 0.0);
        assert_eq!(tasks[0].priority, Priority::Medium);
    }

    #[test]
    fn test_tab_delimited_rows() {
        let data = "Task Name\tEstimated Duration\tDue Date\nShip\t8\t2025-09-01\n";
        let tasks = parse_tabular(data, Delimiter::Tab).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].estimated_duration, 8.0);
    }
}
