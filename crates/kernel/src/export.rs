//! CSV export of projected submissions.

use std::io::Write;

use formsmith_sdk::types::Submission;

use crate::projection::{Table, project_columns};

/// Resolve a comma-separated column request against the declared columns.
///
/// Unknown ids are dropped and the requested order is kept. If nothing
/// survives (or nothing was requested) every declared column is used.
pub fn select_columns(declared: &[String], requested: Option<&str>) -> Vec<String> {
    let wanted: Vec<String> = requested
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty() && declared.iter().any(|d| d == c))
        .map(str::to_string)
        .collect();

    if wanted.is_empty() {
        declared.to_vec()
    } else {
        wanted
    }
}

/// Write a header row of column ids, then one row of values per submission.
///
/// Submissions are written in the order given.
pub fn write_csv<W: Write>(
    writer: W,
    columns: &[String],
    submissions: &[Submission],
) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(columns)?;
    for sub in submissions {
        let row = project_columns(columns, sub);
        out.write_record(row.values())?;
    }
    out.flush()?;
    Ok(())
}

/// Write a projected table (headers first) as CSV.
pub fn write_table_csv<W: Write>(writer: W, table: &Table) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(&table.headers)?;
    for row in &table.rows {
        out.write_record(row)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn declared() -> Vec<String> {
        vec!["name".into(), "email".into(), "phone".into()]
    }

    #[test]
    fn select_columns_filters_and_reorders() {
        assert_eq!(
            select_columns(&declared(), Some(" phone, bogus ,name")),
            vec!["phone", "name"]
        );
    }

    #[test]
    fn select_columns_falls_back_to_all() {
        assert_eq!(select_columns(&declared(), None), declared());
        assert_eq!(select_columns(&declared(), Some("bogus, ,")), declared());
    }

    #[test]
    fn csv_has_header_and_quotes() {
        let subs = vec![
            Submission::new("s", Utc::now())
                .with_value("name", "Doe, Jane")
                .with_value("extra", "ignored"),
            Submission::new("s", Utc::now()).with_value("email", "a@b.co"),
        ];
        let mut buf = Vec::new();
        write_csv(&mut buf, &["name".into(), "email".into()], &subs).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "name,email\n\"Doe, Jane\",\n,a@b.co\n");
    }

    #[test]
    fn table_csv() {
        let table = Table {
            headers: vec!["No".into(), "Name".into()],
            rows: vec![vec!["1".into(), "Ada".into()]],
        };
        let mut buf = Vec::new();
        write_table_csv(&mut buf, &table).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "No,Name\n1,Ada\n");
    }
}
