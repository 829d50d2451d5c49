//! Submission projections for listing and export.
//!
//! Columns always follow field declaration order. Rows tolerate drift
//! between the schema and stored submissions: undeclared stored values are
//! dropped and missing declared values project as `""`.

mod query;

use chrono::{DateTime, Utc};
use formsmith_sdk::types::{Form, Submission};
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::warn;

use crate::config::{DEFAULT_TIMESTAMP_FORMAT, is_valid_timestamp_format};

pub use query::{ListQuery, Page, matches_query, paginate, sort_newest_first};

/// Render a timestamp with a strftime format.
///
/// A format chrono cannot render falls back to [`DEFAULT_TIMESTAMP_FORMAT`].
pub fn format_timestamp(ts: &DateTime<Utc>, format: &str) -> String {
    if is_valid_timestamp_format(format) {
        ts.format(format).to_string()
    } else {
        warn!(format, "unsupported timestamp format, using default");
        ts.format(DEFAULT_TIMESTAMP_FORMAT).to_string()
    }
}

/// A display column: field id plus its header label.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Column {
    pub id: String,
    pub label: String,
}

/// Field ids in declaration order.
pub fn column_order(form: &Form) -> Vec<String> {
    form.fields
        .iter()
        .filter(|f| !f.id.is_empty())
        .map(|f| f.id.clone())
        .collect()
}

/// Columns with labels, in declaration order.
pub fn columns(form: &Form) -> Vec<Column> {
    form.fields
        .iter()
        .filter(|f| !f.id.is_empty())
        .map(|f| Column {
            id: f.id.clone(),
            label: if f.label.is_empty() {
                f.id.clone()
            } else {
                f.label.clone()
            },
        })
        .collect()
}

/// An ordered field-id-to-value row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectedRow {
    cells: Vec<(String, String)>,
}

impl ProjectedRow {
    /// Value for a column, if the column is part of the projection.
    pub fn get(&self, id: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(k, _)| k == id)
            .map(|(_, v)| v.as_str())
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Serialize for ProjectedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (k, v) in &self.cells {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Project a submission onto the form's columns.
pub fn project_row(form: &Form, submission: &Submission) -> ProjectedRow {
    project_columns(&column_order(form), submission)
}

/// Project a submission onto an explicit column list.
pub fn project_columns(columns: &[String], submission: &Submission) -> ProjectedRow {
    ProjectedRow {
        cells: columns
            .iter()
            .map(|c| (c.clone(), submission.value(c).to_string()))
            .collect(),
    }
}

/// Which leading columns a tabular export carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableVariant {
    /// "No", "Submitted At", then field labels.
    WithTimestamp,
    /// "No", then field labels.
    WithoutTimestamp,
}

/// A header row plus string cells, ready for a table, spreadsheet or PDF writer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Build a numbered table from submissions already in display order.
///
/// Row numbers start at 1 and follow the order of `submissions`.
pub fn tabulate(
    form: &Form,
    submissions: &[Submission],
    variant: TableVariant,
    timestamp_format: &str,
) -> Table {
    let cols = columns(form);

    let mut headers = vec!["No".to_string()];
    if variant == TableVariant::WithTimestamp {
        headers.push("Submitted At".to_string());
    }
    headers.extend(cols.iter().map(|c| c.label.clone()));

    let rows = submissions
        .iter()
        .enumerate()
        .map(|(idx, sub)| {
            let mut row = Vec::with_capacity(headers.len());
            row.push((idx + 1).to_string());
            if variant == TableVariant::WithTimestamp {
                row.push(format_timestamp(&sub.created_at, timestamp_format));
            }
            row.extend(cols.iter().map(|c| sub.value(&c.id).to_string()));
            row
        })
        .collect();

    Table { headers, rows }
}
