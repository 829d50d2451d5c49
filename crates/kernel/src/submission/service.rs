//! Submission service: collect, edit, delete, list and export submissions.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use chrono::Utc;
use formsmith_sdk::types::{FieldType, Form, Submission};
use serde_json::{Map, Value};
use tracing::{debug, info};
use uuid::Uuid;

use super::types::{ListedSubmission, SubmissionListing};
use crate::config::Config;
use crate::error::{FormError, FormResult, ReferenceError};
use crate::export::{select_columns, write_csv};
use crate::projection::{
    ListQuery, Table, TableVariant, column_order, columns, format_timestamp, matches_query,
    paginate, project_row, sort_newest_first, tabulate,
};
use crate::store::DocumentStore;
use crate::validate::FieldIndex;

/// Service for submission operations against stored forms.
#[derive(Clone)]
pub struct SubmissionService {
    inner: Arc<SubmissionServiceInner>,
}

struct SubmissionServiceInner {
    store: Arc<dyn DocumentStore>,
    config: Config,
}

impl SubmissionService {
    /// Create a new submission service.
    pub fn new(store: Arc<dyn DocumentStore>, config: Config) -> Self {
        Self {
            inner: Arc::new(SubmissionServiceInner { store, config }),
        }
    }

    /// Validate and store a new submission.
    ///
    /// Every declared field is stored: the submitted value, the select
    /// default for a blank select, or `""`. Undeclared keys are discarded.
    /// The first invalid value aborts the whole submission.
    pub fn submit(&self, slug: &str, values: &HashMap<String, String>) -> FormResult<Submission> {
        let form = self.form(slug)?;
        if form.suspended {
            debug!(slug = %slug, "submission to suspended form refused");
            return Err(FormError::Suspended { slug: slug.into() });
        }

        let index = FieldIndex::new(&form.fields);
        let mut submission = Submission::new(slug, Utc::now());
        for field in &form.fields {
            if field.id.is_empty() {
                continue;
            }
            let mut value = values.get(&field.id).cloned().unwrap_or_default();
            if field.field_type == FieldType::Select && value.trim().is_empty() {
                if let Some(default) = field.default.as_deref().filter(|d| !d.is_empty()) {
                    value = default.to_string();
                }
            }
            index.validate(field, Some(&value)).inspect_err(|e| {
                debug!(slug = %slug, field = %field.id, error = %e, "submission rejected");
            })?;
            submission.fields.insert(field.id.clone(), value);
        }

        self.inner.store.insert_submission(submission.clone())?;
        info!(slug = %slug, submission_id = %submission.id, "submission stored");
        Ok(submission)
    }

    /// Merge edited values into a stored submission.
    ///
    /// Edits for ids the form does not declare are ignored. `null` edits
    /// become `""`. Every known edit is validated before anything is written.
    pub fn update(&self, slug: &str, id: &str, edits: &Map<String, Value>) -> FormResult<Submission> {
        let form = self.form(slug)?;
        let id = parse_id(id)?;
        let mut submission = self
            .inner
            .store
            .submission(slug, id)?
            .ok_or_else(|| ReferenceError::SubmissionNotFound { id: id.to_string() })?;

        let index = FieldIndex::new(&form.fields);
        for (field_id, raw) in edits {
            let Some(field) = index.get(field_id) else {
                continue;
            };
            let value = edit_value(raw);
            index.validate(field, Some(&value))?;
            submission.fields.insert(field_id.clone(), value);
        }

        if !self.inner.store.replace_submission(submission.clone())? {
            return Err(ReferenceError::SubmissionNotFound { id: id.to_string() }.into());
        }
        info!(slug = %slug, submission_id = %id, "submission updated");
        Ok(submission)
    }

    /// Delete one submission of a form.
    pub fn delete(&self, slug: &str, id: &str) -> FormResult<()> {
        self.form(slug)?;
        let id = parse_id(id)?;
        if !self.inner.store.delete_submission(slug, id)? {
            return Err(ReferenceError::SubmissionNotFound { id: id.to_string() }.into());
        }
        info!(slug = %slug, submission_id = %id, "submission deleted");
        Ok(())
    }

    /// List submissions newest first, filtered then paged.
    ///
    /// `total` counts the filtered set.
    pub fn list(&self, slug: &str, query: &ListQuery) -> FormResult<SubmissionListing> {
        let config = &self.inner.config;
        let form = self.form(slug)?;
        let submissions = self.ordered(&form, query.filter_text())?;

        let page = paginate(
            submissions,
            query.page_number(),
            query.page_size(config.default_per_page, config.max_per_page),
        )
        .map(|sub| ListedSubmission {
            id: sub.id,
            created_at: sub.created_at,
            created_at_str: format_timestamp(&sub.created_at, &config.timestamp_format),
            values: project_row(&form, &sub),
        });

        Ok(SubmissionListing {
            columns: columns(&form),
            page,
        })
    }

    /// Numbered table of every submission, newest first.
    pub fn export_table(&self, slug: &str, variant: TableVariant) -> FormResult<Table> {
        let form = self.form(slug)?;
        let submissions = self.ordered(&form, None)?;
        Ok(tabulate(
            &form,
            &submissions,
            variant,
            &self.inner.config.timestamp_format,
        ))
    }

    /// Write every submission as CSV, newest first, values only.
    ///
    /// `requested` is a comma-separated list of field ids.
    pub fn export_csv<W: Write>(
        &self,
        slug: &str,
        requested: Option<&str>,
        writer: W,
    ) -> FormResult<()> {
        let form = self.form(slug)?;
        let cols = select_columns(&column_order(&form), requested);
        let submissions = self.ordered(&form, None)?;
        write_csv(writer, &cols, &submissions)?;
        info!(slug = %slug, rows = submissions.len(), "submissions exported");
        Ok(())
    }

    fn form(&self, slug: &str) -> FormResult<Form> {
        self.inner
            .store
            .form(slug)?
            .ok_or_else(|| ReferenceError::FormNotFound { slug: slug.into() }.into())
    }

    fn ordered(&self, form: &Form, filter: Option<&str>) -> FormResult<Vec<Submission>> {
        let mut submissions = self.inner.store.submissions(&form.slug)?;
        if let Some(q) = filter {
            let cols = column_order(form);
            submissions.retain(|s| matches_query(&cols, s, q));
        }
        sort_newest_first(&mut submissions);
        Ok(submissions)
    }
}

fn parse_id(id: &str) -> Result<Uuid, ReferenceError> {
    Uuid::parse_str(id).map_err(|_| ReferenceError::InvalidSubmissionId { id: id.into() })
}

fn edit_value(raw: &Value) -> String {
    match raw {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
