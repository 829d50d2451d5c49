//! Command-line interface for offline schema work and exports.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use formsmith_kernel::export::write_table_csv;
use formsmith_kernel::form::slugify;
use formsmith_kernel::projection::TableVariant;
use formsmith_kernel::schema::{compile_format, sanitize_fields};
use formsmith_kernel::validate::FieldIndex;
use formsmith_kernel::{Config, MemoryStore, SubmissionService};
use formsmith_sdk::types::{FieldDefinition, FieldType, Form, Submission, Theme};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Formsmith form schema tool.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sanitize a raw field list and print the canonical schema.
    Schema {
        /// JSON file holding a field list or a form object with `fields`.
        file: PathBuf,
    },

    /// Print the pattern compiled from a wildcard format.
    Mask {
        /// Format using X (digit), A (letter) and * (anything).
        format: String,
    },

    /// Validate a values object against a canonical schema.
    Check {
        /// Canonical schema JSON.
        #[arg(long)]
        schema: PathBuf,

        /// JSON object of field id to value.
        #[arg(long)]
        values: PathBuf,
    },

    /// Project submissions into CSV or a numbered table.
    Export {
        /// Canonical schema JSON.
        #[arg(long)]
        schema: PathBuf,

        /// JSON array of submissions or plain value objects.
        #[arg(long)]
        submissions: PathBuf,

        /// Output layout.
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Comma-separated field ids (csv only).
        #[arg(long)]
        columns: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Table,
    TableTimestamp,
}

/// A submission record as found in an export input file.
#[derive(Deserialize)]
#[serde(untagged)]
enum SubmissionRecord {
    Stored(Submission),
    Values(BTreeMap<String, Value>),
}

/// Run a parsed command, writing results to stdout.
pub fn run(cli: Cli, config: Config) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Schema { file } => {
            let raw = read_json(&file)?;
            let fields = sanitize_fields(fields_payload(&raw))?;
            serde_json::to_writer_pretty(&mut out, &fields)?;
            writeln!(out)?;
        }
        Command::Mask { format } => {
            writeln!(out, "{}", compile_format(&format))?;
        }
        Command::Check { schema, values } => {
            let form = load_form(&schema)?;
            let values = read_json(&values)?;
            let Some(values) = values.as_object() else {
                bail!("values file must hold a JSON object");
            };

            let index = FieldIndex::new(&form.fields);
            let mut failures = 0;
            for field in &form.fields {
                let mut value = values.get(&field.id).map(value_text).unwrap_or_default();
                if field.field_type == FieldType::Select && value.trim().is_empty() {
                    value = field.default.clone().unwrap_or_default();
                }
                if let Err(e) = index.validate(field, Some(&value)) {
                    writeln!(out, "{}: {e}", e.field_id())?;
                    failures += 1;
                }
            }
            if failures > 0 {
                bail!("{failures} field(s) failed validation");
            }
            writeln!(out, "ok")?;
        }
        Command::Export {
            schema,
            submissions,
            format,
            columns,
        } => {
            let form = load_form(&schema)?;
            let slug = form.slug.clone();
            let records = load_submissions(&submissions, &slug)?;
            debug!(slug = %slug, rows = records.len(), "loaded export input");

            let store = Arc::new(MemoryStore::with_records(vec![form], records));
            let service = SubmissionService::new(store, config);
            match format {
                ExportFormat::Csv => service.export_csv(&slug, columns.as_deref(), &mut out)?,
                ExportFormat::Table => {
                    let table = service.export_table(&slug, TableVariant::WithoutTimestamp)?;
                    write_table_csv(&mut out, &table)?;
                }
                ExportFormat::TableTimestamp => {
                    let table = service.export_table(&slug, TableVariant::WithTimestamp)?;
                    write_table_csv(&mut out, &table)?;
                }
            }
        }
    }

    Ok(())
}

fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// The field list of a raw payload: the value itself, or its `fields` key.
fn fields_payload(raw: &Value) -> &Value {
    raw.get("fields").unwrap_or(raw)
}

/// Load a canonical schema: a stored form, or a bare field list.
fn load_form(path: &Path) -> Result<Form> {
    let raw = read_json(path)?;
    if let Ok(form) = serde_json::from_value::<Form>(raw.clone()) {
        return Ok(form);
    }

    let fields: Vec<FieldDefinition> = serde_json::from_value(fields_payload(&raw).clone())
        .with_context(|| format!("{} is not a canonical schema", path.display()))?;
    let title = raw
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or("Form")
        .to_string();
    let now = Utc::now();

    Ok(Form {
        slug: slugify(&title),
        title,
        description: None,
        theme: Theme::default(),
        fields,
        suspended: false,
        created_at: now,
        updated_at: now,
    })
}

fn load_submissions(path: &Path, slug: &str) -> Result<Vec<Submission>> {
    let records: Vec<SubmissionRecord> = serde_json::from_value(read_json(path)?)
        .with_context(|| format!("{} must hold a JSON array of submissions", path.display()))?;
    let now = Utc::now();

    Ok(records
        .into_iter()
        .map(|record| match record {
            SubmissionRecord::Stored(mut sub) => {
                sub.slug = slug.to_string();
                sub
            }
            SubmissionRecord::Values(values) => {
                let mut sub = Submission::new(slug, now);
                sub.fields = values
                    .iter()
                    .map(|(k, v)| (k.clone(), value_text(v)))
                    .collect();
                sub
            }
        })
        .collect())
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
