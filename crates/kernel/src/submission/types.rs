//! Submission listing types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::projection::{Column, Page, ProjectedRow};

/// One listed submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListedSubmission {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub created_at_str: String,
    /// Values in column order.
    pub values: ProjectedRow,
}

/// A page of submissions with the column set that drives its layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionListing {
    pub columns: Vec<Column>,
    #[serde(flatten)]
    pub page: Page<ListedSubmission>,
}
