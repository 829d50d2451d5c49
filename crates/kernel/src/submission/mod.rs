//! Submission collection and review.

mod service;
mod types;

pub use service::SubmissionService;
pub use types::{ListedSubmission, SubmissionListing};
