//! Document store seam.
//!
//! The engine never composes queries. It reads and writes whole form and
//! submission records through simple key lookups; ordering, filtering and
//! paging happen in `projection`. Each call is expected to be atomic on its
//! own; concurrent schema edits of the same form are last-writer-wins.

mod memory;

use formsmith_sdk::types::{Form, Submission};
use uuid::Uuid;

use crate::error::StoreError;

pub use memory::MemoryStore;

/// Persistence for forms and their submissions.
pub trait DocumentStore: Send + Sync {
    /// Insert a new form. Fails if the slug is taken.
    fn insert_form(&self, form: Form) -> Result<(), StoreError>;

    fn form(&self, slug: &str) -> Result<Option<Form>, StoreError>;

    fn slug_exists(&self, slug: &str) -> Result<bool, StoreError> {
        Ok(self.form(slug)?.is_some())
    }

    /// Overwrite an existing form. Returns `false` if it does not exist.
    fn replace_form(&self, form: Form) -> Result<bool, StoreError>;

    /// Returns `false` if the form did not exist.
    fn delete_form(&self, slug: &str) -> Result<bool, StoreError>;

    /// All forms, unordered.
    fn forms(&self) -> Result<Vec<Form>, StoreError>;

    fn insert_submission(&self, submission: Submission) -> Result<(), StoreError>;

    /// Look up a submission, scoped to its owning form.
    fn submission(&self, slug: &str, id: Uuid) -> Result<Option<Submission>, StoreError>;

    /// Overwrite an existing submission. Returns `false` if it does not exist.
    fn replace_submission(&self, submission: Submission) -> Result<bool, StoreError>;

    /// Returns `false` if no submission with this id belongs to the form.
    fn delete_submission(&self, slug: &str, id: Uuid) -> Result<bool, StoreError>;

    /// All submissions of a form, unordered.
    fn submissions(&self, slug: &str) -> Result<Vec<Submission>, StoreError>;

    fn count_submissions(&self, slug: &str) -> Result<usize, StoreError> {
        Ok(self.submissions(slug)?.len())
    }

    /// Delete every submission of a form, returning how many were removed.
    fn delete_submissions(&self, slug: &str) -> Result<usize, StoreError>;
}
