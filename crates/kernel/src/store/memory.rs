//! In-memory document store.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use formsmith_sdk::types::{Form, Submission};
use uuid::Uuid;

use super::DocumentStore;
use crate::error::StoreError;

/// Concurrent in-memory store, keyed by form slug and submission id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    forms: DashMap<String, Form>,
    submissions: DashMap<Uuid, Submission>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store from already-canonical records.
    pub fn with_records(forms: Vec<Form>, submissions: Vec<Submission>) -> Self {
        let store = Self::new();
        for form in forms {
            store.forms.insert(form.slug.clone(), form);
        }
        for sub in submissions {
            store.submissions.insert(sub.id, sub);
        }
        store
    }
}

impl DocumentStore for MemoryStore {
    fn insert_form(&self, form: Form) -> Result<(), StoreError> {
        match self.forms.entry(form.slug.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateSlug(form.slug)),
            Entry::Vacant(slot) => {
                slot.insert(form);
                Ok(())
            }
        }
    }

    fn form(&self, slug: &str) -> Result<Option<Form>, StoreError> {
        Ok(self.forms.get(slug).map(|f| f.clone()))
    }

    fn slug_exists(&self, slug: &str) -> Result<bool, StoreError> {
        Ok(self.forms.contains_key(slug))
    }

    fn replace_form(&self, form: Form) -> Result<bool, StoreError> {
        match self.forms.get_mut(&form.slug) {
            Some(mut existing) => {
                *existing = form;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_form(&self, slug: &str) -> Result<bool, StoreError> {
        Ok(self.forms.remove(slug).is_some())
    }

    fn forms(&self) -> Result<Vec<Form>, StoreError> {
        Ok(self.forms.iter().map(|r| r.value().clone()).collect())
    }

    fn insert_submission(&self, submission: Submission) -> Result<(), StoreError> {
        match self.submissions.entry(submission.id) {
            Entry::Occupied(_) => Err(StoreError::DuplicateSubmission(submission.id.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(submission);
                Ok(())
            }
        }
    }

    fn submission(&self, slug: &str, id: Uuid) -> Result<Option<Submission>, StoreError> {
        Ok(self
            .submissions
            .get(&id)
            .filter(|s| s.slug == slug)
            .map(|s| s.clone()))
    }

    fn replace_submission(&self, submission: Submission) -> Result<bool, StoreError> {
        match self.submissions.get_mut(&submission.id) {
            Some(mut existing) if existing.slug == submission.slug => {
                *existing = submission;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn delete_submission(&self, slug: &str, id: Uuid) -> Result<bool, StoreError> {
        Ok(self
            .submissions
            .remove_if(&id, |_, s| s.slug == slug)
            .is_some())
    }

    fn submissions(&self, slug: &str) -> Result<Vec<Submission>, StoreError> {
        Ok(self
            .submissions
            .iter()
            .filter(|r| r.value().slug == slug)
            .map(|r| r.value().clone())
            .collect())
    }

    fn count_submissions(&self, slug: &str) -> Result<usize, StoreError> {
        Ok(self
            .submissions
            .iter()
            .filter(|r| r.value().slug == slug)
            .count())
    }

    fn delete_submissions(&self, slug: &str) -> Result<usize, StoreError> {
        let before = self.submissions.len();
        self.submissions.retain(|_, s| s.slug != slug);
        Ok(before.saturating_sub(self.submissions.len()))
    }
}
