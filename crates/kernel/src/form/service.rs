//! Form service: create, update, suspend and delete forms.

use std::sync::Arc;

use chrono::Utc;
use formsmith_sdk::limits::{MAX_DESC_LEN, MAX_TITLE_LEN};
use formsmith_sdk::types::{Form, Theme};
use tracing::{debug, info};

use super::slug::unique_slug;
use super::types::{CreatedForm, FormSummary, FormUpdate, NewForm, Patch};
use crate::config::{Config, MIN_FORMS_PER_PAGE};
use crate::error::{FormResult, ReferenceError, SchemaError};
use crate::projection::{ListQuery, Page, format_timestamp, paginate};
use crate::schema::{sanitize_fields, sanitize_theme, truncate_chars};
use crate::store::DocumentStore;

/// Service for form lifecycle operations.
#[derive(Clone)]
pub struct FormService {
    inner: Arc<FormServiceInner>,
}

struct FormServiceInner {
    store: Arc<dyn DocumentStore>,
    config: Config,
}

impl FormService {
    /// Create a new form service.
    pub fn new(store: Arc<dyn DocumentStore>, config: Config) -> Self {
        Self {
            inner: Arc::new(FormServiceInner { store, config }),
        }
    }

    /// Sanitize and store a new form.
    ///
    /// Nothing is stored if the title or the field schema is rejected.
    pub fn create(&self, input: NewForm) -> FormResult<CreatedForm> {
        let title = clean_title(&input.title).ok_or(SchemaError::TitleRequired)?;
        let description = input.description.as_deref().and_then(clean_description);
        let theme = sanitize_theme(&input.theme);
        let fields = sanitize_fields(&input.fields).inspect_err(|e| {
            debug!(error = %e, "rejected form schema");
        })?;

        let slug = unique_slug(self.inner.store.as_ref(), &title)?;
        let now = Utc::now();
        let form = Form {
            slug: slug.clone(),
            title,
            description,
            theme,
            fields,
            suspended: false,
            created_at: now,
            updated_at: now,
        };

        self.inner.store.insert_form(form.clone())?;
        info!(slug = %slug, fields = form.fields.len(), "form created");

        Ok(CreatedForm {
            view_url: self.inner.config.public_url(&slug),
            form,
        })
    }

    /// Load a form by slug.
    pub fn get(&self, slug: &str) -> FormResult<Form> {
        self.inner
            .store
            .form(slug)?
            .ok_or_else(|| ReferenceError::FormNotFound { slug: slug.into() }.into())
    }

    /// Dashboard listing: title filter, newest first, with submission counts.
    pub fn list(&self, query: &ListQuery) -> FormResult<Page<FormSummary>> {
        let config = &self.inner.config;
        let mut forms = self.inner.store.forms()?;
        forms.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        if let Some(q) = query.filter_text() {
            let needle = q.to_lowercase();
            forms.retain(|f| f.title.to_lowercase().contains(&needle));
        }

        let page = paginate(
            forms,
            query.page_number(),
            query.page_size_within(
                config.forms_per_page,
                MIN_FORMS_PER_PAGE,
                config.max_forms_per_page,
            ),
        );

        let mut summaries = Vec::with_capacity(page.items.len());
        for form in &page.items {
            summaries.push(FormSummary {
                slug: form.slug.clone(),
                title: form.title.clone(),
                suspended: form.suspended,
                created_at: form.created_at,
                created_at_str: format_timestamp(&form.created_at, &config.timestamp_format),
                submissions_count: self.inner.store.count_submissions(&form.slug)?,
            });
        }

        Ok(Page {
            items: summaries,
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            pages: page.pages,
        })
    }

    /// Apply a partial update.
    ///
    /// Every provided property is validated before anything is written.
    pub fn update(&self, slug: &str, update: FormUpdate) -> FormResult<Form> {
        let mut form = self.get(slug)?;

        match update.title {
            Patch::Unset => {}
            Patch::Clear => return Err(SchemaError::TitleEmpty.into()),
            Patch::Set(title) => form.title = clean_title(&title).ok_or(SchemaError::TitleEmpty)?,
        }

        match update.description {
            Patch::Unset => {}
            Patch::Clear => form.description = None,
            Patch::Set(description) => form.description = clean_description(&description),
        }

        match update.theme {
            Patch::Unset => {}
            Patch::Clear => form.theme = Theme::default(),
            Patch::Set(theme) => form.theme = sanitize_theme(&theme),
        }

        match update.fields {
            Patch::Unset => {}
            Patch::Clear => return Err(SchemaError::NoFields.into()),
            Patch::Set(fields) => form.fields = sanitize_fields(&fields)?,
        }

        match update.suspended {
            Patch::Unset => {}
            Patch::Clear => form.suspended = false,
            Patch::Set(suspended) => form.suspended = suspended,
        }

        form.updated_at = Utc::now();
        self.replace(form)
    }

    /// Suspend or re-activate a form.
    pub fn set_suspended(&self, slug: &str, suspended: bool) -> FormResult<Form> {
        let mut form = self.get(slug)?;
        form.suspended = suspended;
        form.updated_at = Utc::now();
        let form = self.replace(form)?;
        info!(slug = %slug, suspended, "form suspension changed");
        Ok(form)
    }

    /// Delete a form together with all of its submissions.
    ///
    /// Returns the number of submissions removed.
    pub fn delete(&self, slug: &str) -> FormResult<usize> {
        if !self.inner.store.slug_exists(slug)? {
            return Err(ReferenceError::FormNotFound { slug: slug.into() }.into());
        }
        let removed = self.inner.store.delete_submissions(slug)?;
        self.inner.store.delete_form(slug)?;
        info!(slug = %slug, submissions = removed, "form deleted");
        Ok(removed)
    }

    /// Public URL of a form.
    pub fn public_url(&self, slug: &str) -> String {
        self.inner.config.public_url(slug)
    }

    fn replace(&self, form: Form) -> FormResult<Form> {
        if !self.inner.store.replace_form(form.clone())? {
            return Err(ReferenceError::FormNotFound { slug: form.slug }.into());
        }
        info!(slug = %form.slug, "form updated");
        Ok(form)
    }
}

fn clean_title(raw: &str) -> Option<String> {
    let title = truncate_chars(raw.trim(), MAX_TITLE_LEN);
    (!title.is_empty()).then_some(title)
}

fn clean_description(raw: &str) -> Option<String> {
    let description = truncate_chars(raw.trim(), MAX_DESC_LEN);
    (!description.is_empty()).then_some(description)
}
