//! Error types.
//!
//! `SchemaError` and `FieldError` messages are shown to end users verbatim.

use thiserror::Error;

/// The sanitizer or form service rejected a whole payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Too many fields (max {max}).")]
    TooManyFields { max: usize },

    #[error("Field '{label}': add at least one option.")]
    MissingOptions { label: String },

    #[error("Add at least one field.")]
    NoFields,

    #[error("Form title is required.")]
    TitleRequired,

    #[error("Form title cannot be empty.")]
    TitleEmpty,
}

/// A single submitted value failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Missing required field: {label}")]
    Missing { field: String, label: String },

    #[error("{label} must be a number.")]
    NotANumber { field: String, label: String },

    #[error("{label} must be a valid email.")]
    InvalidEmail { field: String, label: String },

    #[error("{label} must be a valid phone.")]
    InvalidPhone { field: String, label: String },

    #[error("{label} must be one of the provided options.")]
    NotAnOption { field: String, label: String },

    #[error("{label} is not in the required format.")]
    FormatMismatch { field: String, label: String },
}

impl FieldError {
    /// Id of the field whose value was rejected.
    pub fn field_id(&self) -> &str {
        match self {
            FieldError::Missing { field, .. }
            | FieldError::NotANumber { field, .. }
            | FieldError::InvalidEmail { field, .. }
            | FieldError::InvalidPhone { field, .. }
            | FieldError::NotAnOption { field, .. }
            | FieldError::FormatMismatch { field, .. } => field,
        }
    }
}

/// A caller-supplied identifier does not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("Form not found")]
    FormNotFound { slug: String },

    #[error("Submission not found")]
    SubmissionNotFound { id: String },

    #[error("Invalid submission id")]
    InvalidSubmissionId { id: String },
}

/// Document store failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("form '{0}' already exists")]
    DuplicateSlug(String),

    #[error("submission '{0}' already exists")]
    DuplicateSubmission(String),

    #[error("backend error: {0}")]
    Backend(String),
}

/// Service-level errors.
#[derive(Debug, Error)]
pub enum FormError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error("This form is not accepting submissions.")]
    Suspended { slug: String },

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("export failed: {0}")]
    Export(#[from] csv::Error),

    #[error("export failed: {0}")]
    Io(#[from] std::io::Error),
}

impl FormError {
    /// HTTP status a routing layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            FormError::Schema(_) | FormError::Validation(_) => 400,
            FormError::Reference(ReferenceError::InvalidSubmissionId { .. }) => 400,
            FormError::Reference(_) => 404,
            FormError::Suspended { .. } => 403,
            FormError::Store(_) | FormError::Export(_) | FormError::Io(_) => 500,
        }
    }

    /// Whether the message may be shown to the end user as-is.
    pub fn is_user_facing(&self) -> bool {
        self.status_code() < 500
    }
}

/// Result type alias using FormError.
pub type FormResult<T> = Result<T, FormError>;
