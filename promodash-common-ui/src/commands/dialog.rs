use promodash_common::traits::Draft;
use promodash_common::FieldErrors;

/// An open create/edit dialog: the draft being typed into, which record it
/// edits (`None` when creating) and the last field errors it was rejected with.
#[derive(Debug, Clone)]
pub struct Dialog<D: Draft> {
    pub target: Option<i64>,
    pub draft: D,
    pub errors: FieldErrors,
}

impl<D: Draft> Dialog<D> {
    pub fn create() -> Self {
        Self {
            target: None,
            draft: D::default(),
            errors: FieldErrors::new(),
        }
    }

    pub fn edit(id: i64, draft: D) -> Self {
        Self {
            target: Some(id),
            draft,
            errors: FieldErrors::new(),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.target.is_some()
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        self.draft.set_field(key, value)
    }

    /// Runs local validation and records the outcome on the dialog.
    pub fn validate(&mut self) -> Result<(), FieldErrors> {
        self.errors.clear();
        self.draft.check().inspect_err(|errors| self.errors = errors.clone())
    }
}
