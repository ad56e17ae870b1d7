// File: promodash-common/src/traits/resource.rs

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::validation::FieldErrors;

/// Form state behind a create/edit dialog.
pub trait Draft: Serialize + Clone + Default + Send + Sync + 'static {
    /// Assigns one input by key, e.g. from a `key=value` console argument.
    fn set_field(&mut self, key: &str, value: &str) -> Result<(), String>;

    /// Local validation, run before anything is sent.
    fn check(&self) -> Result<(), FieldErrors>;

    /// Keys accepted by `set_field`, in display order.
    fn field_names() -> &'static [&'static str];
}

/// A server-owned record managed through the generic list/dialog pattern.
///
/// `PATH` is the collection path relative to the API root, with a trailing
/// slash (`"countries/"`); single records live at `PATH{id}/`.
pub trait Resource: DeserializeOwned + Clone + std::fmt::Debug + Send + Sync + 'static {
    const PATH: &'static str;
    const LABEL: &'static str;
    const PLURAL: &'static str;
    /// Collections whose rows embed data from this resource (joined names,
    /// member counts). Mutations here invalidate their cached reads too.
    const DEPENDENTS: &'static [&'static str] = &[];

    type Draft: Draft;

    fn id(&self) -> i64;
    fn display_name(&self) -> String;
    fn to_draft(&self) -> Self::Draft;

    fn columns() -> &'static [&'static str];
    fn row(&self) -> Vec<String>;

    fn item_path(id: i64) -> String {
        format!("{}{}/", Self::PATH, id)
    }
}
