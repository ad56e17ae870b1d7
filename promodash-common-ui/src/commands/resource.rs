use promodash_common::models::{ListQuery, Page};
use promodash_common::traits::{Resource, ResourceApi};
use promodash_common::Error;
use tracing::{debug, error, info};

use crate::commands::dialog::Dialog;
use crate::commands::{CommandError, CommandResult};
use crate::inflight::InFlight;
use crate::notifications::Notifications;

/// State behind one list screen: paginated search over a resource, a
/// create/edit dialog and a confirmation-gated delete.
pub struct CrudList<R: Resource> {
    query: ListQuery,
    page: Page<R>,
    dialog: Option<Dialog<R::Draft>>,
    pending_delete: Option<i64>,
    inflight: InFlight,
    notifications: Notifications,
}

impl<R: Resource> CrudList<R> {
    pub fn new(page_size: u32, notifications: Notifications) -> Self {
        Self {
            query: ListQuery::with_page_size(page_size),
            page: Page::empty(),
            dialog: None,
            pending_delete: None,
            inflight: InFlight::new(),
            notifications,
        }
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    /// Identifies the current read; changes whenever page or search change.
    pub fn query_key(&self) -> String {
        format!("{}?{}", R::PATH, self.query.to_query_string())
    }

    pub fn items(&self) -> &[R] {
        &self.page.results
    }

    pub fn count(&self) -> u64 {
        self.page.count
    }

    pub fn total_pages(&self) -> u32 {
        self.query.total_pages(self.page.count)
    }

    pub fn dialog(&self) -> Option<&Dialog<R::Draft>> {
        self.dialog.as_ref()
    }

    pub fn pending_delete(&self) -> Option<i64> {
        self.pending_delete
    }

    pub async fn load<A: ResourceApi>(&mut self, api: &A) -> Result<CommandResult<Page<R>>, CommandError> {
        match api.list_page::<R>(&self.query).await {
            Ok(page) => {
                self.page = page;
                let mut warnings = Vec::new();
                if self.page.results.is_empty() && self.query.page > 1 {
                    warnings.push(format!("Page {} is empty", self.query.page));
                }
                Ok(CommandResult::with_warnings(self.page.clone(), warnings))
            }
            Err(e) => {
                self.notifications.error(format!("Could not load {}: {e}", R::PLURAL));
                Err(e.into())
            }
        }
    }

    /// Refetch after a mutation. When the current page has emptied out,
    /// either because the last row on it was removed or because the server
    /// reports it as gone, steps back until a page answers.
    async fn reload<A: ResourceApi>(&mut self, api: &A, removed: Option<i64>) -> Result<(), Error> {
        let emptied = removed.is_some_and(|id| self.page.results.iter().all(|r| r.id() == id));
        if emptied && self.query.page > 1 {
            self.query.page -= 1;
        }
        loop {
            match api.list_page::<R>(&self.query).await {
                Ok(page) => {
                    self.page = page;
                    return Ok(());
                }
                Err(Error::NotFound(reason)) if self.query.page > 1 => {
                    debug!("{} page {} is gone ({}), stepping back", R::LABEL, self.query.page, reason);
                    self.query.page -= 1;
                }
                Err(e) => {
                    self.notifications.error(format!("Could not load {}: {e}", R::PLURAL));
                    return Err(e);
                }
            }
        }
    }

    /// Explicit reload: skips any cached copy of the current page.
    pub async fn refresh<A: ResourceApi>(&mut self, api: &A) -> Result<CommandResult<Page<R>>, CommandError> {
        api.evict_page::<R>(&self.query);
        self.load(api).await
    }

    /// Changing the search always starts again at page 1. Returns whether
    /// the query changed.
    pub fn set_search(&mut self, text: &str) -> bool {
        let text = text.trim().to_string();
        let changed = text != self.query.search || self.query.page != 1;
        self.query.search = text;
        self.query.page = 1;
        changed
    }

    pub fn set_page(&mut self, page: u32) -> Result<(), CommandError> {
        if page == 0 {
            return Err(CommandError::InvalidInput("Pages start at 1".to_string()));
        }
        if self.page.count > 0 && page > self.total_pages() {
            return Err(CommandError::InvalidInput(format!(
                "Page {} is past the last page ({})",
                page,
                self.total_pages()
            )));
        }
        self.query.page = page;
        Ok(())
    }

    pub fn next_page(&mut self) -> Result<(), CommandError> {
        self.set_page(self.query.page + 1)
    }

    pub fn prev_page(&mut self) -> Result<(), CommandError> {
        self.set_page(self.query.page.saturating_sub(1))
    }

    pub fn open_create(&mut self) -> &mut Dialog<R::Draft> {
        self.dialog.insert(Dialog::create())
    }

    /// Edits start from the row as currently listed.
    pub fn open_edit(&mut self, id: i64) -> Result<&mut Dialog<R::Draft>, CommandError> {
        let item = self
            .page
            .results
            .iter()
            .find(|r| r.id() == id)
            .ok_or_else(|| CommandError::NotFound(format!("{} {} is not on this page", R::LABEL, id)))?;
        let dialog = Dialog::edit(id, item.to_draft());
        Ok(self.dialog.insert(dialog))
    }

    pub fn dialog_mut(&mut self) -> Result<&mut Dialog<R::Draft>, CommandError> {
        self.dialog
            .as_mut()
            .ok_or_else(|| CommandError::NothingPending(format!("No {} dialog is open", R::LABEL)))
    }

    pub fn close_dialog(&mut self) -> bool {
        self.dialog.take().is_some()
    }

    pub async fn submit<A: ResourceApi>(&mut self, api: &A) -> Result<CommandResult<R>, CommandError> {
        let Some(dialog) = self.dialog.as_mut() else {
            return Err(CommandError::NothingPending(format!("No {} dialog is open", R::LABEL)));
        };
        if let Err(errors) = dialog.validate() {
            self.notifications.error(format!("{} not saved: {errors}", capitalize(R::LABEL)));
            return Err(CommandError::Validation(errors));
        }
        let target = dialog.target;
        let draft = dialog.draft.clone();

        let guard = self.inflight.begin()?;
        let result = match target {
            Some(id) => api.update::<R>(id, &draft).await,
            None => api.create::<R>(&draft).await,
        };
        drop(guard);

        match result {
            Ok(item) => {
                let verb = if target.is_some() { "updated" } else { "created" };
                info!("{} {} {}", R::LABEL, item.id(), verb);
                self.notifications
                    .success(format!("{} '{}' {}", capitalize(R::LABEL), item.display_name(), verb));
                self.dialog = None;
                let warnings = match self.reload(api, None).await {
                    Ok(()) => Vec::new(),
                    Err(e) => vec![format!("Saved, but the list could not be reloaded: {e}")],
                };
                Ok(CommandResult::with_warnings(item, warnings))
            }
            Err(Error::Validation(errors)) => {
                if let Some(d) = self.dialog.as_mut() {
                    d.errors = errors.clone();
                }
                self.notifications
                    .error(format!("{} not saved: {errors}", capitalize(R::LABEL)));
                Err(CommandError::Validation(errors))
            }
            Err(e) => {
                error!("Saving {} failed: {}", R::LABEL, e);
                self.notifications
                    .error(format!("{} not saved: {e}", capitalize(R::LABEL)));
                Err(e.into())
            }
        }
    }

    pub fn request_delete(&mut self, id: i64) -> Result<&R, CommandError> {
        let item = self
            .page
            .results
            .iter()
            .find(|r| r.id() == id)
            .ok_or_else(|| CommandError::NotFound(format!("{} {} is not on this page", R::LABEL, id)))?;
        self.pending_delete = Some(id);
        Ok(item)
    }

    pub fn cancel_delete(&mut self) -> bool {
        self.pending_delete.take().is_some()
    }

    pub async fn confirm_delete<A: ResourceApi>(&mut self, api: &A) -> Result<CommandResult<i64>, CommandError> {
        let id = self
            .pending_delete
            .ok_or_else(|| CommandError::NothingPending(format!("No {} deletion to confirm", R::LABEL)))?;

        let guard = self.inflight.begin()?;
        let result = api.delete::<R>(id).await;
        drop(guard);

        match result {
            Ok(()) => {
                self.pending_delete = None;
                info!("{} {} deleted", R::LABEL, id);
                self.notifications.success(format!("{} deleted", capitalize(R::LABEL)));
                let warnings = match self.reload(api, Some(id)).await {
                    Ok(()) => Vec::new(),
                    Err(e) => vec![format!("Deleted, but the list could not be reloaded: {e}")],
                };
                Ok(CommandResult::with_warnings(id, warnings))
            }
            Err(e) => {
                error!("Deleting {} {} failed: {}", R::LABEL, id, e);
                self.notifications
                    .error(format!("{} not deleted: {e}", capitalize(R::LABEL)));
                Err(e.into())
            }
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promodash_common::models::Country;

    #[test]
    fn search_change_resets_page_and_query_key() {
        let mut list = CrudList::<Country>::new(10, Notifications::new());
        list.query.page = 3;
        let before = list.query_key();
        assert!(list.set_search("ken"));
        assert_eq!(list.query().page, 1);
        assert_ne!(list.query_key(), before);
        assert_eq!(list.query_key(), "countries/?page=1&page_size=10&search=ken");
        assert!(!list.set_search(" ken "));
    }

    #[test]
    fn page_bounds_follow_count() {
        let mut list = CrudList::<Country>::new(10, Notifications::new());
        list.page.count = 25;
        assert_eq!(list.total_pages(), 3);
        assert!(list.set_page(3).is_ok());
        assert!(list.next_page().is_err());
        assert!(list.set_page(0).is_err());
        list.prev_page().unwrap();
        assert_eq!(list.query().page, 2);
    }

    #[test]
    fn capitalize_label() {
        assert_eq!(capitalize("marketing group"), "Marketing group");
    }
}
