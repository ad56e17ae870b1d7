use promodash_common::models::{FormField, FormFieldPayload};
use promodash_common::traits::FormFieldApi;
use promodash_common::Error;
use tracing::{error, info};

use crate::commands::dialog::Dialog;
use crate::commands::{CommandError, CommandResult};
use crate::inflight::InFlight;
use crate::notifications::Notifications;

/// Entry-form fields of one campaign, ordered by `order`.
pub struct FormFieldEditor {
    campaign_id: i64,
    fields: Vec<FormField>,
    dialog: Option<Dialog<FormFieldPayload>>,
    pending_delete: Option<i64>,
    inflight: InFlight,
    notifications: Notifications,
}

impl FormFieldEditor {
    pub fn new(campaign_id: i64, notifications: Notifications) -> Self {
        Self {
            campaign_id,
            fields: Vec::new(),
            dialog: None,
            pending_delete: None,
            inflight: InFlight::new(),
            notifications,
        }
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn dialog(&self) -> Option<&Dialog<FormFieldPayload>> {
        self.dialog.as_ref()
    }

    pub fn pending_delete(&self) -> Option<i64> {
        self.pending_delete
    }

    pub async fn refresh(&mut self, api: &dyn FormFieldApi) -> Result<CommandResult<Vec<FormField>>, CommandError> {
        match api.list_form_fields(self.campaign_id).await {
            Ok(fields) => {
                self.fields = fields;
                Ok(CommandResult::new(self.fields.clone()))
            }
            Err(e) => {
                self.notifications.error(format!("Could not load form fields: {e}"));
                Err(e.into())
            }
        }
    }

    /// New fields go to the end of the form.
    pub fn open_create(&mut self) -> &mut Dialog<FormFieldPayload> {
        let mut dialog: Dialog<FormFieldPayload> = Dialog::create();
        dialog.draft.order = self.fields.iter().map(|f| f.order + 1).max().unwrap_or(0);
        self.dialog.insert(dialog)
    }

    pub fn open_edit(&mut self, field_id: i64) -> Result<&mut Dialog<FormFieldPayload>, CommandError> {
        let field = self
            .fields
            .iter()
            .find(|f| f.id == field_id)
            .ok_or_else(|| CommandError::NotFound(format!("Form field {field_id}")))?;
        let dialog = Dialog::edit(field.id, field.to_payload());
        Ok(self.dialog.insert(dialog))
    }

    pub fn dialog_mut(&mut self) -> Result<&mut Dialog<FormFieldPayload>, CommandError> {
        self.dialog
            .as_mut()
            .ok_or_else(|| CommandError::NothingPending("No form field dialog is open".to_string()))
    }

    pub fn close_dialog(&mut self) -> bool {
        self.dialog.take().is_some()
    }

    pub async fn submit(&mut self, api: &dyn FormFieldApi) -> Result<CommandResult<FormField>, CommandError> {
        let Some(dialog) = self.dialog.as_mut() else {
            return Err(CommandError::NothingPending("No form field dialog is open".to_string()));
        };
        if let Err(errors) = dialog.validate() {
            self.notifications.error(format!("Form field not saved: {errors}"));
            return Err(CommandError::Validation(errors));
        }
        let target = dialog.target;
        let payload = dialog.draft.clone();

        let guard = self.inflight.begin()?;
        let result = match target {
            Some(id) => api.update_form_field(self.campaign_id, id, &payload).await,
            None => api.create_form_field(self.campaign_id, &payload).await,
        };
        drop(guard);

        match result {
            Ok(field) => {
                info!("Form field '{}' saved for campaign {}", field.label, self.campaign_id);
                self.notifications.success(format!("Field '{}' saved", field.label));
                self.dialog = None;
                let warnings = match self.refresh(api).await {
                    Ok(_) => Vec::new(),
                    Err(e) => vec![format!("Saved, but the list could not be reloaded: {e}")],
                };
                Ok(CommandResult::with_warnings(field, warnings))
            }
            Err(Error::Validation(errors)) => {
                if let Some(d) = self.dialog.as_mut() {
                    d.errors = errors.clone();
                }
                self.notifications.error(format!("Form field not saved: {errors}"));
                Err(CommandError::Validation(errors))
            }
            Err(e) => {
                error!("Saving form field failed: {}", e);
                self.notifications.error(format!("Form field not saved: {e}"));
                Err(e.into())
            }
        }
    }

    pub fn request_delete(&mut self, field_id: i64) -> Result<(), CommandError> {
        if !self.fields.iter().any(|f| f.id == field_id) {
            return Err(CommandError::NotFound(format!("Form field {field_id}")));
        }
        self.pending_delete = Some(field_id);
        Ok(())
    }

    pub fn cancel_delete(&mut self) -> bool {
        self.pending_delete.take().is_some()
    }

    pub async fn confirm_delete(&mut self, api: &dyn FormFieldApi) -> Result<CommandResult<i64>, CommandError> {
        let field_id = self
            .pending_delete
            .ok_or_else(|| CommandError::NothingPending("No form field deletion to confirm".to_string()))?;

        let guard = self.inflight.begin()?;
        let result = api.delete_form_field(self.campaign_id, field_id).await;
        drop(guard);

        match result {
            Ok(()) => {
                self.pending_delete = None;
                self.notifications.success("Form field deleted");
                self.refresh(api).await?;
                Ok(CommandResult::new(field_id))
            }
            Err(e) => {
                self.notifications.error(format!("Form field not deleted: {e}"));
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promodash_common::models::FieldType;

    fn field(id: i64, order: i32) -> FormField {
        FormField {
            id,
            label: format!("Field {id}"),
            field_type: FieldType::Text,
            required: false,
            options: Vec::new(),
            order,
        }
    }

    #[test]
    fn new_fields_go_after_the_last_one() {
        let mut editor = FormFieldEditor::new(3, Notifications::new());
        assert_eq!(editor.open_create().draft.order, 0);

        editor.fields = vec![field(1, 0), field(2, 4)];
        let dialog = editor.open_create();
        assert_eq!(dialog.draft.order, 5);
        assert!(dialog.target.is_none());
    }
}
