use std::fmt;
use std::str::FromStr;

use promodash_common::models::{Campaign, CampaignAction, CampaignPayload, CampaignStatus};
use promodash_common::traits::{CampaignApi, Draft, FormFieldApi, Resource, RewardApi};
use promodash_common::{Error, FieldErrors};
use tracing::{error, info, warn};

use crate::commands::form_field::FormFieldEditor;
use crate::commands::reward::RewardEditor;
use crate::commands::{CommandError, CommandResult};
use crate::inflight::InFlight;
use crate::notifications::Notifications;
use crate::preview::{render_preview, CampaignPreview, PreviewInput};

/// Tabs of the campaign form. Navigation only; any tab can be opened at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormSection {
    #[default]
    Details,
    Rewards,
    Form,
    Settings,
}

impl FormSection {
    pub const ALL: [FormSection; 4] = [
        FormSection::Details,
        FormSection::Rewards,
        FormSection::Form,
        FormSection::Settings,
    ];

    fn index(&self) -> usize {
        FormSection::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    pub fn next(&self) -> FormSection {
        FormSection::ALL[(self.index() + 1).min(FormSection::ALL.len() - 1)]
    }

    pub fn prev(&self) -> FormSection {
        FormSection::ALL[self.index().saturating_sub(1)]
    }

    pub fn title(&self) -> &'static str {
        match self {
            FormSection::Details => "Details",
            FormSection::Rewards => "Rewards",
            FormSection::Form => "Form fields",
            FormSection::Settings => "Settings",
        }
    }
}

impl fmt::Display for FormSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for FormSection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "details" => Ok(FormSection::Details),
            "rewards" => Ok(FormSection::Rewards),
            "form" | "fields" => Ok(FormSection::Form),
            "settings" => Ok(FormSection::Settings),
            other => Err(format!(
                "Unknown section '{other}' (expected details, rewards, form or settings)"
            )),
        }
    }
}

/// Where the shell should go after a controller call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormOutcome {
    Stay,
    NavigateToList,
}

/// One campaign being created or edited.
///
/// Details and settings edit a local `CampaignPayload`; saving sends the whole
/// payload (POST for a new campaign, PATCH otherwise). Rewards and form fields
/// need a saved campaign and get their own editors once it exists.
pub struct CampaignFormController {
    campaign: Option<Campaign>,
    payload: CampaignPayload,
    errors: FieldErrors,
    section: FormSection,
    rewards: Option<RewardEditor>,
    fields: Option<FormFieldEditor>,
    confirm_delete: bool,
    inflight: InFlight,
    notifications: Notifications,
}

impl CampaignFormController {
    pub fn new_campaign(notifications: Notifications) -> Self {
        Self {
            campaign: None,
            payload: CampaignPayload::default(),
            errors: FieldErrors::new(),
            section: FormSection::Details,
            rewards: None,
            fields: None,
            confirm_delete: false,
            inflight: InFlight::new(),
            notifications,
        }
    }

    /// Loads the campaign and its rewards and form fields.
    pub async fn open<A>(api: &A, campaign_id: i64, notifications: Notifications) -> Result<Self, CommandError>
    where
        A: CampaignApi + RewardApi + FormFieldApi,
    {
        let campaign = match api.get_campaign(campaign_id).await {
            Ok(c) => c,
            Err(e) => {
                notifications.error(format!("Could not open campaign {campaign_id}: {e}"));
                return Err(e.into());
            }
        };

        let mut controller = Self::new_campaign(notifications);
        controller.attach(campaign);
        if let Some(rewards) = controller.rewards.as_mut() {
            rewards.refresh(api).await?;
        }
        if let Some(fields) = controller.fields.as_mut() {
            fields.refresh(api).await?;
        }
        Ok(controller)
    }

    fn attach(&mut self, campaign: Campaign) {
        self.payload = campaign.to_draft();
        if self.rewards.as_ref().map(|r| r.campaign_id()) != Some(campaign.id) {
            self.rewards = Some(RewardEditor::new(campaign.id, self.notifications.clone()));
            self.fields = Some(FormFieldEditor::new(campaign.id, self.notifications.clone()));
        }
        self.campaign = Some(campaign);
    }

    pub fn campaign(&self) -> Option<&Campaign> {
        self.campaign.as_ref()
    }

    pub fn campaign_id(&self) -> Option<i64> {
        self.campaign.as_ref().map(|c| c.id)
    }

    pub fn is_new(&self) -> bool {
        self.campaign.is_none()
    }

    pub fn payload(&self) -> &CampaignPayload {
        &self.payload
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn title(&self) -> String {
        match &self.campaign {
            Some(c) => format!("{} (#{})", c.name, c.id),
            None => "New campaign".to_string(),
        }
    }

    // ------------------------------------------------------------ sections

    pub fn section(&self) -> FormSection {
        self.section
    }

    pub fn goto(&mut self, section: FormSection) {
        self.section = section;
    }

    pub fn next_section(&mut self) -> FormSection {
        self.section = self.section.next();
        self.section
    }

    pub fn prev_section(&mut self) -> FormSection {
        self.section = self.section.prev();
        self.section
    }

    fn saved_only(&self, what: &str) -> Result<(), CommandError> {
        if self.is_new() {
            Err(CommandError::InvalidInput(format!("Save the campaign before editing its {what}")))
        } else {
            Ok(())
        }
    }

    pub fn rewards(&self) -> Option<&RewardEditor> {
        self.rewards.as_ref()
    }

    pub fn rewards_mut(&mut self) -> Result<&mut RewardEditor, CommandError> {
        self.saved_only("rewards")?;
        self.rewards
            .as_mut()
            .ok_or_else(|| CommandError::InvalidInput("Rewards are not loaded".to_string()))
    }

    pub fn fields(&self) -> Option<&FormFieldEditor> {
        self.fields.as_ref()
    }

    pub fn fields_mut(&mut self) -> Result<&mut FormFieldEditor, CommandError> {
        self.saved_only("form fields")?;
        self.fields
            .as_mut()
            .ok_or_else(|| CommandError::InvalidInput("Form fields are not loaded".to_string()))
    }

    // ---------------------------------------------------------- editing

    pub fn set_field(&mut self, key: &str, value: &str) -> Result<(), CommandError> {
        self.payload.set_field(key, value).map_err(CommandError::InvalidInput)
    }

    pub async fn save(&mut self, api: &dyn CampaignApi) -> Result<CommandResult<Campaign>, CommandError> {
        self.errors.clear();
        if let Err(errors) = self.payload.check() {
            self.errors = errors.clone();
            self.notifications.error(format!("Campaign not saved: {errors}"));
            return Err(CommandError::Validation(errors));
        }

        let guard = self.inflight.begin()?;
        let result = match self.campaign_id() {
            Some(id) => api.update_campaign(id, &self.payload).await,
            None => api.create_campaign(&self.payload).await,
        };
        drop(guard);

        match result {
            Ok(campaign) => {
                let verb = if self.is_new() { "created" } else { "saved" };
                info!("Campaign {} {}", campaign.id, verb);
                self.notifications.success(format!("Campaign '{}' {}", campaign.name, verb));
                self.attach(campaign.clone());
                Ok(CommandResult::new(campaign))
            }
            Err(Error::Validation(errors)) => {
                self.errors = errors.clone();
                self.notifications.error(format!("Campaign not saved: {errors}"));
                Err(CommandError::Validation(errors))
            }
            Err(e) => {
                error!("Saving campaign failed: {}", e);
                self.notifications.error(format!("Campaign not saved: {e}"));
                Err(e.into())
            }
        }
    }

    // ---------------------------------------------------------- delete

    pub fn request_delete(&mut self) -> Result<(), CommandError> {
        if self.is_new() {
            return Err(CommandError::InvalidInput("This campaign has not been saved yet".to_string()));
        }
        self.confirm_delete = true;
        Ok(())
    }

    pub fn delete_pending(&self) -> bool {
        self.confirm_delete
    }

    pub fn cancel_delete(&mut self) -> bool {
        std::mem::take(&mut self.confirm_delete)
    }

    pub async fn confirm_delete(&mut self, api: &dyn CampaignApi) -> Result<CommandResult<FormOutcome>, CommandError> {
        let campaign_id = match (self.confirm_delete, self.campaign_id()) {
            (true, Some(id)) => id,
            _ => return Err(CommandError::NothingPending("No campaign deletion to confirm".to_string())),
        };

        let guard = self.inflight.begin()?;
        let result = api.delete_campaign(campaign_id).await;
        drop(guard);

        match result {
            Ok(()) => {
                self.confirm_delete = false;
                info!("Campaign {} deleted", campaign_id);
                self.notifications.success("Campaign deleted");
                Ok(CommandResult::new(FormOutcome::NavigateToList))
            }
            Err(e) => {
                error!("Deleting campaign {} failed: {}", campaign_id, e);
                self.notifications.error(format!("Campaign not deleted: {e}"));
                Err(e.into())
            }
        }
    }

    // --------------------------------------------------------- lifecycle

    pub fn status(&self) -> Option<CampaignStatus> {
        self.campaign.as_ref().map(|c| c.status)
    }

    /// Actions the settings tab offers for the current status.
    pub fn offered_actions(&self) -> &'static [CampaignAction] {
        self.status().map(|s| s.available_actions()).unwrap_or(&[])
    }

    /// The backend decides whether a transition is allowed; an action the
    /// current status does not offer is still sent, with a warning.
    pub async fn run_action(
        &mut self,
        api: &dyn CampaignApi,
        action: CampaignAction,
    ) -> Result<CommandResult<Campaign>, CommandError> {
        let campaign_id = self
            .campaign_id()
            .ok_or_else(|| CommandError::InvalidInput("Save the campaign first".to_string()))?;

        let mut warnings = Vec::new();
        if !self.offered_actions().contains(&action) {
            let status = self.status().map(|s| s.to_string()).unwrap_or_default();
            warn!("Running {:?} on a {} campaign", action, status);
            warnings.push(format!("'{}' is not usually offered for {} campaigns", action.path_segment(), status));
        }

        let guard = self.inflight.begin()?;
        let result = api.run_campaign_action(campaign_id, action).await;
        drop(guard);

        match result {
            Ok(campaign) => {
                info!("Campaign {} {}", campaign_id, action.past_tense());
                self.notifications
                    .success(format!("Campaign {}", action.past_tense()));
                self.attach(campaign.clone());
                Ok(CommandResult::with_warnings(campaign, warnings))
            }
            Err(e) => {
                self.notifications
                    .error(format!("Could not {} campaign: {e}", action.path_segment()));
                Err(e.into())
            }
        }
    }

    // ----------------------------------------------------------- preview

    /// Built from the unsaved payload and the current reward list.
    pub fn preview(&self) -> CampaignPreview {
        let rewards = self.rewards.as_ref().map(|r| r.rewards()).unwrap_or(&[]);
        render_preview(&PreviewInput {
            name: &self.payload.name,
            campaign_type: self.payload.campaign_type,
            rewards,
            branding: &self.payload.branding,
            start_date: self.payload.start_date,
            end_date: self.payload.end_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::PreviewBody;
    use promodash_common::models::{Branding, CampaignType};

    #[test]
    fn sections_navigate_without_guards() {
        let mut form = CampaignFormController::new_campaign(Notifications::new());
        assert_eq!(form.section(), FormSection::Details);
        assert_eq!(form.next_section(), FormSection::Rewards);
        form.goto("settings".parse().unwrap());
        assert_eq!(form.next_section(), FormSection::Settings);
        assert_eq!(form.prev_section(), FormSection::Form);
        assert!("billing".parse::<FormSection>().is_err());
    }

    #[test]
    fn new_campaign_cannot_edit_rewards_or_delete() {
        let mut form = CampaignFormController::new_campaign(Notifications::new());
        assert!(form.rewards_mut().is_err());
        assert!(form.request_delete().is_err());
        assert!(!form.delete_pending());
    }

    #[test]
    fn preview_follows_unsaved_edits() {
        let mut form = CampaignFormController::new_campaign(Notifications::new());
        form.set_field("name", "Spin & Win").unwrap();
        form.set_field("type", "slot").unwrap();
        form.set_field("show_logo", "no").unwrap();
        form.set_field("logo", "https://cdn.example.com/logo.png").unwrap();

        let preview = form.preview();
        assert_eq!(preview.header.title, "Spin & Win");
        assert_eq!(preview.header.logo, None);
        assert_eq!(form.payload().campaign_type, CampaignType::InstantWin);
        assert!(matches!(preview.body, PreviewBody::SlotMachine(_)));
        assert_ne!(form.payload().branding, Branding::default());
    }

    #[tokio::test]
    async fn invalid_payload_is_not_sent() {
        let api = no_calls::NoCallsApi;
        let mut form = CampaignFormController::new_campaign(Notifications::new());
        form.set_field("name", "Winter Draw").unwrap();
        match form.save(&api).await {
            Err(CommandError::Validation(errors)) => {
                assert_eq!(errors.first("client"), Some("Client is required"))
            }
            _ => panic!("expected validation error"),
        }
        assert!(form.is_new());
    }

    mod no_calls {
        use super::*;
        use async_trait::async_trait;

        pub struct NoCallsApi;

        #[async_trait]
        impl CampaignApi for NoCallsApi {
            async fn get_campaign(&self, _id: i64) -> Result<Campaign, Error> {
                panic!("unexpected call")
            }
            async fn create_campaign(&self, _p: &CampaignPayload) -> Result<Campaign, Error> {
                panic!("unexpected call")
            }
            async fn update_campaign(&self, _id: i64, _p: &CampaignPayload) -> Result<Campaign, Error> {
                panic!("unexpected call")
            }
            async fn delete_campaign(&self, _id: i64) -> Result<(), Error> {
                panic!("unexpected call")
            }
            async fn run_campaign_action(&self, _id: i64, _a: CampaignAction) -> Result<Campaign, Error> {
                panic!("unexpected call")
            }
        }
    }
}
