use std::path::{Path, PathBuf};

use promodash_common::models::{ImageUpload, ProbabilityBalance, Reward, RewardPayload, RewardSummary};
use promodash_common::traits::RewardApi;
use promodash_common::{Error, FieldErrors};
use tracing::{error, info};

use crate::commands::{CommandError, CommandResult};
use crate::inflight::InFlight;
use crate::notifications::Notifications;

pub struct RewardListResult {
    pub rewards: Vec<Reward>,
    pub summary: RewardSummary,
}

/// Raw dialog inputs. Numbers stay text until submit so that "abc" or "2.5"
/// can be reported against the right field instead of failing to parse.
#[derive(Debug, Clone, PartialEq)]
pub struct RewardDraft {
    pub reward_id: Option<i64>,
    pub name: String,
    pub value: String,
    pub description: String,
    pub probability: String,
    pub total_available: String,
    pub color: String,
    pub image_path: Option<PathBuf>,
    pub errors: FieldErrors,
}

pub const REWARD_FIELDS: &[&str] = &[
    "name",
    "value",
    "description",
    "probability",
    "total_available",
    "color",
    "image",
];

impl Default for RewardDraft {
    fn default() -> Self {
        Self {
            reward_id: None,
            name: String::new(),
            value: String::new(),
            description: String::new(),
            probability: "0".to_string(),
            total_available: "0".to_string(),
            color: String::new(),
            image_path: None,
            errors: FieldErrors::new(),
        }
    }
}

impl RewardDraft {
    pub fn from_reward(reward: &Reward) -> Self {
        Self {
            reward_id: Some(reward.id),
            name: reward.name.clone(),
            value: reward.value.clone(),
            description: reward.description.clone(),
            probability: reward.probability.to_string(),
            total_available: reward.total_available.to_string(),
            color: reward.color.clone().unwrap_or_default(),
            image_path: None,
            errors: FieldErrors::new(),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "name" => self.name = value.to_string(),
            "value" => self.value = value.to_string(),
            "description" => self.description = value.to_string(),
            "probability" | "prob" => self.probability = value.trim().to_string(),
            "total_available" | "stock" => self.total_available = value.trim().to_string(),
            "color" => self.color = value.trim().to_string(),
            "image" => {
                let v = value.trim();
                self.image_path = if v.is_empty() || v.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(PathBuf::from(v))
                };
            }
            other => return Err(format!("Unknown reward field '{other}'")),
        }
        Ok(())
    }

    /// Parses and validates the inputs. Nothing is sent when this fails.
    pub fn to_payload(&self) -> Result<RewardPayload, FieldErrors> {
        let mut errors = FieldErrors::new();

        let probability = match self.probability.trim().parse::<f64>() {
            Ok(p) if p.is_finite() => p,
            _ => {
                errors.add("probability", "Probability must be a number");
                0.0
            }
        };
        let total_available = match self.total_available.trim() {
            "" => 0,
            raw => match raw.parse::<i64>() {
                Ok(n) => n,
                Err(_) => {
                    errors.add("total_available", "Total available must be a whole number");
                    0
                }
            },
        };

        let payload = RewardPayload {
            name: self.name.trim().to_string(),
            value: self.value.trim().to_string(),
            description: self.description.clone(),
            probability,
            total_available,
            color: if self.color.is_empty() { None } else { Some(self.color.clone()) },
        };
        if let Err(e) = payload.check() {
            // Parse failures above already explain the numeric fields.
            for (field, messages) in e.iter() {
                if errors.has(field) {
                    continue;
                }
                for m in messages {
                    errors.add(field, m.clone());
                }
            }
        }
        errors.into_result().map(|_| payload)
    }
}

async fn load_image(path: &Path) -> Result<ImageUpload, Error> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    Ok(ImageUpload::new(file_name, bytes))
}

/// Reward table of one campaign plus its create/edit dialog and delete
/// confirmation.
pub struct RewardEditor {
    campaign_id: i64,
    rewards: Vec<Reward>,
    draft: Option<RewardDraft>,
    pending_delete: Option<i64>,
    inflight: InFlight,
    notifications: Notifications,
}

impl RewardEditor {
    pub fn new(campaign_id: i64, notifications: Notifications) -> Self {
        Self {
            campaign_id,
            rewards: Vec::new(),
            draft: None,
            pending_delete: None,
            inflight: InFlight::new(),
            notifications,
        }
    }

    pub fn campaign_id(&self) -> i64 {
        self.campaign_id
    }

    pub fn rewards(&self) -> &[Reward] {
        &self.rewards
    }

    pub fn summary(&self) -> RewardSummary {
        RewardSummary::from_rewards(&self.rewards)
    }

    pub fn draft(&self) -> Option<&RewardDraft> {
        self.draft.as_ref()
    }

    pub fn pending_delete(&self) -> Option<i64> {
        self.pending_delete
    }

    pub fn is_busy(&self) -> bool {
        self.inflight.is_busy()
    }

    fn find(&self, reward_id: i64) -> Result<&Reward, CommandError> {
        self.rewards
            .iter()
            .find(|r| r.id == reward_id)
            .ok_or_else(|| CommandError::NotFound(format!("Reward {reward_id} is not in this campaign")))
    }

    pub async fn refresh(&mut self, api: &dyn RewardApi) -> Result<CommandResult<RewardListResult>, CommandError> {
        match api.list_rewards(self.campaign_id).await {
            Ok(rewards) => self.rewards = rewards,
            Err(e) => {
                self.notifications.error(format!("Could not load rewards: {e}"));
                return Err(e.into());
            }
        }

        let summary = self.summary();
        let mut warnings = Vec::new();
        if !self.rewards.is_empty() && summary.balance() == ProbabilityBalance::Warning {
            warnings.push(format!(
                "Probabilities add up to {}, not 100%",
                summary.probability_label()
            ));
        }
        Ok(CommandResult::with_warnings(
            RewardListResult {
                rewards: self.rewards.clone(),
                summary,
            },
            warnings,
        ))
    }

    pub fn open_create(&mut self) -> &mut RewardDraft {
        self.draft.insert(RewardDraft::default())
    }

    pub fn open_edit(&mut self, reward_id: i64) -> Result<&mut RewardDraft, CommandError> {
        let draft = RewardDraft::from_reward(self.find(reward_id)?);
        Ok(self.draft.insert(draft))
    }

    pub fn draft_mut(&mut self) -> Result<&mut RewardDraft, CommandError> {
        self.draft
            .as_mut()
            .ok_or_else(|| CommandError::NothingPending("No reward dialog is open".to_string()))
    }

    pub fn close_draft(&mut self) -> bool {
        self.draft.take().is_some()
    }

    /// Validates locally, then creates or updates. On success the dialog
    /// closes and the list is fetched again.
    pub async fn submit(&mut self, api: &dyn RewardApi) -> Result<CommandResult<Reward>, CommandError> {
        let Some(draft) = self.draft.as_mut() else {
            return Err(CommandError::NothingPending("No reward dialog is open".to_string()));
        };

        let payload = match draft.to_payload() {
            Ok(p) => p,
            Err(errors) => {
                draft.errors = errors.clone();
                self.notifications.error(format!("Reward not saved: {errors}"));
                return Err(CommandError::Validation(errors));
            }
        };
        draft.errors.clear();
        let reward_id = draft.reward_id;
        let image_path = draft.image_path.clone();

        let guard = self.inflight.begin()?;
        let image = match image_path {
            Some(path) => match load_image(&path).await {
                Ok(img) => Some(img),
                Err(e) => {
                    self.notifications.error(format!("Could not read image {}: {e}", path.display()));
                    return Err(e.into());
                }
            },
            None => None,
        };

        let result = match reward_id {
            Some(id) => api.update_reward(self.campaign_id, id, &payload, image).await,
            None => api.create_reward(self.campaign_id, &payload, image).await,
        };
        drop(guard);

        match result {
            Ok(reward) => {
                let verb = if reward_id.is_some() { "updated" } else { "created" };
                info!("Reward {} {} in campaign {}", reward.id, verb, self.campaign_id);
                self.notifications.success(format!("Reward '{}' {}", reward.name, verb));
                self.draft = None;
                let warnings = match self.refresh(api).await {
                    Ok(list) => list.warnings,
                    Err(e) => vec![format!("Saved, but the list could not be reloaded: {e}")],
                };
                Ok(CommandResult::with_warnings(reward, warnings))
            }
            Err(Error::Validation(errors)) => {
                if let Some(d) = self.draft.as_mut() {
                    d.errors = errors.clone();
                }
                self.notifications.error(format!("Reward not saved: {errors}"));
                Err(CommandError::Validation(errors))
            }
            Err(e) => {
                error!("Saving reward failed: {}", e);
                self.notifications.error(format!("Reward not saved: {e}"));
                Err(e.into())
            }
        }
    }

    /// First step of a delete; nothing is sent until `confirm_delete`.
    pub fn request_delete(&mut self, reward_id: i64) -> Result<&Reward, CommandError> {
        self.find(reward_id)?;
        self.pending_delete = Some(reward_id);
        self.find(reward_id)
    }

    pub fn cancel_delete(&mut self) -> bool {
        self.pending_delete.take().is_some()
    }

    pub async fn confirm_delete(&mut self, api: &dyn RewardApi) -> Result<CommandResult<i64>, CommandError> {
        let reward_id = self
            .pending_delete
            .ok_or_else(|| CommandError::NothingPending("No reward deletion to confirm".to_string()))?;

        let guard = self.inflight.begin()?;
        let result = api.delete_reward(self.campaign_id, reward_id).await;
        drop(guard);

        match result {
            Ok(()) => {
                self.pending_delete = None;
                info!("Reward {} deleted from campaign {}", reward_id, self.campaign_id);
                self.notifications.success("Reward deleted");
                let warnings = match self.refresh(api).await {
                    Ok(list) => list.warnings,
                    Err(e) => vec![format!("Deleted, but the list could not be reloaded: {e}")],
                };
                Ok(CommandResult::with_warnings(reward_id, warnings))
            }
            Err(e) => {
                error!("Deleting reward {} failed: {}", reward_id, e);
                self.notifications.error(format!("Reward not deleted: {e}"));
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Counts calls so tests can prove nothing reached the network.
    #[derive(Default)]
    struct CountingApi {
        rewards: Mutex<Vec<Reward>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RewardApi for CountingApi {
        async fn list_rewards(&self, _campaign_id: i64) -> Result<Vec<Reward>, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.rewards.lock().unwrap().clone())
        }

        async fn create_reward(
            &self,
            campaign_id: i64,
            payload: &RewardPayload,
            _image: Option<ImageUpload>,
        ) -> Result<Reward, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut rewards = self.rewards.lock().unwrap();
            let reward = Reward {
                id: rewards.len() as i64 + 1,
                campaign: Some(campaign_id),
                name: payload.name.clone(),
                value: payload.value.clone(),
                description: payload.description.clone(),
                probability: payload.probability,
                total_available: payload.total_available,
                image: None,
                color: payload.color.clone(),
            };
            rewards.push(reward.clone());
            Ok(reward)
        }

        async fn update_reward(
            &self,
            _campaign_id: i64,
            _reward_id: i64,
            _payload: &RewardPayload,
            _image: Option<ImageUpload>,
        ) -> Result<Reward, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(Error::NotFound("gone".into()))
        }

        async fn delete_reward(&self, _campaign_id: i64, reward_id: i64) -> Result<(), Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.rewards.lock().unwrap().retain(|r| r.id != reward_id);
            Ok(())
        }
    }

    #[tokio::test]
    async fn probability_over_100_is_rejected_before_any_call() {
        let api = CountingApi::default();
        let notifications = Notifications::new();
        let mut editor = RewardEditor::new(1, notifications.clone());

        let draft = editor.open_create();
        draft.set("name", "Jackpot").unwrap();
        draft.set("value", "$500").unwrap();
        draft.set("probability", "150").unwrap();

        match editor.submit(&api).await {
            Err(CommandError::Validation(errors)) => {
                assert_eq!(errors.first("probability"), Some("Probability cannot exceed 100"))
            }
            _ => panic!("expected a validation error"),
        }
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
        assert!(editor.draft().unwrap().errors.has("probability"));
        assert_eq!(notifications.len(), 1);
    }

    #[test]
    fn inventory_must_be_a_non_negative_whole_number() {
        let mut draft = RewardDraft::default();
        draft.set("name", "Mug").unwrap();
        draft.set("value", "1").unwrap();

        draft.set("stock", "2.5").unwrap();
        assert_eq!(
            draft.to_payload().unwrap_err().first("total_available"),
            Some("Total available must be a whole number")
        );
        draft.set("stock", "-1").unwrap();
        assert_eq!(
            draft.to_payload().unwrap_err().first("total_available"),
            Some("Total available cannot be negative")
        );
        draft.set("probability", "abc").unwrap();
        draft.set("stock", "0").unwrap();
        let errors = draft.to_payload().unwrap_err();
        assert_eq!(errors.get("probability").map(|m| m.len()), Some(1));
        assert_eq!(errors.first("probability"), Some("Probability must be a number"));
    }

    #[tokio::test]
    async fn create_closes_dialog_and_refetches() {
        let api = CountingApi::default();
        let notifications = Notifications::new();
        let mut editor = RewardEditor::new(3, notifications.clone());

        let draft = editor.open_create();
        draft.set("name", "Free Pizza").unwrap();
        draft.set("value", "1 pizza").unwrap();
        draft.set("probability", "20").unwrap();

        let result = editor.submit(&api).await.unwrap();
        assert_eq!(result.data.name, "Free Pizza");
        assert_eq!(result.warnings, vec!["Probabilities add up to 20%, not 100%".to_string()]);
        assert!(editor.draft().is_none());
        assert_eq!(editor.rewards().len(), 1);
        // create + list
        assert_eq!(api.calls.load(Ordering::SeqCst), 2);
        assert_eq!(notifications.drain()[0].message, "Reward 'Free Pizza' created");
    }

    #[tokio::test]
    async fn cancelled_delete_leaves_rewards_alone() {
        let api = CountingApi::default();
        api.rewards.lock().unwrap().push(Reward {
            id: 1,
            campaign: Some(1),
            name: "No Prize".into(),
            value: "-".into(),
            description: String::new(),
            probability: 100.0,
            total_available: 0,
            image: None,
            color: None,
        });
        let mut editor = RewardEditor::new(1, Notifications::new());
        editor.refresh(&api).await.unwrap();

        editor.request_delete(1).unwrap();
        assert!(editor.cancel_delete());
        assert!(matches!(
            editor.confirm_delete(&api).await,
            Err(CommandError::NothingPending(_))
        ));
        assert_eq!(editor.rewards().len(), 1);

        editor.request_delete(1).unwrap();
        editor.confirm_delete(&api).await.unwrap();
        assert!(editor.rewards().is_empty());
    }
}
