use promodash_common::models::{MarketingCampaign, MarketingChannel};
use promodash_common::traits::MarketingApi;
use tracing::{error, info};

use crate::commands::resource::CrudList;
use crate::commands::{CommandError, CommandResult};
use crate::notifications::Notifications;

pub struct SendResult {
    pub campaign: MarketingCampaign,
    pub channel: MarketingChannel,
}

pub struct MarketingCommands;

impl MarketingCommands {
    /// Queues delivery of a listed SMS/email campaign. Delivery itself is
    /// the backend's job; this only reports whether it accepted the request.
    pub async fn send(
        api: &dyn MarketingApi,
        list: &CrudList<MarketingCampaign>,
        campaign_id: i64,
        notifications: &Notifications,
    ) -> Result<CommandResult<SendResult>, CommandError> {
        let listed = list
            .items()
            .iter()
            .find(|c| c.id == campaign_id)
            .ok_or_else(|| CommandError::NotFound(format!("Marketing campaign {campaign_id} is not on this page")))?;
        if !listed.can_send() {
            return Err(CommandError::InvalidInput(format!(
                "'{}' is {} and cannot be sent again",
                listed.name, listed.status
            )));
        }

        match api.send_marketing_campaign(campaign_id).await {
            Ok(campaign) => {
                info!("Marketing campaign {} queued ({})", campaign.id, campaign.channel);
                notifications.success(format!("'{}' queued for delivery", campaign.name));
                let channel = campaign.channel;
                Ok(CommandResult::new(SendResult { campaign, channel }))
            }
            Err(e) => {
                error!("Sending marketing campaign {} failed: {}", campaign_id, e);
                notifications.error(format!("Could not send '{}': {e}", listed.name));
                Err(e.into())
            }
        }
    }
}
