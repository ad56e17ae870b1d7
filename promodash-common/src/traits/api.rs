use async_trait::async_trait;

use crate::error::Error;
use crate::models::{
    Campaign, CampaignAction, CampaignPayload, FormField, FormFieldPayload, ImageUpload,
    ListQuery, MarketingCampaign, Page, Reward, RewardPayload,
};
use crate::traits::Resource;

/// Everything the admin console talks to.
pub trait DashboardApi:
ResourceApi
+ CampaignApi
+ RewardApi
+ FormFieldApi
+ MarketingApi
{
}

impl<T> DashboardApi for T
where
    T: ResourceApi
    + CampaignApi
    + RewardApi
    + FormFieldApi
    + MarketingApi,
{
    // marker
}

/// List/detail/create/update/delete for any `Resource`.
#[async_trait]
pub trait ResourceApi: Send + Sync {
    async fn list_page<R: Resource>(&self, query: &ListQuery) -> Result<Page<R>, Error>;
    async fn fetch<R: Resource>(&self, id: i64) -> Result<R, Error>;
    async fn create<R: Resource>(&self, draft: &R::Draft) -> Result<R, Error>;
    async fn update<R: Resource>(&self, id: i64, draft: &R::Draft) -> Result<R, Error>;
    async fn delete<R: Resource>(&self, id: i64) -> Result<(), Error>;

    /// Drops any cached copy of this page so the next read hits the server.
    fn evict_page<R: Resource>(&self, _query: &ListQuery) {}
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CampaignApi: Send + Sync {
    async fn get_campaign(&self, campaign_id: i64) -> Result<Campaign, Error>;
    async fn create_campaign(&self, payload: &CampaignPayload) -> Result<Campaign, Error>;
    /// Full-campaign PATCH.
    async fn update_campaign(&self, campaign_id: i64, payload: &CampaignPayload) -> Result<Campaign, Error>;
    async fn delete_campaign(&self, campaign_id: i64) -> Result<(), Error>;
    async fn run_campaign_action(&self, campaign_id: i64, action: CampaignAction) -> Result<Campaign, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RewardApi: Send + Sync {
    async fn list_rewards(&self, campaign_id: i64) -> Result<Vec<Reward>, Error>;
    async fn create_reward(
        &self,
        campaign_id: i64,
        payload: &RewardPayload,
        image: Option<ImageUpload>,
    ) -> Result<Reward, Error>;
    async fn update_reward(
        &self,
        campaign_id: i64,
        reward_id: i64,
        payload: &RewardPayload,
        image: Option<ImageUpload>,
    ) -> Result<Reward, Error>;
    async fn delete_reward(&self, campaign_id: i64, reward_id: i64) -> Result<(), Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FormFieldApi: Send + Sync {
    async fn list_form_fields(&self, campaign_id: i64) -> Result<Vec<FormField>, Error>;
    async fn create_form_field(&self, campaign_id: i64, payload: &FormFieldPayload) -> Result<FormField, Error>;
    async fn update_form_field(
        &self,
        campaign_id: i64,
        field_id: i64,
        payload: &FormFieldPayload,
    ) -> Result<FormField, Error>;
    async fn delete_form_field(&self, campaign_id: i64, field_id: i64) -> Result<(), Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketingApi: Send + Sync {
    /// Asks the backend to deliver a draft (or previously failed) blast.
    async fn send_marketing_campaign(&self, campaign_id: i64) -> Result<MarketingCampaign, Error>;
}
