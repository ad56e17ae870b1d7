pub mod api;
pub mod resource;

pub use api::{CampaignApi, DashboardApi, FormFieldApi, MarketingApi, ResourceApi, RewardApi};
pub use resource::{Draft, Resource};
