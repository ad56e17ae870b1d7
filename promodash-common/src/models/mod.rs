// File: promodash-common/src/models/mod.rs
pub mod campaign;
pub mod form_field;
pub mod marketing;
pub mod page;
pub mod reward;
pub mod tenancy;

pub use campaign::{Branding, Campaign, CampaignAction, CampaignPayload, CampaignStatus, CampaignType};
pub use form_field::{FieldType, FormField, FormFieldPayload};
pub use marketing::{
    MarketingCampaign, MarketingCampaignDraft, MarketingCampaignStatus, MarketingChannel,
    MarketingGroup, MarketingGroupDraft, MarketingUser, MarketingUserDraft,
};
pub use page::{ListQuery, Page};
pub use reward::{ImageUpload, ProbabilityBalance, Reward, RewardPayload, RewardSummary};
pub use tenancy::{Branch, BranchDraft, Client, ClientDraft, Country, CountryDraft, Dealer, DealerDraft};
