// File: promodash-common/src/models/marketing.rs
//
// Contacts, segments and SMS/email blasts. Delivery itself happens server-side.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::campaign::{format_date, parse_datetime};
use super::tenancy::default_true;
use crate::traits::{Draft, Resource};
use crate::validation::{optional_text, parse_bool, parse_id, require, FieldErrors};

/// Three concatenated SMS segments.
pub const SMS_MAX_CHARS: usize = 480;

fn parse_ids(field: &str, value: &str) -> Result<Vec<i64>, String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_id(field, s))
        .collect()
}

fn join_ids(ids: &[i64]) -> String {
    if ids.is_empty() {
        "-".to_string()
    } else {
        ids.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(",")
    }
}

// -------------------------------------------------------------------- users

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingUser {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub groups: Vec<i64>,
    #[serde(default = "default_true")]
    pub is_subscribed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MarketingUserDraft {
    #[validate(length(max = 150, message = "Name must be at most 150 characters"))]
    pub name: String,
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: Option<String>,
    pub groups: Vec<i64>,
    pub is_subscribed: bool,
}

impl Default for MarketingUserDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            phone: None,
            email: None,
            groups: Vec::new(),
            is_subscribed: true,
        }
    }
}

impl Draft for MarketingUserDraft {
    fn set_field(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "name" => self.name = value.to_string(),
            "phone" => self.phone = optional_text(value),
            "email" => self.email = optional_text(value),
            "groups" => self.groups = parse_ids("groups", value)?,
            "subscribed" | "is_subscribed" => {
                self.is_subscribed = parse_bool(value)
                    .ok_or_else(|| format!("subscribed must be true or false, got '{value}'"))?
            }
            other => return Err(format!("Unknown marketing user field '{other}'")),
        }
        Ok(())
    }

    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name, "Name is required");
        if self.phone.is_none() && self.email.is_none() {
            errors.add("phone", "Provide a phone number or an email address");
        }
        if let Err(e) = self.validate() {
            errors.merge(FieldErrors::from_validator(&e));
        }
        errors.into_result()
    }

    fn field_names() -> &'static [&'static str] {
        &["name", "phone", "email", "groups", "subscribed"]
    }
}

impl Resource for MarketingUser {
    const PATH: &'static str = "marketing/users/";
    const LABEL: &'static str = "marketing user";
    const PLURAL: &'static str = "marketing users";
    const DEPENDENTS: &'static [&'static str] = &["marketing/groups/"];

    type Draft = MarketingUserDraft;

    fn id(&self) -> i64 {
        self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn to_draft(&self) -> MarketingUserDraft {
        MarketingUserDraft {
            name: self.name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            groups: self.groups.clone(),
            is_subscribed: self.is_subscribed,
        }
    }

    fn columns() -> &'static [&'static str] {
        &["ID", "Name", "Phone", "Email", "Groups", "Subscribed"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.phone.clone().unwrap_or_else(|| "-".into()),
            self.email.clone().unwrap_or_else(|| "-".into()),
            join_ids(&self.groups),
            if self.is_subscribed { "yes".into() } else { "no".into() },
        ]
    }
}

// ------------------------------------------------------------------- groups

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingGroup {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub member_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct MarketingGroupDraft {
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: String,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: String,
}

impl Draft for MarketingGroupDraft {
    fn set_field(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "name" => self.name = value.to_string(),
            "description" => self.description = value.to_string(),
            other => return Err(format!("Unknown group field '{other}'")),
        }
        Ok(())
    }

    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name, "Name is required");
        if let Err(e) = self.validate() {
            errors.merge(FieldErrors::from_validator(&e));
        }
        errors.into_result()
    }

    fn field_names() -> &'static [&'static str] {
        &["name", "description"]
    }
}

impl Resource for MarketingGroup {
    const PATH: &'static str = "marketing/groups/";
    const LABEL: &'static str = "marketing group";
    const PLURAL: &'static str = "marketing groups";
    const DEPENDENTS: &'static [&'static str] = &["marketing/users/", "marketing/campaigns/"];

    type Draft = MarketingGroupDraft;

    fn id(&self) -> i64 {
        self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn to_draft(&self) -> MarketingGroupDraft {
        MarketingGroupDraft {
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }

    fn columns() -> &'static [&'static str] {
        &["ID", "Name", "Members", "Description"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.member_count.to_string(),
            self.description.clone(),
        ]
    }
}

// ---------------------------------------------------------------- campaigns

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketingChannel {
    #[default]
    Sms,
    Email,
}

impl fmt::Display for MarketingChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketingChannel::Sms => f.write_str("sms"),
            MarketingChannel::Email => f.write_str("email"),
        }
    }
}

impl FromStr for MarketingChannel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sms" => Ok(MarketingChannel::Sms),
            "email" => Ok(MarketingChannel::Email),
            other => Err(format!("Unknown channel '{other}' (expected sms or email)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketingCampaignStatus {
    #[default]
    Draft,
    Scheduled,
    Sent,
    Failed,
}

impl fmt::Display for MarketingCampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MarketingCampaignStatus::Draft => "draft",
            MarketingCampaignStatus::Scheduled => "scheduled",
            MarketingCampaignStatus::Sent => "sent",
            MarketingCampaignStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingCampaign {
    pub id: i64,
    pub name: String,
    pub channel: MarketingChannel,
    #[serde(default)]
    pub groups: Vec<i64>,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
    #[serde(default)]
    pub status: MarketingCampaignStatus,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl MarketingCampaign {
    pub fn can_send(&self) -> bool {
        matches!(self.status, MarketingCampaignStatus::Draft | MarketingCampaignStatus::Failed)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct MarketingCampaignDraft {
    #[validate(length(max = 150, message = "Name must be at most 150 characters"))]
    pub name: String,
    pub channel: MarketingChannel,
    pub groups: Vec<i64>,
    #[validate(length(max = 200, message = "Subject must be at most 200 characters"))]
    pub subject: Option<String>,
    pub message: String,
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl Draft for MarketingCampaignDraft {
    fn set_field(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "name" => self.name = value.to_string(),
            "channel" => self.channel = value.parse()?,
            "groups" => self.groups = parse_ids("groups", value)?,
            "subject" => self.subject = optional_text(value),
            "message" => self.message = value.to_string(),
            "scheduled_at" | "schedule" => self.scheduled_at = parse_datetime(value)?,
            other => return Err(format!("Unknown marketing campaign field '{other}'")),
        }
        Ok(())
    }

    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name, "Name is required");
        require(&mut errors, "message", &self.message, "Message is required");
        if self.groups.is_empty() {
            errors.add("groups", "Select at least one group");
        }
        match self.channel {
            MarketingChannel::Email => {
                if self.subject.as_deref().map(str::trim).unwrap_or("").is_empty() {
                    errors.add("subject", "Subject is required for email campaigns");
                }
            }
            MarketingChannel::Sms => {
                if self.message.chars().count() > SMS_MAX_CHARS {
                    errors.add("message", "SMS messages must be at most 480 characters");
                }
            }
        }
        if let Err(e) = self.validate() {
            errors.merge(FieldErrors::from_validator(&e));
        }
        errors.into_result()
    }

    fn field_names() -> &'static [&'static str] {
        &["name", "channel", "groups", "subject", "message", "scheduled_at"]
    }
}

impl Resource for MarketingCampaign {
    const PATH: &'static str = "marketing/campaigns/";
    const LABEL: &'static str = "marketing campaign";
    const PLURAL: &'static str = "marketing campaigns";

    type Draft = MarketingCampaignDraft;

    fn id(&self) -> i64 {
        self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn to_draft(&self) -> MarketingCampaignDraft {
        MarketingCampaignDraft {
            name: self.name.clone(),
            channel: self.channel,
            groups: self.groups.clone(),
            subject: self.subject.clone(),
            message: self.message.clone(),
            scheduled_at: self.scheduled_at,
        }
    }

    fn columns() -> &'static [&'static str] {
        &["ID", "Name", "Channel", "Groups", "Status", "Scheduled"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.channel.to_string(),
            join_ids(&self.groups),
            self.status.to_string(),
            format_date(self.scheduled_at),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_campaign_needs_subject() {
        let mut draft = MarketingCampaignDraft::default();
        draft.set_field("name", "Weekend promo").unwrap();
        draft.set_field("channel", "email").unwrap();
        draft.set_field("groups", "1, 2").unwrap();
        draft.set_field("message", "Spin to win this weekend!").unwrap();
        assert_eq!(
            draft.check().unwrap_err().first("subject"),
            Some("Subject is required for email campaigns")
        );
        draft.set_field("subject", "Win big").unwrap();
        assert!(draft.check().is_ok());
        assert_eq!(draft.groups, vec![1, 2]);
    }

    #[test]
    fn sms_length_is_capped() {
        let mut draft = MarketingCampaignDraft::default();
        draft.set_field("name", "Blast").unwrap();
        draft.set_field("groups", "3").unwrap();
        draft.message = "x".repeat(SMS_MAX_CHARS + 1);
        assert!(draft.check().unwrap_err().has("message"));
    }

    #[test]
    fn contact_needs_phone_or_email() {
        let mut draft = MarketingUserDraft::default();
        draft.set_field("name", "Thandi").unwrap();
        assert!(draft.check().unwrap_err().has("phone"));
        draft.set_field("phone", "+27 82 000 0000").unwrap();
        assert!(draft.check().is_ok());
        assert!(draft.set_field("groups", "1,x").is_err());
    }
}
