// File: promodash-common/src/models/campaign.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::traits::{Draft, Resource};
use crate::validation::{is_hex_color, optional_text, parse_bool, parse_id, require, FieldErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignType {
    #[default]
    ScratchCard,
    SpinWheel,
    /// Rendered as a slot machine.
    InstantWin,
    LuckyDraw,
}

impl CampaignType {
    pub const ALL: [CampaignType; 4] = [
        CampaignType::ScratchCard,
        CampaignType::SpinWheel,
        CampaignType::InstantWin,
        CampaignType::LuckyDraw,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignType::ScratchCard => "scratch_card",
            CampaignType::SpinWheel => "spin_wheel",
            CampaignType::InstantWin => "instant_win",
            CampaignType::LuckyDraw => "lucky_draw",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CampaignType::ScratchCard => "Scratch Card",
            CampaignType::SpinWheel => "Spin Wheel",
            CampaignType::InstantWin => "Slot Machine",
            CampaignType::LuckyDraw => "Lucky Draw",
        }
    }
}

impl fmt::Display for CampaignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CampaignType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "scratch_card" | "scratch" => Ok(CampaignType::ScratchCard),
            "spin_wheel" | "wheel" => Ok(CampaignType::SpinWheel),
            "instant_win" | "slot_machine" | "slot" => Ok(CampaignType::InstantWin),
            "lucky_draw" | "draw" => Ok(CampaignType::LuckyDraw),
            other => Err(format!(
                "Unknown campaign type '{other}' (expected scratch_card, spin_wheel, instant_win or lucky_draw)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    #[default]
    Draft,
    Scheduled,
    Active,
    Paused,
    Completed,
    Cancelled,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Draft => "draft",
            CampaignStatus::Scheduled => "scheduled",
            CampaignStatus::Active => "active",
            CampaignStatus::Paused => "paused",
            CampaignStatus::Completed => "completed",
            CampaignStatus::Cancelled => "cancelled",
        }
    }

    /// Lifecycle buttons offered for this status. The backend decides whether a
    /// transition is actually allowed.
    pub fn available_actions(&self) -> &'static [CampaignAction] {
        use CampaignAction::*;
        match self {
            CampaignStatus::Draft | CampaignStatus::Scheduled => &[Activate, Cancel],
            CampaignStatus::Active => &[Pause, Complete, Cancel, RefreshQr],
            CampaignStatus::Paused => &[Resume, Complete, Cancel],
            CampaignStatus::Completed | CampaignStatus::Cancelled => &[],
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server-side lifecycle endpoints under `campaigns/{id}/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CampaignAction {
    Activate,
    Pause,
    Resume,
    Complete,
    Cancel,
    RefreshQr,
}

impl CampaignAction {
    pub const ALL: [CampaignAction; 6] = [
        CampaignAction::Activate,
        CampaignAction::Pause,
        CampaignAction::Resume,
        CampaignAction::Complete,
        CampaignAction::Cancel,
        CampaignAction::RefreshQr,
    ];

    pub fn path_segment(&self) -> &'static str {
        match self {
            CampaignAction::Activate => "activate",
            CampaignAction::Pause => "pause",
            CampaignAction::Resume => "resume",
            CampaignAction::Complete => "complete",
            CampaignAction::Cancel => "cancel",
            CampaignAction::RefreshQr => "refresh-qr",
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            CampaignAction::Activate => "activated",
            CampaignAction::Pause => "paused",
            CampaignAction::Resume => "resumed",
            CampaignAction::Complete => "completed",
            CampaignAction::Cancel => "cancelled",
            CampaignAction::RefreshQr => "given a new QR code",
        }
    }
}

impl FromStr for CampaignAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        CampaignAction::ALL
            .iter()
            .copied()
            .find(|a| a.path_segment() == wanted)
            .ok_or_else(|| format!("Unknown action '{s}'"))
    }
}

/// Look-and-feel options used by the preview and the player-facing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Branding {
    pub logo: Option<String>,
    pub show_logo: bool,
    pub primary_color: Option<String>,
    /// Cover image for scratch cards.
    pub scratch_image: Option<String>,
    pub show_dates: bool,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            logo: None,
            show_logo: true,
            primary_color: None,
            scratch_image: None,
            show_dates: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub campaign_type: CampaignType,
    #[serde(default)]
    pub status: CampaignStatus,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub client: Option<i64>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub branding: Branding,
    #[serde(default)]
    pub qr_code: Option<String>,
}

/// Full-campaign body sent by the form's save action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct CampaignPayload {
    #[validate(length(max = 200, message = "Name must be at most 200 characters"))]
    pub name: String,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: String,
    #[serde(rename = "type")]
    pub campaign_type: CampaignType,
    pub client: Option<i64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub branding: Branding,
}

const CAMPAIGN_FIELDS: &[&str] = &[
    "name",
    "description",
    "type",
    "client",
    "start",
    "end",
    "logo",
    "show_logo",
    "color",
    "scratch_image",
    "show_dates",
];

impl Draft for CampaignPayload {
    fn set_field(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "name" => self.name = value.to_string(),
            "description" => self.description = value.to_string(),
            "type" => self.campaign_type = value.parse()?,
            "client" => self.client = Some(parse_id("client", value)?),
            "start" => self.start_date = parse_datetime(value)?,
            "end" => self.end_date = parse_datetime(value)?,
            "logo" => self.branding.logo = optional_text(value),
            "show_logo" => {
                self.branding.show_logo =
                    parse_bool(value).ok_or_else(|| format!("show_logo must be true or false, got '{value}'"))?
            }
            "color" => self.branding.primary_color = optional_text(value),
            "scratch_image" => self.branding.scratch_image = optional_text(value),
            "show_dates" => {
                self.branding.show_dates =
                    parse_bool(value).ok_or_else(|| format!("show_dates must be true or false, got '{value}'"))?
            }
            other => return Err(format!("Unknown campaign field '{other}'")),
        }
        Ok(())
    }

    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name, "Name is required");
        if let Err(e) = self.validate() {
            errors.merge(FieldErrors::from_validator(&e));
        }
        if self.client.is_none() {
            errors.add("client", "Client is required");
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end <= start {
                errors.add("end_date", "End date must be after start date");
            }
        }
        if let Some(color) = &self.branding.primary_color {
            if !is_hex_color(color) {
                errors.add("branding.primary_color", "Color must be a hex colour like #FF5733");
            }
        }
        errors.into_result()
    }

    fn field_names() -> &'static [&'static str] {
        CAMPAIGN_FIELDS
    }
}

impl Resource for Campaign {
    const PATH: &'static str = "campaigns/";
    const LABEL: &'static str = "campaign";
    const PLURAL: &'static str = "campaigns";

    type Draft = CampaignPayload;

    fn id(&self) -> i64 {
        self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn to_draft(&self) -> CampaignPayload {
        CampaignPayload {
            name: self.name.clone(),
            description: self.description.clone(),
            campaign_type: self.campaign_type,
            client: self.client,
            start_date: self.start_date,
            end_date: self.end_date,
            branding: self.branding.clone(),
        }
    }

    fn columns() -> &'static [&'static str] {
        &["ID", "Name", "Type", "Status", "Client", "Starts", "Ends"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.campaign_type.display_name().to_string(),
            self.status.to_string(),
            self.client_name
                .clone()
                .or_else(|| self.client.map(|c| c.to_string()))
                .unwrap_or_else(|| "-".to_string()),
            format_date(self.start_date),
            format_date(self.end_date),
        ]
    }
}

pub fn format_date(value: Option<DateTime<Utc>>) -> String {
    value.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_else(|| "-".to_string())
}

/// RFC 3339 or a bare `YYYY-MM-DD` (midnight UTC). `none` clears the value.
pub fn parse_datetime(value: &str) -> Result<Option<DateTime<Utc>>, String> {
    let v = value.trim();
    if v.is_empty() || v.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(v) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(v, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Some(naive.and_utc()))
        .ok_or_else(|| format!("Invalid date '{v}' (use YYYY-MM-DD or RFC 3339)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_parsing_accepts_slot_alias() {
        assert_eq!("slot_machine".parse::<CampaignType>(), Ok(CampaignType::InstantWin));
        assert_eq!("spin-wheel".parse::<CampaignType>(), Ok(CampaignType::SpinWheel));
        assert!("bingo".parse::<CampaignType>().is_err());
    }

    #[test]
    fn action_path_segments() {
        assert_eq!("refresh_qr".parse::<CampaignAction>(), Ok(CampaignAction::RefreshQr));
        assert_eq!(CampaignAction::RefreshQr.path_segment(), "refresh-qr");
        assert!(CampaignStatus::Completed.available_actions().is_empty());
        assert!(CampaignStatus::Paused.available_actions().contains(&CampaignAction::Resume));
    }

    #[test]
    fn payload_serializes_type_key() {
        let payload = CampaignPayload {
            name: "Summer".into(),
            campaign_type: CampaignType::SpinWheel,
            client: Some(3),
            ..Default::default()
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "spin_wheel");
        assert_eq!(json["client"], 3);
    }

    #[test]
    fn draft_checks_dates_and_client() {
        let mut draft = CampaignPayload::default();
        draft.set_field("name", "Summer").unwrap();
        draft.set_field("start", "2026-07-01").unwrap();
        draft.set_field("end", "2026-06-01").unwrap();
        let errors = draft.check().unwrap_err();
        assert_eq!(errors.first("client"), Some("Client is required"));
        assert_eq!(errors.first("end_date"), Some("End date must be after start date"));

        draft.set_field("client", "7").unwrap();
        draft.set_field("end", "2026-08-01T12:00:00Z").unwrap();
        assert!(draft.check().is_ok());
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mut draft = CampaignPayload::default();
        assert!(draft.set_field("colour", "#fff").is_err());
        assert!(draft.set_field("client", "abc").is_err());
    }
}
