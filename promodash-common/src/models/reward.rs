// File: promodash-common/src/models/reward.rs

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::validation::{is_hex_color, require, FieldErrors};

pub const MAX_PROBABILITY: f64 = 100.0;

/// A weighted prize entry inside one campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub id: i64,
    #[serde(default)]
    pub campaign: Option<i64>,
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub description: String,
    /// Percentage points, 0..=100.
    #[serde(deserialize_with = "decimal")]
    pub probability: f64,
    /// Inventory; 0 means unlimited.
    #[serde(default)]
    pub total_available: i64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl Reward {
    pub fn is_unlimited(&self) -> bool {
        self.total_available == 0
    }

    pub fn to_payload(&self) -> RewardPayload {
        RewardPayload {
            name: self.name.clone(),
            value: self.value.clone(),
            description: self.description.clone(),
            probability: self.probability,
            total_available: self.total_available,
            color: self.color.clone(),
        }
    }
}

/// Body for `POST /campaigns/{id}/rewards/` and `PATCH .../rewards/{rewardId}/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct RewardPayload {
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: String,
    #[validate(length(max = 50, message = "Value must be at most 50 characters"))]
    pub value: String,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: String,
    pub probability: f64,
    pub total_available: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl RewardPayload {
    pub fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name, "Name is required");
        require(&mut errors, "value", &self.value, "Value is required");
        if let Err(e) = self.validate() {
            errors.merge(FieldErrors::from_validator(&e));
        }
        if let Some(msg) = probability_error(self.probability) {
            errors.add("probability", msg);
        }
        if self.total_available < 0 {
            errors.add("total_available", "Total available cannot be negative");
        }
        if let Some(color) = &self.color {
            if !is_hex_color(color) {
                errors.add("color", "Color must be a hex colour like #FF5733");
            }
        }
        errors.into_result()
    }
}

pub fn probability_error(probability: f64) -> Option<&'static str> {
    if !probability.is_finite() {
        Some("Probability must be a number")
    } else if probability < 0.0 {
        Some("Probability cannot be negative")
    } else if probability > MAX_PROBABILITY {
        Some("Probability cannot exceed 100")
    } else {
        None
    }
}

/// An image picked for upload alongside a reward or campaign.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = mime_for(&file_name).to_string();
        Self { file_name, mime, bytes }
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, e)| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Whether the probabilities of a campaign add up to exactly 100%.
/// Display hint only; nothing blocks saving an unbalanced set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbabilityBalance {
    Balanced,
    Warning,
}

/// Running totals shown under the reward table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewardSummary {
    pub total: usize,
    /// Sum of limited inventories.
    pub total_available: i64,
    /// Rewards with `total_available == 0`.
    pub unlimited: usize,
    /// Rounded to two decimals.
    pub total_probability: f64,
}

impl RewardSummary {
    pub fn from_rewards(rewards: &[Reward]) -> Self {
        let sum = rewards.iter().fold(0.0, |acc, r| acc + r.probability);
        Self {
            total: rewards.len(),
            total_available: rewards.iter().map(|r| r.total_available.max(0)).sum(),
            unlimited: rewards.iter().filter(|r| r.is_unlimited()).count(),
            total_probability: (sum * 100.0).round() / 100.0,
        }
    }

    pub fn balance(&self) -> ProbabilityBalance {
        if (self.total_probability - MAX_PROBABILITY).abs() < f64::EPSILON {
            ProbabilityBalance::Balanced
        } else {
            ProbabilityBalance::Warning
        }
    }

    pub fn probability_label(&self) -> String {
        format_percent(self.total_probability)
    }
}

/// `100%`, `12.5%`, `33.33%`.
pub fn format_percent(value: f64) -> String {
    // adding zero turns -0.0 into 0.0
    let value = value + 0.0;
    if value.fract() == 0.0 {
        format!("{value:.0}%")
    } else {
        let s = format!("{value:.2}");
        format!("{}%", s.trim_end_matches('0').trim_end_matches('.'))
    }
}

/// Accepts `15`, `15.5` or `"15.50"`; decimal fields arrive as strings from the API.
fn decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrString {
        Num(f64),
        Str(String),
    }

    match NumOrString::deserialize(deserializer)? {
        NumOrString::Num(n) => Ok(n),
        NumOrString::Str(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reward(id: i64, name: &str, probability: f64, total_available: i64) -> Reward {
        Reward {
            id,
            campaign: Some(1),
            name: name.to_string(),
            value: name.to_string(),
            description: String::new(),
            probability,
            total_available,
            image: None,
            color: None,
        }
    }

    #[test]
    fn pizza_scenario_is_balanced() {
        let rewards = vec![
            reward(1, "$10 OFF", 15.0, 100),
            reward(2, "Free Pizza", 20.0, 50),
            reward(3, "No Prize", 65.0, 0),
        ];
        let summary = RewardSummary::from_rewards(&rewards);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.total_available, 150);
        assert_eq!(summary.unlimited, 1);
        assert_eq!(summary.probability_label(), "100%");
        assert_eq!(summary.balance(), ProbabilityBalance::Balanced);
    }

    #[test]
    fn anything_but_one_hundred_is_a_warning() {
        let under = RewardSummary::from_rewards(&[reward(1, "a", 99.5, 1)]);
        assert_eq!(under.balance(), ProbabilityBalance::Warning);
        assert_eq!(under.probability_label(), "99.5%");

        let over = RewardSummary::from_rewards(&[reward(1, "a", 60.0, 1), reward(2, "b", 50.0, 1)]);
        assert_eq!(over.balance(), ProbabilityBalance::Warning);

        let empty = RewardSummary::from_rewards(&[]);
        assert_eq!(empty.balance(), ProbabilityBalance::Warning);
        assert_eq!(empty.probability_label(), "0%");
    }

    #[test]
    fn zero_never_prints_a_sign() {
        assert_eq!(format_percent(-0.0), "0%");
        assert!(RewardSummary::from_rewards(&[]).total_probability.is_sign_positive());
    }

    #[test]
    fn thirds_round_to_balanced() {
        let rewards = vec![
            reward(1, "a", 33.33, 0),
            reward(2, "b", 33.33, 0),
            reward(3, "c", 33.34, 0),
        ];
        assert_eq!(RewardSummary::from_rewards(&rewards).balance(), ProbabilityBalance::Balanced);
    }

    #[test]
    fn payload_limits() {
        let mut payload = RewardPayload {
            name: "x".repeat(101),
            value: String::new(),
            description: "d".repeat(501),
            probability: 150.0,
            total_available: -1,
            color: Some("red".to_string()),
        };
        let errors = payload.check().unwrap_err();
        assert_eq!(errors.first("name"), Some("Name must be at most 100 characters"));
        assert_eq!(errors.first("value"), Some("Value is required"));
        assert_eq!(errors.first("description"), Some("Description must be at most 500 characters"));
        assert_eq!(errors.first("probability"), Some("Probability cannot exceed 100"));
        assert_eq!(errors.first("total_available"), Some("Total available cannot be negative"));
        assert!(errors.has("color"));

        payload.name = "Free Pizza".to_string();
        payload.value = "1 pizza".to_string();
        payload.description = String::new();
        payload.probability = 100.0;
        payload.total_available = 0;
        payload.color = Some("#FF5733".to_string());
        assert!(payload.check().is_ok());
    }

    #[test]
    fn negative_probability() {
        assert_eq!(probability_error(-0.5), Some("Probability cannot be negative"));
        assert_eq!(probability_error(f64::NAN), Some("Probability must be a number"));
        assert_eq!(probability_error(0.0), None);
    }

    #[test]
    fn probability_accepts_decimal_strings() {
        let json = r##"{"id": 4, "name": "Mug", "value": "1 mug", "probability": "12.50", "total_available": 3}"##;
        let r: Reward = serde_json::from_str(json).unwrap();
        assert_eq!(r.probability, 12.5);
        assert!(r.image.is_none());
    }

    #[test]
    fn upload_mime_from_extension() {
        assert_eq!(ImageUpload::new("card.PNG", vec![]).mime, "image/png");
        assert_eq!(ImageUpload::new("noext", vec![]).mime, "application/octet-stream");
    }
}
