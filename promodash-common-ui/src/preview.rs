// Schematic mobile preview of a campaign. Pure: same input, same output.
// No randomness and no game logic; this only mirrors what the player page
// will roughly look like while the campaign is being edited.

use chrono::{DateTime, Utc};
use promodash_common::models::campaign::format_date;
use promodash_common::models::reward::format_percent;
use promodash_common::models::{Branding, CampaignType, Reward};

pub const PALETTE: [&str; 8] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#FFA07A", "#98D8C8", "#F7DC6F", "#BB8FCE", "#85C1E2",
];

pub const REEL_COUNT: usize = 3;
const REEL_MAX_CHARS: usize = 10;
const REEL_KEEP_CHARS: usize = 8;
pub const DEFAULT_SCRATCH_GRADIENT: (&str, &str) = ("#C0C0C0", "#808080");

pub struct PreviewInput<'a> {
    pub name: &'a str,
    pub campaign_type: CampaignType,
    pub rewards: &'a [Reward],
    pub branding: &'a Branding,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewHeader {
    pub title: String,
    pub logo: Option<String>,
    pub primary_color: Option<String>,
    /// `YYYY-MM-DD - YYYY-MM-DD`, only when dates are shown.
    pub dates: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScratchCover {
    Image(String),
    Gradient { from: String, to: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct WheelSegment {
    pub label: String,
    pub color: String,
    pub start_deg: f64,
    pub sweep_deg: f64,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reel {
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawLine {
    pub name: String,
    pub value: String,
    pub odds: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewBody {
    ScratchCard { cover: ScratchCover, prize_count: usize },
    SpinWheel(Vec<WheelSegment>),
    SlotMachine([Reel; REEL_COUNT]),
    LuckyDraw(Vec<DrawLine>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CampaignPreview {
    pub header: PreviewHeader,
    pub body: PreviewBody,
}

pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

pub fn render_preview(input: &PreviewInput<'_>) -> CampaignPreview {
    CampaignPreview {
        header: render_header(input),
        body: match input.campaign_type {
            CampaignType::ScratchCard => scratch_card_body(input),
            CampaignType::SpinWheel => PreviewBody::SpinWheel(wheel_segments(input.rewards)),
            CampaignType::InstantWin => PreviewBody::SlotMachine(reels(input.rewards)),
            CampaignType::LuckyDraw => PreviewBody::LuckyDraw(
                input
                    .rewards
                    .iter()
                    .map(|r| DrawLine {
                        name: r.name.clone(),
                        value: r.value.clone(),
                        odds: format_percent(r.probability),
                    })
                    .collect(),
            ),
        },
    }
}

fn scratch_card_body(input: &PreviewInput<'_>) -> PreviewBody {
    let cover = match &input.branding.scratch_image {
        Some(uri) if !uri.trim().is_empty() => ScratchCover::Image(uri.clone()),
        _ => ScratchCover::Gradient {
            from: DEFAULT_SCRATCH_GRADIENT.0.to_string(),
            to: DEFAULT_SCRATCH_GRADIENT.1.to_string(),
        },
    };
    PreviewBody::ScratchCard {
        cover,
        prize_count: input.rewards.len(),
    }
}

fn render_header(input: &PreviewInput<'_>) -> PreviewHeader {
    let branding = input.branding;
    let logo = if branding.show_logo { branding.logo.clone() } else { None };
    let dates = if branding.show_dates && (input.start_date.is_some() || input.end_date.is_some()) {
        Some(format!("{} - {}", format_date(input.start_date), format_date(input.end_date)))
    } else {
        None
    };
    PreviewHeader {
        title: if input.name.trim().is_empty() {
            "Untitled campaign".to_string()
        } else {
            input.name.to_string()
        },
        logo,
        primary_color: branding.primary_color.clone(),
        dates,
    }
}

/// Segments sized by probability. When the probabilities add up to zero
/// every reward gets an equal slice.
pub fn wheel_segments(rewards: &[Reward]) -> Vec<WheelSegment> {
    let total: f64 = rewards.iter().map(|r| r.probability.max(0.0)).sum();
    let mut start = 0.0;
    rewards
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let sweep = if total > 0.0 {
                r.probability.max(0.0) / total * 360.0
            } else {
                360.0 / rewards.len() as f64
            };
            let segment = WheelSegment {
                label: r.name.clone(),
                color: palette_color(i).to_string(),
                start_deg: start,
                sweep_deg: sweep,
                probability: r.probability,
            };
            start += sweep;
            segment
        })
        .collect()
}

/// Always three reels; reel `i` shows `rewards[i % len]`.
pub fn reels(rewards: &[Reward]) -> [Reel; REEL_COUNT] {
    std::array::from_fn(|i| Reel {
        label: if rewards.is_empty() {
            "?".to_string()
        } else {
            reel_label(&rewards[i % rewards.len()].name)
        },
    })
}

pub fn reel_label(name: &str) -> String {
    if name.chars().count() > REEL_MAX_CHARS {
        let kept: String = name.chars().take(REEL_KEEP_CHARS).collect();
        format!("{kept}..")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reward(name: &str, probability: f64) -> Reward {
        Reward {
            id: 0,
            campaign: None,
            name: name.to_string(),
            value: String::new(),
            description: String::new(),
            probability,
            total_available: 0,
            image: None,
            color: None,
        }
    }

    fn input<'a>(kind: CampaignType, rewards: &'a [Reward], branding: &'a Branding) -> PreviewInput<'a> {
        PreviewInput {
            name: "Summer Spin",
            campaign_type: kind,
            rewards,
            branding,
            start_date: None,
            end_date: None,
        }
    }

    #[test]
    fn wheel_colors_cycle_through_palette() {
        let rewards: Vec<Reward> = (0..10).map(|i| reward(&format!("R{i}"), 10.0)).collect();
        let segments = wheel_segments(&rewards);
        assert_eq!(segments.len(), 10);
        for (i, s) in segments.iter().enumerate() {
            assert_eq!(s.color, PALETTE[i % PALETTE.len()]);
        }
        assert_eq!(segments[8].color, segments[0].color);
        let swept: f64 = segments.iter().map(|s| s.sweep_deg).sum();
        assert!((swept - 360.0).abs() < 1e-9);
    }

    #[test]
    fn wheel_with_zero_probabilities_uses_equal_slices() {
        let rewards = vec![reward("A", 0.0), reward("B", 0.0), reward("C", 0.0), reward("D", 0.0)];
        let segments = wheel_segments(&rewards);
        assert!(segments.iter().all(|s| (s.sweep_deg - 90.0).abs() < 1e-9));
        assert_eq!(segments[3].start_deg, 270.0);
    }

    #[test]
    fn slot_machine_always_has_three_reels() {
        let branding = Branding::default();
        for n in [0usize, 1, 2, 3, 5] {
            let rewards: Vec<Reward> = (0..n).map(|i| reward(&format!("P{i}"), 1.0)).collect();
            let preview = render_preview(&input(CampaignType::InstantWin, &rewards, &branding));
            let PreviewBody::SlotMachine(reels) = preview.body else {
                panic!("expected slot machine");
            };
            assert_eq!(reels.len(), 3);
            if n == 1 {
                assert!(reels.iter().all(|r| r.label == "P0"));
            }
            if n == 2 {
                assert_eq!(reels[2].label, "P0");
            }
            if n == 0 {
                assert!(reels.iter().all(|r| r.label == "?"));
            }
        }
    }

    #[test]
    fn long_reel_names_are_cut() {
        assert_eq!(reel_label("Free Pizza"), "Free Pizza");
        assert_eq!(reel_label("Free Pizza!"), "Free Piz..");
        assert_eq!(reel_label("$10 OFF"), "$10 OFF");
    }

    #[test]
    fn scratch_card_falls_back_to_gradient() {
        let mut branding = Branding::default();
        let rewards = vec![reward("Coffee", 100.0)];
        let preview = render_preview(&input(CampaignType::ScratchCard, &rewards, &branding));
        assert!(matches!(
            preview.body,
            PreviewBody::ScratchCard { cover: ScratchCover::Gradient { .. }, prize_count: 1 }
        ));

        branding.scratch_image = Some("https://cdn.example.com/cover.png".into());
        let preview = render_preview(&input(CampaignType::ScratchCard, &rewards, &branding));
        assert_eq!(
            preview.body,
            PreviewBody::ScratchCard {
                cover: ScratchCover::Image("https://cdn.example.com/cover.png".into()),
                prize_count: 1,
            }
        );
    }

    #[test]
    fn header_respects_branding_flags() {
        let branding = Branding {
            logo: Some("logo.png".into()),
            show_logo: false,
            show_dates: true,
            ..Branding::default()
        };
        let mut preview_input = input(CampaignType::LuckyDraw, &[], &branding);
        preview_input.start_date = promodash_common::models::campaign::parse_datetime("2026-06-01").unwrap();
        let preview = render_preview(&preview_input);
        assert_eq!(preview.header.logo, None);
        assert_eq!(preview.header.dates.as_deref(), Some("2026-06-01 - -"));
        assert_eq!(preview.body, PreviewBody::LuckyDraw(Vec::new()));
    }
}
