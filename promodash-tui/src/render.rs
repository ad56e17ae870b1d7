// Plain-text views for the console: tables, reward totals, dialogs, the
// campaign preview and toasts.

use colored::Colorize;
use promodash_common::models::reward::format_percent;
use promodash_common::models::{FormField, ProbabilityBalance, Reward, RewardSummary};
use promodash_common::traits::{Draft, Resource};
use promodash_common::FieldErrors;
use promodash_common_ui::commands::campaign::CampaignFormController;
use promodash_common_ui::commands::dialog::Dialog;
use promodash_common_ui::commands::resource::CrudList;
use promodash_common_ui::preview::{CampaignPreview, PreviewBody, ScratchCover};
use promodash_common_ui::{AuthEvent, Toast, ToastLevel};

/// Left-aligned columns padded to the widest cell.
pub fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect();
        format!("  {}", padded.join("  ").trim_end())
    };

    let mut out = String::new();
    out.push_str(&line(headers.to_vec()));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("  {}\n", rule.join("  ")));
    for row in rows {
        out.push_str(&line(row.iter().map(|s| s.as_str()).collect()));
        out.push('\n');
    }
    out
}

pub fn render_list<R: Resource>(list: &CrudList<R>) -> String {
    if list.items().is_empty() {
        let mut out = format!("No {} found.\n", R::PLURAL);
        if !list.query().search.is_empty() {
            out.push_str(&format!("(search: \"{}\")\n", list.query().search));
        }
        return out;
    }

    let rows: Vec<Vec<String>> = list.items().iter().map(|r| r.row()).collect();
    let mut out = format_table(R::columns(), &rows);
    out.push_str(&format!(
        "Page {} of {} ({} total)",
        list.query().page,
        list.total_pages(),
        list.count()
    ));
    if !list.query().search.is_empty() {
        out.push_str(&format!(", search \"{}\"", list.query().search));
    }
    out.push('\n');
    out
}

/// Current dialog values as they would be sent, with any field errors
/// under them.
pub fn render_dialog<D: Draft>(label: &str, dialog: &Dialog<D>) -> String {
    let heading = match dialog.target {
        Some(id) => format!("Edit {label} #{id}"),
        None => format!("New {label}"),
    };
    let mut out = format!("{heading}\n");
    let values = serde_json::to_value(&dialog.draft).unwrap_or_default();
    let mut shown = Vec::new();
    if let Some(fields) = values.as_object() {
        for (key, value) in fields {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Null => String::new(),
                serde_json::Value::Object(_) => continue,
                other => other.to_string(),
            };
            out.push_str(&format!("  {:<16} {}\n", key, text));
            if let Some(messages) = dialog.errors.get(key) {
                for m in messages {
                    out.push_str(&format!("  {:<16} {}\n", "", m.red()));
                }
            }
            shown.push(key.as_str());
        }
    }
    out.push_str(&render_field_errors_except(&dialog.errors, &shown));
    out
}

pub fn render_field_errors(errors: &FieldErrors) -> String {
    render_field_errors_except(errors, &[])
}

fn render_field_errors_except(errors: &FieldErrors, shown: &[&str]) -> String {
    let mut out = String::new();
    for (field, messages) in errors.iter() {
        if shown.contains(&field) {
            continue;
        }
        for m in messages {
            out.push_str(&format!("  {} {}\n", format!("{field}:").red(), m));
        }
    }
    out
}

pub fn render_rewards(rewards: &[Reward], summary: &RewardSummary) -> String {
    let mut out = String::new();
    if rewards.is_empty() {
        out.push_str("No rewards yet. Use 'reward add' to create one.\n");
    } else {
        let rows: Vec<Vec<String>> = rewards
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.name.clone(),
                    r.value.clone(),
                    format_percent(r.probability),
                    if r.is_unlimited() {
                        "unlimited".to_string()
                    } else {
                        r.total_available.to_string()
                    },
                    r.color.clone().unwrap_or_default(),
                    if r.image.is_some() { "yes" } else { "" }.to_string(),
                ]
            })
            .collect();
        out.push_str(&format_table(
            &["ID", "Name", "Value", "Probability", "Stock", "Color", "Image"],
            &rows,
        ));
    }
    out.push_str(&render_reward_totals(summary));
    out
}

/// `Total probability: 100%` in green when balanced, yellow otherwise.
pub fn render_reward_totals(summary: &RewardSummary) -> String {
    let label = format!("Total probability: {}", summary.probability_label());
    let label = match summary.balance() {
        ProbabilityBalance::Balanced => label.green().to_string(),
        ProbabilityBalance::Warning => format!("{} (should be 100%)", label).yellow().to_string(),
    };
    format!(
        "{} rewards, {} unlimited, {} limited items\n{}\n",
        summary.total, summary.unlimited, summary.total_available, label
    )
}

pub fn render_fields(fields: &[FormField]) -> String {
    if fields.is_empty() {
        return "No registration fields. Use 'field add' to create one.\n".to_string();
    }
    let rows: Vec<Vec<String>> = fields
        .iter()
        .map(|f| {
            vec![
                f.id.to_string(),
                f.order.to_string(),
                f.label.clone(),
                f.field_type.to_string(),
                if f.required { "yes" } else { "no" }.to_string(),
                f.options.join(", "),
            ]
        })
        .collect();
    format_table(&["ID", "Order", "Label", "Type", "Required", "Options"], &rows)
}

pub fn render_campaign_form(form: &CampaignFormController) -> String {
    let payload = form.payload();
    let mut out = format!("{}  [{}]\n", form.title().bold(), form.section());
    if let Some(status) = form.status() {
        out.push_str(&format!("  status        {}\n", status));
    }
    out.push_str(&format!("  name          {}\n", payload.name));
    out.push_str(&format!("  type          {}\n", payload.campaign_type.display_name()));
    out.push_str(&format!(
        "  client        {}\n",
        payload.client.map(|c| c.to_string()).unwrap_or_default()
    ));
    out.push_str(&format!(
        "  dates         {} - {}\n",
        promodash_common::models::campaign::format_date(payload.start_date),
        promodash_common::models::campaign::format_date(payload.end_date)
    ));
    out.push_str(&format!(
        "  color         {}\n",
        payload.branding.primary_color.clone().unwrap_or_default()
    ));
    if !payload.description.is_empty() {
        out.push_str(&format!("  description   {}\n", payload.description));
    }
    let actions: Vec<&str> = form.offered_actions().iter().map(|a| a.path_segment()).collect();
    if !actions.is_empty() {
        out.push_str(&format!("  actions       {}\n", actions.join(", ")));
    }
    out.push_str(&render_field_errors(form.errors()));
    if form.delete_pending() {
        out.push_str(&"  Delete pending: 'campaign confirm' or 'campaign cancel'\n".yellow().to_string());
    }
    out
}

/// ASCII mock of the player screen.
pub fn render_preview(preview: &CampaignPreview) -> String {
    let header = &preview.header;
    let mut out = String::from("+------------------------------+\n");
    if let Some(logo) = &header.logo {
        out.push_str(&format!("| [logo] {}\n", logo));
    }
    out.push_str(&format!("| {}\n", header.title.bold()));
    if let Some(dates) = &header.dates {
        out.push_str(&format!("| {}\n", dates));
    }
    if let Some(color) = &header.primary_color {
        out.push_str(&format!("| theme {}\n", color));
    }
    out.push_str("+------------------------------+\n");

    match &preview.body {
        PreviewBody::ScratchCard { cover, prize_count } => {
            match cover {
                ScratchCover::Image(url) => out.push_str(&format!("| scratch cover: {}\n", url)),
                ScratchCover::Gradient { from, to } => {
                    out.push_str(&format!("| scratch cover: {} -> {}\n", from, to))
                }
            }
            out.push_str(&format!("| {} possible prizes\n", prize_count));
        }
        PreviewBody::SpinWheel(segments) => {
            if segments.is_empty() {
                out.push_str("| (empty wheel)\n");
            }
            for s in segments {
                out.push_str(&format!(
                    "| {:>6.1}° +{:>5.1}°  {}  {} ({})\n",
                    s.start_deg,
                    s.sweep_deg,
                    s.color,
                    s.label,
                    format_percent(s.probability)
                ));
            }
        }
        PreviewBody::SlotMachine(reels) => {
            let labels: Vec<String> = reels.iter().map(|r| format!("[{:^10}]", r.label)).collect();
            out.push_str(&format!("| {}\n", labels.join(" ")));
        }
        PreviewBody::LuckyDraw(lines) => {
            if lines.is_empty() {
                out.push_str("| (no prizes)\n");
            }
            for l in lines {
                out.push_str(&format!("| {} - {} ({})\n", l.name, l.value, l.odds));
            }
        }
    }
    out.push_str("+------------------------------+\n");
    out
}

pub fn render_toasts(toasts: &[Toast]) -> String {
    let mut out = String::new();
    for toast in toasts {
        let line = match toast.level {
            ToastLevel::Success => format!("{} {}", "✓".green(), toast.message),
            ToastLevel::Error => format!("{} {}", "✗".red(), toast.message.red()),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

pub fn render_auth_event(event: &AuthEvent) -> String {
    match event {
        AuthEvent::LoginRequired => "Your session has ended. Log in again with 'login <email> <password>'."
            .yellow()
            .to_string(),
        AuthEvent::PermissionChanged(detail) => {
            format!("{} {}", "Your permissions have changed:".yellow(), detail)
        }
    }
}

pub fn render_warnings(warnings: &[String]) -> String {
    warnings
        .iter()
        .map(|w| format!("{} {}\n", "warning:".yellow(), w))
        .collect()
}
