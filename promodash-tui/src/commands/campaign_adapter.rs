// File: promodash-tui/src/commands/campaign_adapter.rs

use promodash_common::models::CampaignAction;
use promodash_common_ui::commands::campaign::{CampaignFormController, FormOutcome, FormSection};
use promodash_common_ui::CommandError;

use crate::commands::resource_adapter::handle_resource_command;
use crate::commands::{error_text, parse_assignments, parse_id, with_warnings};
use crate::console::ConsoleModule;
use crate::render;

const USAGE: &str = "Usage: campaign <list|page|search|open|new|show|section|set|save|delete|confirm|cancel|action|preview|close> [args]
Type 'help campaign' for details.";

pub async fn handle_campaign_command(args: &[String], console: &mut ConsoleModule) -> String {
    let Some(sub) = args.first() else {
        return USAGE.to_string();
    };
    let client = console.state.client.clone();

    match sub.to_lowercase().as_str() {
        "list" | "page" | "search" => {
            handle_resource_command(args, &mut console.campaigns, &client, "campaign").await
        }

        "open" => {
            let id = match parse_id(args.get(1), "Usage: campaign open <id>") {
                Ok(id) => id,
                Err(e) => return e,
            };
            match CampaignFormController::open(&client, id, console.state.notifications.clone()).await {
                Ok(form) => {
                    let out = render::render_campaign_form(&form);
                    console.campaign_form = Some(form);
                    out
                }
                Err(e) => error_text(&e),
            }
        }

        "new" => {
            let form = CampaignFormController::new_campaign(console.state.notifications.clone());
            let out = format!(
                "{}Fill in the details with 'campaign set key=value ...' and 'campaign save'.",
                render::render_campaign_form(&form)
            );
            console.campaign_form = Some(form);
            out
        }

        "close" => match console.campaign_form.take() {
            Some(form) => format!("Closed {}.", form.title()),
            None => "No campaign is open.".to_string(),
        },

        _ => {
            let Some(form) = console.campaign_form.as_mut() else {
                return "No campaign is open. Use 'campaign open <id>' or 'campaign new'.".to_string();
            };
            match handle_form_command(args, form, &client).await {
                FormReply::Text(out) => out,
                FormReply::Closed(out) => {
                    console.campaign_form = None;
                    let listed = handle_resource_command(
                        &["list".to_string()],
                        &mut console.campaigns,
                        &client,
                        "campaign",
                    )
                    .await;
                    format!("{out}\n{listed}")
                }
            }
        }
    }
}

enum FormReply {
    Text(String),
    Closed(String),
}

async fn handle_form_command(
    args: &[String],
    form: &mut CampaignFormController,
    client: &promodash_common_ui::ApiClient,
) -> FormReply {
    let text = match args[0].to_lowercase().as_str() {
        "show" => render::render_campaign_form(form),

        "section" => {
            let section = match args.get(1).map(|s| s.as_str()) {
                None => {
                    let names: Vec<String> = FormSection::ALL
                        .iter()
                        .map(|s| {
                            if *s == form.section() {
                                format!("[{}]", s)
                            } else {
                                s.to_string()
                            }
                        })
                        .collect();
                    return FormReply::Text(names.join("  "));
                }
                Some("next") => form.next_section(),
                Some("prev") => form.prev_section(),
                Some(name) => match name.parse::<FormSection>() {
                    Ok(section) => {
                        form.goto(section);
                        section
                    }
                    Err(e) => return FormReply::Text(e),
                },
            };
            format!("Section: {}", section)
        }

        "set" => {
            let pairs = match parse_assignments(&args[1..]) {
                Ok(p) if !p.is_empty() => p,
                Ok(_) => return FormReply::Text("Usage: campaign set key=value [key=value ...]".to_string()),
                Err(e) => return FormReply::Text(e),
            };
            for (key, value) in &pairs {
                if let Err(e) = form.set_field(key, value) {
                    return FormReply::Text(error_text(&e));
                }
            }
            render::render_campaign_form(form)
        }

        "save" => match form.save(client).await {
            Ok(saved) => with_warnings(
                format!("Saved campaign '{}' (#{}).\n{}", saved.data.name, saved.data.id, render::render_campaign_form(form)),
                &saved.warnings,
            ),
            Err(CommandError::Validation(_)) => render::render_campaign_form(form),
            Err(e) => error_text(&e),
        },

        "delete" | "remove" => match form.request_delete() {
            Ok(()) => format!(
                "Delete campaign {}? Type 'campaign confirm' to delete or 'campaign cancel' to keep it.",
                form.title()
            ),
            Err(e) => error_text(&e),
        },

        "confirm" => match form.confirm_delete(client).await {
            Ok(done) => match done.data {
                FormOutcome::NavigateToList => return FormReply::Closed("Campaign deleted.".to_string()),
                FormOutcome::Stay => render::render_campaign_form(form),
            },
            Err(e) => error_text(&e),
        },

        "cancel" => {
            if form.cancel_delete() {
                "Deletion cancelled.".to_string()
            } else {
                "Nothing to cancel.".to_string()
            }
        }

        "action" => {
            let Some(raw) = args.get(1) else {
                let offered: Vec<&str> = form.offered_actions().iter().map(|a| a.path_segment()).collect();
                let all: Vec<&str> = CampaignAction::ALL.iter().map(|a| a.path_segment()).collect();
                return FormReply::Text(format!(
                    "Usage: campaign action <{}>\nOffered now: {}",
                    all.join("|"),
                    if offered.is_empty() { "none".to_string() } else { offered.join(", ") }
                ));
            };
            let action = match raw.parse::<CampaignAction>() {
                Ok(a) => a,
                Err(e) => return FormReply::Text(e),
            };
            match form.run_action(client, action).await {
                Ok(result) => with_warnings(
                    format!("Campaign is now {}.\n", result.data.status),
                    &result.warnings,
                ),
                Err(e) => error_text(&e),
            }
        }

        "preview" => render::render_preview(&form.preview()),

        _ => USAGE.to_string(),
    };
    FormReply::Text(text)
}
