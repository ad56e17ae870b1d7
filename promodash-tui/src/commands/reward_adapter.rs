// File: promodash-tui/src/commands/reward_adapter.rs
//
// Rewards of the open campaign. Needs a saved campaign from 'campaign open'.

use promodash_common_ui::commands::reward::{RewardDraft, RewardEditor, REWARD_FIELDS};
use promodash_common_ui::{ApiClient, CommandError};

use crate::commands::{error_text, parse_assignments, parse_id, with_warnings};
use crate::console::ConsoleModule;
use crate::render;

const USAGE: &str = "Usage: reward <list|add|edit|image|show|remove|confirm|cancel> [args]
Type 'help reward' for details.";

pub async fn handle_reward_command(args: &[String], console: &mut ConsoleModule) -> String {
    let Some(sub) = args.first() else {
        return USAGE.to_string();
    };
    let client = console.state.client.clone();
    let editor = match console.campaign_form.as_mut() {
        None => return "No campaign is open. Use 'campaign open <id>' first.".to_string(),
        Some(form) => match form.rewards_mut() {
            Ok(editor) => editor,
            Err(e) => return error_text(&e),
        },
    };

    match sub.to_lowercase().as_str() {
        "list" => match editor.refresh(&client).await {
            Ok(listed) => render::render_rewards(&listed.data.rewards, &listed.data.summary),
            Err(e) => error_text(&e),
        },

        "add" => {
            let pairs = match parse_assignments(&args[1..]) {
                Ok(p) => p,
                Err(e) => return e,
            };
            let keep_open = editor.draft().map(|d| d.reward_id.is_none()).unwrap_or(false);
            if !keep_open {
                editor.open_create();
            }
            fill_and_submit(editor, &client, &pairs).await
        }

        "edit" => {
            let id = match parse_id(args.get(1), "Usage: reward edit <id> [key=value ...]") {
                Ok(id) => id,
                Err(e) => return e,
            };
            let pairs = match parse_assignments(&args[2..]) {
                Ok(p) => p,
                Err(e) => return e,
            };
            if let Err(e) = ensure_edit(editor, id) {
                return error_text(&e);
            }
            fill_and_submit(editor, &client, &pairs).await
        }

        "image" => {
            let usage = "Usage: reward image <id> <path|none>";
            let id = match parse_id(args.get(1), usage) {
                Ok(id) => id,
                Err(e) => return e,
            };
            let Some(path) = args.get(2) else {
                return usage.to_string();
            };
            if let Err(e) = ensure_edit(editor, id) {
                return error_text(&e);
            }
            fill_and_submit(editor, &client, &[("image".to_string(), path.clone())]).await
        }

        "show" => match editor.draft() {
            Some(draft) => render_draft(draft),
            None => "No reward dialog is open.".to_string(),
        },

        "remove" | "delete" => {
            let id = match parse_id(args.get(1), "Usage: reward remove <id>") {
                Ok(id) => id,
                Err(e) => return e,
            };
            match editor.request_delete(id) {
                Ok(reward) => format!(
                    "Delete reward '{}'? Type 'reward confirm' to delete or 'reward cancel' to keep it.",
                    reward.name
                ),
                Err(e) => error_text(&e),
            }
        }

        "confirm" => {
            if editor.pending_delete().is_some() {
                match editor.confirm_delete(&client).await {
                    Ok(done) => with_warnings(
                        format!(
                            "Deleted reward #{}.\n{}",
                            done.data,
                            render::render_rewards(editor.rewards(), &editor.summary())
                        ),
                        &done.warnings,
                    ),
                    Err(e) => error_text(&e),
                }
            } else if editor.draft().is_some() {
                submit(editor, &client).await
            } else {
                "Nothing to confirm for reward.".to_string()
            }
        }

        "cancel" => {
            if editor.cancel_delete() {
                "Deletion cancelled.".to_string()
            } else if editor.close_draft() {
                "Dialog closed.".to_string()
            } else {
                "Nothing to cancel.".to_string()
            }
        }

        _ => USAGE.to_string(),
    }
}

fn ensure_edit(editor: &mut RewardEditor, reward_id: i64) -> Result<(), CommandError> {
    let keep_open = editor.draft().map(|d| d.reward_id == Some(reward_id)).unwrap_or(false);
    if !keep_open {
        editor.open_edit(reward_id)?;
    }
    Ok(())
}

async fn fill_and_submit(editor: &mut RewardEditor, client: &ApiClient, pairs: &[(String, String)]) -> String {
    let draft = match editor.draft_mut() {
        Ok(d) => d,
        Err(e) => return error_text(&e),
    };
    for (key, value) in pairs {
        if let Err(e) = draft.set(key, value) {
            return format!("{}\nFields: {}", e, REWARD_FIELDS.join(", "));
        }
    }
    if pairs.is_empty() {
        return format!(
            "{}Set values with key=value arguments, then 'reward confirm' to save.",
            render_draft(draft)
        );
    }
    submit(editor, client).await
}

async fn submit(editor: &mut RewardEditor, client: &ApiClient) -> String {
    match editor.submit(client).await {
        Ok(saved) => with_warnings(
            format!(
                "Saved reward '{}' (#{}).\n{}",
                saved.data.name,
                saved.data.id,
                render::render_rewards(editor.rewards(), &editor.summary())
            ),
            &saved.warnings,
        ),
        Err(CommandError::Validation(_)) => match editor.draft() {
            Some(draft) => format!(
                "{}Fix the values and run the same command again, or 'reward cancel'.",
                render_draft(draft)
            ),
            None => "Validation failed.".to_string(),
        },
        Err(e) => error_text(&e),
    }
}

fn render_draft(draft: &RewardDraft) -> String {
    let heading = match draft.reward_id {
        Some(id) => format!("Edit reward #{id}"),
        None => "New reward".to_string(),
    };
    let image = draft
        .image_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let values = [
        ("name", draft.name.as_str()),
        ("value", draft.value.as_str()),
        ("description", draft.description.as_str()),
        ("probability", draft.probability.as_str()),
        ("total_available", draft.total_available.as_str()),
        ("color", draft.color.as_str()),
        ("image", image.as_str()),
    ];

    let mut out = format!("{heading}\n");
    for (key, value) in values {
        out.push_str(&format!("  {:<16} {}\n", key, value));
        if let Some(messages) = draft.errors.get(key) {
            for m in messages {
                out.push_str(&format!("  {:<16} ! {}\n", "", m));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_lists_errors_under_their_field() {
        let mut draft = RewardDraft::default();
        draft.set("name", "Jackpot").unwrap();
        draft.set("probability", "150").unwrap();
        draft.errors.add("probability", "Probability cannot exceed 100");

        let text = render_draft(&draft);
        assert!(text.starts_with("New reward\n"));
        assert!(text.contains("  probability      150\n"));
        assert!(text.contains("! Probability cannot exceed 100"));
    }
}
