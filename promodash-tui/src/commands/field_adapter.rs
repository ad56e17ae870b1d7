// File: promodash-tui/src/commands/field_adapter.rs

use promodash_common::traits::Draft;
use promodash_common::models::FormFieldPayload;
use promodash_common_ui::commands::form_field::FormFieldEditor;
use promodash_common_ui::{ApiClient, CommandError};

use crate::commands::{error_text, parse_assignments, parse_id, with_warnings};
use crate::console::ConsoleModule;
use crate::render;

const USAGE: &str = "Usage: field <list|add|edit|show|remove|confirm|cancel> [args]
Type 'help field' for details.";

pub async fn handle_field_command(args: &[String], console: &mut ConsoleModule) -> String {
    let Some(sub) = args.first() else {
        return USAGE.to_string();
    };
    let client = console.state.client.clone();
    let editor = match console.campaign_form.as_mut() {
        None => return "No campaign is open. Use 'campaign open <id>' first.".to_string(),
        Some(form) => match form.fields_mut() {
            Ok(editor) => editor,
            Err(e) => return error_text(&e),
        },
    };

    match sub.to_lowercase().as_str() {
        "list" => match editor.refresh(&client).await {
            Ok(listed) => render::render_fields(&listed.data),
            Err(e) => error_text(&e),
        },

        "add" => {
            let pairs = match parse_assignments(&args[1..]) {
                Ok(p) => p,
                Err(e) => return e,
            };
            let keep_open = editor.dialog().map(|d| !d.is_edit()).unwrap_or(false);
            if !keep_open {
                editor.open_create();
            }
            fill_and_submit(editor, &client, &pairs).await
        }

        "edit" => {
            let id = match parse_id(args.get(1), "Usage: field edit <id> [key=value ...]") {
                Ok(id) => id,
                Err(e) => return e,
            };
            let pairs = match parse_assignments(&args[2..]) {
                Ok(p) => p,
                Err(e) => return e,
            };
            let keep_open = editor.dialog().map(|d| d.target == Some(id)).unwrap_or(false);
            if !keep_open {
                if let Err(e) = editor.open_edit(id) {
                    return error_text(&e);
                }
            }
            fill_and_submit(editor, &client, &pairs).await
        }

        "show" => match editor.dialog() {
            Some(dialog) => render::render_dialog("form field", dialog),
            None => "No form field dialog is open.".to_string(),
        },

        "remove" | "delete" => {
            let id = match parse_id(args.get(1), "Usage: field remove <id>") {
                Ok(id) => id,
                Err(e) => return e,
            };
            match editor.request_delete(id) {
                Ok(()) => "Delete this field? Type 'field confirm' to delete or 'field cancel' to keep it.".to_string(),
                Err(e) => error_text(&e),
            }
        }

        "confirm" => {
            if editor.pending_delete().is_some() {
                match editor.confirm_delete(&client).await {
                    Ok(done) => with_warnings(
                        format!("Deleted field #{}.\n{}", done.data, render::render_fields(editor.fields())),
                        &done.warnings,
                    ),
                    Err(e) => error_text(&e),
                }
            } else if editor.dialog().is_some() {
                submit(editor, &client).await
            } else {
                "Nothing to confirm for field.".to_string()
            }
        }

        "cancel" => {
            if editor.cancel_delete() {
                "Deletion cancelled.".to_string()
            } else if editor.close_dialog() {
                "Dialog closed.".to_string()
            } else {
                "Nothing to cancel.".to_string()
            }
        }

        _ => USAGE.to_string(),
    }
}

async fn fill_and_submit(editor: &mut FormFieldEditor, client: &ApiClient, pairs: &[(String, String)]) -> String {
    let dialog = match editor.dialog_mut() {
        Ok(d) => d,
        Err(e) => return error_text(&e),
    };
    for (key, value) in pairs {
        if let Err(e) = dialog.set(key, value) {
            return format!("{}\nFields: {}", e, FormFieldPayload::field_names().join(", "));
        }
    }
    if pairs.is_empty() {
        return format!(
            "{}Set values with key=value arguments, then 'field confirm' to save.",
            render::render_dialog("form field", dialog)
        );
    }
    submit(editor, client).await
}

async fn submit(editor: &mut FormFieldEditor, client: &ApiClient) -> String {
    match editor.submit(client).await {
        Ok(saved) => with_warnings(
            format!("Saved field '{}'.\n{}", saved.data.label, render::render_fields(editor.fields())),
            &saved.warnings,
        ),
        Err(CommandError::Validation(_)) => match editor.dialog() {
            Some(dialog) => render::render_dialog("form field", dialog),
            None => "Validation failed.".to_string(),
        },
        Err(e) => error_text(&e),
    }
}
