// File: promodash-tui/src/commands/resource_adapter.rs
//
// One adapter for every list screen: country, dealer, client, branch,
// muser and mgroup all share list/page/search/add/edit/remove.

use promodash_common::traits::{Draft, Resource};
use promodash_common_ui::commands::dialog::Dialog;
use promodash_common_ui::commands::resource::CrudList;
use promodash_common_ui::{ApiClient, CommandError};

use crate::commands::{error_text, parse_assignments, parse_id, with_warnings};
use crate::render;

pub async fn handle_resource_command<R: Resource>(
    args: &[String],
    list: &mut CrudList<R>,
    client: &ApiClient,
    name: &str,
) -> String {
    let usage = format!(
        "Usage: {name} <list|page|search|add|edit|show|remove|confirm|cancel> [args]\nType 'help {name}' for details."
    );
    let Some(sub) = args.first() else {
        return usage;
    };

    match sub.to_lowercase().as_str() {
        "list" => match list.refresh(client).await {
            Ok(result) => with_warnings(render::render_list(list), &result.warnings),
            Err(e) => error_text(&e),
        },

        "page" => {
            let moved = match args.get(1).map(|s| s.as_str()) {
                Some("next") => list.next_page(),
                Some("prev") | Some("previous") => list.prev_page(),
                Some(n) => match n.parse::<u32>() {
                    Ok(page) => list.set_page(page),
                    Err(_) => return format!("'{}' is not a page number", n),
                },
                None => return format!("Usage: {name} page <number|next|prev>"),
            };
            match moved {
                Ok(()) => reload(list, client).await,
                Err(e) => error_text(&e),
            }
        }

        "search" => {
            let text = args[1..].join(" ");
            list.set_search(&text);
            reload(list, client).await
        }

        "add" => {
            let pairs = match parse_assignments(&args[1..]) {
                Ok(p) => p,
                Err(e) => return e,
            };
            let keep_open = list.dialog().map(|d| !d.is_edit()).unwrap_or(false);
            if !keep_open {
                list.open_create();
            }
            fill_and_submit(list, client, name, &pairs).await
        }

        "edit" => {
            let id = match parse_id(args.get(1), &format!("Usage: {name} edit <id> [key=value ...]")) {
                Ok(id) => id,
                Err(e) => return e,
            };
            let pairs = match parse_assignments(&args[2..]) {
                Ok(p) => p,
                Err(e) => return e,
            };
            let keep_open = list.dialog().map(|d| d.target == Some(id)).unwrap_or(false);
            if !keep_open {
                if let Err(e) = list.open_edit(id) {
                    return error_text(&e);
                }
            }
            fill_and_submit(list, client, name, &pairs).await
        }

        "show" => match list.dialog() {
            Some(dialog) => render::render_dialog(R::LABEL, dialog),
            None => format!("No {} dialog is open.", R::LABEL),
        },

        "remove" | "delete" => {
            let id = match parse_id(args.get(1), &format!("Usage: {name} remove <id>")) {
                Ok(id) => id,
                Err(e) => return e,
            };
            match list.request_delete(id) {
                Ok(item) => format!(
                    "Delete {} '{}'? Type '{name} confirm' to delete or '{name} cancel' to keep it.",
                    R::LABEL,
                    item.display_name()
                ),
                Err(e) => error_text(&e),
            }
        }

        "confirm" => {
            if list.pending_delete().is_some() {
                match list.confirm_delete(client).await {
                    Ok(done) => with_warnings(format!("Deleted {} #{}.\n", R::LABEL, done.data), &done.warnings),
                    Err(e) => error_text(&e),
                }
            } else if list.dialog().is_some() {
                submit(list, client, name).await
            } else {
                format!("Nothing to confirm for {}.", name)
            }
        }

        "cancel" => {
            if list.cancel_delete() {
                "Deletion cancelled.".to_string()
            } else if list.close_dialog() {
                "Dialog closed.".to_string()
            } else {
                "Nothing to cancel.".to_string()
            }
        }

        _ => usage,
    }
}

async fn reload<R: Resource>(list: &mut CrudList<R>, client: &ApiClient) -> String {
    match list.load(client).await {
        Ok(result) => with_warnings(render::render_list(list), &result.warnings),
        Err(e) => error_text(&e),
    }
}

fn apply<D: Draft>(dialog: &mut Dialog<D>, pairs: &[(String, String)]) -> Result<(), String> {
    for (key, value) in pairs {
        dialog.set(key, value)?;
    }
    Ok(())
}

/// With no assignments the dialog is only shown; otherwise the values are
/// applied and submitted.
async fn fill_and_submit<R: Resource>(
    list: &mut CrudList<R>,
    client: &ApiClient,
    name: &str,
    pairs: &[(String, String)],
) -> String {
    let dialog = match list.dialog_mut() {
        Ok(d) => d,
        Err(e) => return error_text(&e),
    };
    if let Err(e) = apply(dialog, pairs) {
        return format!("{}\nFields: {}", e, field_list::<R>());
    }
    if pairs.is_empty() {
        return format!(
            "{}Set values with '{name} {} key=value ...', then '{name} confirm' to save.",
            render::render_dialog(R::LABEL, dialog),
            if dialog.is_edit() { "edit <id>" } else { "add" },
        );
    }
    submit(list, client, name).await
}

async fn submit<R: Resource>(list: &mut CrudList<R>, client: &ApiClient, name: &str) -> String {
    match list.submit(client).await {
        Ok(saved) => {
            let head = format!("Saved {} '{}' (#{}).\n", R::LABEL, saved.data.display_name(), saved.data.id());
            with_warnings(head + &render::render_list(list), &saved.warnings)
        }
        Err(CommandError::Validation(_)) => match list.dialog() {
            Some(dialog) => format!(
                "{}Fix the values with '{name} {} key=value ...' or '{name} cancel'.",
                render::render_dialog(R::LABEL, dialog),
                if dialog.is_edit() { "edit <id>" } else { "add" },
            ),
            None => "Validation failed.".to_string(),
        },
        Err(e) => error_text(&e),
    }
}

fn field_list<R: Resource>() -> String {
    <R::Draft as Draft>::field_names().join(", ")
}
