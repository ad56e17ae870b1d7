// File: promodash-tui/src/commands/mod.rs

pub mod auth_adapter;
pub mod campaign_adapter;
pub mod field_adapter;
pub mod marketing_adapter;
pub mod resource_adapter;
pub mod reward_adapter;

use promodash_common_ui::CommandError;

use crate::console::ConsoleModule;
use crate::help;
use crate::render;

/// Runs one console line. Returns `(quit, output)`.
pub async fn dispatch(line: &str, console: &mut ConsoleModule) -> (bool, Option<String>) {
    let parts = match split_args(line) {
        Ok(p) => p,
        Err(e) => return (false, Some(e)),
    };
    let cmd = parts.first().map(|s| s.to_lowercase()).unwrap_or_default();
    let args = if parts.is_empty() { &parts[..] } else { &parts[1..] };
    let client = console.state.client.clone();

    let message = match cmd.as_str() {
        "" => return (false, None),
        "help" => help::show_command_help(args.first().map(|s| s.as_str()).unwrap_or("")),
        "quit" | "exit" => return (true, Some("Goodbye.".to_string())),

        "login" | "logout" | "whoami" => auth_adapter::handle_auth_command(&cmd, args, console).await,

        "country" => {
            resource_adapter::handle_resource_command(args, &mut console.countries, &client, "country").await
        }
        "dealer" => {
            resource_adapter::handle_resource_command(args, &mut console.dealers, &client, "dealer").await
        }
        "client" => {
            resource_adapter::handle_resource_command(args, &mut console.clients, &client, "client").await
        }
        "branch" => {
            resource_adapter::handle_resource_command(args, &mut console.branches, &client, "branch").await
        }
        "muser" => {
            resource_adapter::handle_resource_command(args, &mut console.marketing_users, &client, "muser").await
        }
        "mgroup" => {
            resource_adapter::handle_resource_command(args, &mut console.marketing_groups, &client, "mgroup").await
        }
        "mcampaign" => marketing_adapter::handle_mcampaign_command(args, console).await,

        "campaign" => campaign_adapter::handle_campaign_command(args, console).await,
        "reward" => reward_adapter::handle_reward_command(args, console).await,
        "field" => field_adapter::handle_field_command(args, console).await,

        "toasts" => {
            let log = console.toast_log();
            if log.is_empty() {
                "No notifications yet.".to_string()
            } else {
                render::render_toasts(log)
            }
        }

        other => format!("Unknown command '{}'. Type 'help' for a list of commands.", other),
    };
    (false, Some(message))
}

/// Splits on whitespace; double quotes group words and are dropped, so
/// `name="Free Pizza"` becomes a single `name=Free Pizza` argument.
pub fn split_args(line: &str) -> Result<Vec<String>, String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    args.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if in_quotes {
        return Err("Unterminated quote".to_string());
    }
    if has_token {
        args.push(current);
    }
    Ok(args)
}

/// `key=value` arguments in order. A value may itself contain `=`.
pub fn parse_assignments(args: &[String]) -> Result<Vec<(String, String)>, String> {
    args.iter()
        .map(|arg| match arg.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_lowercase(), value.to_string()))
            }
            _ => Err(format!("Expected key=value, got '{}'", arg)),
        })
        .collect()
}

pub(crate) fn parse_id(value: Option<&String>, usage: &str) -> Result<i64, String> {
    let raw = value.ok_or_else(|| usage.to_string())?;
    raw.parse::<i64>()
        .map_err(|_| format!("'{}' is not a valid id", raw))
}

/// One line for errors that have no dialog to show them on.
pub(crate) fn error_text(err: &CommandError) -> String {
    match err {
        CommandError::Validation(errors) => {
            format!("Please fix:\n{}", render::render_field_errors(errors))
        }
        other => format!("Error: {}", other),
    }
}

pub(crate) fn with_warnings(mut out: String, warnings: &[String]) -> String {
    out.push_str(&render::render_warnings(warnings));
    out
}
