// File: promodash-tui/src/commands/auth_adapter.rs

use promodash_common_ui::commands::auth::AuthCommands;

use crate::commands::{error_text, with_warnings};
use crate::console::ConsoleModule;

pub async fn handle_auth_command(cmd: &str, args: &[String], console: &mut ConsoleModule) -> String {
    let client = console.state.client.clone();
    match cmd {
        "login" => {
            if args.len() != 2 {
                return "Usage: login <email> <password>".to_string();
            }
            match AuthCommands::login(&client, &args[0], &args[1], &console.state.notifications).await {
                Ok(result) => with_warnings(
                    format!(
                        "Logged in as {}.\n",
                        result.data.email.as_deref().unwrap_or("(unknown)")
                    ),
                    &result.warnings,
                ),
                Err(e) => error_text(&e),
            }
        }
        "logout" => match AuthCommands::logout(&client).await {
            Ok(result) => {
                console.campaign_form = None;
                with_warnings("Logged out.\n".to_string(), &result.warnings)
            }
            Err(e) => error_text(&e),
        },
        _ => match AuthCommands::whoami(&client).await {
            Ok(result) => {
                let who = result.data;
                if !who.authenticated {
                    "Not logged in.".to_string()
                } else {
                    format!(
                        "Logged in as {}{}",
                        who.email.as_deref().unwrap_or("(unknown)"),
                        if who.can_refresh { "" } else { " (no refresh token)" }
                    )
                }
            }
            Err(e) => error_text(&e),
        },
    }
}
