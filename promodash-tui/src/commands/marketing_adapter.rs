// File: promodash-tui/src/commands/marketing_adapter.rs

use promodash_common_ui::commands::marketing::MarketingCommands;

use crate::commands::resource_adapter::handle_resource_command;
use crate::commands::{error_text, parse_id};
use crate::console::ConsoleModule;

/// `mcampaign` is a regular list screen plus `send`.
pub async fn handle_mcampaign_command(args: &[String], console: &mut ConsoleModule) -> String {
    let client = console.state.client.clone();

    if args.first().map(|s| s.eq_ignore_ascii_case("send")) != Some(true) {
        return handle_resource_command(args, &mut console.marketing_campaigns, &client, "mcampaign").await;
    }

    let id = match parse_id(args.get(1), "Usage: mcampaign send <id>") {
        Ok(id) => id,
        Err(e) => return e,
    };
    if console.marketing_campaigns.items().is_empty() {
        if let Err(e) = console.marketing_campaigns.load(&client).await {
            return error_text(&e);
        }
    }

    match MarketingCommands::send(
        &client,
        &console.marketing_campaigns,
        id,
        &console.state.notifications,
    )
    .await
    {
        Ok(sent) => format!(
            "'{}' ({}) is now {}.",
            sent.data.campaign.name, sent.data.channel, sent.data.campaign.status
        ),
        Err(e) => error_text(&e),
    }
}
