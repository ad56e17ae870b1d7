//! Central help module that provides a single entry point (`show_command_help`)
//! to display usage or subcommand details for any recognized console command.

pub mod help_auth;
pub mod help_campaign;
pub mod help_field;
pub mod help_marketing;
pub mod help_resource;
pub mod help_reward;

fn show_general_help() -> String {
    let text = r#"Promodash console - Available Commands:

  help [command]
    Show general help, or detailed help on a specific command.

  login <email> <password> | logout | whoami
    Start or end an admin session.

  country|dealer|client|branch <list|page|search|add|edit|show|remove|confirm|cancel> ...
    Manage the tenancy hierarchy.

  campaign <list|page|search|open|new|show|section|set|save|delete|confirm|cancel|action|preview|close> ...
    Browse campaigns and edit one at a time.

  reward <list|add|edit|image|show|remove|confirm|cancel> ...
    Prizes of the open campaign, with probability totals.

  field <list|add|edit|show|remove|confirm|cancel> ...
    Registration form fields of the open campaign.

  muser|mgroup <list|page|search|add|edit|show|remove|confirm|cancel> ...
    Marketing contacts and groups.

  mcampaign <list|page|search|add|edit|show|remove|confirm|cancel|send> ...
    SMS and email marketing campaigns.

  toasts
    Show recent notifications.

  quit
    Leave the console.

Values with spaces go in double quotes: reward add name="Free Pizza" value="1 large pizza"
"#;
    text.to_owned()
}

pub fn show_command_help(command: &str) -> String {
    match command {
        "" => show_general_help(),

        "login" | "logout" | "whoami" => help_auth::AUTH_HELP_TEXT.to_owned(),
        "country" | "dealer" | "client" | "branch" | "muser" | "mgroup" => {
            help_resource::resource_help(command)
        }
        "campaign" => help_campaign::CAMPAIGN_HELP_TEXT.to_owned(),
        "reward" => help_reward::REWARD_HELP_TEXT.to_owned(),
        "field" => help_field::FIELD_HELP_TEXT.to_owned(),
        "mcampaign" => help_marketing::MCAMPAIGN_HELP_TEXT.to_owned(),

        "toasts" => "toasts\n  Shows the last 20 success/error notifications.".to_owned(),
        "quit" | "exit" => "quit\n  Leaves the console. Unsaved dialogs are discarded.".to_owned(),

        other => format!("No detailed help for '{}'. Type 'help' for a list of commands.", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_help_names_its_keys() {
        let text = show_command_help("dealer");
        assert!(text.contains("dealer add name=<text> country=<id>"));
        assert!(show_command_help("nope").starts_with("No detailed help"));
    }
}
