// File: promodash-tui/src/help/help_campaign.rs
//
// Contains help text for the "campaign" console subcommands:
//   campaign list | page | search
//   campaign open <id> | new | show | close
//   campaign section [details|rewards|form|settings|next|prev]
//   campaign set key=value ...
//   campaign save
//   campaign delete | confirm | cancel
//   campaign action <name>
//   campaign preview

pub const CAMPAIGN_HELP_TEXT: &str = r#"
Campaign Command Help
=====================

Usage:
  campaign <list|page|search|open|new|show|section|set|save|delete|confirm|cancel|action|preview|close> ...

Browsing:

  campaign list | page <n|next|prev> | search [text]
    Same as the other list screens.

Editing one campaign:

  campaign open <id>
    Loads the campaign with its rewards and form fields. The prompt shows
    the open campaign and the current section.

  campaign new
    Starts an unsaved campaign. Rewards and fields need a saved campaign.

  campaign section [details|rewards|form|settings|next|prev]
    Switches the form tab. Any tab can be opened at any time.

  campaign set key=value [key=value ...]
    Changes the local copy. Nothing is sent until 'campaign save'.
    Keys: name, description, type, client, start, end, logo, show_logo,
          color, scratch_image, show_dates
    Types: scratch_card, spin_wheel, instant_win (slot machine), lucky_draw
    Dates: YYYY-MM-DD or RFC 3339; 'none' clears a value.

  campaign save
    Creates or updates the whole campaign. Stays on the current tab.

  campaign delete
    Asks for confirmation; 'campaign confirm' deletes and returns to the list,
    'campaign cancel' keeps it.

  campaign action <activate|pause|resume|complete|cancel|refresh-qr>
    Runs a lifecycle action. Without a name, lists those offered for the
    current status. Others are still sent, with a warning.

  campaign preview
    Text mock of the player screen, from the unsaved values.

  campaign close
    Closes the form without saving.
"#;
