// File: promodash-tui/src/help/help_marketing.rs

pub const MCAMPAIGN_HELP_TEXT: &str = r#"
Marketing Campaign Command Help
===============================

Usage:
  mcampaign <list|page|search|add|edit|show|remove|confirm|cancel|send> ...

  mcampaign list | page | search | show | remove | confirm | cancel
    Same as the other list screens.

  mcampaign add name=<text> channel=<sms|email> groups=<id,id,...> message=<text> [subject=<text>] [scheduled_at=<date>]
    Email campaigns need a subject. SMS messages are limited to 480 characters.

  mcampaign send <id>
    Queues a draft or failed campaign for delivery. Sent campaigns cannot be
    sent again.

Contacts and groups are managed with 'muser' and 'mgroup' (see 'help muser').
"#;
