// File: promodash-tui/src/help/help_field.rs

pub const FIELD_HELP_TEXT: &str = r#"
Field Command Help
==================

Registration form fields shown to players of the open campaign.

Usage:
  field <list|add|edit|show|remove|confirm|cancel> ...

  field list
    Fields in display order.

  field add label=<text> type=<text|email|phone|select|checkbox> [required=true] [options=a,b,c] [order=<n>]
    New fields go after the last one unless an order is given.
    Select fields need at least one option.

  field edit <id> key=value ...
  field remove <id>            then 'field confirm' or 'field cancel'
"#;
