// File: promodash-tui/src/help/help_resource.rs
//
// Help for the list screens that share one adapter:
//   country, dealer, client, branch, muser, mgroup

const RESOURCE_HELP_TEMPLATE: &str = r#"
{name} Command Help
====================

Usage:
  {name} <list|page|search|add|edit|show|remove|confirm|cancel> ...

Subcommands:

  {name} list
    Shows the current page (cached; changes refetch automatically).

  {name} page <number|next|prev>
    Moves to another page.

  {name} search [text]
    Filters by text and goes back to page 1. No text clears the filter.

  {name} add [key=value ...]
    Opens a create dialog. With values, applies them and saves.
    A dialog that failed validation stays open; run 'add' again with the fixes.

  {name} edit <id> [key=value ...]
    Same as add, for an existing record on the current page.

  {name} show
    Shows the open dialog with any field errors.

  {name} remove <id>
    Asks for confirmation. Nothing is deleted until '{name} confirm'.

  {name} confirm
    Confirms a pending delete, or submits the open dialog.

  {name} cancel
    Drops a pending delete, or closes the open dialog.

Keys:
  {keys}
"#;

fn keys_for(name: &str) -> &'static str {
    match name {
        "country" => "country add name=<text> code=<2 letters> currency=<3 letters> is_active=<true|false>",
        "dealer" => "dealer add name=<text> country=<id> email=<address> phone=<text> is_active=<true|false>",
        "client" => "client add name=<text> dealer=<id> email=<address> phone=<text> is_active=<true|false>",
        "branch" => "branch add name=<text> client=<id> address=<text> phone=<text> is_active=<true|false>",
        "muser" => "muser add name=<text> phone=<text> email=<address> groups=<id,id,...> subscribed=<true|false>\n  A phone number or an email address is required.",
        "mgroup" => "mgroup add name=<text> description=<text>",
        _ => "",
    }
}

pub fn resource_help(name: &str) -> String {
    RESOURCE_HELP_TEMPLATE
        .replace("{name}", name)
        .replace("{keys}", keys_for(name))
}
