// Tab completion support for console commands
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::{Highlighter, MatchingBracketHighlighter};
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Context, Helper};
use rustyline_derive::Helper;
use std::borrow::Cow;

const LIST_SUBCOMMANDS: &[&str] = &[
    "list", "page", "search", "add", "edit", "show", "remove", "confirm", "cancel",
];

#[derive(Helper)]
pub struct TuiCompleter {
    commands: Vec<CommandInfo>,
    highlighter: MatchingBracketHighlighter,
    hinter: HistoryHinter,
}

#[derive(Clone)]
struct CommandInfo {
    name: String,
    subcommands: Vec<String>,
    description: String,
}

impl CommandInfo {
    fn new(name: &str, subcommands: &[&str], description: &str) -> Self {
        Self {
            name: name.to_string(),
            subcommands: subcommands.iter().map(|s| s.to_string()).collect(),
            description: description.to_string(),
        }
    }
}

impl Default for TuiCompleter {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiCompleter {
    pub fn new() -> Self {
        Self {
            commands: Self::build_command_tree(),
            highlighter: MatchingBracketHighlighter::new(),
            hinter: HistoryHinter::new(),
        }
    }

    fn build_command_tree() -> Vec<CommandInfo> {
        let mut mcampaign = LIST_SUBCOMMANDS.to_vec();
        mcampaign.push("send");

        vec![
            // Core
            CommandInfo::new("help", &[], "Show help for commands"),
            CommandInfo::new("login", &[], "Sign in"),
            CommandInfo::new("logout", &[], "Sign out"),
            CommandInfo::new("whoami", &[], "Show the signed-in account"),
            CommandInfo::new("toasts", &[], "Recent notifications"),
            CommandInfo::new("quit", &[], "Leave the console"),
            // Tenancy
            CommandInfo::new("country", LIST_SUBCOMMANDS, "Countries"),
            CommandInfo::new("dealer", LIST_SUBCOMMANDS, "Dealers"),
            CommandInfo::new("client", LIST_SUBCOMMANDS, "Clients"),
            CommandInfo::new("branch", LIST_SUBCOMMANDS, "Branches"),
            // Campaigns
            CommandInfo::new(
                "campaign",
                &[
                    "list", "page", "search", "open", "new", "show", "section", "set", "save",
                    "delete", "confirm", "cancel", "action", "preview", "close",
                ],
                "Campaign list and form",
            ),
            CommandInfo::new(
                "reward",
                &["list", "add", "edit", "image", "show", "remove", "confirm", "cancel"],
                "Rewards of the open campaign",
            ),
            CommandInfo::new(
                "field",
                &["list", "add", "edit", "show", "remove", "confirm", "cancel"],
                "Form fields of the open campaign",
            ),
            // Marketing
            CommandInfo::new("muser", LIST_SUBCOMMANDS, "Marketing contacts"),
            CommandInfo::new("mgroup", LIST_SUBCOMMANDS, "Marketing groups"),
            CommandInfo::new("mcampaign", &mcampaign, "SMS/email campaigns"),
        ]
    }

    /// Third-word candidates for a few fixed vocabularies.
    fn argument_values(command: &str, subcommand: &str) -> &'static [&'static str] {
        match (command, subcommand) {
            ("campaign", "section") => &["details", "rewards", "form", "settings", "next", "prev"],
            ("campaign", "action") => &["activate", "pause", "resume", "complete", "cancel", "refresh-qr"],
            (_, "page") => &["next", "prev"],
            _ => &[],
        }
    }
}

impl Completer for TuiCompleter {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Result<(usize, Vec<Pair>), ReadlineError> {
        let mut candidates = Vec::new();
        let line_to_cursor = &line[..pos];
        let parts: Vec<&str> = line_to_cursor.split_whitespace().collect();
        let at_new_word = line_to_cursor.ends_with(' ');

        // Calculate where the completion should start
        let start = if at_new_word {
            pos
        } else {
            line_to_cursor.rfind(' ').map(|i| i + 1).unwrap_or(0)
        };
        let prefix = if at_new_word { "" } else { parts.last().copied().unwrap_or("") };
        // Index of the word being completed
        let word = if at_new_word { parts.len() } else { parts.len().saturating_sub(1) };

        match word {
            0 => {
                for cmd in &self.commands {
                    if cmd.name.starts_with(prefix) {
                        candidates.push(Pair {
                            display: format!("{:<15} {}", cmd.name, cmd.description),
                            replacement: cmd.name.clone(),
                        });
                    }
                }
            }
            1 => {
                let command = parts[0];
                if command == "help" {
                    for cmd in &self.commands {
                        if cmd.name != "help" && cmd.name.starts_with(prefix) {
                            candidates.push(Pair {
                                display: cmd.name.clone(),
                                replacement: cmd.name.clone(),
                            });
                        }
                    }
                } else if let Some(cmd_info) = self.commands.iter().find(|c| c.name == command) {
                    for sub in &cmd_info.subcommands {
                        if sub.starts_with(prefix) {
                            candidates.push(Pair {
                                display: sub.clone(),
                                replacement: sub.clone(),
                            });
                        }
                    }
                }
            }
            2 => {
                for value in Self::argument_values(parts[0], parts[1]) {
                    if value.starts_with(prefix) {
                        candidates.push(Pair {
                            display: value.to_string(),
                            replacement: value.to_string(),
                        });
                    }
                }
            }
            _ => {}
        }

        Ok((start, candidates))
    }
}

impl Validator for TuiCompleter {
    fn validate(&self, _ctx: &mut ValidationContext) -> Result<ValidationResult, ReadlineError> {
        Ok(ValidationResult::Valid(None))
    }
}

impl Hinter for TuiCompleter {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for TuiCompleter {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line, pos)
    }

    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool,
    ) -> Cow<'b, str> {
        self.highlighter.highlight_prompt(prompt, default)
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(format!("\x1b[2m{}\x1b[0m", hint))
    }

    fn highlight_char(&self, line: &str, pos: usize, forced: bool) -> bool {
        self.highlighter.highlight_char(line, pos, forced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustyline::history::DefaultHistory;

    fn complete(line: &str) -> (usize, Vec<String>) {
        let completer = TuiCompleter::new();
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);
        let (start, pairs) = completer.complete(line, line.len(), &ctx).unwrap();
        (start, pairs.into_iter().map(|p| p.replacement).collect())
    }

    #[test]
    fn completes_commands_then_subcommands() {
        assert_eq!(complete("rew").1, vec!["reward"]);
        let (start, subs) = complete("campaign pr");
        assert_eq!(start, 9);
        assert_eq!(subs, vec!["preview"]);
        assert!(complete("mcampaign ").1.contains(&"send".to_string()));
    }

    #[test]
    fn completes_section_names() {
        assert_eq!(complete("campaign section se").1, vec!["settings"]);
        assert_eq!(complete("help mc").1, vec!["mcampaign"]);
    }
}
