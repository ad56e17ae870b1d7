// File: promodash-tui/src/help/help_reward.rs

pub const REWARD_HELP_TEXT: &str = r#"
Reward Command Help
===================

Works on the campaign opened with 'campaign open <id>'.

Usage:
  reward <list|add|edit|image|show|remove|confirm|cancel> ...

Subcommands:

  reward list
    Shows all rewards with totals. The probability total is green at
    exactly 100% and yellow otherwise; an unbalanced set can still be saved.

  reward add key=value [key=value ...]
    Creates a reward. Keys:
      name, value, description, probability (or prob, 0-100),
      total_available (or stock, 0 = unlimited), color, image (file path)

  reward edit <id> key=value [key=value ...]
    Updates a reward.

  reward image <id> <path|none>
    Uploads a new image for a reward.

  reward show
    Shows the open dialog with any field errors.

  reward remove <id>
    Asks for confirmation; 'reward confirm' deletes, 'reward cancel' keeps it.

Examples:
  reward add name="$10 OFF" value="$10 off your order" prob=15
  reward add name="Free Pizza" value="1 large pizza" prob=20 stock=50
  reward add name="No Prize" value="Try again" prob=65
"#;
