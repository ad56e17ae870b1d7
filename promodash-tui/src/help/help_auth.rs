// File: promodash-tui/src/help/help_auth.rs

pub const AUTH_HELP_TEXT: &str = r#"
Session Commands
================

  login <email> <password>
    Signs in. Expired access tokens are refreshed automatically; when that
    fails you are asked to log in again.

  logout
    Forgets the tokens and closes any open campaign.

  whoami
    Shows the signed-in account.

Credentials can also come from PROMODASH_EMAIL / PROMODASH_PASSWORD or a .env file.
"#;
