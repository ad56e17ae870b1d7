use tracing::{error, info};

use crate::api_client::ApiClient;
use crate::commands::{CommandError, CommandResult};
use crate::notifications::Notifications;
use crate::session::Session;

pub struct WhoAmIResult {
    pub email: Option<String>,
    pub authenticated: bool,
    pub can_refresh: bool,
}

pub struct AuthCommands;

impl AuthCommands {
    pub async fn login(
        client: &ApiClient,
        email: &str,
        password: &str,
        notifications: &Notifications,
    ) -> Result<CommandResult<Session>, CommandError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(CommandError::InvalidInput("Email and password are required".to_string()));
        }
        let session = match client.login(email.trim(), password).await {
            Ok(session) => session,
            Err(e) => {
                error!("Login for {} failed: {}", email.trim(), e);
                notifications.error(format!("Login failed: {e}"));
                return Err(match e {
                    promodash_common::Error::Auth(reason) => {
                        CommandError::InvalidInput(format!("Login failed: {reason}"))
                    }
                    other => other.into(),
                });
            }
        };
        let mut warnings = Vec::new();
        if session.refresh.is_none() {
            warnings.push("No refresh token was issued; you will need to log in again when the session expires".to_string());
        }
        Ok(CommandResult::with_warnings(session, warnings))
    }

    pub async fn logout(client: &ApiClient) -> Result<CommandResult<()>, CommandError> {
        let was_signed_in = client.session().await.is_authenticated();
        client.logout().await;
        if was_signed_in {
            Ok(CommandResult::new(()))
        } else {
            info!("logout without a session");
            Ok(CommandResult::with_warnings((), vec!["You were not logged in".to_string()]))
        }
    }

    pub async fn whoami(client: &ApiClient) -> Result<CommandResult<WhoAmIResult>, CommandError> {
        let session = client.session().await;
        Ok(CommandResult::new(WhoAmIResult {
            authenticated: session.is_authenticated(),
            can_refresh: session.refresh.is_some(),
            email: session.email,
        }))
    }
}
