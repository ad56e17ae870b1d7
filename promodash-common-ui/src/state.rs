use std::sync::Arc;

use crate::api_client::ApiClient;
use crate::http::HttpTransport;
use crate::notifications::Notifications;
use crate::session::{AuthEvent, AuthEvents};

/// Shared handles every screen needs.
#[derive(Clone)]
pub struct AppState {
    pub client: ApiClient,
    pub notifications: Notifications,
    pub auth_events: Arc<AuthEvents>,
    pub page_size: u32,
}

impl AppState {
    pub fn new(transport: Arc<dyn HttpTransport>, page_size: u32) -> Self {
        let auth_events = Arc::new(AuthEvents::new());
        Self {
            client: ApiClient::new(transport, auth_events.sender()),
            notifications: Notifications::new(),
            auth_events,
            page_size: page_size.max(1),
        }
    }

    pub fn drain_auth_events(&self) -> Vec<AuthEvent> {
        self.auth_events.drain()
    }
}
