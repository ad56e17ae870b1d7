use crossbeam_channel::{unbounded, Receiver, Sender};

/// Bearer tokens for the signed-in staff member. Kept in memory only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub access: Option<String>,
    pub refresh: Option<String>,
    pub email: Option<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.access.is_some()
    }
}

/// Signals the client raises for the shell to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// Refresh failed or the retried request was rejected again.
    LoginRequired,
    /// HTTP 403 on a request the user could previously make.
    PermissionChanged(String),
}

pub struct AuthEvents {
    tx: Sender<AuthEvent>,
    rx: Receiver<AuthEvent>,
}

impl AuthEvents {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<AuthEvent> {
        self.tx.clone()
    }

    pub fn drain(&self) -> Vec<AuthEvent> {
        self.rx.try_iter().collect()
    }
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}
