pub mod api_client;
pub mod cache;
pub mod commands;
pub mod http;
pub mod inflight;
pub mod notifications;
pub mod preview;
pub mod session;
pub mod state;

pub use api_client::ApiClient;
pub use commands::{CommandError, CommandResult};
pub use http::{ApiRequest, ApiResponse, HttpTransport, ReqwestTransport};
pub use notifications::{Notifications, Toast, ToastLevel};
pub use session::{AuthEvent, AuthEvents, Session};
pub use state::AppState;
