// tests/common/mod.rs

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use http::Method;
use promodash_common::Error;
use promodash_common_ui::{ApiRequest, ApiResponse, AppState, HttpTransport, Session};

/// Answers requests from a per-route queue and records everything it saw.
/// The last queued answer for a route is reused once the queue runs dry.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<Vec<(Method, String, VecDeque<ApiResponse>)>>,
    seen: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, method: Method, path: &str, status: u16, body: &str) {
        let mut routes = self.routes.lock().unwrap();
        let response = ApiResponse::new(status, body);
        match routes.iter_mut().find(|(m, p, _)| *m == method && p == path) {
            Some((_, _, queue)) => queue.push_back(response),
            None => routes.push((method, path.to_string(), VecDeque::from([response]))),
        }
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, Error> {
        self.seen.lock().unwrap().push(request.clone());
        let mut routes = self.routes.lock().unwrap();
        let route = routes
            .iter_mut()
            .find(|(m, p, _)| *m == request.method && *p == request.path)
            .ok_or_else(|| Error::NotFound(format!("no script for {} {}", request.method, request.path)))?;
        let queue = &mut route.2;
        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        response.ok_or_else(|| Error::NotFound(format!("script exhausted for {}", request.path)))
    }
}

/// App state over the scripted transport, already signed in.
pub async fn signed_in_state(transport: Arc<ScriptedTransport>) -> AppState {
    let state = AppState::new(transport, 10);
    state
        .client
        .set_session(Session {
            access: Some("access-1".to_string()),
            refresh: Some("refresh-1".to_string()),
            email: Some("admin@example.com".to_string()),
        })
        .await;
    state
}

pub fn reward_json(id: i64, name: &str, probability: f64) -> String {
    format!(
        r#"{{"id":{id},"campaign":1,"name":"{name}","value":"{name}","description":"","probability":"{probability:.2}","total_available":0,"image":null,"color":null}}"#
    )
}
