//! Transport layer between the admin client and the REST backend.
//!
//! `ApiClient` builds `ApiRequest`s and hands them to an `HttpTransport`.
//! The default transport wraps reqwest; tests script responses instead of
//! talking to a server.

use std::time::Duration;

use async_trait::async_trait;
use http::Method;
use promodash_common::models::page::encode_pairs;
use promodash_common::Error;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::debug;

/// A file attached to a multipart request.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart {
        fields: Vec<(String, String)>,
        file: Option<FilePart>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Relative to the API root, e.g. `campaigns/4/rewards/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub bearer: Option<String>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            bearer: None,
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn multipart(mut self, fields: Vec<(String, String)>, file: Option<FilePart>) -> Self {
        self.body = RequestBody::Multipart { fields, file };
        self
    }

    /// Path plus encoded query string. Identical reads share a key.
    pub fn query_key(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, encode_pairs(&self.query))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, Error>;
}

/// Flattens a JSON object into multipart text fields. Nulls are skipped,
/// strings are sent verbatim and everything else as its JSON text.
pub fn form_fields(value: &Value) -> Vec<(String, String)> {
    let Value::Object(map) = value else {
        return Vec::new();
    };
    map.iter()
        .filter_map(|(k, v)| match v {
            Value::Null => None,
            Value::String(s) => Some((k.clone(), s.clone())),
            other => Some((k.clone(), other.to_string())),
        })
        .collect()
}

#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        url::Url::parse(base_url)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, Error> {
        debug!("{} {}", request.method, request.query_key());

        let mut builder = self.client.request(request.method.clone(), self.url(&request.path));
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart { fields, file } => {
                let mut form = Form::new();
                for (k, v) in fields {
                    form = form.text(k, v);
                }
                if let Some(f) = file {
                    let part = Part::bytes(f.bytes)
                        .file_name(f.file_name)
                        .mime_str(&f.mime)?;
                    form = form.part(f.field, part);
                }
                builder.multipart(form)
            }
        };

        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        debug!("-> HTTP {} ({} bytes)", status, body.len());
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_key_includes_encoded_query() {
        let req = ApiRequest::get("countries/").with_query(vec![
            ("page".into(), "2".into()),
            ("search".into(), "south africa".into()),
        ]);
        assert_eq!(req.query_key(), "countries/?page=2&search=south%20africa");
        assert_eq!(ApiRequest::get("campaigns/3/").query_key(), "campaigns/3/");
    }

    #[test]
    fn form_fields_skip_nulls() {
        let fields = form_fields(&json!({
            "name": "Free Pizza",
            "probability": 20.5,
            "color": null,
        }));
        assert!(fields.contains(&("name".to_string(), "Free Pizza".to_string())));
        assert!(fields.contains(&("probability".to_string(), "20.5".to_string())));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn transport_rejects_bad_base_url() {
        assert!(matches!(
            ReqwestTransport::new("not a url", Duration::from_secs(1)),
            Err(Error::Url(_))
        ));
    }
}
