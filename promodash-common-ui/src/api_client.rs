use std::sync::Arc;

use async_trait::async_trait;
use crossbeam_channel::Sender;
use promodash_common::models::{
    Campaign, CampaignAction, CampaignPayload, FormField, FormFieldPayload, ImageUpload,
    ListQuery, MarketingCampaign, Page, Reward, RewardPayload,
};
use promodash_common::traits::{CampaignApi, FormFieldApi, MarketingApi, Resource, ResourceApi, RewardApi};
use promodash_common::{Error, FieldErrors};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::cache::QueryCache;
use crate::http::{form_fields, ApiRequest, ApiResponse, FilePart, HttpTransport};
use crate::session::{AuthEvent, Session};

const LOGIN_PATH: &str = "auth/token/";
const REFRESH_PATH: &str = "auth/token/refresh/";

#[derive(Debug, Deserialize)]
struct TokenPair {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}

/// Collection endpoints nested under a campaign answer either a bare array
/// or the paginated envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Page(Page<T>),
    Plain(Vec<T>),
}

impl<T> ListBody<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            ListBody::Page(p) => p.results,
            ListBody::Plain(v) => v,
        }
    }
}

/// Typed REST client for the dashboard backend.
///
/// Every request carries the current access token. A 401 triggers one refresh
/// and one retry; if that fails too the session is dropped and
/// `AuthEvent::LoginRequired` is emitted. A 403 emits
/// `AuthEvent::PermissionChanged`. Reads go through a `QueryCache` that
/// mutations invalidate by path prefix.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    session: Arc<RwLock<Session>>,
    cache: QueryCache,
    events: Sender<AuthEvent>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn HttpTransport>, events: Sender<AuthEvent>) -> Self {
        Self {
            transport,
            session: Arc::new(RwLock::new(Session::default())),
            cache: QueryCache::new(),
            events,
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub async fn session(&self) -> Session {
        self.session.read().await.clone()
    }

    pub async fn set_session(&self, session: Session) {
        *self.session.write().await = session;
    }

    // ---------------------------------------------------------------- auth

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, Error> {
        let request = ApiRequest::post(LOGIN_PATH).json(json!({
            "email": email,
            "password": password,
        }));
        let resp = self.transport.send(request).await?;
        if !resp.is_success() {
            let reason = match resp.status {
                400 | 401 => FieldErrors::from_server_body(&resp.body).to_string(),
                status => format!("HTTP {status}"),
            };
            warn!("Login for {} rejected: {}", email, reason);
            return Err(Error::Auth(reason));
        }

        let tokens: TokenPair = decode_str(&resp.body)?;
        let session = Session {
            access: Some(tokens.access),
            refresh: tokens.refresh,
            email: Some(email.to_string()),
        };
        *self.session.write().await = session.clone();
        self.cache.clear();
        info!("Logged in as {}", email);
        Ok(session)
    }

    pub async fn logout(&self) {
        *self.session.write().await = Session::default();
        self.cache.clear();
        info!("Logged out");
    }

    async fn refresh_access(&self) -> Result<(), Error> {
        let refresh = self
            .session
            .read()
            .await
            .refresh
            .clone()
            .ok_or(Error::SessionExpired)?;

        let resp = self
            .transport
            .send(ApiRequest::post(REFRESH_PATH).json(json!({ "refresh": refresh })))
            .await?;
        if !resp.is_success() {
            return Err(Error::SessionExpired);
        }

        let tokens: TokenPair = decode_str(&resp.body)?;
        let mut session = self.session.write().await;
        session.access = Some(tokens.access);
        if tokens.refresh.is_some() {
            session.refresh = tokens.refresh;
        }
        info!("Access token refreshed");
        Ok(())
    }

    fn login_required(&self) -> Error {
        warn!("Session could not be refreshed; login required");
        let _ = self.events.send(AuthEvent::LoginRequired);
        Error::SessionExpired
    }

    // ------------------------------------------------------------- plumbing

    /// Sends with the current bearer token, refreshing once on 401.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, Error> {
        let bearer = self.session.read().await.access.clone();
        let resp = self.transport.send(request.clone().with_bearer(bearer)).await?;
        if resp.status != 401 {
            return self.check_status(resp);
        }

        warn!("{} {} answered 401, refreshing token", request.method, request.path);
        if self.refresh_access().await.is_err() {
            *self.session.write().await = Session::default();
            return Err(self.login_required());
        }

        let bearer = self.session.read().await.access.clone();
        let retried = self.transport.send(request.with_bearer(bearer)).await?;
        if retried.status == 401 {
            *self.session.write().await = Session::default();
            return Err(self.login_required());
        }
        self.check_status(retried)
    }

    fn check_status(&self, resp: ApiResponse) -> Result<ApiResponse, Error> {
        match resp.status {
            200..=299 => Ok(resp),
            400 => Err(Error::Validation(FieldErrors::from_server_body(&resp.body))),
            403 => {
                let message = detail_message(&resp.body)
                    .unwrap_or_else(|| "You do not have permission to perform this action".to_string());
                warn!("Permission denied: {}", message);
                let _ = self.events.send(AuthEvent::PermissionChanged(message.clone()));
                Err(Error::Forbidden(message))
            }
            404 => Err(Error::NotFound(
                detail_message(&resp.body).unwrap_or_else(|| "Not found".to_string()),
            )),
            status => {
                let message = detail_message(&resp.body).unwrap_or_else(|| resp.body.trim().to_string());
                error!("HTTP {}: {}", status, message);
                Err(Error::Api { status, message })
            }
        }
    }

    /// Cached GET. Identical path + query pairs are served from the cache
    /// until a mutation invalidates them.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<T, Error> {
        let request = ApiRequest::get(path).with_query(query);
        let key = request.query_key();
        if let Some(hit) = self.cache.get(&key) {
            debug!("cache hit: {}", key);
            return decode_value(hit);
        }

        let resp = self.execute(request).await?;
        let value: Value = serde_json::from_str(&resp.body)?;
        self.cache.put(key, value.clone());
        decode_value(value)
    }

    /// Non-GET request; on success drops cached reads under each prefix.
    pub async fn mutate(&self, request: ApiRequest, invalidate: &[&str]) -> Result<ApiResponse, Error> {
        let method = request.method.clone();
        let path = request.path.clone();
        let resp = self.execute(request).await?;
        for prefix in invalidate {
            self.cache.invalidate_prefix(prefix);
        }
        info!("{} {} -> {}", method, path, resp.status);
        Ok(resp)
    }

    async fn mutate_json<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        invalidate: &[&str],
    ) -> Result<T, Error> {
        let resp = self.mutate(request, invalidate).await?;
        decode_str(&resp.body)
    }

    fn with_payload<P: Serialize>(
        request: ApiRequest,
        payload: &P,
        image: Option<ImageUpload>,
    ) -> Result<ApiRequest, Error> {
        let value = serde_json::to_value(payload)?;
        Ok(match image {
            Some(img) => request.multipart(
                form_fields(&value),
                Some(FilePart {
                    field: "image".to_string(),
                    file_name: img.file_name,
                    mime: img.mime,
                    bytes: img.bytes,
                }),
            ),
            None => request.json(value),
        })
    }
}

fn decode_str<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    let de = &mut serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(de).map_err(|e| Error::Decode {
        path: e.path().to_string(),
        message: e.inner().to_string(),
    })
}

fn decode_value<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    serde_path_to_error::deserialize(value).map_err(|e| Error::Decode {
        path: e.path().to_string(),
        message: e.inner().to_string(),
    })
}

/// `detail` from a DRF-style error body, if there is one.
fn detail_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("detail").and_then(|d| d.as_str()).map(str::to_string)
}

/// The resource's own collection plus every collection that embeds it.
fn invalidation_set<R: Resource>() -> Vec<&'static str> {
    std::iter::once(R::PATH).chain(R::DEPENDENTS.iter().copied()).collect()
}

fn rewards_path(campaign_id: i64) -> String {
    format!("campaigns/{campaign_id}/rewards/")
}

fn form_fields_path(campaign_id: i64) -> String {
    format!("campaigns/{campaign_id}/form-fields/")
}

#[async_trait]
impl ResourceApi for ApiClient {
    async fn list_page<R: Resource>(&self, query: &ListQuery) -> Result<Page<R>, Error> {
        self.get_json(R::PATH, query.pairs()).await
    }

    async fn fetch<R: Resource>(&self, id: i64) -> Result<R, Error> {
        self.get_json(&R::item_path(id), Vec::new()).await
    }

    async fn create<R: Resource>(&self, draft: &R::Draft) -> Result<R, Error> {
        let request = ApiRequest::post(R::PATH).json(serde_json::to_value(draft)?);
        self.mutate_json(request, &invalidation_set::<R>()).await
    }

    async fn update<R: Resource>(&self, id: i64, draft: &R::Draft) -> Result<R, Error> {
        let request = ApiRequest::patch(R::item_path(id)).json(serde_json::to_value(draft)?);
        self.mutate_json(request, &invalidation_set::<R>()).await
    }

    async fn delete<R: Resource>(&self, id: i64) -> Result<(), Error> {
        self.mutate(ApiRequest::delete(R::item_path(id)), &invalidation_set::<R>()).await?;
        Ok(())
    }

    fn evict_page<R: Resource>(&self, query: &ListQuery) {
        let key = ApiRequest::get(R::PATH).with_query(query.pairs()).query_key();
        if self.cache.remove(&key) {
            debug!("evicted cached read: {}", key);
        }
    }
}

#[async_trait]
impl CampaignApi for ApiClient {
    async fn get_campaign(&self, campaign_id: i64) -> Result<Campaign, Error> {
        self.fetch::<Campaign>(campaign_id).await
    }

    async fn create_campaign(&self, payload: &CampaignPayload) -> Result<Campaign, Error> {
        self.create::<Campaign>(payload).await
    }

    async fn update_campaign(&self, campaign_id: i64, payload: &CampaignPayload) -> Result<Campaign, Error> {
        self.update::<Campaign>(campaign_id, payload).await
    }

    async fn delete_campaign(&self, campaign_id: i64) -> Result<(), Error> {
        self.delete::<Campaign>(campaign_id).await
    }

    async fn run_campaign_action(&self, campaign_id: i64, action: CampaignAction) -> Result<Campaign, Error> {
        let path = format!("campaigns/{}/{}/", campaign_id, action.path_segment());
        self.mutate_json(ApiRequest::post(path), &[Campaign::PATH]).await
    }
}

#[async_trait]
impl RewardApi for ApiClient {
    async fn list_rewards(&self, campaign_id: i64) -> Result<Vec<Reward>, Error> {
        let body: ListBody<Reward> = self.get_json(&rewards_path(campaign_id), Vec::new()).await?;
        Ok(body.into_vec())
    }

    async fn create_reward(
        &self,
        campaign_id: i64,
        payload: &RewardPayload,
        image: Option<ImageUpload>,
    ) -> Result<Reward, Error> {
        let path = rewards_path(campaign_id);
        let request = Self::with_payload(ApiRequest::post(path.clone()), payload, image)?;
        self.mutate_json(request, &[&path]).await
    }

    async fn update_reward(
        &self,
        campaign_id: i64,
        reward_id: i64,
        payload: &RewardPayload,
        image: Option<ImageUpload>,
    ) -> Result<Reward, Error> {
        let base = rewards_path(campaign_id);
        let request = Self::with_payload(ApiRequest::patch(format!("{base}{reward_id}/")), payload, image)?;
        self.mutate_json(request, &[&base]).await
    }

    async fn delete_reward(&self, campaign_id: i64, reward_id: i64) -> Result<(), Error> {
        let base = rewards_path(campaign_id);
        self.mutate(ApiRequest::delete(format!("{base}{reward_id}/")), &[&base]).await?;
        Ok(())
    }
}

#[async_trait]
impl FormFieldApi for ApiClient {
    async fn list_form_fields(&self, campaign_id: i64) -> Result<Vec<FormField>, Error> {
        let body: ListBody<FormField> = self.get_json(&form_fields_path(campaign_id), Vec::new()).await?;
        let mut fields = body.into_vec();
        fields.sort_by_key(|f| f.order);
        Ok(fields)
    }

    async fn create_form_field(&self, campaign_id: i64, payload: &FormFieldPayload) -> Result<FormField, Error> {
        let path = form_fields_path(campaign_id);
        let request = ApiRequest::post(path.clone()).json(serde_json::to_value(payload)?);
        self.mutate_json(request, &[&path]).await
    }

    async fn update_form_field(
        &self,
        campaign_id: i64,
        field_id: i64,
        payload: &FormFieldPayload,
    ) -> Result<FormField, Error> {
        let base = form_fields_path(campaign_id);
        let request = ApiRequest::patch(format!("{base}{field_id}/")).json(serde_json::to_value(payload)?);
        self.mutate_json(request, &[&base]).await
    }

    async fn delete_form_field(&self, campaign_id: i64, field_id: i64) -> Result<(), Error> {
        let base = form_fields_path(campaign_id);
        self.mutate(ApiRequest::delete(format!("{base}{field_id}/")), &[&base]).await?;
        Ok(())
    }
}

#[async_trait]
impl MarketingApi for ApiClient {
    async fn send_marketing_campaign(&self, campaign_id: i64) -> Result<MarketingCampaign, Error> {
        let path = format!("{}{}/send/", MarketingCampaign::PATH, campaign_id);
        self.mutate_json(ApiRequest::post(path), &[MarketingCampaign::PATH]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{MockHttpTransport, RequestBody};
    use http::Method;
    use crate::session::AuthEvents;
    use mockall::Sequence;
    use promodash_common::models::Country;

    async fn signed_in(transport: MockHttpTransport, events: &AuthEvents) -> ApiClient {
        let client = ApiClient::new(Arc::new(transport), events.sender());
        client
            .set_session(Session {
                access: Some("old-access".into()),
                refresh: Some("refresh-1".into()),
                email: Some("ops@example.com".into()),
            })
            .await;
        client
    }

    #[tokio::test]
    async fn unauthorized_refreshes_then_retries_once() {
        let mut transport = MockHttpTransport::new();
        let mut seq = Sequence::new();
        transport
            .expect_send()
            .withf(|r| r.path == "campaigns/4/rewards/" && r.bearer.as_deref() == Some("old-access"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(ApiResponse::new(401, r#"{"detail":"expired"}"#)));
        transport
            .expect_send()
            .withf(|r| {
                r.path == REFRESH_PATH
                    && r.body == RequestBody::Json(json!({ "refresh": "refresh-1" }))
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(ApiResponse::new(200, r#"{"access":"new-access"}"#)));
        transport
            .expect_send()
            .withf(|r| r.path == "campaigns/4/rewards/" && r.bearer.as_deref() == Some("new-access"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(ApiResponse::new(200, "[]")));

        let events = AuthEvents::new();
        let client = signed_in(transport, &events).await;
        let rewards = client.list_rewards(4).await.unwrap();
        assert!(rewards.is_empty());
        assert_eq!(client.session().await.access.as_deref(), Some("new-access"));
        assert_eq!(client.session().await.refresh.as_deref(), Some("refresh-1"));
        assert!(events.drain().is_empty());
    }

    #[tokio::test]
    async fn second_unauthorized_requires_login() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|r| r.path == REFRESH_PATH)
            .times(1)
            .returning(|_| Ok(ApiResponse::new(200, r#"{"access":"new-access"}"#)));
        transport
            .expect_send()
            .withf(|r| r.path == "countries/")
            .times(2)
            .returning(|_| Ok(ApiResponse::new(401, "")));

        let events = AuthEvents::new();
        let client = signed_in(transport, &events).await;
        let err = client.list_page::<Country>(&ListQuery::default()).await.unwrap_err();
        assert!(matches!(err, Error::SessionExpired));
        assert_eq!(events.drain(), vec![AuthEvent::LoginRequired]);
        assert!(!client.session().await.is_authenticated());
    }

    #[tokio::test]
    async fn forbidden_emits_permission_changed() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Ok(ApiResponse::new(403, r#"{"detail":"Dealer access revoked"}"#)));

        let events = AuthEvents::new();
        let client = signed_in(transport, &events).await;
        let err = client.delete_campaign(9).await.unwrap_err();
        assert!(matches!(err, Error::Forbidden(ref m) if m == "Dealer access revoked"));
        assert_eq!(
            events.drain(),
            vec![AuthEvent::PermissionChanged("Dealer access revoked".into())]
        );
    }

    #[tokio::test]
    async fn bad_request_maps_to_field_errors() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|r| r.method == Method::POST && r.path == "campaigns/2/rewards/")
            .times(1)
            .returning(|_| Ok(ApiResponse::new(400, r#"{"name":["Reward with this name already exists."]}"#)));

        let events = AuthEvents::new();
        let client = signed_in(transport, &events).await;
        let payload = RewardPayload {
            name: "Free Pizza".into(),
            value: "1 pizza".into(),
            probability: 20.0,
            ..RewardPayload::default()
        };
        match client.create_reward(2, &payload, None).await {
            Err(Error::Validation(errors)) => {
                assert_eq!(errors.first("name"), Some("Reward with this name already exists."))
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn reads_are_cached_until_a_mutation_invalidates_them() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|r| r.method == Method::GET && r.path == "campaigns/5/rewards/")
            .times(2)
            .returning(|_| Ok(ApiResponse::new(200, r#"{"count":0,"results":[]}"#)));
        transport
            .expect_send()
            .withf(|r| r.method == Method::DELETE && r.path == "campaigns/5/rewards/3/")
            .times(1)
            .returning(|_| Ok(ApiResponse::new(204, "")));

        let events = AuthEvents::new();
        let client = signed_in(transport, &events).await;
        client.list_rewards(5).await.unwrap();
        client.list_rewards(5).await.unwrap();
        client.delete_reward(5, 3).await.unwrap();
        client.list_rewards(5).await.unwrap();
    }

    #[tokio::test]
    async fn image_uploads_go_out_as_multipart() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|r| match &r.body {
                RequestBody::Multipart { fields, file: Some(f) } => {
                    r.method == Method::PATCH
                        && r.path == "campaigns/1/rewards/8/"
                        && f.field == "image"
                        && f.mime == "image/png"
                        && fields.iter().any(|(k, v)| k == "name" && v == "Mug")
                }
                _ => false,
            })
            .times(1)
            .returning(|_| {
                Ok(ApiResponse::new(
                    200,
                    r#"{"id":8,"name":"Mug","value":"1","probability":"5.00","total_available":10}"#,
                ))
            });

        let events = AuthEvents::new();
        let client = signed_in(transport, &events).await;
        let payload = RewardPayload {
            name: "Mug".into(),
            value: "1".into(),
            probability: 5.0,
            total_available: 10,
            ..RewardPayload::default()
        };
        let reward = client
            .update_reward(1, 8, &payload, Some(ImageUpload::new("mug.png", vec![1, 2, 3])))
            .await
            .unwrap();
        assert_eq!(reward.probability, 5.0);
    }
}
