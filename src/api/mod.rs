// REST client for the awareness platform API

pub mod resources;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::AppConfig;
use crate::error::{ClientError, ClientResult};
use crate::models::{Identity, LoginRequest, LoginResponse};
use crate::session::SessionStore;

/// HTTP client bound to one session store.
///
/// Every request carries `Authorization: Bearer <token>` when the store
/// holds a token. Any 401 clears the store and comes back as
/// `ClientError::Unauthorized` pointing at the login path, whichever call
/// produced it.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    store: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(config: &AppConfig, store: Arc<SessionStore>) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url()?,
            store,
        })
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Authenticate and cache the resulting identity in the session store
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Identity> {
        let request = LoginRequest::new(email, password);
        request.validate()?;

        let builder = self.request(Method::POST, "auth/login")?.json(&request);
        // A 401 here means bad credentials, not an expired session
        let response = self.dispatch(builder, false).await?;
        let body: LoginResponse = decode(response).await?;

        let identity = Identity::from(body);
        self.store.set(&identity)?;
        info!(user_id = identity.user_id(), role = %identity.role(), "logged in");
        Ok(identity)
    }

    pub fn logout(&self) -> ClientResult<()> {
        self.store.clear()?;
        info!("logged out");
        Ok(())
    }

    pub(crate) fn url(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::Config(format!("invalid request path '{path}': {e}")))
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let url = self.url(path)?;
        debug!(%method, %url, "request");

        let mut builder = self.http.request(method, url);
        if let Some(token) = self.store.token()? {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let builder = self.request(Method::GET, path)?;
        decode(self.send(builder).await?).await
    }

    pub(crate) async fn get_json_query<T, Q>(&self, path: &str, query: &Q) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.request(Method::GET, path)?.query(query);
        decode(self.send(builder).await?).await
    }

    pub(crate) async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(method, path)?.json(body);
        decode(self.send(builder).await?).await
    }

    pub(crate) async fn send_form<B, T>(&self, method: Method, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(method, path)?.form(body);
        decode(self.send(builder).await?).await
    }

    pub(crate) async fn delete(&self, path: &str) -> ClientResult<()> {
        let builder = self.request(Method::DELETE, path)?;
        self.send(builder).await?;
        Ok(())
    }

    pub(crate) async fn get_bytes(&self, path: &str) -> ClientResult<Vec<u8>> {
        let builder = self.request(Method::GET, path)?;
        let response = self.send(builder).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn send(&self, builder: RequestBuilder) -> ClientResult<Response> {
        self.dispatch(builder, true).await
    }

    async fn dispatch(&self, builder: RequestBuilder, clear_on_401: bool) -> ClientResult<Response> {
        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED && clear_on_401 {
            warn!(url = %response.url(), "unauthorized response, clearing session");
            self.store.clear()?;
            return Err(ClientError::unauthorized());
        }

        let message = error_message(response).await;
        debug!(status = status.as_u16(), %message, "request failed");
        Err(ClientError::api(status.as_u16(), message))
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ClientError::from)
}

/// Best human-readable message from an error response: the `detail` field
/// when the backend sends one, else the raw body, else the status reason.
async fn error_message(response: Response) -> String {
    let status = response.status();
    let fallback = status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string();

    let text = match response.text().await {
        Ok(text) if !text.trim().is_empty() => text,
        _ => return fallback,
    };

    match serde_json::from_str::<Value>(&text) {
        Ok(body) => detail_message(&body).unwrap_or(text),
        Err(_) => text,
    }
}

pub(crate) fn detail_message(body: &Value) -> Option<String> {
    match body.get("detail")? {
        Value::String(s) => Some(s.clone()),
        // Field validation errors come back as a list of {loc, msg}
        Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .map(str::to_string)
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        other => Some(other.to_string()),
    }
}
