//! Generic CRUD verbs against the portal API
//!
//! One HTTP attempt per call, no client-side cache: every read hits the
//! server again. Callers sequence dependent writes themselves.

use crate::config::{resolve_base_url, Scheme, DEFAULT_API_PORT, HEALTH_TIMEOUT};
use crate::error::{ApiError, ApiResult};
use hrportal_core::Resource;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Display;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

pub struct RestClient {
    pub(crate) http: Client,
    base_url: String,
    health_timeout: Duration,
}

impl RestClient {
    /// Client for the API derived from the given page origin on the
    /// default port.
    pub fn new(scheme: Scheme, hostname: &str) -> Self {
        Self::with_base_url(resolve_base_url(scheme, hostname, DEFAULT_API_PORT))
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            health_timeout: HEALTH_TIMEOUT,
        }
    }

    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// GET a collection or record. On any non-2xx the failure names the
    /// endpoint and nothing else; the body is returned as parsed, not
    /// validated.
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        let url = self.url(endpoint);
        debug!("GET {}", url);

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            error!("GET {} returned {}", endpoint, response.status());
            return Err(ApiError::fetch(endpoint));
        }
        Ok(response.json().await?)
    }

    /// POST a new record. Rejections keep the raw response text.
    pub async fn create<B, T>(&self, endpoint: &str, data: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(endpoint);
        debug!("POST {}", url);

        let response = self.http.post(&url).json(data).send().await?;
        if !response.status().is_success() {
            return Err(Self::rejected("POST", endpoint.to_string(), response).await);
        }
        Ok(response.json().await?)
    }

    /// PUT a record by id. Rejections name the id (via the path) and
    /// keep the raw response text.
    pub async fn update<B, T>(&self, endpoint: &str, id: impl Display, data: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let path = format!("{}/{}", endpoint, id);
        let url = self.url(&path);
        debug!("PUT {}", url);

        let response = self.http.put(&url).json(data).send().await?;
        if !response.status().is_success() {
            return Err(Self::rejected("PUT", path, response).await);
        }
        Ok(response.json().await?)
    }

    /// DELETE a record by id. Same failure contract as update.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        id: impl Display,
    ) -> ApiResult<T> {
        let path = format!("{}/{}", endpoint, id);
        let url = self.url(&path);
        debug!("DELETE {}", url);

        let response = self.http.delete(&url).send().await?;
        if !response.status().is_success() {
            return Err(Self::rejected("DELETE", path, response).await);
        }
        Ok(response.json().await?)
    }

    /// Probe `{base}/health`. True only on HTTP 200 within the
    /// configured timeout; any error, timeout, or other status is
    /// false. Never errors.
    pub async fn check_connection(&self) -> bool {
        self.check_connection_with(self.health_timeout, None).await
    }

    /// Health probe with an injectable bound and optional cancellation.
    /// Cancellation resolves to false, like every other failure.
    pub async fn check_connection_with(
        &self,
        timeout: Duration,
        cancel: Option<CancellationToken>,
    ) -> bool {
        let url = self.url("health");
        debug!("GET {} (timeout {:?})", url, timeout);

        let probe = async {
            match tokio::time::timeout(timeout, self.http.get(&url).send()).await {
                Ok(Ok(response)) => response.status() == StatusCode::OK,
                Ok(Err(e)) => {
                    debug!("health probe failed: {}", e);
                    false
                }
                Err(_) => {
                    debug!("health probe timed out after {:?}", timeout);
                    false
                }
            }
        };

        match cancel {
            Some(token) => tokio::select! {
                _ = token.cancelled() => false,
                up = probe => up,
            },
            None => probe.await,
        }
    }

    // ---- typed wrappers over the Resource trait ----

    pub async fn fetch_all<R: Resource>(&self) -> ApiResult<Vec<R>> {
        self.get(R::ENDPOINT).await
    }

    pub async fn fetch_one<R: Resource>(&self, id: impl Display) -> ApiResult<R> {
        self.get(&format!("{}/{}", R::ENDPOINT, id)).await
    }

    pub async fn create_record<R: Resource>(&self, record: &R) -> ApiResult<R> {
        self.create(R::ENDPOINT, record).await
    }

    pub async fn update_record<R: Resource>(&self, id: impl Display, record: &R) -> ApiResult<R> {
        self.update(R::ENDPOINT, id, record).await
    }

    pub async fn delete_record<R: Resource>(
        &self,
        id: impl Display,
    ) -> ApiResult<serde_json::Value> {
        self.delete(R::ENDPOINT, id).await
    }

    async fn rejected(method: &'static str, path: String, response: Response) -> ApiError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        error!("{} {} failed {}: {}", method, path, status, body);
        ApiError::Rejected {
            method,
            path,
            status: status.as_u16(),
            body,
        }
    }
}
