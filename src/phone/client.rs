//! PhoneClient - thin HTTP wrapper around the telephony service API
//!
//! Composes URLs from `http://host:port`, applies a per-request timeout,
//! and turns every transport/status/decode failure into a `ClientError`.

use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::error::ClientError;
use crate::models::{
    ActiveCallsResponse, Broadcast, BroadcastsResponse, CallHistoryResponse, CallRecord, Group,
    GroupsResponse,
};

#[derive(Clone)]
pub struct PhoneClient {
    http_client: Client,
    base_url: Url,
}

impl PhoneClient {
    pub fn new(host: &str, port: u16, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = Url::parse(&format!("http://{}:{}", host, port))
            .map_err(|e| ClientError::Transport(format!("Invalid base URL: {}", e)))?;

        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Transport("Base URL cannot carry a path".to_string()))?
            .clear()
            .extend(segments);
        Ok(url)
    }

    /// GET and decode a JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let url = self.url(segments)?;
        tracing::debug!("[PhoneClient] GET {}", url);

        let resp = self.http_client.get(url).query(query).send().await?;
        decode(resp).await
    }

    /// POST a JSON body and decode the JSON reply
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ClientError> {
        let url = self.url(segments)?;
        tracing::debug!("[PhoneClient] POST {}", url);

        let resp = self.http_client.post(url).json(body).send().await?;
        decode(resp).await
    }

    /// POST without a body; only the status matters
    pub async fn post_empty(&self, segments: &[&str]) -> Result<(), ClientError> {
        let url = self.url(segments)?;
        tracing::debug!("[PhoneClient] POST {}", url);

        let resp = self.http_client.post(url).send().await?;
        ensure_success(&resp)
    }

    /// `GET /health`; Ok when the service answers 2xx
    pub async fn check_health(&self) -> Result<(), ClientError> {
        let url = self.url(&["health"])?;
        let resp = self.http_client.get(url).send().await?;
        ensure_success(&resp)
    }

    pub async fn active_calls(&self) -> Result<Vec<CallRecord>, ClientError> {
        let resp: ActiveCallsResponse = self.get_json(&["api", "calls", "active"], &[]).await?;
        Ok(resp.active_calls)
    }

    pub async fn call_history(&self, limit: u32) -> Result<Vec<CallRecord>, ClientError> {
        let resp: CallHistoryResponse = self
            .get_json(&["api", "call_history"], &[("limit", limit.to_string())])
            .await?;
        Ok(resp.calls)
    }

    pub async fn groups(&self) -> Result<Vec<Group>, ClientError> {
        let resp: GroupsResponse = self.get_json(&["api", "groups"], &[]).await?;
        Ok(resp.groups)
    }

    pub async fn broadcasts(&self) -> Result<Vec<Broadcast>, ClientError> {
        let resp: BroadcastsResponse = self.get_json(&["api", "broadcasts"], &[]).await?;
        Ok(resp.broadcasts)
    }
}

fn ensure_success(resp: &reqwest::Response) -> Result<(), ClientError> {
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(ClientError::Status(status.as_u16()))
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    ensure_success(&resp)?;

    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}
