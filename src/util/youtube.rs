use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;

use crate::constants::{YOUTUBE_API_BASE, YOUTUBE_URN_CHANNELS, channel_ids};
use crate::total::CountSource;

/// Client for the YouTube Data API `channels` endpoint, bound to a fixed set of channel ids
#[derive(Clone)]
pub struct YouTube {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    channel_ids: Vec<String>,
}

impl YouTube {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(YOUTUBE_API_BASE, api_key, channel_ids())
    }

    pub fn with_base_url<I, S>(base_url: impl Into<String>, api_key: impl Into<String>, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            channel_ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Requests the `statistics` part for every tracked channel in a single call.
    ///
    /// # Errors
    ///
    /// Transport failures and non-2xx responses are returned as-is; nothing is retried.
    #[instrument(skip(self), fields(channel_count = self.channel_ids.len()))]
    pub async fn fetch_statistics(&self) -> YoutubeResult<ChannelListResponse> {
        let uri = format!("{}/{}", self.base_url, YOUTUBE_URN_CHANNELS);
        let ids = self.channel_ids.join(",");

        // reqwest errors carry the request url, which includes the api key
        let res = self
            .client
            .get(uri)
            .query(&[
                ("part", "statistics"),
                ("id", ids.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| YoutubeErr::ReqwestError(e.without_url()))?;

        let status = res.status();
        if !status.is_success() {
            tracing::error!(code = %status, "non-2xx response from statistics api");
            return Err(match res.json::<Value>().await {
                Ok(body) => {
                    tracing::error!(body = ?body["error"]["message"], "error message in response");
                    YoutubeErr::FetchErrWithBody { status: status.as_u16(), body }
                }
                Err(_) => YoutubeErr::FetchErr(status.to_string()),
            });
        }

        let body = res
            .json::<ChannelListResponse>()
            .await
            .map_err(|e| YoutubeErr::ReqwestError(e.without_url()))?;

        tracing::debug!(item_count = body.items.len(), "fetched channel statistics");
        Ok(body)
    }
}

#[async_trait]
impl CountSource for YouTube {
    #[instrument(skip(self))]
    async fn total_subscribers(&self) -> YoutubeResult<u64> {
        let total = self.fetch_statistics().await?.total_subscribers();
        tracing::debug!(total, "summed subscriber counts");

        Ok(total)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelListResponse {
    #[serde(default)]
    pub items: Vec<ChannelItem>,
}

impl ChannelListResponse {
    pub fn total_subscribers(&self) -> u64 {
        self.items
            .iter()
            .map(ChannelItem::subscribers)
            .fold(0u64, u64::saturating_add)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub statistics: Option<ChannelStatistics>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatistics {
    /// Reported as a decimal string by the api
    #[serde(default)]
    pub subscriber_count: Option<Value>,
}

impl ChannelItem {
    /// Missing or non-numeric counts contribute nothing
    pub fn subscribers(&self) -> u64 {
        let count = self
            .statistics
            .as_ref()
            .and_then(|stats| stats.subscriber_count.as_ref());

        match count {
            Some(Value::String(s)) => s.trim().parse::<u64>().unwrap_or(0),
            Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
            _ => {
                tracing::warn!(channel = %self.id, "channel reported no subscriber count");
                0
            }
        }
    }
}

pub type YoutubeResult<T> = core::result::Result<T, YoutubeErr>;

#[derive(Debug, Error)]
pub enum YoutubeErr {
    #[error("reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("error during statistics fetch: {0}")]
    FetchErr(String),

    #[error("error (status {status}) during statistics fetch: {}", body["error"]["message"])]
    FetchErrWithBody { status: u16, body: Value },
}
