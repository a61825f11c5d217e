use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::source::BookingSource;
use crate::{Result, UpstreamError};
use frontdesk_core::RecordValue;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = "frontdesk";
const API_VERSION_HEADER: &str = "cal-api-version";

const DEFAULT_CANCEL_REASON: &str = "Cancelled by caller request";
const DEFAULT_RESCHEDULE_REASON: &str = "Caller requested reschedule";

#[derive(Debug, Clone)]
pub struct BookingApiOptions {
    pub base_url: String,
    pub api_key: String,
    pub api_version: String,
    pub page_size: u32,
    pub max_pages: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    Cancelled,
    AlreadyCancelled,
}

/// Client for the scheduling service's booking endpoints.
#[derive(Debug, Clone)]
pub struct BookingApi {
    client: Client,
    base_url: Url,
    api_key: String,
    api_version: String,
    page_size: u32,
    max_pages: u32,
}

impl BookingApi {
    pub fn new(options: BookingApiOptions) -> Result<Self> {
        let base_url = Url::parse(&options.base_url)?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url,
            api_key: options.api_key,
            api_version: options.api_version,
            page_size: options.page_size.max(1),
            max_pages: options.max_pages.max(1),
        })
    }

    /// Reads every booking page sequentially, up to the hard page cap. Any
    /// page failure discards the whole read.
    pub async fn fetch_all(&self) -> Result<Vec<RecordValue>> {
        let url = self.endpoint(&["v1", "bookings"])?;
        let mut all = Vec::new();

        for page in 1..=self.max_pages {
            let response = self
                .client
                .get(url.clone())
                .query(&[
                    ("page", page.to_string()),
                    ("take", self.page_size.to_string()),
                ])
                .bearer_auth(&self.api_key)
                .header(API_VERSION_HEADER, &self.api_version)
                .send()
                .await?;

            let status = response.status();
            let body = response.text().await?;
            if !status.is_success() {
                return Err(UpstreamError::Api {
                    status: status.as_u16(),
                    body,
                });
            }

            let parsed: Value = serde_json::from_str(&body)
                .map_err(|err| UpstreamError::Parse(format!("bookings page {page}: {err}")))?;
            let records = records_from_page(parsed).ok_or_else(|| {
                UpstreamError::Parse(format!("bookings page {page}: no bookings array"))
            })?;

            let count = records.len();
            debug!(page, count, "fetched bookings page");
            all.extend(records);

            if count < self.page_size as usize {
                break;
            }
        }

        Ok(all)
    }

    pub async fn cancel(&self, uid: &str, reason: Option<&str>) -> Result<CancelOutcome> {
        let url = self.endpoint(&["v2", "bookings", uid, "cancel"])?;
        let body = serde_json::json!({
            "cancellationReason": reason.unwrap_or(DEFAULT_CANCEL_REASON),
        });

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .header(API_VERSION_HEADER, &self.api_version)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            debug!(uid, "booking cancelled");
            return Ok(CancelOutcome::Cancelled);
        }

        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|parsed| error_message(&parsed))
            .unwrap_or_else(|| body.clone());
        if is_already_cancelled_message(&message) {
            debug!(uid, "booking was already cancelled");
            return Ok(CancelOutcome::AlreadyCancelled);
        }

        Err(UpstreamError::Api {
            status: status.as_u16(),
            body: message,
        })
    }

    pub async fn reschedule(&self, uid: &str, new_start: &str, reason: Option<&str>) -> Result<()> {
        let url = self.endpoint(&["v2", "bookings", uid, "reschedule"])?;
        let body = serde_json::json!({
            "start": new_start,
            "reschedulingReason": reason.unwrap_or(DEFAULT_RESCHEDULE_REASON),
        });

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .header(API_VERSION_HEADER, &self.api_version)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(uid, new_start, "booking rescheduled");
            return Ok(());
        }

        let body = response.text().await?;
        Err(UpstreamError::Api {
            status: status.as_u16(),
            body,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::Parse("base url cannot be a base".to_string()))?
            .extend(segments);
        Ok(url)
    }
}

impl BookingSource for BookingApi {
    fn fetch_all(&self) -> impl std::future::Future<Output = Result<Vec<RecordValue>>> + Send {
        BookingApi::fetch_all(self)
    }
}

/// Accepts the envelopes the service is known to send: `{"bookings": […]}`,
/// `{"data": […]}`, or a bare array.
fn records_from_page(page: Value) -> Option<Vec<RecordValue>> {
    match page {
        Value::Array(records) => Some(records),
        Value::Object(mut map) => match map.remove("bookings").or_else(|| map.remove("data")) {
            Some(Value::Array(records)) => Some(records),
            _ => None,
        },
        _ => None,
    }
}

fn error_message(body: &Value) -> Option<String> {
    body.pointer("/error/message")
        .or_else(|| body.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn is_already_cancelled_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("already") && (lower.contains("cancelled") || lower.contains("canceled"))
}
