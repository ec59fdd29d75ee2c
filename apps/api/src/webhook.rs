//! Outbound webhook delivery.
//!
//! Delivery is best-effort: a network failure, timeout, or unexpected
//! status is reported to the caller and never discards the record already
//! computed.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::{info, warn};

use crate::analysis::report::ResultRecord;

pub const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);
/// Statuses the receiving side may answer with on success.
const ACCEPTED_STATUSES: [u16; 3] = [200, 201, 204];

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook returned status {0}")]
    Status(u16),
}

#[derive(Clone)]
pub struct WebhookClient {
    client: Client,
    shared_secret: String,
}

impl WebhookClient {
    pub fn new(shared_secret: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(WEBHOOK_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            shared_secret,
        }
    }

    /// POSTs the serialized record to `url` as JSON, carrying the shared
    /// secret so the receiving side can authenticate the caller.
    pub async fn deliver(&self, url: &str, record: &ResultRecord) -> Result<(), WebhookError> {
        let response = self
            .client
            .post(url)
            .header(WEBHOOK_SECRET_HEADER, &self.shared_secret)
            .json(record)
            .send()
            .await?;

        let status = response.status().as_u16();
        if ACCEPTED_STATUSES.contains(&status) {
            info!("webhook delivered to {url} ({status})");
            Ok(())
        } else {
            warn!("webhook to {url} rejected with status {status}");
            Err(WebhookError::Status(status))
        }
    }
}
