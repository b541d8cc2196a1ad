//! Delivery of the candidate report to an HTTP webhook

use crate::error::ScanError;
use crate::report::CandidateReport;
use tracing::{debug, info};

pub struct WebhookClient {
    url: String,
    client: reqwest::Client,
}

impl WebhookClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(url, reqwest::Client::new())
    }

    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST the report as JSON. Non-2xx responses are errors.
    pub async fn send(&self, report: &CandidateReport) -> Result<(), ScanError> {
        debug!(url = %self.url, candidates = report.candidates.len(), "Sending report to webhook");

        let response = self
            .client
            .post(&self.url)
            .json(report)
            .send()
            .await?
            .error_for_status()?;

        info!(url = %self.url, status = %response.status(), "Webhook accepted report");
        Ok(())
    }
}
