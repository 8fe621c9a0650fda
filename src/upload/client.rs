use crate::config::AppConfig;
use crate::error::FormError;
use crate::upload::types::{Submission, SubmitOutcome};
use log::{error, info};
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::sync::mpsc::Sender;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct ExtractionClient {
    url: String,
    submit_delay: Duration,
    request_timeout: Option<Duration>,
}

impl ExtractionClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            url: config.processing_url(),
            submit_delay: config.submit_delay,
            request_timeout: config.request_timeout,
        }
    }

    /// Runs one submission on a worker thread and reports a single outcome.
    pub fn spawn(&self, submission: Submission, outcome_sender: Sender<SubmitOutcome>) {
        let client = self.clone();

        std::thread::spawn(move || {
            let file_name = submission.file.name.clone();
            let customer_name = submission.customer_name.clone();

            let result = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt.block_on(async {
                    tokio::time::sleep(client.submit_delay).await;
                    client.process(&submission).await
                }),
                Err(e) => Err(FormError::Unexpected(format!(
                    "Failed to start request runtime: {}",
                    e
                ))),
            };

            outcome_sender
                .send(SubmitOutcome {
                    file_name,
                    customer_name,
                    result,
                })
                .unwrap_or_default();
        });
    }

    pub async fn process(&self, submission: &Submission) -> Result<Value, FormError> {
        info!(
            "Sending '{}' ({} bytes) for customer '{}' to {}",
            submission.file.name,
            submission.file.bytes.len(),
            submission.customer_name,
            self.url
        );

        let mut file_part =
            Part::bytes(submission.file.bytes.clone()).file_name(submission.file.name.clone());
        if let Some(mime) = &submission.file.mime {
            file_part = file_part.mime_str(mime)?;
        }

        let form = Form::new()
            .part("file", file_part)
            .text("customer_name", submission.customer_name.clone());

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let response = client
            .post(&self.url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!("Request to {} failed: {}", self.url, e);
                FormError::Request(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = status.canonical_reason().unwrap_or_default().to_string();
            error!("Extraction endpoint responded with {}", status);
            return Err(FormError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body).map_err(|e| {
            error!("Extraction response is not valid JSON: {}", e);
            FormError::Unexpected(format!("Response is not valid JSON: {}", e))
        })?;

        if !value.is_object() {
            return Err(FormError::Unexpected(
                "Response JSON is not an object".to_string(),
            ));
        }

        info!("Extraction finished for '{}'", submission.file.name);
        Ok(value)
    }
}
