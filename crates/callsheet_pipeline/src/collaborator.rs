//! HTTP client for the analysis collaborator service.

use crate::extraction::parse_tolerant;
use crate::PipelineConfig;
use callsheet_error::{CallsheetResult, HttpError, PipelineError, PipelineErrorKind};
use callsheet_interface::{AnalysisCollaborator, JobState, JobStatus, SubmitReceipt, TaskType};
use serde_json::json;
use std::time::Duration;
use tokio_retry2::{strategy::jitter, strategy::ExponentialBackoff, Retry, RetryError};
use tracing::{debug, info, instrument, warn};

/// Cap on a single backoff interval while polling.
const MAX_POLL_DELAY: Duration = Duration::from_secs(5);

/// Reqwest-backed client for the collaborator's HTTP surface.
///
/// Endpoints follow the brain-service binding: `POST /analyze/async` to
/// submit, `GET /jobs/{job_id}` to poll, `GET /` as a health probe. Every
/// request carries the configured timeout; a request that outlives it is
/// cancelled when its future drops; nothing keeps running in the
/// background.
#[derive(Debug, Clone)]
pub struct HttpCollaborator {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCollaborator {
    /// Create a client against the configured collaborator URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    #[instrument(skip_all, fields(url = %config.collaborator_url))]
    pub fn new(config: &PipelineConfig) -> CallsheetResult<Self> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::new(format!("failed to build HTTP client: {e}")))?;

        info!("Created collaborator client");
        Ok(Self {
            client,
            base_url: config.collaborator_url.trim_end_matches('/').to_string(),
        })
    }

    /// Check that the collaborator service is up.
    ///
    /// # Errors
    ///
    /// Returns an error when the service is unreachable or answers with
    /// something other than its service-info document.
    #[instrument(skip(self))]
    pub async fn probe(&self) -> CallsheetResult<serde_json::Value> {
        let raw = self
            .client
            .get(&self.base_url)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("health probe failed: {e}")))?
            .text()
            .await
            .map_err(|e| HttpError::new(format!("health probe body unreadable: {e}")))?;
        parse_tolerant(&raw)
    }
}

#[async_trait::async_trait]
impl AnalysisCollaborator for HttpCollaborator {
    #[instrument(skip(self, text, context), fields(task = %task, text_len = text.len()))]
    async fn submit(
        &self,
        text: &str,
        task: TaskType,
        context: &serde_json::Value,
    ) -> CallsheetResult<SubmitReceipt> {
        // Request ids must be unique across concurrently in-flight
        // submissions, so each one gets a fresh UUID.
        let request_id = uuid::Uuid::new_v4().to_string();
        let body = json!({
            "text": text,
            "component": task,
            "context": context,
            "request_id": request_id,
        });

        let raw = self
            .client
            .post(format!("{}/analyze/async", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                PipelineError::new(PipelineErrorKind::CollaboratorUnavailable(e.to_string()))
            })?
            .text()
            .await
            .map_err(|e| {
                PipelineError::new(PipelineErrorKind::CollaboratorUnavailable(e.to_string()))
            })?;

        let receipt: SubmitReceipt = parse_tolerant(&raw)?;
        debug!(job_id = %receipt.job_id, status = %receipt.status, "Submitted analysis task");
        Ok(receipt)
    }

    #[instrument(skip(self))]
    async fn status(&self, job_id: &str) -> CallsheetResult<JobStatus> {
        let raw = self
            .client
            .get(format!("{}/jobs/{}", self.base_url, job_id))
            .send()
            .await
            .map_err(|e| {
                PipelineError::new(PipelineErrorKind::CollaboratorUnavailable(e.to_string()))
            })?
            .text()
            .await
            .map_err(|e| {
                PipelineError::new(PipelineErrorKind::CollaboratorUnavailable(e.to_string()))
            })?;
        parse_tolerant(&raw)
    }

    fn collaborator_name(&self) -> &'static str {
        "brain_service"
    }
}

/// Wait for a submitted job's result.
///
/// A synchronous (`fallback`-status) receipt returns immediately. Anything
/// else is polled with exponential backoff and jitter, bounded by
/// `poll_max_attempts` and by the overall request deadline, never a busy
/// loop. On deadline expiry the in-flight poll is dropped, which cancels
/// the underlying request.
///
/// # Errors
///
/// Returns an error when the job fails, completes without a result, or the
/// deadline expires; the orchestrator maps all of these to the stage's
/// fallback path.
pub async fn await_result<C>(
    collaborator: &C,
    receipt: &SubmitReceipt,
    config: &PipelineConfig,
    task: TaskType,
) -> CallsheetResult<serde_json::Value>
where
    C: AnalysisCollaborator + ?Sized,
{
    if let Some(result) = receipt.result.as_ref().filter(|_| receipt.is_synchronous()) {
        debug!(job_id = %receipt.job_id, "Collaborator answered synchronously");
        return Ok(result.clone());
    }

    let strategy = ExponentialBackoff::from_millis(config.poll_initial_backoff_ms)
        .factor(2)
        .max_delay(MAX_POLL_DELAY)
        .map(jitter)
        .take(config.poll_max_attempts);

    let job_id = receipt.job_id.clone();
    let poll = Retry::spawn(strategy, || {
        let job_id = job_id.clone();
        async move {
            match collaborator.status(&job_id).await {
                Ok(status) => match status.status {
                    JobState::Completed => status.result.ok_or_else(|| {
                        RetryError::Permanent(
                            PipelineError::new(PipelineErrorKind::MissingResult(job_id.clone()))
                                .into(),
                        )
                    }),
                    JobState::Failed => Err(RetryError::Permanent(
                        PipelineError::new(PipelineErrorKind::JobFailed {
                            job_id: job_id.clone(),
                            message: status.error.unwrap_or_else(|| "unknown".to_string()),
                        })
                        .into(),
                    )),
                    JobState::Pending | JobState::Processing => {
                        debug!(job_id = %job_id, state = %status.status, "Job not ready");
                        Err(RetryError::Transient {
                            err: PipelineError::new(PipelineErrorKind::CollaboratorUnavailable(
                                format!("job {job_id} still {}", status.status),
                            ))
                            .into(),
                            retry_after: None,
                        })
                    }
                },
                Err(e) => {
                    warn!(job_id = %job_id, error = %e, "Status poll failed, will retry");
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
            }
        }
    });

    let deadline = Duration::from_secs(config.request_timeout_secs);
    match tokio::time::timeout(deadline, poll).await {
        Ok(result) => result,
        Err(_) => Err(PipelineError::new(PipelineErrorKind::Timeout {
            task: task.to_string(),
            seconds: config.request_timeout_secs,
        })
        .into()),
    }
}
