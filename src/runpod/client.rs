use super::types::*;
use crate::{
    Error, Result,
    config::{CallMode, RunpodConfig},
};
use async_trait::async_trait;
use tracing::{debug, info, warn};

#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn submit(&self, request: RunpodRequest) -> Result<UpstreamResponse>;
}

pub struct RunpodClient {
    http: reqwest::Client,
    config: RunpodConfig,
}

impl RunpodClient {
    pub fn new(config: RunpodConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self { http, config })
    }

    /// Builds a client only when both the endpoint id and the API key are set.
    pub fn from_config(config: &RunpodConfig) -> Result<Option<Self>> {
        if !config.is_configured() {
            warn!("Runpod endpoint or API key missing, inference calls will be rejected");
            return Ok(None);
        }
        Self::new(config.clone()).map(Some)
    }

    async fn post(&self, url: &str, request: &RunpodRequest) -> Result<UpstreamResponse> {
        debug!("Posting {} request to {}", request.mode(), url);

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(Error::from_upstream)?;

        UpstreamResponse::read(response).await
    }

    async fn poll(&self, job_id: &str) -> Result<UpstreamResponse> {
        let url = self.config.status_url(job_id);

        for attempt in 1..=self.config.max_poll_attempts {
            tokio::time::sleep(self.config.poll_interval()).await;

            let response = self
                .http
                .get(&url)
                .bearer_auth(&self.config.api_key)
                .send()
                .await
                .map_err(Error::from_upstream)?;
            let upstream = UpstreamResponse::read(response).await?;

            if !upstream.is_http_success() {
                warn!(
                    job_id,
                    attempt,
                    upstream_status = upstream.status,
                    "Runpod status check failed"
                );
                return Ok(upstream);
            }

            match upstream.job_status() {
                Some(status) if status.is_pending() => {
                    debug!(job_id, attempt, ?status, "Runpod job still pending");
                }
                status => {
                    info!(job_id, attempt, ?status, "Runpod job settled");
                    return Ok(upstream);
                }
            }
        }

        warn!(
            job_id,
            max_poll_attempts = self.config.max_poll_attempts,
            "Gave up waiting for Runpod job"
        );
        Err(Error::RunpodTimeout)
    }
}

#[async_trait]
impl InferenceClient for RunpodClient {
    async fn submit(&self, request: RunpodRequest) -> Result<UpstreamResponse> {
        match self.config.mode {
            CallMode::Sync => {
                let upstream = self.post(&self.config.runsync_url(), &request).await?;
                // runsync hands back a pending job when the handler outlives its wait window
                match upstream.pending_job_id().map(str::to_owned) {
                    Some(job_id) => {
                        debug!(%job_id, "runsync returned before completion, polling");
                        self.poll(&job_id).await
                    }
                    None => Ok(upstream),
                }
            }
            CallMode::Async => {
                let upstream = self.post(&self.config.run_url(), &request).await?;
                if !upstream.is_http_success() {
                    return Ok(upstream);
                }
                let job_id = upstream
                    .job_id()
                    .map(str::to_owned)
                    .ok_or_else(|| Error::runpod_call("Runpod did not return a job id"))?;
                info!(%job_id, "Submitted Runpod job");
                self.poll(&job_id).await
            }
        }
    }
}
