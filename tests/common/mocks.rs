use async_trait::async_trait;
use peti_backend::{
    Error, Result,
    runpod::{InferenceClient, RunpodRequest, UpstreamResponse},
};
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub enum MockFailure {
    Timeout,
    CallFailed(String),
}

/// Mock inference client that replays canned upstream responses
#[derive(Debug, Default)]
pub struct MockInferenceClient {
    pub responses: Mutex<Vec<UpstreamResponse>>,
    pub requests: Mutex<Vec<RunpodRequest>>,
    pub failure: Option<MockFailure>,
}

impl MockInferenceClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, response: UpstreamResponse) -> Self {
        self.responses.lock().unwrap().push(response);
        self
    }

    pub fn with_failure(mut self, failure: MockFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn get_requests(&self) -> Vec<RunpodRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceClient for MockInferenceClient {
    async fn submit(&self, request: RunpodRequest) -> Result<UpstreamResponse> {
        self.requests.lock().unwrap().push(request);

        match &self.failure {
            Some(MockFailure::Timeout) => return Err(Error::RunpodTimeout),
            Some(MockFailure::CallFailed(msg)) => return Err(Error::runpod_call(msg.clone())),
            None => {}
        }

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(Error::runpod_call("No more mock responses available"));
        }

        Ok(responses.remove(0))
    }
}
