use crate::domain::model::TransportFailure;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Where `path` ends up once written, for reporting to the user.
    fn location_of(&self, path: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn request_timeout(&self) -> Duration;
    fn max_in_flight(&self) -> usize;
    fn user_agent(&self) -> &str;
}

#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    pub timeout: Duration,
    pub headers: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind:?}: {message}")]
pub struct TransportError {
    pub kind: TransportFailure,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Outbound GET with redirects already followed; the response is the final hop.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> std::result::Result<FetchResponse, TransportError>;
}
