use crate::domain::model::TransportFailure;
use crate::domain::ports::{FetchRequest, FetchResponse, HttpTransport, TransportError};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::Client;

/// reqwest-backed transport. Redirects are followed by the client up to
/// `max_redirects`; timeouts are applied per request.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(max_redirects: usize) -> Result<Self> {
        let client = Client::builder()
            .redirect(Policy::limited(max_redirects))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn fetch(&self, request: &FetchRequest) -> std::result::Result<FetchResponse, TransportError> {
        let mut builder = self.client.get(&request.url).timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        tracing::debug!("{} -> HTTP {} (final url {})", request.url, status, response.url());

        // 逾時也涵蓋讀取 body 的時間
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                map_reqwest_error(e)
            } else {
                TransportError::new(TransportFailure::Body, e.to_string())
            }
        })?;

        Ok(FetchResponse { status, body })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    let kind = if e.is_timeout() {
        TransportFailure::Timeout
    } else if e.is_connect() {
        TransportFailure::Connect
    } else if e.is_redirect() {
        TransportFailure::Redirect
    } else if e.is_body() || e.is_decode() {
        TransportFailure::Body
    } else {
        TransportFailure::Other
    };
    TransportError::new(kind, e.to_string())
}
