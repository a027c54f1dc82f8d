use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Boxed error returned by transports
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Performs one HTTP request/response exchange.
///
/// Implementations must read the full response body before returning so the
/// underlying connection is released on every path.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(
        &self,
        request: http::Request<Vec<u8>>,
    ) -> Result<http::Response<Vec<u8>>, BoxError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn execute(
        &self,
        request: http::Request<Vec<u8>>,
    ) -> Result<http::Response<Vec<u8>>, BoxError> {
        (**self).execute(request).await
    }
}

/// Default transport backed by `reqwest`
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an existing client (connection pool, proxy settings, TLS roots)
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            timeout: None,
        }
    }

    /// Per-request timeout. Unset means the client's own default applies.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(
        &self,
        request: http::Request<Vec<u8>>,
    ) -> Result<http::Response<Vec<u8>>, BoxError> {
        let mut request = reqwest::Request::try_from(request)?;
        if let Some(timeout) = self.timeout {
            *request.timeout_mut() = Some(timeout);
        }

        let response = self.client.execute(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        let mut builder = http::Response::builder().status(status);
        if let Some(response_headers) = builder.headers_mut() {
            *response_headers = headers;
        }

        Ok(builder.body(body.to_vec())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_is_opt_in() {
        assert_eq!(ReqwestTransport::new().timeout(), None);

        let transport = ReqwestTransport::new().with_timeout(Duration::from_secs(5));
        assert_eq!(transport.timeout(), Some(Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn test_arc_transport_delegates() {
        let mut mock = MockHttpTransport::new();
        mock.expect_execute().times(1).returning(|_| {
            Ok(http::Response::builder()
                .status(204)
                .body(Vec::new())
                .unwrap())
        });

        let shared: Arc<dyn HttpTransport> = Arc::new(mock);
        let request = http::Request::builder()
            .uri("https://auth.example.com/token")
            .body(Vec::new())
            .unwrap();

        let response = shared.execute(request).await.unwrap();
        assert_eq!(response.status(), 204);
    }
}
