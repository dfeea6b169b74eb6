//! The network boundary.
//!
//! A `Transport` executes one `HttpRequest` and hands back the raw
//! `HttpResponse`. Status codes are never turned into errors here; only a
//! failed round-trip is.

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::http::{HttpRequest, HttpResponse};

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ServiceError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ServiceError> {
        (**self).send(request).await
    }
}

#[cfg(feature = "reqwest")]
pub use self::reqwest_transport::ReqwestTransport;

#[cfg(feature = "reqwest")]
mod reqwest_transport {
    use std::time::Duration;

    use async_trait::async_trait;
    use reqwest::{Client, ClientBuilder};

    use super::Transport;
    use crate::error::ServiceError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// `Transport` backed by a shared `reqwest::Client`.
    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        client: Client,
    }

    impl ReqwestTransport {
        pub fn new() -> Result<Self, ServiceError> {
            Self::build(client_builder())
        }

        /// Client-level timeout applied to every request.
        pub fn with_timeout(timeout: Duration) -> Result<Self, ServiceError> {
            Self::build(client_builder().timeout(timeout))
        }

        pub fn from_client(client: Client) -> Self {
            Self { client }
        }

        fn build(builder: ClientBuilder) -> Result<Self, ServiceError> {
            let client = builder.build().map_err(ServiceError::transport)?;
            Ok(Self { client })
        }
    }

    fn client_builder() -> ClientBuilder {
        Client::builder().pool_max_idle_per_host(10)
    }

    fn method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Options => reqwest::Method::OPTIONS,
        }
    }

    #[async_trait]
    impl Transport for ReqwestTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ServiceError> {
            let mut builder = self.client.request(method(request.method), &request.url);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await.map_err(ServiceError::transport)?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = response.bytes().await.map_err(ServiceError::transport)?;

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }

}
