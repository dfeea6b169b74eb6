//! Service factory: turns endpoint descriptors into callable services.
//!
//! # Design
//! `ServiceFactory` holds the injected collaborators (transport, token store)
//! and call policy. `Service` binds them to one descriptor. A call is split
//! the same way as the request/response types: `build_request` is pure
//! (normalize input, render URL, assemble headers, serialize body) and
//! `parse_response` decodes and classifies. `call` runs both around a single
//! `Transport::send`. Services carry no mutable state, so clones and
//! concurrent calls never interfere.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::body::serialize_body;
use crate::config::ServiceConfig;
use crate::descriptor::EndpointDescriptor;
use crate::error::ServiceError;
use crate::headers::{assemble_headers, AuthPolicy};
use crate::http::{HttpRequest, HttpResponse};
use crate::input::{CallInput, PreparedInput};
use crate::registry::EndpointRegistry;
use crate::response::{dispatch, ServiceOutput};
use crate::template::build_url;
use crate::tokens::TokenProvider;
use crate::transport::Transport;

/// Builds `Service`s that share one transport, token store and call policy.
#[derive(Clone)]
pub struct ServiceFactory {
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenProvider>,
    auth_policy: AuthPolicy,
    timeout: Option<Duration>,
}

impl ServiceFactory {
    pub fn new<T, P>(transport: T, tokens: P) -> Self
    where
        T: Transport + 'static,
        P: TokenProvider + 'static,
    {
        Self {
            transport: Arc::new(transport),
            tokens: Arc::new(tokens),
            auth_policy: AuthPolicy::default(),
            timeout: None,
        }
    }

    /// Apply the policy and timeout from `config`.
    pub fn from_config<T, P>(config: &ServiceConfig, transport: T, tokens: P) -> Self
    where
        T: Transport + 'static,
        P: TokenProvider + 'static,
    {
        let factory = Self::new(transport, tokens).with_auth_policy(config.auth_policy);
        match config.timeout {
            Some(timeout) => factory.with_timeout(timeout),
            None => factory,
        }
    }

    pub fn with_auth_policy(mut self, policy: AuthPolicy) -> Self {
        self.auth_policy = policy;
        self
    }

    /// Deadline applied to every `Service::call`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn service(&self, descriptor: EndpointDescriptor) -> Service {
        Service {
            descriptor: Arc::new(descriptor),
            transport: Arc::clone(&self.transport),
            tokens: Arc::clone(&self.tokens),
            auth_policy: self.auth_policy,
            timeout: self.timeout,
        }
    }

    /// One service per registry entry, keyed by endpoint name.
    pub fn services(&self, registry: &EndpointRegistry) -> HashMap<String, Service> {
        registry
            .iter()
            .map(|descriptor| (descriptor.name.clone(), self.service(descriptor.clone())))
            .collect()
    }

    pub fn service_named(&self, registry: &EndpointRegistry, name: &str) -> Result<Service, ServiceError> {
        Ok(self.service(registry.require(name)?.clone()))
    }
}

impl fmt::Debug for ServiceFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceFactory")
            .field("auth_policy", &self.auth_policy)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// A callable bound to one endpoint descriptor.
#[derive(Clone)]
pub struct Service {
    descriptor: Arc<EndpointDescriptor>,
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenProvider>,
    auth_policy: AuthPolicy,
    timeout: Option<Duration>,
}

impl Service {
    pub fn descriptor(&self) -> &EndpointDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Normalize `input` and build the request without sending it.
    pub fn build_request(&self, input: impl Into<CallInput>) -> Result<HttpRequest, ServiceError> {
        let prepared = input.into().prepare(self.descriptor.method);
        self.build_prepared(&prepared)
    }

    fn build_prepared(&self, input: &PreparedInput) -> Result<HttpRequest, ServiceError> {
        let descriptor = self.descriptor.as_ref();
        let url = build_url(&descriptor.base_url, &descriptor.path, &input.query)?;
        let headers = assemble_headers(descriptor, input, self.tokens.as_ref(), self.auth_policy)?;
        let body = serialize_body(&input.body)?;
        Ok(HttpRequest {
            method: descriptor.method,
            url,
            headers,
            body,
        })
    }

    /// Decode `response` with the endpoint's accept type and classify it.
    pub async fn parse_response(&self, response: HttpResponse) -> Result<ServiceOutput, ServiceError> {
        dispatch(self.descriptor.accept_type, response).await
    }

    /// Perform the call. Statuses >= 400 are returned as `Ok` with the error
    /// side set; `Err` means no structured output could be produced.
    ///
    /// Dropping the returned future cancels the call.
    pub async fn call(&self, input: impl Into<CallInput>) -> Result<ServiceOutput, ServiceError> {
        let input = input.into();
        match self.timeout {
            Some(deadline) => self.call_with_deadline(input, deadline).await,
            None => self.execute(input).await,
        }
    }

    /// Like `call`, failing with `ServiceError::Timeout` once `deadline` elapses.
    pub async fn call_with_deadline(
        &self,
        input: impl Into<CallInput>,
        deadline: Duration,
    ) -> Result<ServiceOutput, ServiceError> {
        tokio::time::timeout(deadline, self.execute(input.into()))
            .await
            .map_err(|_| ServiceError::Timeout(deadline))?
    }

    async fn execute(&self, input: CallInput) -> Result<ServiceOutput, ServiceError> {
        tracing::debug!(
            endpoint = %self.descriptor.name,
            method = %self.descriptor.method,
            input = ?input,
            "calling service"
        );
        let request = self.build_request(input)?;
        let response = self.transport.send(request).await?;
        tracing::debug!(
            endpoint = %self.descriptor.name,
            status = response.status,
            "service responded"
        );
        self.parse_response(response).await
    }
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("descriptor", &self.descriptor)
            .field("auth_policy", &self.auth_policy)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
