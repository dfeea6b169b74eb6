//! Declarative HTTP service factory.
//!
//! # Overview
//! An `EndpointDescriptor` describes one endpoint as plain data: base URL,
//! path template, method, content negotiation, auth flags and an optional
//! `Prefer` header template. `ServiceFactory` turns a descriptor into a
//! `Service` whose `call(input)` performs the request and returns a uniform
//! `ServiceOutput` holding either the decoded `data` or the decoded `error`,
//! plus the raw response.
//!
//! # Design
//! - Descriptors and the `EndpointRegistry` are data; all behavior lives in
//!   `Service`.
//! - The network (`Transport`) and the session token store (`TokenProvider`)
//!   are injected, so request assembly is testable with fakes.
//! - `Service::build_request` / `Service::parse_response` expose both halves
//!   of a call for hosts that execute the HTTP round-trip themselves.
//! - HTTP error statuses are data, not errors. `ServiceError` is reserved for
//!   calls that could not produce an output at all.
//!
//! ```rust,ignore
//! use service_core::{EndpointRegistry, ReqwestTransport, ServiceFactory, SessionTokens};
//!
//! let factory = ServiceFactory::new(ReqwestTransport::new()?, SessionTokens::new());
//! let registry = EndpointRegistry::builtin("http://localhost:3000");
//! let get_customer = factory.service_named(&registry, "getCustomer")?;
//! let output = get_customer.call(serde_json::json!({"customerId": 5})).await?;
//! ```

pub mod body;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod headers;
pub mod http;
pub mod input;
pub mod registry;
pub mod response;
pub mod service;
pub mod template;
pub mod tokens;
pub mod transport;

pub use config::ServiceConfig;
pub use descriptor::{ContentKind, EndpointDescriptor};
pub use error::ServiceError;
pub use headers::AuthPolicy;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use input::{CallInput, Params, PreparedInput};
pub use registry::EndpointRegistry;
pub use response::{FormField, Payload, ServiceOutput};
pub use service::{Service, ServiceFactory};
pub use tokens::{NoTokens, SessionTokens, TokenKey, TokenProvider};
pub use transport::Transport;
#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;
