//! Endpoint registry: the static list of descriptors an application calls.

use std::collections::HashSet;

use crate::config::ServiceConfig;
use crate::descriptor::{ContentKind, EndpointDescriptor};
use crate::error::ServiceError;
use crate::http::HttpMethod;

/// Ordered, name-unique set of endpoint descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointRegistry {
    endpoints: Vec<EndpointDescriptor>,
}

impl EndpointRegistry {
    /// Fails if two descriptors share a name or a name is blank.
    pub fn new(endpoints: Vec<EndpointDescriptor>) -> Result<Self, ServiceError> {
        let mut seen = HashSet::new();
        for endpoint in &endpoints {
            if endpoint.name.trim().is_empty() {
                return Err(ServiceError::InvalidDescriptor(format!(
                    "endpoint with path `{}` has no name",
                    endpoint.path
                )));
            }
            if !seen.insert(endpoint.name.as_str()) {
                return Err(ServiceError::InvalidDescriptor(format!(
                    "duplicate endpoint name `{}`",
                    endpoint.name
                )));
            }
        }
        Ok(Self { endpoints })
    }

    /// Parse a JSON array of descriptors.
    pub fn from_json(raw: &str) -> Result<Self, ServiceError> {
        let endpoints: Vec<EndpointDescriptor> = serde_json::from_str(raw)
            .map_err(|e| ServiceError::InvalidDescriptor(e.to_string()))?;
        let registry = Self::new(endpoints)?;
        tracing::debug!(endpoints = registry.len(), "loaded endpoint registry");
        Ok(registry)
    }

    pub fn get(&self, name: &str) -> Option<&EndpointDescriptor> {
        self.endpoints.iter().find(|e| e.name == name)
    }

    pub fn require(&self, name: &str) -> Result<&EndpointDescriptor, ServiceError> {
        self.get(name)
            .ok_or_else(|| ServiceError::UnknownEndpoint(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &EndpointDescriptor> {
        self.endpoints.iter()
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Point every descriptor at `base_url`.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        for endpoint in &mut self.endpoints {
            endpoint.base_url = base_url.to_string();
        }
        self
    }

    /// The builtin customer API at `config.base_url`.
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::builtin(&config.base_url)
    }

    /// The customer API served by the bundled mock server.
    pub fn builtin(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        let endpoint = |name: &str, path: &str, method| EndpointDescriptor::new(name, base, path, method);

        Self {
            endpoints: vec![
                endpoint("listCustomers", "/api/customers", HttpMethod::Get),
                endpoint("getCustomer", "/api/customers/{customerId}", HttpMethod::Get).authenticated(),
                endpoint("createCustomer", "/api/customers", HttpMethod::Post).authenticated(),
                endpoint("updateCustomer", "/api/customers/{customerId}", HttpMethod::Put).authenticated(),
                endpoint("patchCustomer", "/api/customers/{customerId}", HttpMethod::Patch).authenticated(),
                endpoint("deleteCustomer", "/api/customers/{customerId}", HttpMethod::Delete).authenticated(),
                endpoint("getCustomerAvatar", "/api/customers/{customerId}/avatar", HttpMethod::Get)
                    .authenticated()
                    .accept(ContentKind::Blob),
                endpoint("exportCustomers", "/api/customers/export", HttpMethod::Get)
                    .authenticated()
                    .accept(ContentKind::Text),
                endpoint("getCustomerDocuments", "/api/customers/{customerId}/documents", HttpMethod::Get)
                    .authenticated()
                    .accept(ContentKind::FormData),
                endpoint("getCustomerExample", "/api/customers/{customerId}", HttpMethod::Get)
                    .authenticated()
                    .prefer("example={example}"),
            ],
        }
    }
}

impl<'a> IntoIterator for &'a EndpointRegistry {
    type Item = &'a EndpointDescriptor;
    type IntoIter = std::slice::Iter<'a, EndpointDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.endpoints.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_names_are_unique() {
        let builtin = EndpointRegistry::builtin("http://localhost:3000");
        let rebuilt = EndpointRegistry::new(builtin.iter().cloned().collect()).unwrap();
        assert_eq!(rebuilt.len(), builtin.len());
    }

    #[test]
    fn builtin_trims_trailing_slash() {
        let registry = EndpointRegistry::builtin("http://localhost:3000/");
        assert_eq!(registry.get("listCustomers").unwrap().base_url, "http://localhost:3000");
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let a = EndpointDescriptor::new("a", "http://h", "/a", HttpMethod::Get);
        let err = EndpointRegistry::new(vec![a.clone(), a]).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidDescriptor(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn blank_names_are_rejected() {
        let blank = EndpointDescriptor::new(" ", "http://h", "/a", HttpMethod::Get);
        assert!(EndpointRegistry::new(vec![blank]).is_err());
    }

    #[test]
    fn loads_from_json() {
        let raw = r#"[
            {"name": "status", "baseUrl": "http://h", "path": "/status", "method": "head"},
            {"name": "ping", "baseUrl": "http://h", "path": "/ping", "method": "get", "acceptType": "text"},
            {"name": "save", "baseUrl": "http://h", "path": "/save", "method": "POST", "usesAccessToken": true}
        ]"#;
        let registry = EndpointRegistry::from_json(raw).unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("status").unwrap().method, HttpMethod::Head);
        assert_eq!(registry.get("ping").unwrap().accept_type, ContentKind::Text);
        assert!(registry.get("save").unwrap().uses_access_token);
    }

    #[test]
    fn malformed_json_is_invalid_descriptor() {
        let err = EndpointRegistry::from_json(r#"[{"name": "x"}]"#).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidDescriptor(_)));
    }

    #[test]
    fn require_reports_unknown_names() {
        let registry = EndpointRegistry::default();
        assert!(registry.is_empty());
        let err = registry.require("missing").unwrap_err();
        assert!(matches!(err, ServiceError::UnknownEndpoint(name) if name == "missing"));
    }

    #[test]
    fn with_base_url_rewrites_every_descriptor() {
        let registry = EndpointRegistry::builtin("http://a").with_base_url("http://b/");
        assert!(registry.iter().all(|e| e.base_url == "http://b"));
    }

    #[test]
    fn from_config_uses_configured_base_url() {
        let config = ServiceConfig {
            base_url: "http://configured:9".to_string(),
            ..ServiceConfig::default()
        };
        let registry = EndpointRegistry::from_config(&config);
        assert_eq!(registry.len(), EndpointRegistry::builtin("http://x").len());
        assert!(registry.iter().all(|e| e.base_url == "http://configured:9"));
    }
}
