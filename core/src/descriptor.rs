//! Static endpoint descriptors.
//!
//! A descriptor is plain data: it says where an endpoint lives and how to
//! talk to it, but carries no behavior of its own. `Service` interprets it.

use serde::{Deserialize, Serialize};

use crate::http::HttpMethod;

/// MIME marker sent as `Content-Type` on GET requests.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Body encoding used for `Accept` / `Content-Type` negotiation.
///
/// For `Accept` it also selects how the response body is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentKind {
    #[default]
    Json,
    Text,
    Blob,
    FormData,
}

impl ContentKind {
    pub fn mime(&self) -> &'static str {
        match self {
            ContentKind::Json => "application/json",
            ContentKind::Text => "text/plain",
            ContentKind::Blob => "application/octet-stream",
            ContentKind::FormData => "multipart/form-data",
        }
    }
}

/// Static description of one HTTP endpoint.
///
/// `path` may contain `{name}` placeholders that are filled from the call's
/// query values. `prefer` is an optional template rendered the same way and
/// sent as the `Prefer` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDescriptor {
    pub name: String,
    pub base_url: String,
    pub path: String,
    pub method: HttpMethod,
    #[serde(default)]
    pub uses_access_token: bool,
    #[serde(default)]
    pub uses_id_token: bool,
    #[serde(default)]
    pub accept_type: ContentKind,
    #[serde(default)]
    pub content_type: ContentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefer: Option<String>,
}

impl EndpointDescriptor {
    /// JSON in, JSON out, no auth, no Prefer template.
    pub fn new(name: &str, base_url: &str, path: &str, method: HttpMethod) -> Self {
        Self {
            name: name.to_string(),
            base_url: base_url.to_string(),
            path: path.to_string(),
            method,
            uses_access_token: false,
            uses_id_token: false,
            accept_type: ContentKind::Json,
            content_type: ContentKind::Json,
            prefer: None,
        }
    }

    pub fn accept(mut self, kind: ContentKind) -> Self {
        self.accept_type = kind;
        self
    }

    pub fn content(mut self, kind: ContentKind) -> Self {
        self.content_type = kind;
        self
    }

    /// Mark the endpoint as authenticated with both the access and id token.
    pub fn authenticated(mut self) -> Self {
        self.uses_access_token = true;
        self.uses_id_token = true;
        self
    }

    pub fn prefer(mut self, template: &str) -> Self {
        self.prefer = Some(template.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_kinds_map_to_mime_strings() {
        assert_eq!(ContentKind::Json.mime(), "application/json");
        assert_eq!(ContentKind::Text.mime(), "text/plain");
        assert_eq!(ContentKind::Blob.mime(), "application/octet-stream");
        assert_eq!(ContentKind::FormData.mime(), "multipart/form-data");
    }

    #[test]
    fn descriptor_deserializes_with_defaults() {
        let raw = r#"{
            "name": "getCustomer",
            "baseUrl": "http://localhost:3000",
            "path": "/api/customers/{customerId}",
            "method": "GET",
            "acceptType": "formData"
        }"#;
        let descriptor: EndpointDescriptor = serde_json::from_str(raw).unwrap();
        assert_eq!(descriptor.method, HttpMethod::Get);
        assert_eq!(descriptor.accept_type, ContentKind::FormData);
        assert_eq!(descriptor.content_type, ContentKind::Json);
        assert!(!descriptor.uses_access_token);
        assert!(descriptor.prefer.is_none());
    }

    #[test]
    fn builder_methods_set_fields() {
        let descriptor = EndpointDescriptor::new("x", "http://h", "/x", HttpMethod::Post)
            .accept(ContentKind::Text)
            .content(ContentKind::Blob)
            .authenticated()
            .prefer("example={example}");
        assert_eq!(descriptor.accept_type, ContentKind::Text);
        assert_eq!(descriptor.content_type, ContentKind::Blob);
        assert!(descriptor.uses_access_token && descriptor.uses_id_token);
        assert_eq!(descriptor.prefer.as_deref(), Some("example={example}"));
    }
}
