//! Request header assembly: content negotiation, session tokens, Prefer.

use std::str::FromStr;

use crate::descriptor::{EndpointDescriptor, FORM_URLENCODED};
use crate::error::ServiceError;
use crate::http::HttpMethod;
use crate::input::PreparedInput;
use crate::template::render_template;
use crate::tokens::{TokenKey, TokenProvider};

pub const CONTENT_TYPE: &str = "Content-Type";
pub const ACCEPT: &str = "Accept";
pub const AUTHORIZATION: &str = "Authorization";
pub const ID_TOKEN: &str = "x-id-token";
pub const PREFER: &str = "Prefer";

/// When session tokens are attached to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthPolicy {
    /// Attach tokens whenever an access token is stored, whatever the
    /// descriptor declares.
    #[default]
    Ambient,
    /// Attach each token only if the descriptor's matching flag is set.
    Declared,
}

impl FromStr for AuthPolicy {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ambient" => Ok(AuthPolicy::Ambient),
            "declared" => Ok(AuthPolicy::Declared),
            other => Err(ServiceError::Config(format!("unknown auth policy `{other}`"))),
        }
    }
}

/// Build the header list for one call, in wire order.
pub fn assemble_headers(
    descriptor: &EndpointDescriptor,
    input: &PreparedInput,
    tokens: &dyn TokenProvider,
    policy: AuthPolicy,
) -> Result<Vec<(String, String)>, ServiceError> {
    let content_type = match descriptor.method {
        HttpMethod::Get => FORM_URLENCODED,
        _ => descriptor.content_type.mime(),
    };

    let mut headers = vec![
        (CONTENT_TYPE.to_string(), content_type.to_string()),
        (ACCEPT.to_string(), descriptor.accept_type.mime().to_string()),
    ];

    if let Some(access) = tokens.get(TokenKey::AccessToken) {
        let (send_access, send_id) = match policy {
            AuthPolicy::Ambient => (true, true),
            AuthPolicy::Declared => (descriptor.uses_access_token, descriptor.uses_id_token),
        };
        if send_access {
            headers.push((AUTHORIZATION.to_string(), format!("Bearer {access}")));
        }
        if send_id {
            if let Some(id) = tokens.get(TokenKey::IdToken) {
                headers.push((ID_TOKEN.to_string(), id));
            }
        }
    }

    if let Some(template) = &descriptor.prefer {
        headers.push((PREFER.to_string(), render_template(template, &input.query)?));
    }

    Ok(headers)
}
