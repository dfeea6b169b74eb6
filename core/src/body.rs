//! Request body serialization.
//!
//! Bodies are always sent as JSON text, whatever the endpoint's declared
//! content type. An empty mapping means no body at all.

use crate::error::ServiceError;
use crate::input::Params;

pub fn serialize_body(body: &Params) -> Result<Option<String>, ServiceError> {
    if body.is_empty() {
        return Ok(None);
    }
    serde_json::to_string(body)
        .map(Some)
        .map_err(ServiceError::SerializationError)
}
