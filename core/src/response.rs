//! Response decoding and success/error classification.
//!
//! # Design
//! The body is decoded with the strategy selected by the endpoint's accept
//! type, then classified by status: `>= 400` makes the decoded payload the
//! `error`, anything below makes it the `data`. `ServiceOutput` stores the
//! two as a single `Result`, so exactly one side is ever present.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::descriptor::ContentKind;
use crate::error::ServiceError;
use crate::http::HttpResponse;

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
    Blob(Bytes),
    FormData(Vec<FormField>),
}

/// One part of a multipart/form-data body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl FormField {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}

impl Payload {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Payload::Blob(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_form(&self) -> Option<&[FormField]> {
        match self {
            Payload::FormData(fields) => Some(fields),
            _ => None,
        }
    }

    /// First form field with the given name.
    pub fn form_field(&self, name: &str) -> Option<&FormField> {
        self.as_form()?.iter().find(|f| f.name == name)
    }

    /// Deserialize a JSON (or JSON-looking text) payload into `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ServiceError> {
        match self {
            Payload::Json(value) => T::deserialize(value),
            Payload::Text(text) => serde_json::from_str(text),
            Payload::Blob(_) | Payload::FormData(_) => Err(
                <serde_json::Error as serde::de::Error>::custom("payload is not JSON"),
            ),
        }
        .map_err(ServiceError::DeserializationError)
    }
}

/// Decode the response body according to `kind`.
///
/// A JSON body that is empty or only whitespace (e.g. `204 No Content`)
/// decodes to `Payload::Json(Value::Null)` rather than failing. Any other
/// body that is not valid JSON is a `DeserializationError`.
pub async fn decode(kind: ContentKind, response: &HttpResponse) -> Result<Payload, ServiceError> {
    let payload = match kind {
        ContentKind::Json => Payload::Json(decode_json(&response.body)?),
        ContentKind::Text => Payload::Text(String::from_utf8_lossy(&response.body).into_owned()),
        ContentKind::Blob => Payload::Blob(response.body.clone()),
        ContentKind::FormData => Payload::FormData(decode_form_data(response).await?),
    };
    Ok(payload)
}

/// An empty body decodes to `null` (e.g. `204 No Content`).
fn decode_json(body: &Bytes) -> Result<Value, ServiceError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(ServiceError::DeserializationError)
}

async fn decode_form_data(response: &HttpResponse) -> Result<Vec<FormField>, ServiceError> {
    let content_type = response
        .header("content-type")
        .ok_or(ServiceError::MissingBoundary)?;
    let boundary = multer::parse_boundary(content_type).map_err(|_| ServiceError::MissingBoundary)?;

    let body = response.body.clone();
    let stream = futures_util::stream::once(async move { Ok::<Bytes, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(|mime| mime.to_string());
        let data = field.bytes().await?;
        fields.push(FormField {
            name,
            file_name,
            content_type,
            data,
        });
    }
    Ok(fields)
}

/// Result of one service call.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceOutput {
    outcome: Result<Payload, Payload>,
    response: HttpResponse,
}

impl ServiceOutput {
    /// Place `payload` on the data or error side according to the status.
    pub fn classify(payload: Payload, response: HttpResponse) -> Self {
        let outcome = if response.is_error() {
            Err(payload)
        } else {
            Ok(payload)
        };
        Self { outcome, response }
    }

    pub fn data(&self) -> Option<&Payload> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&Payload> {
        self.outcome.as_ref().err()
    }

    pub fn response(&self) -> &HttpResponse {
        &self.response
    }

    pub fn status(&self) -> u16 {
        self.response.status
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// `Ok(data)` or `Err(error)`, dropping the raw response.
    pub fn into_result(self) -> Result<Payload, Payload> {
        self.outcome
    }

    /// `(error, data, response)`.
    pub fn into_parts(self) -> (Option<Payload>, Option<Payload>, HttpResponse) {
        match self.outcome {
            Ok(data) => (None, Some(data), self.response),
            Err(error) => (Some(error), None, self.response),
        }
    }
}

/// Decode then classify.
pub async fn dispatch(kind: ContentKind, response: HttpResponse) -> Result<ServiceOutput, ServiceError> {
    let payload = decode(kind, &response).await?;
    Ok(ServiceOutput::classify(payload, response))
}
