use serde::Deserialize;
use serde_json::Value;
use std::error::Error;

use crate::domain::{NormalizedError, TransportFailure};

#[derive(Deserialize)]
struct ErrorEnvelope {
    success: bool,
    #[serde(default)]
    error: Option<NormalizedError>,
}

// Normalizes a transport failure. Tiers are checked in order of precision:
// structured body, then bare status, then connectivity, then local fault.
pub fn classify(failure: &TransportFailure) -> NormalizedError {
    match failure {
        TransportFailure::Response { status, body } => body
            .as_deref()
            .and_then(|body| structured_body(*status, body))
            .unwrap_or_else(|| NormalizedError::http_status(*status)),
        TransportFailure::NoResponse { .. } => NormalizedError::network(),
        TransportFailure::Local { message } => NormalizedError::unknown(message.clone()),
    }
}

// Returns the backend's own error when the failure carries one.
pub fn structured(failure: &TransportFailure) -> Option<NormalizedError> {
    match failure {
        TransportFailure::Response {
            status,
            body: Some(body),
        } => structured_body(*status, body),
        _ => None,
    }
}

// Enveloped endpoints wrap the error in `{success: false, error}`; raw-shape
// endpoints send the error object bare. An error without its own status
// takes the HTTP one.
fn structured_body(status: u16, body: &str) -> Option<NormalizedError> {
    let value: Value = serde_json::from_str(body).ok()?;
    let mut error = if value.get("success").is_some() {
        let envelope: ErrorEnvelope = serde_json::from_value(value).ok()?;
        if envelope.success {
            return None;
        }
        envelope.error?
    } else {
        serde_json::from_value::<NormalizedError>(value).ok()?
    };
    if error.status == 0 {
        error.status = status;
    }
    Some(error)
}

// Classifies an arbitrary error value. `None` means there was nothing to
// classify.
pub fn classify_error(error: Option<&(dyn Error + 'static)>) -> Option<NormalizedError> {
    let error = error?;
    if let Some(normalized) = error.downcast_ref::<NormalizedError>() {
        return Some(normalized.clone());
    }
    if let Some(failure) = error.downcast_ref::<TransportFailure>() {
        return Some(classify(failure));
    }
    if let Some(error) = error.downcast_ref::<reqwest::Error>() {
        return Some(classify(&failure_from_reqwest(error)));
    }
    Some(NormalizedError::unknown(error.to_string()))
}

// Knowing about reqwest here is a dependency leak, but it keeps every way a
// call can fail mapped in one place.
pub fn failure_from_reqwest(error: &reqwest::Error) -> TransportFailure {
    if let Some(status) = error.status() {
        return TransportFailure::Response {
            status: status.as_u16(),
            body: None,
        };
    }
    if error.is_builder() || error.is_decode() {
        return TransportFailure::Local {
            message: error.to_string(),
        };
    }
    TransportFailure::NoResponse {
        message: error.to_string(),
    }
}
