use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

// Synthetic codes used when the backend did not report one.
pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";
pub const LOGIN_FAILED: &str = "LOGIN_FAILED";
pub const SIGNUP_FAILED: &str = "SIGNUP_FAILED";

// Backend code for a missing or expired session.
pub const LOGIN_REQUIRED: &str = "M004";

const REQUEST_FAILED_MESSAGE: &str = "요청에 실패했습니다.";
const NETWORK_ERROR_MESSAGE: &str = "네트워크 오류가 발생했습니다.";
const LOGIN_FAILED_MESSAGE: &str = "로그인에 실패했습니다.";
const SIGNUP_FAILED_MESSAGE: &str = "회원가입에 실패했습니다.";

// One rejected input field, as reported by the backend validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    #[serde(default)]
    pub value: Option<Value>,
    pub reason: String,
}

// Shape-normalized failure handed to UI code. `code` is always set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedError {
    pub message: String,
    // 0 when the backend left it out; the classifier fills in the HTTP status.
    #[serde(default)]
    pub status: u16,
    pub code: String,
    #[serde(
        default,
        rename = "errors",
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub field_errors: Vec<FieldError>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<FieldError>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<FieldError>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl NormalizedError {
    pub fn new(message: impl Into<String>, status: u16, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status,
            code: code.into(),
            field_errors: Vec::new(),
        }
    }

    pub fn with_field_errors(mut self, field_errors: Vec<FieldError>) -> Self {
        self.field_errors = field_errors;
        self
    }

    // Backend answered with a non-2xx status but no structured error body.
    pub fn http_status(status: u16) -> Self {
        Self::new(REQUEST_FAILED_MESSAGE, status, format!("HTTP_{status}"))
    }

    // No response was received at all.
    pub fn network() -> Self {
        Self::new(NETWORK_ERROR_MESSAGE, 0, NETWORK_ERROR)
    }

    // Local fault unrelated to the transport.
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(message, 500, UNKNOWN_ERROR)
    }

    pub fn login_failed(status: u16) -> Self {
        Self::new(LOGIN_FAILED_MESSAGE, status, LOGIN_FAILED)
    }

    pub fn signup_failed(status: u16) -> Self {
        Self::new(SIGNUP_FAILED_MESSAGE, status, SIGNUP_FAILED)
    }
}

impl fmt::Display for NormalizedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} (status {})", self.code, self.message, self.status)
    }
}

impl std::error::Error for NormalizedError {}

// Raw failure produced by the transport before any normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportFailure {
    // Backend was reached but the call failed: a non-2xx status, or a 2xx
    // envelope reporting `success: false`.
    Response { status: u16, body: Option<String> },
    // Connection refused, reset, timed out: nothing came back.
    NoResponse { message: String },
    // Request could not be built or the response could not be decoded.
    Local { message: String },
}

impl TransportFailure {
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportFailure::Response { status, .. } => Some(*status),
            TransportFailure::NoResponse { .. } | TransportFailure::Local { .. } => None,
        }
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportFailure::Response { status, body } => match body {
                Some(body) => write!(f, "request failed with status {status}: {body}"),
                None => write!(f, "request failed with status {status}"),
            },
            TransportFailure::NoResponse { message } => write!(f, "no response: {message}"),
            TransportFailure::Local { message } => write!(f, "local failure: {message}"),
        }
    }
}

impl std::error::Error for TransportFailure {}
