use std::collections::HashMap;
use std::sync::OnceLock;

use crate::domain::NormalizedError;
use crate::domain::errors::LOGIN_REQUIRED;

pub const GENERIC_ERROR_MESSAGE: &str = "오류가 발생했습니다.";

// Domain error code -> user-facing message.
const BUILTIN_MESSAGES: &[(&str, &str)] = &[
    // Members and auth
    ("M001", "이미 사용 중인 이메일입니다."),
    ("M002", "존재하지 않는 회원입니다."),
    ("M003", "비밀번호가 일치하지 않습니다."),
    ("M004", "로그인이 필요합니다."),
    ("M005", "이미 사용 중인 닉네임입니다."),
    // Accommodations
    ("A001", "숙소를 찾을 수 없습니다."),
    ("A002", "해당 숙소에 대한 권한이 없습니다."),
    // Reservations
    ("R001", "예약할 수 없는 날짜입니다."),
    ("R002", "예약을 찾을 수 없습니다."),
    ("R003", "최대 숙박 인원을 초과했습니다."),
    // Payments
    ("P001", "결제 정보를 찾을 수 없습니다."),
    ("P002", "결제 금액이 일치하지 않습니다."),
    // Reviews
    ("RV001", "리뷰를 찾을 수 없습니다."),
    ("RV002", "이미 리뷰를 작성했습니다."),
    // Wishlists
    ("W001", "이미 위시리스트에 추가된 숙소입니다."),
    ("W002", "위시리스트를 찾을 수 없습니다."),
    // Common
    ("C001", "입력값이 올바르지 않습니다."),
    ("C002", "서버 내부 오류가 발생했습니다."),
    // Synthesized on the client
    ("NETWORK_ERROR", "네트워크 연결을 확인해주세요."),
    ("UNKNOWN_ERROR", "알 수 없는 오류가 발생했습니다."),
    ("LOGIN_FAILED", "로그인에 실패했습니다."),
    ("SIGNUP_FAILED", "회원가입에 실패했습니다."),
];

static GLOBAL_TABLE: OnceLock<ErrorCodeTable> = OnceLock::new();

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorCodeTable {
    messages: HashMap<String, String>,
}

impl ErrorCodeTable {
    pub fn builtin() -> Self {
        let messages = BUILTIN_MESSAGES
            .iter()
            .map(|(code, message)| (code.to_string(), message.to_string()))
            .collect();
        Self { messages }
    }

    // Overrides are flat `CODE = "message"` pairs layered on the builtins.
    pub fn from_toml_overrides(source: &str) -> Result<Self, toml::de::Error> {
        let overrides: HashMap<String, String> = toml::from_str(source)?;
        Ok(Self::builtin().with_overrides(overrides))
    }

    pub fn with_overrides(mut self, overrides: HashMap<String, String>) -> Self {
        self.messages.extend(overrides);
        self
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.messages.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    // Freezes `table` as the process-wide table. Fails once the table has been
    // installed or read.
    pub fn install(table: ErrorCodeTable) -> Result<(), ErrorCodeTable> {
        GLOBAL_TABLE.set(table)
    }

    pub fn global() -> &'static ErrorCodeTable {
        GLOBAL_TABLE.get_or_init(Self::builtin)
    }
}

// Maps normalized errors to display strings. Pure and total.
#[derive(Debug, Clone, Copy)]
pub struct ErrorMessageResolver<'a> {
    table: &'a ErrorCodeTable,
}

impl ErrorMessageResolver<'static> {
    pub fn global() -> Self {
        Self::new(ErrorCodeTable::global())
    }
}

impl<'a> ErrorMessageResolver<'a> {
    pub fn new(table: &'a ErrorCodeTable) -> Self {
        Self { table }
    }

    pub fn resolve(&self, code: &str, fallback: Option<&str>) -> String {
        self.table
            .get(code)
            .or(fallback.filter(|message| !message.is_empty()))
            .unwrap_or(GENERIC_ERROR_MESSAGE)
            .to_string()
    }

    // Base message, then one "<field>: <reason>" line per field error.
    pub fn resolve_full(&self, error: &NormalizedError) -> String {
        let mut message = self.resolve(&error.code, Some(&error.message));
        for field_error in &error.field_errors {
            message.push('\n');
            message.push_str(&field_error.field);
            message.push_str(": ");
            message.push_str(&field_error.reason);
        }
        message
    }
}

pub fn resolve(code: &str, fallback: Option<&str>) -> String {
    ErrorMessageResolver::global().resolve(code, fallback)
}

pub fn resolve_full(error: &NormalizedError) -> String {
    ErrorMessageResolver::global().resolve_full(error)
}

// Sole trigger for session invalidation.
pub fn is_auth_expired(error: &NormalizedError) -> bool {
    error.code == LOGIN_REQUIRED || error.status == 401
}
