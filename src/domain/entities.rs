use serde::{Deserialize, Serialize};
use std::fmt;

// Shared login status observed by every UI surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub authenticated: bool,
    // True until the first session probe completes.
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            authenticated: false,
            loading: true,
        }
    }
}

#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

// Keep passwords out of logs.
impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Serialize)]
pub struct SignupRequest {
    pub nickname: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_image_url: Option<String>,
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("nickname", &self.nickname)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("thumbnail_image_url", &self.thumbnail_image_url)
            .finish()
    }
}

// Payload of the "who am I" probe. The backend omits fields freely.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MemberProfile {
    pub member_id: Option<u64>,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub thumbnail_image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accommodation {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub price_per_night: Option<u64>,
    #[serde(default)]
    pub max_guests: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Wishlist {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewWishlist {
    pub name: String,
}
