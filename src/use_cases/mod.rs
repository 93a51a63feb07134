pub mod classify;
pub mod messages;
pub mod session;
#[cfg(test)]
pub(crate) mod test_support;

pub use classify::{classify, classify_error, structured};
pub use messages::{
    ErrorCodeTable, ErrorMessageResolver, is_auth_expired, resolve, resolve_full,
};
pub use session::AuthSessionController;
