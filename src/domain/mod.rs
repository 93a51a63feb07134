pub mod entities;
pub mod errors;
pub mod expiry;
pub mod ports;

// Re-export the domain boundary types and ports.
pub use entities::{
    Accommodation, LoginRequest, MemberProfile, NewWishlist, SessionState, SignupRequest,
    Wishlist,
};
pub use errors::{FieldError, NormalizedError, TransportFailure};
pub use expiry::ExpiryHook;
pub use ports::{AuthApi, SessionInvalidator, SessionMarker};
