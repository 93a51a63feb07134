// Typed wrappers over backend endpoint groups. Domain calls return the raw
// transport failure; callers normalize it when they need to display it.

pub mod accommodations;
pub mod auth;
pub mod wishlists;

pub use accommodations::AccommodationClient;
pub use auth::HttpAuthApi;
pub use wishlists::WishlistClient;
