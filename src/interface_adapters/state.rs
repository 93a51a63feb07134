use std::sync::Arc;

use crate::interface_adapters::clients::{AccommodationClient, HttpAuthApi, WishlistClient};
use crate::interface_adapters::session_marker::CookieSessionMarker;
use crate::interface_adapters::transport::TransportClient;
use crate::use_cases::AuthSessionController;

pub type SessionController = AuthSessionController<HttpAuthApi, CookieSessionMarker>;

// Everything a UI surface needs, sharing one transport and one session.
#[derive(Clone)]
pub struct AppState {
    pub transport: TransportClient,
    pub session: Arc<SessionController>,
    pub accommodations: AccommodationClient,
    pub wishlists: WishlistClient,
}
