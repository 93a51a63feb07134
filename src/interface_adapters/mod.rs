// Interface adapters: reqwest transport, endpoint clients and wire shapes.

pub mod clients;
pub mod protocol;
pub mod session_marker;
pub mod state;
pub mod transport;
