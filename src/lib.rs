pub mod domain;
pub mod frameworks;
pub mod interface_adapters;
pub mod use_cases;

pub use frameworks::config::ClientConfig;
pub use frameworks::runtime::{build_state, run};
