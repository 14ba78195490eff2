pub mod domain;
pub mod frameworks;
pub mod interface_adapters;
pub mod use_cases;

pub use frameworks::app::{Frontend, run};
pub use frameworks::config::FrontendConfig;
