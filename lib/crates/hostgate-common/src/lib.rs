pub mod config;
pub mod types;
pub mod validation;

pub use config::GatewayConfig;
pub use types::*;
pub use validation::{first_token, is_select_query, required, simulated};
