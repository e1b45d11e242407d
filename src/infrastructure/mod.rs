pub mod adapters;
pub mod config;
pub mod signing;

pub use adapters::{ReqwestTransport, SystemClock};
pub use config::{GatewayConfig, GatewayConfigBuilder};
pub use signing::RequestSigner;
