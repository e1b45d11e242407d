pub mod gateway_config;

pub use gateway_config::{
    GatewayConfig, GatewayConfigBuilder, DEFAULT_DEEP_LINK_APP_ID, DEFAULT_GATEWAY_URL,
};
