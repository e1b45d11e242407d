//! 芝麻信用身份认证网关客户端
//!
//! 构造并签名 initialize / certify / query 请求，生成授权查询与互看授权的
//! 支付宝客户端深链，并提供一个可选的 HTTP 服务外壳。

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

#[cfg(test)]
mod test_support;

pub use application::{CertificationService, GatewayContext};
pub use domain::{CertificationResult, CertificationSession, DomainError, DomainResult};
pub use infrastructure::{GatewayConfig, ReqwestTransport, SystemClock};
