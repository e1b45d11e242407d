use crate::domain::errors::DomainResult;
use async_trait::async_trait;

/// 网关传输端口接口
///
/// 实现方自行负责超时；核心不重试，失败原样返回给调用方。
#[async_trait]
pub trait GatewayTransport: Send + Sync {
    /// 以表单方式 POST，返回原始响应字节（未做字符集转换）
    async fn post(&self, url: &str, form: &[(String, String)]) -> DomainResult<Vec<u8>>;
}
