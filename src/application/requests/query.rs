use super::{BaseRequest, GatewayContext, SessionBizContent, Signable};
use crate::application::response::{decode_body, parse_envelope};
use crate::application::validation;
use crate::domain::entities::{parse_passed, CertificationResult};
use crate::domain::errors::DomainResult;
use crate::domain::value_objects::{envelope_key, CertificationProduct};
use crate::infrastructure::config::GatewayConfig;
use crate::ports::GatewayTransport;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

/// 查询认证结果操作
pub struct QueryOperation {
    product: CertificationProduct,
    biz_no: String,
}

impl Signable for QueryOperation {
    fn method(&self) -> &'static str {
        self.product.query_method()
    }

    fn biz_content<'a>(&'a self, _config: &'a GatewayConfig) -> impl Serialize + 'a {
        SessionBizContent::new(self.product, &self.biz_no)
    }
}

/// 查询认证结果请求：Built → Executed
///
/// 网关按 `response_charset`（默认 GBK）返回字节，解析 JSON 前必须先转为 UTF-8。
pub struct QueryRequest {
    base: BaseRequest,
    operation: QueryOperation,
    response: Option<String>,
}

impl QueryRequest {
    pub fn new(context: GatewayContext, biz_no: &str) -> DomainResult<Self> {
        validation::check_biz_no(biz_no)?;

        let product = context.product();
        Ok(Self {
            base: BaseRequest::new(context),
            operation: QueryOperation {
                product,
                biz_no: biz_no.to_string(),
            },
            response: None,
        })
    }

    /// 以表单 POST 已签名参数，响应体缓存后不再重复请求
    pub async fn execute<T>(&mut self, transport: &T) -> DomainResult<&str>
    where
        T: GatewayTransport + ?Sized,
    {
        let body = match self.response.take() {
            Some(body) => body,
            None => {
                let signed = self.base.signed(&self.operation)?;
                let raw = transport.post(self.base.url(), &signed.form_pairs()).await?;
                let body = decode_body(&raw, &self.base.config().response_charset)?;
                debug!("Certification query response: {}", body);
                body
            }
        };
        Ok(self.response.insert(body).as_str())
    }

    /// 网关返回的完整结果
    pub async fn payload<T>(&mut self, transport: &T) -> DomainResult<Map<String, Value>>
    where
        T: GatewayTransport + ?Sized,
    {
        let key = envelope_key(self.operation.method());
        let raw = self.execute(transport).await?;
        parse_envelope(raw, &key)
    }

    /// 是否通过认证
    pub async fn passed<T>(&mut self, transport: &T) -> DomainResult<bool>
    where
        T: GatewayTransport + ?Sized,
    {
        let payload = self.payload(transport).await?;
        parse_passed(&payload)
    }

    pub async fn result<T>(&mut self, transport: &T) -> DomainResult<CertificationResult>
    where
        T: GatewayTransport + ?Sized,
    {
        let payload = self.payload(transport).await?;
        CertificationResult::from_payload(self.operation.product, &self.operation.biz_no, payload)
    }
}
