use super::{non_empty, BaseRequest, GatewayContext, Signable};
use crate::application::dto::InitializeParams;
use crate::application::response::{self, decode_body, parse_envelope};
use crate::application::validation;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{envelope_key, CertificationProduct};
use crate::infrastructure::config::GatewayConfig;
use crate::ports::GatewayTransport;
use serde::Serialize;

/// 芝麻认证产品码
pub const ZHIMA_PRODUCT_CODE: &str = "w1010100000000002978";

const IDENTITY_TYPE: &str = "CERT_INFO";
const CERT_TYPE: &str = "IDENTITY_CARD";

#[derive(Serialize)]
struct IdentityParam<'a> {
    identity_type: &'static str,
    cert_type: &'static str,
    cert_name: &'a str,
    cert_no: &'a str,
}

#[derive(Serialize)]
struct MerchantConfig<'a> {
    return_url: &'a str,
}

#[derive(Serialize)]
#[serde(untagged)]
enum InitializeBizContent<'a> {
    AlipayOpen {
        outer_order_no: &'a str,
        biz_code: &'a str,
        identity_param: IdentityParam<'a>,
        #[serde(skip_serializing_if = "Option::is_none")]
        merchant_config: Option<MerchantConfig<'a>>,
    },
    Zhima {
        transaction_id: &'a str,
        product_code: &'static str,
        biz_code: &'a str,
        identity_param: IdentityParam<'a>,
    },
}

/// 初始化操作
pub struct InitializeOperation {
    product: CertificationProduct,
    params: InitializeParams,
}

impl Signable for InitializeOperation {
    fn method(&self) -> &'static str {
        self.product.initialize_method()
    }

    fn biz_content<'a>(&'a self, config: &'a GatewayConfig) -> impl Serialize + 'a {
        let identity_param = IdentityParam {
            identity_type: IDENTITY_TYPE,
            cert_type: CERT_TYPE,
            cert_name: &self.params.cert_name,
            cert_no: &self.params.cert_no,
        };

        match self.product {
            CertificationProduct::AlipayOpen => InitializeBizContent::AlipayOpen {
                outer_order_no: &self.params.transaction_id,
                biz_code: &config.biz_code,
                identity_param,
                merchant_config: non_empty(&self.params.return_url)
                    .map(|return_url| MerchantConfig { return_url }),
            },
            CertificationProduct::Zhima => InitializeBizContent::Zhima {
                transaction_id: &self.params.transaction_id,
                product_code: ZHIMA_PRODUCT_CODE,
                biz_code: &config.biz_code,
                identity_param,
            },
        }
    }
}

/// 初始化认证请求：Built → Executed
pub struct InitializeRequest {
    base: BaseRequest,
    operation: InitializeOperation,
    response: Option<String>,
}

impl InitializeRequest {
    pub fn new(context: GatewayContext, params: InitializeParams) -> DomainResult<Self> {
        validation::check_initialize_params(&params)?;

        let product = context.product();
        Ok(Self {
            base: BaseRequest::new(context),
            operation: InitializeOperation { product, params },
            response: None,
        })
    }

    /// 带签名查询串的请求地址
    pub fn url_with_params(&mut self) -> DomainResult<String> {
        self.base.signed_url(&self.operation)
    }

    /// 发起请求，响应体缓存后不再重复请求
    pub async fn execute<T>(&mut self, transport: &T) -> DomainResult<&str>
    where
        T: GatewayTransport + ?Sized,
    {
        let body = match self.response.take() {
            Some(body) => body,
            None => {
                let url = self.url_with_params()?;
                let raw = transport.post(&url, &[]).await?;
                decode_body(&raw, &self.base.config().charset)?
            }
        };
        Ok(self.response.insert(body).as_str())
    }

    /// 会话标识：开放认证为 certify_id，芝麻认证为 biz_no
    pub async fn session_id<T>(&mut self, transport: &T) -> DomainResult<String>
    where
        T: GatewayTransport + ?Sized,
    {
        let key = envelope_key(self.operation.method());
        let field = self.operation.product.session_field();

        let raw = self.execute(transport).await?;
        let envelope = parse_envelope(raw, &key)?;

        response::field(&envelope, field)
            .ok_or_else(|| DomainError::InvalidResponse(format!("missing {} in {}", field, key)))
    }
}
