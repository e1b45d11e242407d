//! 网关请求
//!
//! 每个操作由一个 [`Signable`] 描述（方法名、biz_content、顶层附加参数），
//! 再由 [`BaseRequest`] 合并公共参数、签名并缓存。
//!
//! 请求对象是单次使用、单一所有者的：参数与响应在首次访问时计算并缓存，
//! 之后不再重算，依赖 `&mut self` 保证不会被并发调用。

pub mod certify;
pub mod deep_link;
pub mod initialize;
pub mod query;

pub use certify::CertifyRequest;
pub use deep_link::{AuthQueryRequest, MutualViewApplyRequest};
pub use initialize::InitializeRequest;
pub use query::QueryRequest;

use crate::application::dto::{AuthQueryParams, CertifyParams, InitializeParams, MutualViewParams};
use crate::domain::errors::DomainResult;
use crate::domain::parameters::{SignableParameters, SignedRequest};
use crate::domain::value_objects::CertificationProduct;
use crate::infrastructure::config::GatewayConfig;
use crate::infrastructure::signing::RequestSigner;
use crate::ports::Clock;
use serde::Serialize;
use std::sync::Arc;

/// 每个请求都携带的公共参数键
pub const BASE_PARAM_KEYS: [&str; 5] = ["app_id", "charset", "format", "sign_type", "version"];

/// 可签名的网关操作
pub trait Signable {
    /// 远程方法名
    fn method(&self) -> &'static str;

    /// 业务参数，序列化后作为 `biz_content`
    fn biz_content<'a>(&'a self, config: &'a GatewayConfig) -> impl Serialize + 'a;

    /// biz_content 之外的顶层参数
    fn extra_params(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// 请求共享上下文：只读配置、签名器与时钟
#[derive(Clone)]
pub struct GatewayContext {
    config: Arc<GatewayConfig>,
    signer: Arc<RequestSigner>,
    clock: Arc<dyn Clock>,
}

impl GatewayContext {
    /// 解析配置中的密钥，失败即返回配置错误
    pub fn new(config: Arc<GatewayConfig>, clock: Arc<dyn Clock>) -> DomainResult<Self> {
        let signer = RequestSigner::from_config(&config)?;
        Ok(Self::with_signer(config, Arc::new(signer), clock))
    }

    pub fn with_signer(
        config: Arc<GatewayConfig>,
        signer: Arc<RequestSigner>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            signer,
            clock,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn product(&self) -> CertificationProduct {
        self.config.product
    }

    pub fn initialize(&self, params: InitializeParams) -> DomainResult<InitializeRequest> {
        InitializeRequest::new(self.clone(), params)
    }

    pub fn certify(&self, params: CertifyParams) -> DomainResult<CertifyRequest> {
        CertifyRequest::new(self.clone(), params)
    }

    pub fn query(&self, biz_no: &str) -> DomainResult<QueryRequest> {
        QueryRequest::new(self.clone(), biz_no)
    }

    pub fn auth_query(&self, params: AuthQueryParams) -> DomainResult<AuthQueryRequest> {
        AuthQueryRequest::new(self.clone(), params)
    }

    pub fn mutual_view_apply(
        &self,
        params: MutualViewParams,
    ) -> DomainResult<MutualViewApplyRequest> {
        MutualViewApplyRequest::new(self.clone(), params)
    }
}

/// 各请求共用的参数合并与签名逻辑
pub struct BaseRequest {
    context: GatewayContext,
    params: Option<SignableParameters>,
}

impl BaseRequest {
    pub fn new(context: GatewayContext) -> Self {
        Self {
            context,
            params: None,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        self.context.config()
    }

    /// 网关地址
    pub fn url(&self) -> &str {
        &self.context.config.gateway_url
    }

    pub fn base_params(&self) -> SignableParameters {
        let config = self.config();
        let mut params = SignableParameters::new();
        params.insert("app_id", config.app_id.as_str());
        params.insert("charset", config.charset.as_str());
        params.insert("format", config.format.as_str());
        params.insert("sign_type", config.sign_type.to_string());
        params.insert("version", config.version.as_str());
        params
    }

    /// 待签名参数，首次调用时构造并缓存
    pub fn params<S: Signable>(&mut self, operation: &S) -> DomainResult<&SignableParameters> {
        let params = match self.params.take() {
            Some(params) => params,
            None => self.build_params(operation)?,
        };
        Ok(self.params.insert(params))
    }

    pub fn signed<S: Signable>(&mut self, operation: &S) -> DomainResult<SignedRequest> {
        let params = self.params(operation)?.clone();
        let signature = self.context.signer.sign(params.as_map())?;
        Ok(params.into_signed(signature))
    }

    /// 带签名查询串的网关地址
    pub fn signed_url<S: Signable>(&mut self, operation: &S) -> DomainResult<String> {
        let signed = self.signed(operation)?;
        Ok(signed.to_url(self.url()))
    }

    fn build_params<S: Signable>(&self, operation: &S) -> DomainResult<SignableParameters> {
        let config = self.config();
        let timestamp = config.format_timestamp(self.context.clock.now())?;
        let biz_content = serde_json::to_string(&operation.biz_content(config))?;

        let mut params = self.base_params();
        params.insert("method", operation.method());
        params.insert("timestamp", timestamp);
        params.insert("biz_content", biz_content);

        for (key, value) in operation.extra_params() {
            if params.get(key).is_none() {
                params.insert(key, value);
            }
        }

        Ok(params)
    }
}

/// 仅保留非空白的可选值，原值不做修改
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// certify / query 的 biz_content：只有会话标识，字段名随产品线变化
#[derive(Serialize)]
#[serde(untagged)]
pub(crate) enum SessionBizContent<'a> {
    CertifyId { certify_id: &'a str },
    BizNo { biz_no: &'a str },
}

impl<'a> SessionBizContent<'a> {
    pub(crate) fn new(product: CertificationProduct, session_id: &'a str) -> Self {
        match product {
            CertificationProduct::AlipayOpen => SessionBizContent::CertifyId {
                certify_id: session_id,
            },
            CertificationProduct::Zhima => SessionBizContent::BizNo { biz_no: session_id },
        }
    }
}
