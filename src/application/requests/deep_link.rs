use super::{non_empty, BaseRequest, GatewayContext, Signable};
use crate::application::dto::{AuthQueryParams, MutualViewParams};
use crate::application::validation;
use crate::domain::errors::DomainResult;
use crate::infrastructure::config::GatewayConfig;
use serde::Serialize;

pub const AUTH_QUERY_METHOD: &str = "zhima.auth.info.authquery";
pub const MUTUAL_VIEW_APPLY_METHOD: &str = "zhima.customer.auth.mutualview.apply";

/// 互看授权产品码
pub const MUTUAL_VIEW_PRODUCT_CODE: &str = "w1010100001000002181";

const DEEP_LINK_PREFIX: &str = "alipays://platformapi/startapp";

/// 支付宝用户ID身份类型
const USER_ID_IDENTITY_TYPE: &str = "5";
const AUTH_CATEGORY: &str = "C2ConB";
const BIZ_TYPE_SELF: &str = "self";
const CERT_TYPE: &str = "IDENTITY_CARD";

/// 唤起支付宝客户端打开已签名地址的深链
fn deep_link(app_id: &str, signed_url: &str) -> String {
    format!(
        "{}?appId={}&url={}",
        DEEP_LINK_PREFIX,
        app_id,
        urlencoding::encode(signed_url)
    )
}

#[derive(Serialize)]
struct UserIdentityParam<'a> {
    #[serde(rename = "userId")]
    user_id: &'a str,
}

#[derive(Serialize)]
struct AuthQueryBizContent<'a> {
    identity_type: &'static str,
    identity_param: UserIdentityParam<'a>,
    auth_category: &'static str,
}

/// 授权信息查询操作
pub struct AuthQueryOperation {
    params: AuthQueryParams,
}

impl Signable for AuthQueryOperation {
    fn method(&self) -> &'static str {
        AUTH_QUERY_METHOD
    }

    fn biz_content<'a>(&'a self, _config: &'a GatewayConfig) -> impl Serialize + 'a {
        AuthQueryBizContent {
            identity_type: USER_ID_IDENTITY_TYPE,
            identity_param: UserIdentityParam {
                user_id: &self.params.user_id,
            },
            auth_category: AUTH_CATEGORY,
        }
    }
}

/// 授权信息查询深链生成器
pub struct AuthQueryRequest {
    base: BaseRequest,
    operation: AuthQueryOperation,
}

impl AuthQueryRequest {
    pub fn new(context: GatewayContext, params: AuthQueryParams) -> DomainResult<Self> {
        validation::check_auth_query_params(&params)?;

        Ok(Self {
            base: BaseRequest::new(context),
            operation: AuthQueryOperation { params },
        })
    }

    pub fn generate_url(&mut self) -> DomainResult<String> {
        let signed_url = self.base.signed_url(&self.operation)?;
        Ok(deep_link(&self.base.config().deep_link_app_id, &signed_url))
    }

    /// 同 [`Self::generate_url`]，不发起网络请求
    pub fn execute(&mut self) -> DomainResult<String> {
        self.generate_url()
    }
}

#[derive(Serialize)]
struct ProductParam {
    #[serde(rename = "productCode")]
    product_code: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CertIdentityParam<'a> {
    cert_type: &'static str,
    name: &'a str,
    cert_no: &'a str,
}

#[derive(Serialize)]
struct MutualViewBizContent<'a> {
    product_param: ProductParam,
    biz_type: &'static str,
    identity_param: CertIdentityParam<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ext_biz_param: Option<&'a str>,
}

/// 互看授权申请操作
pub struct MutualViewApplyOperation {
    params: MutualViewParams,
}

impl Signable for MutualViewApplyOperation {
    fn method(&self) -> &'static str {
        MUTUAL_VIEW_APPLY_METHOD
    }

    fn biz_content<'a>(&'a self, _config: &'a GatewayConfig) -> impl Serialize + 'a {
        MutualViewBizContent {
            product_param: ProductParam {
                product_code: MUTUAL_VIEW_PRODUCT_CODE,
            },
            biz_type: BIZ_TYPE_SELF,
            identity_param: CertIdentityParam {
                cert_type: CERT_TYPE,
                name: &self.params.cert_name,
                cert_no: &self.params.cert_no,
            },
            callback_url: non_empty(&self.params.callback_url),
            ext_biz_param: non_empty(&self.params.ext_biz_param),
        }
    }
}

/// 互看授权申请深链生成器
pub struct MutualViewApplyRequest {
    base: BaseRequest,
    operation: MutualViewApplyOperation,
}

impl MutualViewApplyRequest {
    pub fn new(context: GatewayContext, params: MutualViewParams) -> DomainResult<Self> {
        validation::check_mutual_view_params(&params)?;

        Ok(Self {
            base: BaseRequest::new(context),
            operation: MutualViewApplyOperation { params },
        })
    }

    pub fn generate_url(&mut self) -> DomainResult<String> {
        let signed_url = self.base.signed_url(&self.operation)?;
        Ok(deep_link(&self.base.config().deep_link_app_id, &signed_url))
    }

    /// 同 [`Self::generate_url`]，不发起网络请求
    pub fn execute(&mut self) -> DomainResult<String> {
        self.generate_url()
    }
}
