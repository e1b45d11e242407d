use serde::{Deserialize, Serialize};

/// 初始化认证参数
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InitializeParams {
    /// 姓名
    pub cert_name: String,

    /// 身份证号
    pub cert_no: String,

    /// 商户侧唯一交易号
    pub transaction_id: String,

    /// 认证完成后的回跳地址
    pub return_url: Option<String>,
}

/// 生成认证地址参数
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CertifyParams {
    /// initialize 返回的会话标识（certify_id 或 biz_no）
    pub biz_no: String,

    pub return_url: Option<String>,
}

/// 授权信息查询参数
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthQueryParams {
    /// 支付宝用户ID
    #[serde(alias = "userId")]
    pub user_id: String,
}

/// 互看授权申请参数
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MutualViewParams {
    pub cert_name: String,

    pub cert_no: String,

    pub callback_url: Option<String>,

    /// 透传的业务扩展参数
    pub ext_biz_param: Option<String>,
}

/// 深链响应
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkResponse {
    pub url: String,
}

/// 错误响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: String, message: String) -> Self {
        Self { error, message }
    }
}
