use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{CertificationProduct, SignType};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::sync::Arc;

/// 网关地址
pub const DEFAULT_GATEWAY_URL: &str = "https://openapi.alipay.com/gateway.do";

/// 唤起支付宝客户端时使用的 appId
pub const DEFAULT_DEEP_LINK_APP_ID: &str = "20000067";

/// 请求时间戳格式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 芝麻认证网关配置
///
/// 进程启动时构造一次，之后只读，通过 `Arc` 共享给所有请求。
#[derive(Clone, Deserialize)]
pub struct GatewayConfig {
    /// 应用ID
    pub app_id: String,

    /// 请求字符集
    #[serde(default = "default_charset")]
    pub charset: String,

    /// 响应格式
    #[serde(default = "default_format")]
    pub format: String,

    /// 签名算法
    #[serde(default = "default_sign_type")]
    pub sign_type: SignType,

    /// 接口版本
    #[serde(default = "default_version")]
    pub version: String,

    /// 认证场景码
    #[serde(default = "default_biz_code")]
    pub biz_code: String,

    /// 签名密钥：RSA2 为应用私钥（PEM 或 base64 DER），HMAC 为共享密钥
    #[serde(deserialize_with = "deserialize_key")]
    pub signing_key: Vec<u8>,

    /// 产品线
    #[serde(default)]
    pub product: CertificationProduct,

    /// API基础URL
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,

    /// 时间戳所用时区（相对 UTC 的小时数），网关按东八区校验
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,

    /// 查询接口响应的原始字符集
    #[serde(default = "default_response_charset")]
    pub response_charset: String,

    /// HTTP 超时（秒）
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// 深链唤起的客户端 appId
    #[serde(default = "default_deep_link_app_id")]
    pub deep_link_app_id: String,
}

fn default_charset() -> String {
    "utf-8".to_string()
}

fn default_format() -> String {
    "JSON".to_string()
}

fn default_sign_type() -> SignType {
    SignType::Rsa2
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_biz_code() -> String {
    "FACE".to_string()
}

fn default_gateway_url() -> String {
    DEFAULT_GATEWAY_URL.to_string()
}

fn default_utc_offset_hours() -> i32 {
    8
}

fn default_response_charset() -> String {
    "GBK".to_string()
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_deep_link_app_id() -> String {
    DEFAULT_DEEP_LINK_APP_ID.to_string()
}

fn deserialize_key<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(s.into_bytes())
}

impl GatewayConfig {
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder::default()
    }

    /// 从环境变量加载
    pub fn from_env() -> DomainResult<Arc<Self>> {
        Self::from_lookup(|key| std::env::var(key).ok()).map(Arc::new)
    }

    /// 按 `ZHIMA_*` 键名从任意来源加载，空白值视为未设置
    pub fn from_lookup<F>(lookup: F) -> DomainResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            optional(key)
                .ok_or_else(|| DomainError::ConfigurationError(format!("{} must be set", key)))
        };

        let signing_key = match optional("ZHIMA_PRIVATE_KEY_PATH") {
            Some(path) => std::fs::read(&path).map_err(|e| {
                DomainError::ConfigurationError(format!(
                    "Failed to read private key {}: {}",
                    path, e
                ))
            })?,
            None => required("ZHIMA_PRIVATE_KEY")?.into_bytes(),
        };

        let product = match optional("ZHIMA_PRODUCT").as_deref() {
            None | Some("zhima") => CertificationProduct::Zhima,
            Some("alipay_open") => CertificationProduct::AlipayOpen,
            Some(other) => {
                return Err(DomainError::ConfigurationError(format!(
                    "unknown ZHIMA_PRODUCT: {}",
                    other
                )));
            }
        };

        let mut builder = Self::builder()
            .app_id(required("ZHIMA_APP_ID")?)
            .signing_key(signing_key)
            .product(product);

        if let Some(v) = optional("ZHIMA_CHARSET") {
            builder = builder.charset(v);
        }
        if let Some(v) = optional("ZHIMA_FORMAT") {
            builder = builder.format(v);
        }
        if let Some(v) = optional("ZHIMA_SIGN_TYPE") {
            builder = builder.sign_type(v.parse()?);
        }
        if let Some(v) = optional("ZHIMA_VERSION") {
            builder = builder.version(v);
        }
        if let Some(v) = optional("ZHIMA_BIZ_CODE") {
            builder = builder.biz_code(v);
        }
        if let Some(v) = optional("ZHIMA_GATEWAY_URL") {
            builder = builder.gateway_url(v);
        }
        if let Some(v) = optional("ZHIMA_UTC_OFFSET_HOURS") {
            builder = builder.utc_offset_hours(parse_env("ZHIMA_UTC_OFFSET_HOURS", &v)?);
        }
        if let Some(v) = optional("ZHIMA_RESPONSE_CHARSET") {
            builder = builder.response_charset(v);
        }
        if let Some(v) = optional("ZHIMA_HTTP_TIMEOUT_SECS") {
            builder = builder.http_timeout_secs(parse_env("ZHIMA_HTTP_TIMEOUT_SECS", &v)?);
        }
        if let Some(v) = optional("ZHIMA_DEEP_LINK_APP_ID") {
            builder = builder.deep_link_app_id(v);
        }

        builder.build()
    }

    /// 校验必填项与取值范围
    pub fn validate(&self) -> DomainResult<()> {
        if self.app_id.trim().is_empty() {
            return Err(DomainError::ConfigurationError("app_id is required".to_string()));
        }
        if self.signing_key.is_empty() {
            return Err(DomainError::ConfigurationError(
                "signing_key is required".to_string(),
            ));
        }
        for (name, value) in [
            ("charset", &self.charset),
            ("format", &self.format),
            ("version", &self.version),
            ("gateway_url", &self.gateway_url),
            ("response_charset", &self.response_charset),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::ConfigurationError(format!(
                    "{} must not be empty",
                    name
                )));
            }
        }
        self.utc_offset()?;
        Ok(())
    }

    pub fn utc_offset(&self) -> DomainResult<FixedOffset> {
        self.utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                DomainError::ConfigurationError(format!(
                    "utc_offset_hours out of range: {}",
                    self.utc_offset_hours
                ))
            })
    }

    /// 按网关时区格式化请求时间戳
    pub fn format_timestamp(&self, now: DateTime<Utc>) -> DomainResult<String> {
        let offset = self.utc_offset()?;
        Ok(now.with_timezone(&offset).format(TIMESTAMP_FORMAT).to_string())
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("app_id", &self.app_id)
            .field("charset", &self.charset)
            .field("format", &self.format)
            .field("sign_type", &self.sign_type)
            .field("version", &self.version)
            .field("biz_code", &self.biz_code)
            .field("signing_key", &"<redacted>")
            .field("product", &self.product)
            .field("gateway_url", &self.gateway_url)
            .field("utc_offset_hours", &self.utc_offset_hours)
            .field("response_charset", &self.response_charset)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("deep_link_app_id", &self.deep_link_app_id)
            .finish()
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> DomainResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| DomainError::ConfigurationError(format!("{} is not valid: {}", key, value)))
}

/// [`GatewayConfig`] 构造器
#[derive(Default)]
pub struct GatewayConfigBuilder {
    app_id: Option<String>,
    charset: Option<String>,
    format: Option<String>,
    sign_type: Option<SignType>,
    version: Option<String>,
    biz_code: Option<String>,
    signing_key: Option<Vec<u8>>,
    product: Option<CertificationProduct>,
    gateway_url: Option<String>,
    utc_offset_hours: Option<i32>,
    response_charset: Option<String>,
    http_timeout_secs: Option<u64>,
    deep_link_app_id: Option<String>,
}

impl GatewayConfigBuilder {
    pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn sign_type(mut self, sign_type: SignType) -> Self {
        self.sign_type = Some(sign_type);
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn biz_code(mut self, biz_code: impl Into<String>) -> Self {
        self.biz_code = Some(biz_code.into());
        self
    }

    pub fn signing_key(mut self, signing_key: impl Into<Vec<u8>>) -> Self {
        self.signing_key = Some(signing_key.into());
        self
    }

    pub fn product(mut self, product: CertificationProduct) -> Self {
        self.product = Some(product);
        self
    }

    pub fn gateway_url(mut self, gateway_url: impl Into<String>) -> Self {
        self.gateway_url = Some(gateway_url.into());
        self
    }

    pub fn utc_offset_hours(mut self, hours: i32) -> Self {
        self.utc_offset_hours = Some(hours);
        self
    }

    pub fn response_charset(mut self, charset: impl Into<String>) -> Self {
        self.response_charset = Some(charset.into());
        self
    }

    pub fn http_timeout_secs(mut self, secs: u64) -> Self {
        self.http_timeout_secs = Some(secs);
        self
    }

    pub fn deep_link_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.deep_link_app_id = Some(app_id.into());
        self
    }

    pub fn build(self) -> DomainResult<GatewayConfig> {
        let config = GatewayConfig {
            app_id: self.app_id.unwrap_or_default(),
            charset: self.charset.unwrap_or_else(default_charset),
            format: self.format.unwrap_or_else(default_format),
            sign_type: self.sign_type.unwrap_or_else(default_sign_type),
            version: self.version.unwrap_or_else(default_version),
            biz_code: self.biz_code.unwrap_or_else(default_biz_code),
            signing_key: self.signing_key.unwrap_or_default(),
            product: self.product.unwrap_or_default(),
            gateway_url: self.gateway_url.unwrap_or_else(default_gateway_url),
            utc_offset_hours: self.utc_offset_hours.unwrap_or_else(default_utc_offset_hours),
            response_charset: self.response_charset.unwrap_or_else(default_response_charset),
            http_timeout_secs: self.http_timeout_secs.unwrap_or_else(default_http_timeout_secs),
            deep_link_app_id: self.deep_link_app_id.unwrap_or_else(default_deep_link_app_id),
        };
        config.validate()?;
        Ok(config)
    }
}
