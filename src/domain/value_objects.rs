use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// 签名算法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SignType {
    /// SHA256WithRSA（PKCS#1 v1.5）
    #[serde(rename = "RSA2")]
    Rsa2,
    /// HMAC-SHA256
    #[serde(rename = "HMAC")]
    HmacSha256,
}

impl FromStr for SignType {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RSA2" => Ok(SignType::Rsa2),
            "HMAC" | "HMAC-SHA256" => Ok(SignType::HmacSha256),
            other => Err(DomainError::ConfigurationError(format!(
                "unsupported sign_type: {}",
                other
            ))),
        }
    }
}

/// 反序列化与 [`FromStr`] 接受同一组取值
impl<'de> Deserialize<'de> for SignType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for SignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignType::Rsa2 => write!(f, "RSA2"),
            SignType::HmacSha256 => write!(f, "HMAC"),
        }
    }
}

/// 认证产品线
///
/// 两条产品线的方法名与会话标识字段不同，流程一致：
/// initialize → certify → query。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificationProduct {
    /// alipay.user.certify.open.*，会话标识为 certify_id
    AlipayOpen,
    /// zhima.customer.certification.*，会话标识为 biz_no
    #[default]
    Zhima,
}

impl CertificationProduct {
    pub fn initialize_method(&self) -> &'static str {
        match self {
            CertificationProduct::AlipayOpen => "alipay.user.certify.open.initialize",
            CertificationProduct::Zhima => "zhima.customer.certification.initialize",
        }
    }

    pub fn certify_method(&self) -> &'static str {
        match self {
            CertificationProduct::AlipayOpen => "alipay.user.certify.open.certify",
            CertificationProduct::Zhima => "zhima.customer.certification.certify",
        }
    }

    pub fn query_method(&self) -> &'static str {
        match self {
            CertificationProduct::AlipayOpen => "alipay.user.certify.open.query",
            CertificationProduct::Zhima => "zhima.customer.certification.query",
        }
    }

    /// 响应与 biz_content 中的会话标识字段名
    pub fn session_field(&self) -> &'static str {
        match self {
            CertificationProduct::AlipayOpen => "certify_id",
            CertificationProduct::Zhima => "biz_no",
        }
    }
}

impl fmt::Display for CertificationProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CertificationProduct::AlipayOpen => write!(f, "alipay_open"),
            CertificationProduct::Zhima => write!(f, "zhima"),
        }
    }
}

/// 网关响应信封的键名：方法名中的 '.' 替换为 '_' 后加 `_response`
pub fn envelope_key(method: &str) -> String {
    format!("{}_response", method.replace('.', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_type_from_str() {
        assert_eq!("RSA2".parse::<SignType>().unwrap(), SignType::Rsa2);
        assert_eq!("hmac-sha256".parse::<SignType>().unwrap(), SignType::HmacSha256);
        assert!(matches!(
            "MD5".parse::<SignType>(),
            Err(DomainError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_sign_type_deserialize_accepts_aliases() {
        for raw in [r#""HMAC-SHA256""#, r#""hmac""#, r#""HMAC""#] {
            assert_eq!(serde_json::from_str::<SignType>(raw).unwrap(), SignType::HmacSha256);
        }
        assert_eq!(serde_json::from_str::<SignType>(r#""rsa2""#).unwrap(), SignType::Rsa2);
        assert!(serde_json::from_str::<SignType>(r#""MD5""#).is_err());
        assert_eq!(serde_json::to_string(&SignType::HmacSha256).unwrap(), r#""HMAC""#);
    }

    #[test]
    fn test_envelope_key() {
        assert_eq!(
            envelope_key(CertificationProduct::Zhima.query_method()),
            "zhima_customer_certification_query_response"
        );
        assert_eq!(
            envelope_key(CertificationProduct::AlipayOpen.initialize_method()),
            "alipay_user_certify_open_initialize_response"
        );
    }
}
