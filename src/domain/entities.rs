use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::CertificationProduct;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 一次认证流程的会话：initialize 返回的标识与用户跳转地址
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificationSession {
    /// certify_id 或 biz_no，取决于产品线
    pub session_id: String,

    /// 用户浏览器需要跳转的认证地址
    pub certify_url: String,
}

/// 认证查询结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificationResult {
    /// 会话标识
    pub session_id: String,

    /// 是否通过认证
    pub passed: bool,

    /// 未通过原因
    pub failed_reason: Option<String>,

    /// 网关返回的完整结果
    pub payload: Map<String, Value>,
}

impl CertificationResult {
    /// 从查询响应信封构造
    pub fn from_payload(
        product: CertificationProduct,
        session_id: &str,
        payload: Map<String, Value>,
    ) -> DomainResult<Self> {
        let passed = parse_passed(&payload)?;

        let session_id = payload
            .get(product.session_field())
            .and_then(Value::as_str)
            .unwrap_or(session_id)
            .to_string();

        let failed_reason = payload
            .get("failed_reason")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(String::from);

        Ok(Self {
            session_id,
            passed,
            failed_reason,
            payload,
        })
    }
}

/// 解析 `passed` 字段，网关以字符串 "T"/"F" 或 "true"/"false" 表示
pub fn parse_passed(payload: &Map<String, Value>) -> DomainResult<bool> {
    match payload.get("passed") {
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::String(s)) => match s.as_str() {
            "T" | "true" => Ok(true),
            "F" | "false" => Ok(false),
            other => Err(DomainError::InvalidResponse(format!(
                "unrecognised passed value: {}",
                other
            ))),
        },
        Some(other) => Err(DomainError::InvalidResponse(format!(
            "unrecognised passed value: {}",
            other
        ))),
        None => Err(DomainError::InvalidResponse(
            "missing passed field".to_string(),
        )),
    }
}
