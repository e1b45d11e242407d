//! 网关响应解析：字符集转换、信封校验与结果提取。

use crate::domain::errors::{DomainError, DomainResult};
use encoding_rs::Encoding;
use serde_json::{Map, Value};

/// 网关业务成功码
pub const SUCCESS_CODE: &str = "10000";

/// 网关在签名、应用等公共错误时返回的信封
const ERROR_ENVELOPE_KEY: &str = "error_response";

/// 按网关字符集把原始字节转换为 UTF-8 文本
pub fn decode_body(raw: &[u8], charset: &str) -> DomainResult<String> {
    let encoding = Encoding::for_label(charset.trim().as_bytes()).ok_or_else(|| {
        DomainError::EncodingError(format!("unknown response charset: {}", charset))
    })?;

    let (text, had_errors) = encoding.decode_without_bom_handling(raw);
    if had_errors {
        return Err(DomainError::EncodingError(format!(
            "response is not valid {}",
            encoding.name()
        )));
    }

    Ok(text.into_owned())
}

/// 解析响应信封，成功时原样返回 `envelope_key` 对应的对象
pub fn parse_envelope(raw: &str, envelope_key: &str) -> DomainResult<Map<String, Value>> {
    let root: Value = serde_json::from_str(raw).map_err(|e| DomainError::GatewayError {
        code: "MALFORMED_RESPONSE".to_string(),
        msg: format!("response is not valid JSON: {}", e),
        sub_code: None,
        sub_msg: None,
    })?;

    if let Some(error) = root.get(ERROR_ENVELOPE_KEY).and_then(Value::as_object) {
        return Err(gateway_error(error));
    }

    let envelope = root
        .get(envelope_key)
        .and_then(Value::as_object)
        .ok_or_else(|| DomainError::GatewayError {
            code: "MISSING_ENVELOPE".to_string(),
            msg: format!("response has no {} object", envelope_key),
            sub_code: None,
            sub_msg: None,
        })?;

    let failed = match field(envelope, "code") {
        Some(code) => code != SUCCESS_CODE,
        None => false,
    };
    if failed || field(envelope, "sub_code").is_some() {
        return Err(gateway_error(envelope));
    }

    Ok(envelope.clone())
}

/// 读取字符串字段，兼容数字形式的返回码
pub fn field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn gateway_error(envelope: &Map<String, Value>) -> DomainError {
    DomainError::GatewayError {
        code: field(envelope, "code").unwrap_or_else(|| "UNKNOWN".to_string()),
        msg: field(envelope, "msg").unwrap_or_default(),
        sub_code: field(envelope, "sub_code"),
        sub_msg: field(envelope, "sub_msg"),
    }
}
