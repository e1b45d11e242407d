use thiserror::Error;

/// 领域层错误类型
#[derive(Error, Debug)]
pub enum DomainError {
    /// 调用方参数校验失败（发生在任何网络请求之前）
    #[error("Validation error: {field}: {reason}")]
    ValidationError { field: String, reason: String },

    /// 配置错误（缺少或无法解析的密钥、应用凭证等）
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// 网关返回业务错误码
    #[error("Gateway error: code={code}, msg={msg}, sub_code={sub_code:?}, sub_msg={sub_msg:?}")]
    GatewayError {
        code: String,
        msg: String,
        sub_code: Option<String>,
        sub_msg: Option<String>,
    },

    /// 网关响应缺少预期字段
    #[error("Invalid gateway response: {0}")]
    InvalidResponse(String),

    /// 传输层错误（非 2xx 状态等）
    #[error("Transport error: {0}")]
    TransportError(String),

    /// HTTP请求错误
    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// 响应字符集转换失败
    #[error("Encoding error: {0}")]
    EncodingError(String),

    /// 序列化错误
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// 加密错误
    #[error("Cryptography error: {0}")]
    CryptoError(String),
}

impl DomainError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        DomainError::ValidationError {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// 是否属于传输层错误，重试策略由调用方决定
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DomainError::TransportError(_) | DomainError::HttpError(_) | DomainError::EncodingError(_)
        )
    }
}

/// 领域结果类型
pub type DomainResult<T> = Result<T, DomainError>;
