use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::parameters::canonical_string;
use crate::domain::value_objects::SignType;
use crate::infrastructure::config::GatewayConfig;
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{RandomizedSigner, SignatureEncoding};
use rsa::RsaPrivateKey;
use sha2::Sha256;
use std::collections::BTreeMap;

type HmacSha256 = Hmac<Sha256>;

/// 请求签名器
///
/// 构造时解析密钥，密钥缺失或格式错误直接返回配置错误，不会产出空签名。
#[derive(Clone)]
pub enum RequestSigner {
    Rsa2(SigningKey<Sha256>),
    HmacSha256(Vec<u8>),
}

impl RequestSigner {
    pub fn from_config(config: &GatewayConfig) -> DomainResult<Self> {
        Self::new(config.sign_type, &config.signing_key)
    }

    pub fn new(sign_type: SignType, key: &[u8]) -> DomainResult<Self> {
        if key.is_empty() {
            return Err(DomainError::ConfigurationError(
                "signing key is missing".to_string(),
            ));
        }

        match sign_type {
            SignType::Rsa2 => {
                let private_key = load_rsa_private_key(key)?;
                Ok(RequestSigner::Rsa2(SigningKey::<Sha256>::new(private_key)))
            }
            SignType::HmacSha256 => Ok(RequestSigner::HmacSha256(key.to_vec())),
        }
    }

    pub fn sign_type(&self) -> SignType {
        match self {
            RequestSigner::Rsa2(_) => SignType::Rsa2,
            RequestSigner::HmacSha256(_) => SignType::HmacSha256,
        }
    }

    /// 对参数集合签名，返回 Base64 编码的签名串
    pub fn sign(&self, params: &BTreeMap<String, String>) -> DomainResult<String> {
        self.sign_message(&canonical_string(params))
    }

    /// 对待签名串签名
    pub fn sign_message(&self, message: &str) -> DomainResult<String> {
        let signature = match self {
            RequestSigner::Rsa2(signing_key) => signing_key
                .try_sign_with_rng(&mut OsRng, message.as_bytes())
                .map_err(|e| DomainError::CryptoError(format!("RSA sign error: {}", e)))?
                .to_vec(),
            RequestSigner::HmacSha256(secret) => {
                let mut mac = HmacSha256::new_from_slice(secret)
                    .map_err(|e| DomainError::ConfigurationError(format!("HMAC key error: {}", e)))?;
                mac.update(message.as_bytes());
                mac.finalize().into_bytes().to_vec()
            }
        };

        Ok(base64::engine::general_purpose::STANDARD.encode(signature))
    }
}

/// 加载应用私钥，支持 PKCS#8/PKCS#1 PEM 以及不带页眉的 base64 DER
fn load_rsa_private_key(key: &[u8]) -> DomainResult<RsaPrivateKey> {
    let text = std::str::from_utf8(key).map(str::trim);

    let loaded = match text {
        Ok(pem) if pem.contains("BEGIN RSA PRIVATE KEY") => RsaPrivateKey::from_pkcs1_pem(pem)
            .map_err(|e| format!("invalid PKCS#1 PEM: {}", e)),
        Ok(pem) if pem.contains("BEGIN PRIVATE KEY") => RsaPrivateKey::from_pkcs8_pem(pem)
            .map_err(|e| format!("invalid PKCS#8 PEM: {}", e)),
        Ok(encoded) => {
            let compact: String = encoded.split_whitespace().collect();
            base64::engine::general_purpose::STANDARD
                .decode(compact)
                .map_err(|e| format!("Base64 decode error: {}", e))
                .and_then(|der| load_rsa_der(&der))
        }
        Err(_) => load_rsa_der(key),
    };

    loaded.map_err(|e| DomainError::ConfigurationError(format!("Failed to load private key: {}", e)))
}

fn load_rsa_der(der: &[u8]) -> Result<RsaPrivateKey, String> {
    RsaPrivateKey::from_pkcs8_der(der)
        .or_else(|_| RsaPrivateKey::from_pkcs1_der(der))
        .map_err(|e| format!("invalid DER key: {}", e))
}
