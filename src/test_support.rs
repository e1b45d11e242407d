use crate::application::requests::GatewayContext;
use crate::domain::errors::DomainResult;
use crate::domain::value_objects::{CertificationProduct, SignType};
use crate::infrastructure::config::GatewayConfig;
use crate::ports::{Clock, GatewayTransport};
use async_trait::async_trait;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use rand::rngs::OsRng;
use rsa::pkcs1::EncodeRsaPrivateKey;
use rsa::pkcs8::{EncodePrivateKey, LineEnding};
use rsa::RsaPrivateKey;
use std::sync::{Arc, Mutex, OnceLock};

pub const TEST_APP_ID: &str = "2017010100000001";

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub url: String,
    pub form: Vec<(String, String)>,
}

/// 记录调用并返回固定响应的传输实现
pub struct MockTransport {
    body: Vec<u8>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn with_raw(body: Vec<u8>) -> Self {
        Self {
            body,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_body(body: &str) -> Self {
        Self::with_raw(body.as_bytes().to_vec())
    }

    pub fn with_gbk_body(body: &str) -> Self {
        let (bytes, _, _) = encoding_rs::GBK.encode(body);
        Self::with_raw(bytes.into_owned())
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GatewayTransport for MockTransport {
    async fn post(&self, url: &str, form: &[(String, String)]) -> DomainResult<Vec<u8>> {
        self.calls.lock().unwrap().push(RecordedCall {
            url: url.to_string(),
            form: form.to_vec(),
        });
        Ok(self.body.clone())
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// 2017-01-01 00:00:00 UTC，即东八区 08:00:00
pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(Utc.with_ymd_and_hms(2017, 1, 1, 0, 0, 0).unwrap()))
}

pub fn fixed_context(config: GatewayConfig) -> GatewayContext {
    GatewayContext::new(Arc::new(config), fixed_clock()).unwrap()
}

pub fn hmac_config() -> GatewayConfig {
    GatewayConfig::builder()
        .app_id(TEST_APP_ID)
        .sign_type(SignType::HmacSha256)
        .signing_key("test-secret")
        .build()
        .unwrap()
}

pub fn open_product_config() -> GatewayConfig {
    GatewayConfig {
        product: CertificationProduct::AlipayOpen,
        ..hmac_config()
    }
}

pub fn rsa_config() -> GatewayConfig {
    GatewayConfig::builder()
        .app_id(TEST_APP_ID)
        .sign_type(SignType::Rsa2)
        .signing_key(rsa_pkcs8_pem())
        .build()
        .unwrap()
}

pub fn test_rsa_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| RsaPrivateKey::new(&mut OsRng, 1024).unwrap())
}

pub fn rsa_pkcs8_pem() -> String {
    test_rsa_key().to_pkcs8_pem(LineEnding::LF).unwrap().to_string()
}

pub fn rsa_pkcs1_pem() -> String {
    test_rsa_key().to_pkcs1_pem(LineEnding::LF).unwrap().to_string()
}

/// 支付宝开放平台控制台导出的格式：无页眉的 base64 DER
pub fn rsa_pkcs8_der_base64() -> String {
    let der = test_rsa_key().to_pkcs8_der().unwrap();
    base64::engine::general_purpose::STANDARD.encode(der.as_bytes())
}
