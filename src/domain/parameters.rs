use std::collections::BTreeMap;

/// 签名参数名，本身不参与签名
pub const SIGN_KEY: &str = "sign";

/// 构造待签名串：去掉 `sign` 与空值，按键字节序升序拼接为 `k1=v1&k2=v2`
pub fn canonical_string(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .filter(|(k, v)| k.as_str() != SIGN_KEY && !v.is_empty())
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// 参与签名的参数集合（不含 `sign`）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignableParameters {
    params: BTreeMap<String, String>,
}

impl SignableParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入参数；`sign` 键被忽略，签名只能经由 [`SignableParameters::into_signed`] 附加
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        if key == SIGN_KEY {
            return;
        }
        self.params.insert(key, value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn canonical_string(&self) -> String {
        canonical_string(&self.params)
    }

    pub fn into_signed(self, signature: String) -> SignedRequest {
        let mut params = self.params;
        params.insert(SIGN_KEY.to_string(), signature);
        SignedRequest { params }
    }
}

/// 已签名请求：既可作为 POST 表单，也可拼成查询串
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    params: BTreeMap<String, String>,
}

impl SignedRequest {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn signature(&self) -> &str {
        self.get(SIGN_KEY).unwrap_or_default()
    }

    /// 百分号编码后的查询串，键按字典序排列
    pub fn to_query_string(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn to_url(&self, gateway_url: &str) -> String {
        format!("{}?{}", gateway_url, self.to_query_string())
    }

    pub fn form_pairs(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_string_drops_sign_and_empty_values() {
        let mut params = BTreeMap::new();
        params.insert("method".to_string(), "zhima.auth.info.authquery".to_string());
        params.insert("app_id".to_string(), "2017".to_string());
        params.insert("sign".to_string(), "stale".to_string());
        params.insert("return_url".to_string(), String::new());

        assert_eq!(
            canonical_string(&params),
            "app_id=2017&method=zhima.auth.info.authquery"
        );
    }

    #[test]
    fn test_canonical_string_sorts_bytewise() {
        let mut params = SignableParameters::new();
        params.insert("b", "2");
        params.insert("B", "1");
        params.insert("a_b", "3");
        params.insert("ab", "4");

        assert_eq!(params.canonical_string(), "B=1&a_b=3&ab=4&b=2");
    }

    #[test]
    fn test_insert_ignores_sign_key() {
        let mut params = SignableParameters::new();
        params.insert("sign", "forged");
        assert!(params.get("sign").is_none());

        let signed = params.into_signed("real".to_string());
        assert_eq!(signed.signature(), "real");
    }

    #[test]
    fn test_query_string_percent_encodes_values() {
        let mut params = SignableParameters::new();
        params.insert("biz_content", r#"{"biz_no":"MK1"}"#);
        params.insert("timestamp", "2017-01-01 08:00:00");
        let signed = params.into_signed("a+b/c=".to_string());

        assert_eq!(
            signed.to_url("https://gw.example/do"),
            "https://gw.example/do?biz_content=%7B%22biz_no%22%3A%22MK1%22%7D\
             &sign=a%2Bb%2Fc%3D&timestamp=2017-01-01%2008%3A00%3A00"
        );
    }
}
