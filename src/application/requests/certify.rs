use super::{non_empty, BaseRequest, GatewayContext, SessionBizContent, Signable};
use crate::application::dto::CertifyParams;
use crate::application::validation;
use crate::domain::errors::DomainResult;
use crate::domain::value_objects::CertificationProduct;
use crate::infrastructure::config::GatewayConfig;
use serde::Serialize;

/// 生成认证地址操作，return_url 作为顶层参数参与签名
pub struct CertifyOperation {
    product: CertificationProduct,
    params: CertifyParams,
}

impl Signable for CertifyOperation {
    fn method(&self) -> &'static str {
        self.product.certify_method()
    }

    fn biz_content<'a>(&'a self, _config: &'a GatewayConfig) -> impl Serialize + 'a {
        SessionBizContent::new(self.product, &self.params.biz_no)
    }

    fn extra_params(&self) -> Vec<(&'static str, String)> {
        non_empty(&self.params.return_url)
            .map(|url| vec![("return_url", url.to_string())])
            .unwrap_or_default()
    }
}

/// 认证地址生成器，不发起网络请求
pub struct CertifyRequest {
    base: BaseRequest,
    operation: CertifyOperation,
}

impl CertifyRequest {
    pub fn new(context: GatewayContext, params: CertifyParams) -> DomainResult<Self> {
        validation::check_certify_params(&params)?;

        let product = context.product();
        Ok(Self {
            base: BaseRequest::new(context),
            operation: CertifyOperation { product, params },
        })
    }

    /// 用户浏览器跳转的认证地址
    pub fn generate_url(&mut self) -> DomainResult<String> {
        self.base.signed_url(&self.operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainError;
    use crate::infrastructure::config::DEFAULT_GATEWAY_URL;
    use crate::test_support::{fixed_context, hmac_config, open_product_config, rsa_config};

    fn params() -> CertifyParams {
        CertifyParams {
            biz_no: "MK62873648327468".to_string(),
            return_url: Some("https://example.com".to_string()),
        }
    }

    #[test]
    fn test_generate_url() {
        let mut request = CertifyRequest::new(fixed_context(rsa_config()), params()).unwrap();
        let url = request.generate_url().unwrap();

        assert!(url.starts_with(DEFAULT_GATEWAY_URL));
        assert!(url.contains("method=zhima.customer.certification.certify"));
        assert!(url.contains("biz_content=%7B%22biz_no%22%3A%22MK62873648327468%22%7D"));
        assert!(url.contains("return_url=https%3A%2F%2Fexample.com"));
        assert!(url.contains("sign_type=RSA2"));

        let sign = url
            .split('&')
            .find_map(|pair| pair.strip_prefix("sign="))
            .unwrap();
        assert!(!sign.is_empty());
    }

    #[test]
    fn test_generate_url_is_stable_for_one_instance() {
        let mut request = CertifyRequest::new(fixed_context(hmac_config()), params()).unwrap();
        assert_eq!(request.generate_url().unwrap(), request.generate_url().unwrap());
    }

    #[test]
    fn test_separate_builds_are_identical_with_fixed_clock() {
        let context = fixed_context(hmac_config());
        let first = CertifyRequest::new(context.clone(), params())
            .unwrap()
            .generate_url()
            .unwrap();
        let second = CertifyRequest::new(context, params())
            .unwrap()
            .generate_url()
            .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_open_product_uses_certify_id() {
        let mut request =
            CertifyRequest::new(fixed_context(open_product_config()), params()).unwrap();
        let url = request.generate_url().unwrap();

        assert!(url.contains("method=alipay.user.certify.open.certify"));
        assert!(url.contains("biz_content=%7B%22certify_id%22%3A%22MK62873648327468%22%7D"));
    }

    #[test]
    fn test_absent_return_url_is_not_sent() {
        let mut request = CertifyRequest::new(
            fixed_context(hmac_config()),
            CertifyParams {
                return_url: None,
                ..params()
            },
        )
        .unwrap();

        assert!(!request.generate_url().unwrap().contains("return_url"));
    }

    #[test]
    fn test_empty_biz_no_is_rejected() {
        let result = CertifyRequest::new(
            fixed_context(hmac_config()),
            CertifyParams {
                biz_no: String::new(),
                ..params()
            },
        );

        assert!(matches!(
            result,
            Err(DomainError::ValidationError { ref field, .. }) if field == "biz_no"
        ));
    }
}
