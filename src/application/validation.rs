//! 请求构造前的参数预检，失败时不会发起任何网络请求。

use crate::application::dto::{AuthQueryParams, CertifyParams, InitializeParams, MutualViewParams};
use crate::domain::errors::{DomainError, DomainResult};

const MAX_TRANSACTION_ID_LEN: usize = 64;
const MAX_CERT_NO_LEN: usize = 32;

pub fn check_initialize_params(params: &InitializeParams) -> DomainResult<()> {
    require("cert_name", &params.cert_name)?;
    check_cert_no(&params.cert_no)?;

    require("transaction_id", &params.transaction_id)?;
    if params.transaction_id.len() > MAX_TRANSACTION_ID_LEN {
        return Err(DomainError::validation(
            "transaction_id",
            format!("must be 1-{} characters", MAX_TRANSACTION_ID_LEN),
        ));
    }

    check_url("return_url", params.return_url.as_deref())
}

pub fn check_certify_params(params: &CertifyParams) -> DomainResult<()> {
    check_biz_no(&params.biz_no)?;
    check_url("return_url", params.return_url.as_deref())
}

pub fn check_biz_no(biz_no: &str) -> DomainResult<()> {
    require("biz_no", biz_no)?;
    if biz_no.chars().any(char::is_whitespace) {
        return Err(DomainError::validation("biz_no", "must not contain whitespace"));
    }
    Ok(())
}

pub fn check_auth_query_params(params: &AuthQueryParams) -> DomainResult<()> {
    require("user_id", &params.user_id)
}

pub fn check_mutual_view_params(params: &MutualViewParams) -> DomainResult<()> {
    require("cert_name", &params.cert_name)?;
    check_cert_no(&params.cert_no)?;
    check_url("callback_url", params.callback_url.as_deref())
}

fn require(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(field, "must not be blank"));
    }
    Ok(())
}

fn check_cert_no(cert_no: &str) -> DomainResult<()> {
    require("cert_no", cert_no)?;
    if cert_no.len() > MAX_CERT_NO_LEN || !cert_no.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(DomainError::validation(
            "cert_no",
            format!("must be at most {} ASCII letters or digits", MAX_CERT_NO_LEN),
        ));
    }
    Ok(())
}

/// 可选地址，空串视为未提供
fn check_url(field: &str, url: Option<&str>) -> DomainResult<()> {
    match url.map(str::trim) {
        None | Some("") => Ok(()),
        Some(u) if u.starts_with("https://") || u.starts_with("http://") => Ok(()),
        Some(_) => Err(DomainError::validation(field, "must be an http(s) URL")),
    }
}
