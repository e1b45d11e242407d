use crate::application::dto::{
    AuthQueryParams, CertifyParams, InitializeParams, MutualViewParams,
};
use crate::application::requests::GatewayContext;
use crate::domain::errors::DomainResult;
use crate::domain::{CertificationResult, CertificationSession};
use crate::ports::GatewayTransport;
use std::sync::Arc;
use tracing::{debug, info};

/// 身份认证服务
pub struct CertificationService<T: GatewayTransport> {
    context: GatewayContext,
    transport: Arc<T>,
}

impl<T: GatewayTransport> CertificationService<T> {
    pub fn new(context: GatewayContext, transport: Arc<T>) -> Self {
        Self { context, transport }
    }

    pub fn context(&self) -> &GatewayContext {
        &self.context
    }

    /// 发起认证：初始化会话并生成用户跳转地址
    pub async fn start_certification(
        &self,
        params: InitializeParams,
    ) -> DomainResult<CertificationSession> {
        info!(
            "Starting {} certification for transaction: {}",
            self.context.product(),
            params.transaction_id
        );

        let return_url = params.return_url.clone();

        // 1. 初始化，取得会话标识
        let mut initialize = self.context.initialize(params)?;
        let session_id = initialize.session_id(self.transport.as_ref()).await?;
        debug!("Certification session initialized: {}", session_id);

        // 2. 生成认证地址
        let mut certify = self.context.certify(CertifyParams {
            biz_no: session_id.clone(),
            return_url,
        })?;
        let certify_url = certify.generate_url()?;

        info!("Certification session ready: {}", session_id);

        Ok(CertificationSession {
            session_id,
            certify_url,
        })
    }

    /// 查询认证结果
    pub async fn query_certification(&self, session_id: &str) -> DomainResult<CertificationResult> {
        info!("Querying certification: {}", session_id);

        let mut query = self.context.query(session_id)?;
        let result = query.result(self.transport.as_ref()).await?;

        info!("Certification {} passed: {}", session_id, result.passed);
        Ok(result)
    }

    /// 授权信息查询深链
    pub fn auth_query_link(&self, params: AuthQueryParams) -> DomainResult<String> {
        debug!("Generating auth query link for user: {}", params.user_id);
        self.context.auth_query(params)?.generate_url()
    }

    /// 互看授权申请深链
    pub fn mutual_view_link(&self, params: MutualViewParams) -> DomainResult<String> {
        debug!("Generating mutual view link");
        self.context.mutual_view_apply(params)?.generate_url()
    }
}
