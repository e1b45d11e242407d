use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use zhima_auth::api::{self, AppState};
use zhima_auth::{CertificationService, GatewayConfig, GatewayContext, ReqwestTransport, SystemClock};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载环境变量
    dotenvy::dotenv().ok();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Starting Zhima certification service...");

    // 加载网关配置
    let config = GatewayConfig::from_env()?;
    info!(
        "Gateway configuration loaded for app_id: {} ({})",
        config.app_id, config.product
    );

    // 创建网关传输与签名上下文
    let transport = Arc::new(ReqwestTransport::new(&config)?);
    let context = GatewayContext::new(config, Arc::new(SystemClock))?;

    // 创建认证服务
    let certification_service = Arc::new(CertificationService::new(context, transport));

    let app_state = AppState {
        certification_service,
    };

    let app = api::create_router(app_state);

    // 启动服务器
    let host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("SERVER_PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    info!("Server listening on {}", addr);
    info!("Available endpoints:");
    info!("  GET  /health - Health check");
    info!("  POST /api/certifications - Start certification");
    info!("  GET  /api/certifications/:session_id - Query certification");
    info!("  POST /api/auth-links/auth-query - Auth query deep link");
    info!("  POST /api/auth-links/mutual-view - Mutual view deep link");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
