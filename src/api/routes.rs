use super::handlers::*;
use crate::ports::GatewayTransport;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn create_router<T: GatewayTransport + 'static>(state: AppState<T>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/certifications", post(start_certification::<T>))
        .route("/api/certifications/:session_id", get(query_certification::<T>))
        .route("/api/auth-links/auth-query", post(auth_query_link::<T>))
        .route("/api/auth-links/mutual-view", post(mutual_view_link::<T>))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::CertificationService;
    use crate::test_support::{fixed_context, hmac_config, MockTransport};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn router(body: &str, gbk: bool) -> Router {
        let transport = if gbk {
            MockTransport::with_gbk_body(body)
        } else {
            MockTransport::with_body(body)
        };
        let service = CertificationService::new(fixed_context(hmac_config()), Arc::new(transport));
        create_router(AppState {
            certification_service: Arc::new(service),
        })
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = router("{}", false)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_start_certification_created() {
        let app = router(
            r#"{"zhima_customer_certification_initialize_response":{"code":"10000","msg":"Success","biz_no":"ZM201701011234"}}"#,
            false,
        );
        let response = app
            .oneshot(post_json(
                "/api/certifications",
                serde_json::json!({
                    "cert_name": "Bran",
                    "cert_no": "3543563267268",
                    "transaction_id": "AIHEHUO20170101000000001"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["session_id"], "ZM201701011234");
        assert!(
            body["certify_url"]
                .as_str()
                .unwrap()
                .starts_with("https://openapi.alipay.com/gateway.do?")
        );
    }

    #[tokio::test]
    async fn test_validation_error_is_bad_request() {
        let response = router("{}", false)
            .oneshot(post_json(
                "/api/certifications",
                serde_json::json!({
                    "cert_name": "Bran",
                    "cert_no": "",
                    "transaction_id": "AIHEHUO20170101000000001"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "CERTIFICATION_ERROR");
    }

    #[tokio::test]
    async fn test_missing_fields_reach_validation() {
        let response = router("{}", false)
            .oneshot(post_json(
                "/api/certifications",
                serde_json::json!({
                    "cert_name": "Bran",
                    "transaction_id": "T1"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "CERTIFICATION_ERROR");
        assert!(body["message"].as_str().unwrap().contains("cert_no"));

        let response = router("{}", false)
            .oneshot(post_json("/api/auth-links/auth-query", serde_json::json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "LINK_ERROR");
    }

    #[tokio::test]
    async fn test_gateway_error_is_bad_gateway() {
        let response = router(
            r#"{"zhima_customer_certification_query_response":{"code":"40004","msg":"Business Failed","sub_code":"BIZ_NO_NOT_EXIST"}}"#,
            true,
        )
        .oneshot(
            Request::get("/api/certifications/ZM201701011234")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_query_certification_ok() {
        let response = router(
            r#"{"zhima_customer_certification_query_response":{"code":"10000","msg":"Success","passed":"T"}}"#,
            true,
        )
        .oneshot(
            Request::get("/api/certifications/ZM201701011234")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["passed"], true);
        assert_eq!(body["session_id"], "ZM201701011234");
    }

    #[tokio::test]
    async fn test_auth_query_link() {
        let response = router("{}", false)
            .oneshot(post_json(
                "/api/auth-links/auth-query",
                serde_json::json!({ "userId": "2088102000000001" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(
            body["url"]
                .as_str()
                .unwrap()
                .starts_with("alipays://platformapi/startapp?appId=20000067&url=")
        );
    }
}
