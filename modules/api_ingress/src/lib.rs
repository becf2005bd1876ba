//! HTTP ingress: owns the listener, the cross-cutting middleware stack and
//! the service endpoints (`/health`, `/openapi.json`, `/docs`).

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Result;
use axum::{extract::DefaultBodyLimit, routing::get, Extension, Router};
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

mod config;
pub mod request_id;
mod web;

pub use config::ApiIngressConfig;

pub struct ApiIngress {
    config: ApiIngressConfig,
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ApiIngressConfig {
        &self.config
    }

    /// Mount the module routes next to the service endpoints and wrap
    /// everything in the middleware stack.
    pub fn build_router(&self, api: Router, doc: utoipa::openapi::OpenApi) -> Router {
        tracing::debug!("Building router");
        let mut router = Router::new()
            .route("/health", get(web::health_check))
            .merge(api);

        if self.config.enable_docs {
            router = router
                .route("/openapi.json", get(web::openapi_json))
                .route("/docs", get(web::serve_docs))
                .layer(Extension(Arc::new(doc)));
        }

        // Layers run outermost-last: a request passes SetRequestId first,
        // then Propagate, Trace, Timeout, CORS and BodyLimit.
        // DefaultBodyLimit lifts axum's own 2 MB extractor cap to the same value.
        router = router
            .layer(DefaultBodyLimit::max(self.config.body_limit_bytes))
            .layer(RequestBodyLimitLayer::new(self.config.body_limit_bytes));

        if self.config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        router = router
            .layer(TimeoutLayer::new(Duration::from_secs(
                self.config.request_timeout_secs,
            )))
            .layer(request_id::create_trace_layer());

        let x_request_id = request_id::header();
        router
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId))
    }

    /// Bind and serve until `cancel` fires, then drain in-flight requests.
    pub async fn serve(
        &self,
        router: Router,
        addr: SocketAddr,
        cancel: CancellationToken,
    ) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", addr, e))?;
        tracing::info!("HTTP server bound on {}", listener.local_addr()?);

        let shutdown = async move {
            cancel.cancelled().await;
            tracing::info!("HTTP server shutting down gracefully (cancellation)");
        };

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    fn empty_doc() -> utoipa::openapi::OpenApi {
        utoipa::openapi::OpenApiBuilder::new()
            .info(utoipa::openapi::InfoBuilder::new().title("test").version("0").build())
            .build()
    }

    async fn status_of(router: Router, uri: &str) -> StatusCode {
        router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn health_is_always_mounted() {
        let ingress = ApiIngress::new(ApiIngressConfig::default());
        let router = ingress.build_router(Router::new(), empty_doc());
        assert_eq!(status_of(router, "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn docs_can_be_disabled() {
        let ingress = ApiIngress::new(ApiIngressConfig {
            enable_docs: false,
            ..Default::default()
        });
        let router = ingress.build_router(Router::new(), empty_doc());
        assert_eq!(
            status_of(router.clone(), "/openapi.json").await,
            StatusCode::NOT_FOUND
        );
        assert_eq!(status_of(router, "/docs").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn serve_stops_on_cancel() {
        let ingress = ApiIngress::new(ApiIngressConfig::default());
        let router = ingress.build_router(Router::new(), empty_doc());
        let cancel = CancellationToken::new();
        cancel.cancel();
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        assert!(ingress.serve(router, addr, cancel).await.is_ok());
    }
}
