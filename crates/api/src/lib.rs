//! HTTP front ends for the create-order saga.
//!
//! Four processes share this crate: the Order, Payment and Shipping
//! services, each exposing its record store as JSON over HTTP, and the
//! orchestrator, which runs sagas against them. Every router carries
//! structured request logging (tracing), permissive CORS, `GET /health`
//! and Prometheus metrics at `GET /metrics`.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use domain::{OrderStore, PaymentStore, ShippingStore};
use metrics_exporter_prometheus::PrometheusHandle;
use saga::{
    HttpOrderClient, HttpPaymentClient, HttpShippingClient, OrderClient, PaymentClient,
    SagaCoordinator, ShippingClient,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::OrchestratorConfig;

/// The orchestrator as deployed: HTTP clients to the three services.
pub type HttpSagaCoordinator =
    SagaCoordinator<HttpOrderClient, HttpPaymentClient, HttpShippingClient>;

/// Adds the health and metrics routes plus the CORS and trace layers.
fn finish(service: &'static str, router: Router, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    router
        .route("/health", get(move || routes::health::check(service)))
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the Order service router.
pub fn create_order_app(store: OrderStore, metrics_handle: PrometheusHandle) -> Router {
    let router = Router::new()
        .route("/orders", post(routes::orders::create))
        .route("/orders/{id}", get(routes::orders::get))
        .route("/orders/{id}/cancel", post(routes::orders::cancel))
        .route("/orders/{id}/complete", post(routes::orders::complete))
        .with_state(store);
    finish("order", router, metrics_handle)
}

/// Creates the Payment service router.
pub fn create_payment_app(store: PaymentStore, metrics_handle: PrometheusHandle) -> Router {
    let router = Router::new()
        .route("/payments", post(routes::payments::process))
        .route("/payments/{id}", get(routes::payments::get))
        .route("/payments/{id}/refund", post(routes::payments::refund))
        .with_state(store);
    finish("payment", router, metrics_handle)
}

/// Creates the Shipping service router.
pub fn create_shipping_app(store: ShippingStore, metrics_handle: PrometheusHandle) -> Router {
    let router = Router::new()
        .route("/shipments", post(routes::shipments::arrange))
        .route("/shipments/{id}", get(routes::shipments::get))
        .route("/shipments/{id}/cancel", post(routes::shipments::cancel))
        .with_state(store);
    finish("shipping", router, metrics_handle)
}

/// Creates the orchestrator router around any coordinator.
pub fn create_orchestrator_app<O, P, S>(
    coordinator: Arc<SagaCoordinator<O, P, S>>,
    metrics_handle: PrometheusHandle,
) -> Router
where
    O: OrderClient + 'static,
    P: PaymentClient + 'static,
    S: ShippingClient + 'static,
{
    let router = Router::new()
        .route(
            "/sagas/create-order",
            post(routes::sagas::create_order::<O, P, S>),
        )
        .with_state(coordinator);
    finish("orchestrator", router, metrics_handle)
}

/// Builds the coordinator for the configured service URLs, sharing one
/// connection pool between the three clients.
pub fn create_http_coordinator(config: &OrchestratorConfig) -> Arc<HttpSagaCoordinator> {
    let client = reqwest::Client::new();
    let coordinator = SagaCoordinator::with_config(
        HttpOrderClient::with_client(client.clone(), &config.order_service_url),
        HttpPaymentClient::with_client(client.clone(), &config.payment_service_url),
        HttpShippingClient::with_client(client, &config.shipping_service_url),
        config.saga,
    );

    let timeouts = coordinator.config();
    tracing::info!(
        order_service = %config.order_service_url,
        payment_service = %config.payment_service_url,
        shipping_service = %config.shipping_service_url,
        saga_timeout = ?timeouts.saga_timeout,
        compensation_timeout = ?timeouts.compensation_timeout,
        finalize_timeout = ?timeouts.finalize_timeout,
        "saga coordinator configured"
    );

    Arc::new(coordinator)
}
