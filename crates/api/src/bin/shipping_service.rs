//! Shipping service entry point.

use api::config::{Config, GatewayConfig, SHIPPING_SERVICE_PORT};
use domain::ShippingStore;

#[tokio::main]
async fn main() {
    let config = Config::from_env(SHIPPING_SERVICE_PORT).expect("invalid configuration");
    api::server::init_tracing(&config.log_level);

    let gateways = GatewayConfig::from_env().expect("invalid gateway configuration");
    let metrics_handle = api::server::install_metrics().expect("failed to install Prometheus recorder");

    tracing::info!(success_rate = gateways.carrier_success_rate, "using simulated carrier");
    let store = ShippingStore::new(gateways.carrier());
    let app = api::create_shipping_app(store, metrics_handle);
    api::server::serve("shipping", &config.addr(), app)
        .await
        .expect("server error");
}
