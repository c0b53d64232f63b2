//! Payment service entry point.

use api::config::{Config, GatewayConfig, PAYMENT_SERVICE_PORT};
use domain::PaymentStore;

#[tokio::main]
async fn main() {
    let config = Config::from_env(PAYMENT_SERVICE_PORT).expect("invalid configuration");
    api::server::init_tracing(&config.log_level);

    let gateways = GatewayConfig::from_env().expect("invalid gateway configuration");
    let metrics_handle = api::server::install_metrics().expect("failed to install Prometheus recorder");

    tracing::info!(approval_rate = gateways.payment_approval_rate, "using simulated payment gateway");
    let store = PaymentStore::new(gateways.payment_gateway());
    let app = api::create_payment_app(store, metrics_handle);
    api::server::serve("payment", &config.addr(), app)
        .await
        .expect("server error");
}
