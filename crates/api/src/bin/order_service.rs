//! Order service entry point.

use api::config::{Config, ORDER_SERVICE_PORT};
use domain::OrderStore;

#[tokio::main]
async fn main() {
    let config = Config::from_env(ORDER_SERVICE_PORT).expect("invalid configuration");
    api::server::init_tracing(&config.log_level);

    let metrics_handle = api::server::install_metrics().expect("failed to install Prometheus recorder");

    let app = api::create_order_app(OrderStore::new(), metrics_handle);
    api::server::serve("order", &config.addr(), app)
        .await
        .expect("server error");
}
