//! Orchestrator entry point.

use api::config::{Config, ORCHESTRATOR_PORT, OrchestratorConfig};

#[tokio::main]
async fn main() {
    let config = Config::from_env(ORCHESTRATOR_PORT).expect("invalid configuration");
    api::server::init_tracing(&config.log_level);

    let orchestrator = OrchestratorConfig::from_env().expect("invalid orchestrator configuration");
    let metrics_handle = api::server::install_metrics().expect("failed to install Prometheus recorder");

    let coordinator = api::create_http_coordinator(&orchestrator);
    let app = api::create_orchestrator_app(coordinator, metrics_handle);
    api::server::serve("orchestrator", &config.addr(), app)
        .await
        .expect("server error");
}
