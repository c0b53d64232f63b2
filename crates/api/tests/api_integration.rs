//! Integration tests for the service and orchestrator routers.

use std::sync::{Arc, OnceLock};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain::{OrderStore, PaymentStore, ShippingStore, StubCarrier, StubPaymentGateway};
use metrics_exporter_prometheus::PrometheusHandle;
use saga::SagaCoordinator;
use serde_json::{Value, json};
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn order_details() -> Value {
    json!({
        "user_id": "u1",
        "items": [{ "product_id": "A", "quantity": 2, "price": 1050 }]
    })
}

fn payment_info(amount: i64) -> Value {
    json!({
        "card_number": "xxxx-xxxx-xxxx-1234",
        "expiry_date": "12/26",
        "cvv": "123",
        "amount": amount
    })
}

fn address() -> Value {
    json!({
        "street": "123 Saga Lane",
        "city": "Orchestration City",
        "state": "Workflow",
        "zip_code": "98765",
        "country": "Rustland"
    })
}

mod order_service {
    use super::*;

    fn setup() -> Router {
        api::create_order_app(OrderStore::new(), get_metrics_handle())
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = setup();
        let (status, json) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "order");
    }

    #[tokio::test]
    async fn test_create_and_get_order() {
        let app = setup();

        let (status, created) = send(&app, "POST", "/orders", Some(order_details())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "PENDING");
        let order_id = created["order_id"].as_str().unwrap().to_string();
        assert!(order_id.starts_with("order-"));

        let (status, order) = send(&app, "GET", &format!("/orders/{order_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(order["user_id"], "u1");
        assert_eq!(order["total_amount"], 2100);
        assert_eq!(order["status"], "PENDING");
    }

    #[tokio::test]
    async fn test_create_order_without_items_is_bad_request() {
        let app = setup();

        let (status, json) = send(
            &app,
            "POST",
            "/orders",
            Some(json!({ "user_id": "u1", "items": [] })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "invalid_argument");
    }

    #[tokio::test]
    async fn test_create_order_with_overflowing_total_is_bad_request() {
        let app = setup();

        let (status, json) = send(
            &app,
            "POST",
            "/orders",
            Some(json!({
                "user_id": "u1",
                "items": [{ "product_id": "A", "quantity": 3, "price": i64::MAX / 2 }]
            })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "invalid_argument");
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent() {
        let app = setup();
        let (_, created) = send(&app, "POST", "/orders", Some(order_details())).await;
        let order_id = created["order_id"].as_str().unwrap().to_string();
        let uri = format!("/orders/{order_id}/cancel");

        let (status, first) = send(&app, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["success"], true);
        assert_eq!(first["message"], "Order cancelled successfully");

        let (status, second) = send(&app, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(second["message"], "Order already cancelled");
    }

    #[tokio::test]
    async fn test_complete_order() {
        let app = setup();
        let (_, created) = send(&app, "POST", "/orders", Some(order_details())).await;
        let order_id = created["order_id"].as_str().unwrap().to_string();

        let (status, json) =
            send(&app, "POST", &format!("/orders/{order_id}/complete"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Order completion processed");

        let (_, order) = send(&app, "GET", &format!("/orders/{order_id}"), None).await;
        assert_eq!(order["status"], "COMPLETED");
    }

    #[tokio::test]
    async fn test_unknown_order_is_not_found() {
        let app = setup();

        let (status, json) = send(&app, "POST", "/orders/order-missing/cancel", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["code"], "not_found");
        assert_eq!(json["message"], "Order order-missing not found");

        let (status, _) = send(&app, "GET", "/orders/order-missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let app = setup();
        send(&app, "POST", "/orders", Some(order_details())).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/metrics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap();
        assert!(content_type.starts_with("text/plain"));
    }
}

mod payment_service {
    use super::*;

    fn setup(gateway: StubPaymentGateway) -> Router {
        api::create_payment_app(PaymentStore::new(gateway), get_metrics_handle())
    }

    #[tokio::test]
    async fn test_process_and_refund() {
        let app = setup(StubPaymentGateway::new());

        let (status, paid) = send(
            &app,
            "POST",
            "/payments",
            Some(json!({ "order_id": "order-1", "payment_info": payment_info(2100) })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(paid["status"], "SUCCESS");
        assert_eq!(paid["message"], "Payment processed successfully.");
        let payment_id = paid["payment_id"].as_str().unwrap().to_string();

        let (status, refunded) = send(
            &app,
            "POST",
            &format!("/payments/{payment_id}/refund"),
            Some(json!({ "order_id": "order-1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(refunded["message"], "Payment refunded successfully");

        let (_, payment) = send(&app, "GET", &format!("/payments/{payment_id}"), None).await;
        assert_eq!(payment["status"], "REFUNDED");
        assert_eq!(payment["amount"], 2100);
    }

    #[tokio::test]
    async fn test_declined_payment_is_ok_with_failed_status() {
        let app = setup(StubPaymentGateway::declining());

        let (status, json) = send(
            &app,
            "POST",
            "/payments",
            Some(json!({ "order_id": "order-1", "payment_info": payment_info(2100) })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "FAILED");
        assert_eq!(json["message"], "Payment failed due to insufficient funds.");
    }

    #[tokio::test]
    async fn test_refund_for_another_order_is_bad_request() {
        let app = setup(StubPaymentGateway::new());
        let (_, paid) = send(
            &app,
            "POST",
            "/payments",
            Some(json!({ "order_id": "order-1", "payment_info": payment_info(2100) })),
        )
        .await;
        let payment_id = paid["payment_id"].as_str().unwrap().to_string();

        let (status, json) = send(
            &app,
            "POST",
            &format!("/payments/{payment_id}/refund"),
            Some(json!({ "order_id": "order-2" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "invalid_argument");

        let (_, payment) = send(&app, "GET", &format!("/payments/{payment_id}"), None).await;
        assert_eq!(payment["status"], "SUCCESS");
    }

    #[tokio::test]
    async fn test_negative_amount_is_bad_request() {
        let app = setup(StubPaymentGateway::new());

        let (status, _) = send(
            &app,
            "POST",
            "/payments",
            Some(json!({ "order_id": "order-1", "payment_info": payment_info(-5) })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

mod shipping_service {
    use super::*;

    fn setup(carrier: StubCarrier) -> Router {
        api::create_shipping_app(ShippingStore::new(carrier), get_metrics_handle())
    }

    #[tokio::test]
    async fn test_arrange_and_cancel() {
        let app = setup(StubCarrier::new());

        let (status, arranged) = send(
            &app,
            "POST",
            "/shipments",
            Some(json!({ "order_id": "order-1", "address": address() })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(arranged["status"], "SHIPPED");
        let shipment_id = arranged["shipment_id"].as_str().unwrap().to_string();

        let uri = format!("/shipments/{shipment_id}/cancel");
        let (status, first) =
            send(&app, "POST", &uri, Some(json!({ "order_id": "order-1" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["message"], "Shipping cancelled successfully");

        let (_, second) = send(&app, "POST", &uri, Some(json!({ "order_id": "order-1" }))).await;
        assert_eq!(second["message"], "Shipment already cancelled");

        let (_, shipment) = send(&app, "GET", &format!("/shipments/{shipment_id}"), None).await;
        assert_eq!(shipment["status"], "CANCELLED");
    }

    #[tokio::test]
    async fn test_carrier_unavailable_is_service_unavailable() {
        let app = setup(StubCarrier::unavailable());

        let (status, json) = send(
            &app,
            "POST",
            "/shipments",
            Some(json!({ "order_id": "order-1", "address": address() })),
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["code"], "unavailable");
        assert_eq!(
            json["message"],
            "Failed to arrange shipping for order order-1: Carrier unavailable"
        );
    }

    #[tokio::test]
    async fn test_unknown_shipment_is_not_found() {
        let app = setup(StubCarrier::new());

        let (status, json) = send(
            &app,
            "POST",
            "/shipments/ship-missing/cancel",
            Some(json!({ "order_id": "order-1" })),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["code"], "not_found");
    }
}

mod orchestrator {
    use super::*;

    struct Setup {
        app: Router,
        orders: OrderStore,
        gateway: StubPaymentGateway,
        carrier: StubCarrier,
    }

    fn setup() -> Setup {
        let gateway = StubPaymentGateway::new();
        let carrier = StubCarrier::new();
        let orders = OrderStore::new();
        let coordinator = SagaCoordinator::new(
            orders.clone(),
            PaymentStore::new(gateway.clone()),
            ShippingStore::new(carrier.clone()),
        );
        let app = api::create_orchestrator_app(Arc::new(coordinator), get_metrics_handle());
        Setup {
            app,
            orders,
            gateway,
            carrier,
        }
    }

    fn saga_request() -> Value {
        json!({
            "order": order_details(),
            "payment": payment_info(2100),
            "shipping": address()
        })
    }

    #[tokio::test]
    async fn test_completed_saga() {
        let s = setup();

        let (status, json) = send(&s.app, "POST", "/sagas/create-order", Some(saga_request())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "completed");
        assert_eq!(json["finalized"], true);
        assert!(json["payment_id"].as_str().unwrap().starts_with("pay-"));
        assert!(json["shipment_id"].as_str().unwrap().starts_with("ship-"));

        let order_id = common::OrderId::new(json["order_id"].as_str().unwrap());
        assert_eq!(
            s.orders.get(&order_id).await.unwrap().status,
            common::OrderStatus::Completed
        );
    }

    #[tokio::test]
    async fn test_payment_failure_is_unprocessable() {
        let s = setup();
        s.gateway.set_decline(true);

        let (status, json) = send(&s.app, "POST", "/sagas/create-order", Some(saga_request())).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["status"], "failed");
        assert_eq!(json["reason"], "failed to process payment");
        assert!(json.get("unresolved").is_none());
        assert_eq!(s.carrier.booking_count(), 0);
    }

    #[tokio::test]
    async fn test_shipping_failure_is_unprocessable() {
        let s = setup();
        s.carrier.set_unavailable(true);

        let (status, json) = send(&s.app, "POST", "/sagas/create-order", Some(saga_request())).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["reason"], "failed to arrange shipping");
    }

    #[tokio::test]
    async fn test_invalid_order_fails_first_step() {
        let s = setup();
        let mut request = saga_request();
        request["order"]["items"] = json!([]);

        let (status, json) = send(&s.app, "POST", "/sagas/create-order", Some(request)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["reason"], "failed to create order");
        assert!(s.orders.is_empty().await);
    }
}
