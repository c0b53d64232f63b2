//! JSON-over-HTTP clients for the service binaries.

use async_trait::async_trait;
use common::{
    ArrangeShippingRequest, ArrangeShippingResponse, CompensateRequest, CompensationResponse,
    CreateOrderResponse, ErrorBody, ErrorCode, OrderDetails, OrderId, PaymentId, PaymentInfo,
    ProcessPaymentRequest, ProcessPaymentResponse, ShipmentId, ShippingAddress,
};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{OrderClient, PaymentClient, ShippingClient};
use crate::error::CallError;

/// Base URL plus a shared connection pool.
#[derive(Debug, Clone)]
struct Endpoint {
    client: Client,
    base_url: String,
}

impl Endpoint {
    fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, CallError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        decode(response).await
    }

    async fn post_empty<R: DeserializeOwned>(&self, path: &str) -> Result<R, CallError> {
        let response = self
            .client
            .post(self.url(path))
            .send()
            .await
            .map_err(transport_error)?;
        decode(response).await
    }
}

fn transport_error(err: reqwest::Error) -> CallError {
    if err.is_timeout() {
        CallError::DeadlineExceeded
    } else {
        CallError::Transport(err.to_string())
    }
}

async fn decode<R: DeserializeOwned>(response: Response) -> Result<R, CallError> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<R>()
            .await
            .map_err(|e| CallError::Decode(e.to_string()));
    }

    let body = response.bytes().await.map_err(transport_error)?;
    match serde_json::from_slice::<ErrorBody>(&body) {
        Ok(err) => Err(CallError::Status {
            code: err.code,
            message: err.message,
        }),
        Err(_) => Err(CallError::Status {
            code: code_for_status(status),
            message: format!("HTTP {status}"),
        }),
    }
}

/// Fallback when an error response carries no [`ErrorBody`].
fn code_for_status(status: StatusCode) -> ErrorCode {
    match status {
        StatusCode::NOT_FOUND => ErrorCode::NotFound,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ErrorCode::InvalidArgument,
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            ErrorCode::Unavailable
        }
        _ => ErrorCode::Internal,
    }
}

/// HTTP client of the Order service.
#[derive(Debug, Clone)]
pub struct HttpOrderClient {
    endpoint: Endpoint,
}

impl HttpOrderClient {
    /// Creates a client for the service at `base_url` (e.g. `http://localhost:50051`).
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Creates a client sharing an existing connection pool.
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            endpoint: Endpoint::new(client, base_url),
        }
    }
}

#[async_trait]
impl OrderClient for HttpOrderClient {
    async fn create_order(&self, details: OrderDetails) -> Result<CreateOrderResponse, CallError> {
        self.endpoint.post_json("/orders", &details).await
    }

    async fn cancel_order(&self, order_id: &OrderId) -> Result<CompensationResponse, CallError> {
        self.endpoint
            .post_empty(&format!("/orders/{order_id}/cancel"))
            .await
    }

    async fn complete_order(
        &self,
        order_id: &OrderId,
    ) -> Result<CompensationResponse, CallError> {
        self.endpoint
            .post_empty(&format!("/orders/{order_id}/complete"))
            .await
    }
}

/// HTTP client of the Payment service.
#[derive(Debug, Clone)]
pub struct HttpPaymentClient {
    endpoint: Endpoint,
}

impl HttpPaymentClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            endpoint: Endpoint::new(client, base_url),
        }
    }
}

#[async_trait]
impl PaymentClient for HttpPaymentClient {
    async fn process_payment(
        &self,
        order_id: &OrderId,
        payment_info: PaymentInfo,
    ) -> Result<ProcessPaymentResponse, CallError> {
        let request = ProcessPaymentRequest {
            order_id: order_id.clone(),
            payment_info,
        };
        self.endpoint.post_json("/payments", &request).await
    }

    async fn refund_payment(
        &self,
        order_id: &OrderId,
        payment_id: &PaymentId,
    ) -> Result<CompensationResponse, CallError> {
        let request = CompensateRequest {
            order_id: order_id.clone(),
        };
        self.endpoint
            .post_json(&format!("/payments/{payment_id}/refund"), &request)
            .await
    }
}

/// HTTP client of the Shipping service.
#[derive(Debug, Clone)]
pub struct HttpShippingClient {
    endpoint: Endpoint,
}

impl HttpShippingClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            endpoint: Endpoint::new(client, base_url),
        }
    }
}

#[async_trait]
impl ShippingClient for HttpShippingClient {
    async fn arrange_shipping(
        &self,
        order_id: &OrderId,
        address: ShippingAddress,
    ) -> Result<ArrangeShippingResponse, CallError> {
        let request = ArrangeShippingRequest {
            order_id: order_id.clone(),
            address,
        };
        self.endpoint.post_json("/shipments", &request).await
    }

    async fn cancel_shipping(
        &self,
        order_id: &OrderId,
        shipment_id: &ShipmentId,
    ) -> Result<CompensationResponse, CallError> {
        let request = CompensateRequest {
            order_id: order_id.clone(),
        };
        self.endpoint
            .post_json(&format!("/shipments/{shipment_id}/cancel"), &request)
            .await
    }
}
