//! Shared types for the create-order saga.
//!
//! Everything that crosses a service boundary lives here: typed record ids,
//! money, the request/response messages of the Order, Payment and Shipping
//! services, the record status enums, and the wire error body.

pub mod error;
pub mod messages;
pub mod money;
pub mod status;
pub mod types;

pub use error::{ErrorBody, ErrorCode};
pub use messages::{
    ArrangeShippingRequest, ArrangeShippingResponse, CompensateRequest, CompensationResponse,
    CreateOrderResponse, Item, OrderDetails, PaymentInfo, ProcessPaymentRequest,
    ProcessPaymentResponse, ShippingAddress,
};
pub use money::Money;
pub use status::{OrderStatus, PaymentStatus, ShippingStatus};
pub use types::{OrderId, PaymentId, ShipmentId};
