//! Record stores of the Order, Payment and Shipping services.
//!
//! Each store owns an in-memory map behind one `RwLock` and exposes a
//! forward action and its compensating action:
//!
//! | store | forward | compensation |
//! |---|---|---|
//! | [`OrderStore`] | `create_order` (+ `complete_order`) | `cancel_order` |
//! | [`PaymentStore`] | `process_payment` | `refund_payment` |
//! | [`ShippingStore`] | `arrange_shipping` | `cancel_shipping` |
//!
//! Compensations are idempotent: a record already in its compensated state
//! is reported as success and left untouched.

pub mod error;
pub mod gateway;
pub mod order;
pub mod payment;
pub mod shipping;

pub use error::DomainError;
pub use gateway::{
    BookingOutcome, CarrierGateway, ChargeOutcome, PaymentGateway, RandomCarrier,
    RandomPaymentGateway, StubCarrier, StubPaymentGateway,
};
pub use order::{OrderRecord, OrderStore};
pub use payment::{PaymentRecord, PaymentStore};
pub use shipping::{ShipmentRecord, ShippingStore};
