//! External gateways consulted by the forward actions.
//!
//! The Payment service asks a payment gateway to charge a card and the
//! Shipping service asks a carrier to book a pickup. Both are injected so
//! that tests can pin the outcome; the random implementations simulate an
//! unreliable outside world for demos.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use common::{Money, OrderId, ShippingAddress};
use rand::Rng;

/// Outcome of asking the payment gateway to charge an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChargeOutcome {
    Approved { transaction_id: String },
    Declined { reason: String },
}

/// Outcome of asking the carrier to take a shipment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingOutcome {
    Booked { tracking_number: String },
    Unavailable { reason: String },
}

/// Card processor used by the Payment service.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, order_id: &OrderId, amount: Money) -> ChargeOutcome;
}

/// Carrier used by the Shipping service.
#[async_trait]
pub trait CarrierGateway: Send + Sync {
    async fn book(&self, order_id: &OrderId, address: &ShippingAddress) -> BookingOutcome;
}

fn clamp_rate(rate: f64) -> f64 {
    if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) }
}

/// Payment gateway that approves a configurable share of charges at random.
#[derive(Debug, Clone)]
pub struct RandomPaymentGateway {
    approval_rate: f64,
}

impl RandomPaymentGateway {
    pub const DEFAULT_APPROVAL_RATE: f64 = 0.7;

    /// Creates a gateway approving `approval_rate` (0.0..=1.0) of charges.
    pub fn new(approval_rate: f64) -> Self {
        Self {
            approval_rate: clamp_rate(approval_rate),
        }
    }

    pub fn approval_rate(&self) -> f64 {
        self.approval_rate
    }
}

impl Default for RandomPaymentGateway {
    fn default() -> Self {
        Self::new(Self::DEFAULT_APPROVAL_RATE)
    }
}

#[async_trait]
impl PaymentGateway for RandomPaymentGateway {
    async fn charge(&self, _order_id: &OrderId, _amount: Money) -> ChargeOutcome {
        let approved = rand::rng().random_bool(self.approval_rate);
        if approved {
            ChargeOutcome::Approved {
                transaction_id: format!("txn-{:016x}", rand::rng().random::<u64>()),
            }
        } else {
            ChargeOutcome::Declined {
                reason: "Payment failed due to insufficient funds.".to_string(),
            }
        }
    }
}

/// Carrier that accepts a configurable share of bookings at random.
#[derive(Debug, Clone)]
pub struct RandomCarrier {
    success_rate: f64,
}

impl RandomCarrier {
    pub const DEFAULT_SUCCESS_RATE: f64 = 0.8;

    pub fn new(success_rate: f64) -> Self {
        Self {
            success_rate: clamp_rate(success_rate),
        }
    }

    pub fn success_rate(&self) -> f64 {
        self.success_rate
    }
}

impl Default for RandomCarrier {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SUCCESS_RATE)
    }
}

#[async_trait]
impl CarrierGateway for RandomCarrier {
    async fn book(&self, _order_id: &OrderId, _address: &ShippingAddress) -> BookingOutcome {
        let booked = rand::rng().random_bool(self.success_rate);
        if booked {
            BookingOutcome::Booked {
                tracking_number: format!("TRK{:010}", rand::rng().random_range(0..10_000_000_000u64)),
            }
        } else {
            BookingOutcome::Unavailable {
                reason: "Carrier unavailable".to_string(),
            }
        }
    }
}

/// Deterministic payment gateway. Approves until told to decline.
#[derive(Debug, Clone, Default)]
pub struct StubPaymentGateway {
    decline: Arc<AtomicBool>,
    charges: Arc<AtomicU64>,
}

impl StubPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gateway that declines every charge.
    pub fn declining() -> Self {
        let gateway = Self::default();
        gateway.set_decline(true);
        gateway
    }

    /// Configures the gateway to decline subsequent charges.
    pub fn set_decline(&self, decline: bool) {
        self.decline.store(decline, Ordering::SeqCst);
    }

    /// Returns how many charges were attempted.
    pub fn charge_count(&self) -> u64 {
        self.charges.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for StubPaymentGateway {
    async fn charge(&self, _order_id: &OrderId, _amount: Money) -> ChargeOutcome {
        let n = self.charges.fetch_add(1, Ordering::SeqCst) + 1;
        if self.decline.load(Ordering::SeqCst) {
            ChargeOutcome::Declined {
                reason: "Payment failed due to insufficient funds.".to_string(),
            }
        } else {
            ChargeOutcome::Approved {
                transaction_id: format!("txn-{n:04}"),
            }
        }
    }
}

/// Deterministic carrier. Books until told to be unavailable.
#[derive(Debug, Clone, Default)]
pub struct StubCarrier {
    unavailable: Arc<AtomicBool>,
    bookings: Arc<AtomicU64>,
}

impl StubCarrier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        let carrier = Self::default();
        carrier.set_unavailable(true);
        carrier
    }

    /// Configures the carrier to refuse subsequent bookings.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn booking_count(&self) -> u64 {
        self.bookings.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CarrierGateway for StubCarrier {
    async fn book(&self, _order_id: &OrderId, _address: &ShippingAddress) -> BookingOutcome {
        let n = self.bookings.fetch_add(1, Ordering::SeqCst) + 1;
        if self.unavailable.load(Ordering::SeqCst) {
            BookingOutcome::Unavailable {
                reason: "Carrier unavailable".to_string(),
            }
        } else {
            BookingOutcome::Booked {
                tracking_number: format!("TRACK-{n:04}"),
            }
        }
    }
}
