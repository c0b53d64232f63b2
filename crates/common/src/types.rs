use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Prefix of every generated id of this kind.
            pub const PREFIX: &'static str = $prefix;

            /// Generates a fresh, globally unique id.
            pub fn generate() -> Self {
                Self(format!("{}-{}", $prefix, Uuid::new_v4()))
            }

            /// Wraps an existing id string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the id as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true if the id carries no value.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

record_id!(
    /// Identity of an order record, assigned by the Order service.
    OrderId,
    "order"
);

record_id!(
    /// Identity of a payment record, assigned by the Payment service.
    PaymentId,
    "pay"
);

record_id!(
    /// Identity of a shipment record, assigned by the Shipping service.
    ShipmentId,
    "ship"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let id1 = OrderId::generate();
        let id2 = OrderId::generate();
        assert_ne!(id1, id2);
    }

    #[test]
    fn generated_ids_carry_prefix() {
        assert!(OrderId::generate().as_str().starts_with("order-"));
        assert!(PaymentId::generate().as_str().starts_with("pay-"));
        assert!(ShipmentId::generate().as_str().starts_with("ship-"));
    }

    #[test]
    fn empty_id_is_detected() {
        assert!(PaymentId::new("").is_empty());
        assert!(!PaymentId::new("pay-1").is_empty());
    }

    #[test]
    fn id_serializes_as_plain_string() {
        let id = ShipmentId::new("ship-42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"ship-42\"");
        let back: ShipmentId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
