//! Order, delivery, and location enums shared by storefront and admin.

use serde::{Deserialize, Serialize};

/// Lifecycle status of an order, as stored by the catalog API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Just placed, not yet reviewed.
    #[default]
    New,
    /// Reviewed and confirmed by a manager.
    Confirmed,
    /// Being assembled / prepared.
    Processing,
    /// Handed to the carrier.
    Shipped,
    /// Delivered and closed.
    Completed,
    /// Cancelled by either side.
    Cancelled,
}

impl OrderStatus {
    /// All statuses in workflow order (used for admin filter dropdowns).
    pub const ALL: [Self; 6] = [
        Self::New,
        Self::Confirmed,
        Self::Processing,
        Self::Shipped,
        Self::Completed,
        Self::Cancelled,
    ];

    /// The wire/value string for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the order is in a terminal state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(Self::New),
            "confirmed" => Ok(Self::Confirmed),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}

/// Error for unrecognized status strings.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown order status: {0}")]
pub struct UnknownStatus(pub String);

/// How an order is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMethod {
    /// Pickup from a shop or office.
    #[default]
    Pickup,
    /// Courier delivery to an address.
    Courier,
    /// Nova Poshta office or locker.
    NovaPoshta,
}

impl DeliveryMethod {
    /// The wire/value string for this method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pickup => "pickup",
            Self::Courier => "courier",
            Self::NovaPoshta => "nova_poshta",
        }
    }
}

impl std::fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DeliveryMethod {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pickup" => Ok(Self::Pickup),
            "courier" => Ok(Self::Courier),
            "nova_poshta" => Ok(Self::NovaPoshta),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}

/// Kind of a physical company location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    Shop,
    Office,
    Warehouse,
}

impl LocationKind {
    /// Whether orders can be picked up at this kind of location.
    #[must_use]
    pub const fn is_pickup_point(self) -> bool {
        matches!(self, Self::Shop | Self::Office)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_order_status_round_trip() {
        for status in OrderStatus::ALL {
            let parsed = OrderStatus::from_str(status.as_str()).expect("parse");
            assert_eq!(parsed, status);

            let json = serde_json::to_string(&status).expect("serialize");
            assert_eq!(json, format!("\"{status}\""));
            let back: OrderStatus = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(back, status);
        }
    }

    #[test]
    fn test_order_status_rejects_unknown() {
        assert!(OrderStatus::from_str("paid").is_err());
        assert!(OrderStatus::from_str("").is_err());
    }

    #[test]
    fn test_order_status_terminal() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::New.is_terminal());
        assert!(!OrderStatus::Shipped.is_terminal());
    }

    #[test]
    fn test_delivery_method_wire_values() {
        assert_eq!(DeliveryMethod::NovaPoshta.as_str(), "nova_poshta");
        assert_eq!(
            serde_json::to_string(&DeliveryMethod::NovaPoshta).expect("serialize"),
            "\"nova_poshta\""
        );
        assert_eq!(
            DeliveryMethod::from_str("nova_poshta").expect("parse"),
            DeliveryMethod::NovaPoshta
        );
    }

    #[test]
    fn test_pickup_points() {
        assert!(LocationKind::Shop.is_pickup_point());
        assert!(LocationKind::Office.is_pickup_point());
        assert!(!LocationKind::Warehouse.is_pickup_point());
    }
}
