//! # Domain Types
//!
//! Core domain types for the order-delivery system.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Customer ──owns──► Order ──owns──► OrderItem ──refs──► MenuItem        │
//! │                       │                                    │            │
//! │                       │ owns                         owned │            │
//! │                       ▼                                    │            │
//! │                   Delivery ──refs──► Driver          Restaurant ◄───────┘
//! │                                                         ▲               │
//! │                                      Order ──refs───────┘               │
//! │                                                                         │
//! │  CustomerCurrentOrders: one row per active order, derived, maintained   │
//! │  transactionally by the PlaceOrder workflow and the delete engine.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity has a surrogate integer key assigned by the storage layer
//! (AUTOINCREMENT) and immutable afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Customer
// =============================================================================

/// A customer who places orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    /// Surrogate key, assigned by the store.
    pub customer_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
}

impl Customer {
    /// Full display name ("First Last").
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// =============================================================================
// Restaurant
// =============================================================================

/// A restaurant that owns menu items and fulfils orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Restaurant {
    pub restaurant_id: i64,
    pub name: String,
    pub address: String,
    pub phone: String,
}

// =============================================================================
// Menu Item
// =============================================================================

/// A menu item belonging to exactly one restaurant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub menu_item_id: i64,
    /// Owning restaurant.
    pub restaurant_id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Price in cents, never negative.
    pub price_cents: i64,
}

impl MenuItem {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Driver
// =============================================================================

/// A delivery driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Driver {
    pub driver_id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Area the driver picks up from.
    pub pickup_area: String,
    /// Area the driver delivers to.
    pub destination_area: String,
}

impl Driver {
    /// Full display name ("First Last").
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// =============================================================================
// Order
// =============================================================================

/// An order placed by a customer at a restaurant.
///
/// Orders are only ever created by the PlaceOrder workflow, which computes
/// `total_cents` from the order's line items inside the same transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub order_id: i64,
    pub customer_id: i64,
    pub restaurant_id: i64,
    pub order_date: DateTime<Utc>,
    /// Sum of the order's line totals, in cents.
    pub total_cents: i64,
}

impl Order {
    /// Returns the order total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line item on an order.
///
/// `line_total_cents` is the menu item's price at order time multiplied by
/// the quantity, frozen when the order is placed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub order_item_id: i64,
    pub order_id: i64,
    pub menu_item_id: i64,
    /// Always positive.
    pub quantity: i64,
    pub line_total_cents: i64,
}

impl OrderItem {
    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

// =============================================================================
// Delivery
// =============================================================================

/// A delivery assignment linking an order to a driver.
///
/// Created only by the AssignDelivery workflow; at most one active delivery
/// per order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Delivery {
    pub delivery_id: i64,
    pub order_id: i64,
    pub driver_id: i64,
    pub pickup_time: DateTime<Utc>,
    /// Drop-off location.
    pub location: String,
    /// Delivery fee in cents, never negative.
    pub fee_cents: i64,
}

impl Delivery {
    /// Returns the delivery fee as Money.
    #[inline]
    pub fn fee(&self) -> Money {
        Money::from_cents(self.fee_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_names() {
        let customer = Customer {
            customer_id: 1,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            phone: "555-0100".to_string(),
            email: "ada@example.com".to_string(),
        };
        assert_eq!(customer.full_name(), "Ada Lovelace");

        let driver = Driver {
            driver_id: 1,
            first_name: "Max".to_string(),
            last_name: "Verst".to_string(),
            pickup_area: "Downtown".to_string(),
            destination_area: "Uptown".to_string(),
        };
        assert_eq!(driver.full_name(), "Max Verst");
    }

    #[test]
    fn test_money_accessors() {
        let item = MenuItem {
            menu_item_id: 1,
            restaurant_id: 1,
            name: "Margherita".to_string(),
            description: None,
            price_cents: 1250,
        };
        assert_eq!(item.price().cents(), 1250);

        let order = Order {
            order_id: 1,
            customer_id: 1,
            restaurant_id: 1,
            order_date: Utc::now(),
            total_cents: 2500,
        };
        assert_eq!(order.total().cents(), 2500);
    }
}
