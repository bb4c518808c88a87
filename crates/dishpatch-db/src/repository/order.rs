//! # Order Repository
//!
//! Read-side database operations for orders.
//!
//! ## Why Read-Only
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Order Lifecycle Ownership                           │
//! │                                                                         │
//! │  CREATE   → WorkflowService::place_order    (one transaction:           │
//! │             order + item + current-orders row, total computed)          │
//! │                                                                         │
//! │  READ     → THIS REPOSITORY (lists, search, detail, counts)             │
//! │                                                                         │
//! │  DELETE   → DeleteEngine::delete_order      (children before parent)    │
//! │                                                                         │
//! │  There is no direct INSERT/UPDATE path: totals and the derived          │
//! │  current-orders table stay consistent because only the workflow and     │
//! │  the delete engine touch them.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use dishpatch_core::{Delivery, Order};

/// One row in an order list or search result.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderSummaryRow {
    pub order_id: i64,
    pub order_date: chrono::DateTime<chrono::Utc>,
    pub total_cents: i64,
    pub customer_name: String,
    pub restaurant_name: String,
}

/// One line item on an order detail view, with the menu item's current name.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItemRow {
    pub order_item_id: i64,
    pub menu_item_id: i64,
    pub menu_item_name: String,
    pub quantity: i64,
    pub line_total_cents: i64,
}

/// Repository for order read operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Gets an order by id.
    pub async fn get_by_id(&self, order_id: i64) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT order_id, customer_id, restaurant_id, order_date, total_cents
            FROM orders
            WHERE order_id = ?1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Lists the most recent orders with customer and restaurant names.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<OrderSummaryRow>> {
        let rows = sqlx::query_as::<_, OrderSummaryRow>(
            r#"
            SELECT
                o.order_id,
                o.order_date,
                o.total_cents,
                c.first_name || ' ' || c.last_name AS customer_name,
                r.name AS restaurant_name
            FROM orders o
            JOIN customers c ON o.customer_id = c.customer_id
            JOIN restaurants r ON o.restaurant_id = r.restaurant_id
            ORDER BY o.order_id DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Searches orders by numeric id or by customer-name substring.
    ///
    /// A query that parses as an integer is treated as an order id; anything
    /// else matches against the customer's full name. The pattern is bound,
    /// never spliced into the query text.
    pub async fn search(&self, query: &str) -> DbResult<Vec<OrderSummaryRow>> {
        let query = query.trim();
        debug!(query, "Searching orders");

        if let Ok(order_id) = query.parse::<i64>() {
            let rows = sqlx::query_as::<_, OrderSummaryRow>(
                r#"
                SELECT
                    o.order_id,
                    o.order_date,
                    o.total_cents,
                    c.first_name || ' ' || c.last_name AS customer_name,
                    r.name AS restaurant_name
                FROM orders o
                JOIN customers c ON o.customer_id = c.customer_id
                JOIN restaurants r ON o.restaurant_id = r.restaurant_id
                WHERE o.order_id = ?1
                "#,
            )
            .bind(order_id)
            .fetch_all(&self.pool)
            .await?;
            return Ok(rows);
        }

        let pattern = format!("%{}%", query);
        let rows = sqlx::query_as::<_, OrderSummaryRow>(
            r#"
            SELECT
                o.order_id,
                o.order_date,
                o.total_cents,
                c.first_name || ' ' || c.last_name AS customer_name,
                r.name AS restaurant_name
            FROM orders o
            JOIN customers c ON o.customer_id = c.customer_id
            JOIN restaurants r ON o.restaurant_id = r.restaurant_id
            WHERE c.first_name || ' ' || c.last_name LIKE ?1
            ORDER BY o.order_id DESC
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Gets the line items of an order with menu item names.
    pub async fn items_for_order(&self, order_id: i64) -> DbResult<Vec<OrderItemRow>> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT
                oi.order_item_id,
                oi.menu_item_id,
                m.name AS menu_item_name,
                oi.quantity,
                oi.line_total_cents
            FROM order_items oi
            JOIN menu_items m ON oi.menu_item_id = m.menu_item_id
            WHERE oi.order_id = ?1
            ORDER BY oi.order_item_id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Gets the deliveries assigned to an order.
    pub async fn deliveries_for_order(&self, order_id: i64) -> DbResult<Vec<Delivery>> {
        let deliveries = sqlx::query_as::<_, Delivery>(
            r#"
            SELECT delivery_id, order_id, driver_id, pickup_time, location, fee_cents
            FROM deliveries
            WHERE order_id = ?1
            ORDER BY delivery_id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(deliveries)
    }

    /// Number of active orders for a customer.
    ///
    /// Reads the derived `customer_current_orders` table directly; the
    /// workflow and delete engine keep it consistent, so no recomputation
    /// happens here.
    pub async fn active_order_count(&self, customer_id: i64) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM customer_current_orders WHERE customer_id = ?1",
        )
        .bind(customer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
