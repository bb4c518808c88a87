//! # Reporting Query Engine
//!
//! Parameterized, read-only reporting queries.
//!
//! ## Query Families
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ReportService                                      │
//! │                                                                         │
//! │  busy_customers(min)      nested subquery over the derived              │
//! │                           current-orders table, HAVING COUNT(*) > ?     │
//! │                                                                         │
//! │  order_join_report(f)     orders ⋈ customers ⋈ restaurants,             │
//! │                           LEFT JOIN deliveries/drivers; optional        │
//! │                           restaurant filter, else 50 most recent        │
//! │                                                                         │
//! │  aggregate_report(v)      GROUP BY restaurant / driver / customer;      │
//! │                           SUM and COUNT in SQL, averages derived in     │
//! │                           Rust with Money::div_round (exact cents)      │
//! │                                                                         │
//! │  dashboard_counts()       four row counts for the landing view          │
//! │                                                                         │
//! │  Every user input is a bound parameter. Report identity is this enum    │
//! │  dispatch, never SQL text assembled from caller strings.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use dishpatch_core::validation::validate_min_orders;
use dishpatch_core::Money;

/// Unfiltered join-report row cap.
const JOIN_REPORT_LIMIT: i64 = 50;

// =============================================================================
// Row Types
// =============================================================================

/// A customer with more active orders than a threshold, with contact
/// details so the caller can reach out directly.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BusyCustomerRow {
    pub customer_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub active_orders: i64,
}

/// One row of the order join report. Delivery fields are None for orders
/// without an assigned delivery.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderJoinRow {
    pub order_id: i64,
    pub order_date: chrono::DateTime<chrono::Utc>,
    pub total_cents: i64,
    pub customer_name: String,
    pub restaurant_name: String,
    pub driver_name: Option<String>,
    pub delivery_location: Option<String>,
    pub delivery_fee_cents: Option<i64>,
}

/// Per-restaurant revenue aggregate. Restaurants with no orders are absent.
#[derive(Debug, Clone, Serialize)]
pub struct RestaurantAggregateRow {
    pub restaurant_id: i64,
    pub restaurant_name: String,
    pub order_count: i64,
    pub total_revenue: Money,
    pub avg_revenue: Money,
    pub max_revenue: Money,
    pub min_revenue: Money,
}

/// Per-driver delivery aggregate. Drivers with no deliveries appear with
/// zero counts and fees.
#[derive(Debug, Clone, Serialize)]
pub struct DriverAggregateRow {
    pub driver_id: i64,
    pub driver_name: String,
    pub delivery_count: i64,
    pub total_fees: Money,
    pub avg_fee: Money,
}

/// Per-customer spend aggregate. Customers with no orders are absent.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerAggregateRow {
    pub customer_id: i64,
    pub customer_name: String,
    pub order_count: i64,
    pub total_spend: Money,
    pub avg_spend: Money,
}

/// Selects which grouping the aggregate report runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateVariant {
    Restaurants,
    Drivers,
    Customers,
}

/// The result of one aggregate report run.
#[derive(Debug, Clone, Serialize)]
pub enum AggregateReport {
    Restaurants(Vec<RestaurantAggregateRow>),
    Drivers(Vec<DriverAggregateRow>),
    Customers(Vec<CustomerAggregateRow>),
}

/// Row counts for the landing view.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DashboardCounts {
    pub orders: i64,
    pub deliveries: i64,
    pub drivers: i64,
    pub restaurants: i64,
}

// =============================================================================
// Service
// =============================================================================

/// Read-only reporting queries over the full schema.
#[derive(Debug, Clone)]
pub struct ReportService {
    pool: SqlitePool,
}

impl ReportService {
    /// Creates a new ReportService.
    pub fn new(pool: SqlitePool) -> Self {
        ReportService { pool }
    }

    /// Customers whose active-order count exceeds `min_orders` (strictly).
    ///
    /// Counts rows in the derived current-orders table, so only active
    /// orders qualify. Ordered by customer id ascending.
    ///
    /// ## Errors
    /// * `DbError::Validation` - negative `min_orders`
    pub async fn busy_customers(&self, min_orders: i64) -> DbResult<Vec<BusyCustomerRow>> {
        validate_min_orders(min_orders)?;

        debug!(min_orders, "Running busy-customers report");

        let rows = sqlx::query_as::<_, BusyCustomerRow>(
            r#"
            SELECT c.customer_id, c.first_name, c.last_name, c.email, c.phone,
                   counted.active_orders
            FROM customers c
            JOIN (
                SELECT customer_id, COUNT(*) AS active_orders
                FROM customer_current_orders
                GROUP BY customer_id
                HAVING COUNT(*) > ?1
            ) counted ON c.customer_id = counted.customer_id
            ORDER BY c.customer_id
            "#,
        )
        .bind(min_orders)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Orders joined with customer, restaurant, and (when assigned) delivery
    /// and driver.
    ///
    /// With a restaurant filter, every matching order is returned; without
    /// one, the 50 most recent. Both orderings are date descending with
    /// order id descending as the tiebreak, so paging is deterministic.
    pub async fn order_join_report(
        &self,
        restaurant_filter: Option<i64>,
    ) -> DbResult<Vec<OrderJoinRow>> {
        debug!(?restaurant_filter, "Running order join report");

        let rows = match restaurant_filter {
            Some(restaurant_id) => {
                sqlx::query_as::<_, OrderJoinRow>(
                    r#"
                    SELECT
                        o.order_id,
                        o.order_date,
                        o.total_cents,
                        c.first_name || ' ' || c.last_name AS customer_name,
                        r.name AS restaurant_name,
                        dr.first_name || ' ' || dr.last_name AS driver_name,
                        d.location AS delivery_location,
                        d.fee_cents AS delivery_fee_cents
                    FROM orders o
                    JOIN customers c ON o.customer_id = c.customer_id
                    JOIN restaurants r ON o.restaurant_id = r.restaurant_id
                    LEFT JOIN deliveries d ON d.order_id = o.order_id
                    LEFT JOIN drivers dr ON dr.driver_id = d.driver_id
                    WHERE o.restaurant_id = ?1
                    ORDER BY o.order_date DESC, o.order_id DESC
                    "#,
                )
                .bind(restaurant_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, OrderJoinRow>(
                    r#"
                    SELECT
                        o.order_id,
                        o.order_date,
                        o.total_cents,
                        c.first_name || ' ' || c.last_name AS customer_name,
                        r.name AS restaurant_name,
                        dr.first_name || ' ' || dr.last_name AS driver_name,
                        d.location AS delivery_location,
                        d.fee_cents AS delivery_fee_cents
                    FROM orders o
                    JOIN customers c ON o.customer_id = c.customer_id
                    JOIN restaurants r ON o.restaurant_id = r.restaurant_id
                    LEFT JOIN deliveries d ON d.order_id = o.order_id
                    LEFT JOIN drivers dr ON dr.driver_id = d.driver_id
                    ORDER BY o.order_date DESC, o.order_id DESC
                    LIMIT ?1
                    "#,
                )
                .bind(JOIN_REPORT_LIMIT)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows)
    }

    /// Runs the aggregate report selected by `variant`.
    ///
    /// SUM, COUNT, MAX, MIN come from SQL; averages are derived here with
    /// [`Money::div_round`] so the result is exact cents rather than a
    /// floating-point approximation.
    pub async fn aggregate_report(&self, variant: AggregateVariant) -> DbResult<AggregateReport> {
        debug!(?variant, "Running aggregate report");

        match variant {
            AggregateVariant::Restaurants => {
                let rows: Vec<(i64, String, i64, i64, i64, i64)> = sqlx::query_as(
                    r#"
                    SELECT
                        r.restaurant_id,
                        r.name,
                        COUNT(o.order_id),
                        SUM(o.total_cents),
                        MAX(o.total_cents),
                        MIN(o.total_cents)
                    FROM restaurants r
                    JOIN orders o ON o.restaurant_id = r.restaurant_id
                    GROUP BY r.restaurant_id, r.name
                    ORDER BY SUM(o.total_cents) DESC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?;

                let report = rows
                    .into_iter()
                    .map(|(id, name, count, total, max, min)| RestaurantAggregateRow {
                        restaurant_id: id,
                        restaurant_name: name,
                        order_count: count,
                        total_revenue: Money::from_cents(total),
                        avg_revenue: Money::from_cents(total).div_round(count),
                        max_revenue: Money::from_cents(max),
                        min_revenue: Money::from_cents(min),
                    })
                    .collect();

                Ok(AggregateReport::Restaurants(report))
            }

            AggregateVariant::Drivers => {
                // LEFT JOIN keeps drivers with no deliveries; COALESCE turns
                // their NULL sums into zeros.
                let rows: Vec<(i64, String, String, i64, i64)> = sqlx::query_as(
                    r#"
                    SELECT
                        dr.driver_id,
                        dr.first_name,
                        dr.last_name,
                        COUNT(d.delivery_id),
                        COALESCE(SUM(d.fee_cents), 0)
                    FROM drivers dr
                    LEFT JOIN deliveries d ON d.driver_id = dr.driver_id
                    GROUP BY dr.driver_id, dr.first_name, dr.last_name
                    ORDER BY COALESCE(SUM(d.fee_cents), 0) DESC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?;

                let report = rows
                    .into_iter()
                    .map(|(id, first, last, count, total)| DriverAggregateRow {
                        driver_id: id,
                        driver_name: format!("{} {}", first, last),
                        delivery_count: count,
                        total_fees: Money::from_cents(total),
                        avg_fee: Money::from_cents(total).div_round(count),
                    })
                    .collect();

                Ok(AggregateReport::Drivers(report))
            }

            AggregateVariant::Customers => {
                let rows: Vec<(i64, String, String, i64, i64)> = sqlx::query_as(
                    r#"
                    SELECT
                        c.customer_id,
                        c.first_name,
                        c.last_name,
                        COUNT(o.order_id),
                        SUM(o.total_cents)
                    FROM customers c
                    JOIN orders o ON o.customer_id = c.customer_id
                    GROUP BY c.customer_id, c.first_name, c.last_name
                    ORDER BY SUM(o.total_cents) DESC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?;

                let report = rows
                    .into_iter()
                    .map(|(id, first, last, count, total)| CustomerAggregateRow {
                        customer_id: id,
                        customer_name: format!("{} {}", first, last),
                        order_count: count,
                        total_spend: Money::from_cents(total),
                        avg_spend: Money::from_cents(total).div_round(count),
                    })
                    .collect();

                Ok(AggregateReport::Customers(report))
            }
        }
    }

    /// Row counts for the landing view.
    ///
    /// The startup schema check already guaranteed these tables exist, so a
    /// failure here is a real storage error, not a missing table to shrug
    /// off as zero.
    pub async fn dashboard_counts(&self) -> DbResult<DashboardCounts> {
        let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        let deliveries: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM deliveries")
            .fetch_one(&self.pool)
            .await?;
        let drivers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM drivers")
            .fetch_one(&self.pool)
            .await?;
        let restaurants: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM restaurants")
            .fetch_one(&self.pool)
            .await?;

        Ok(DashboardCounts {
            orders,
            deliveries,
            drivers,
            restaurants,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::{AggregateReport, AggregateVariant};
    use crate::fixtures::{place_test_order, test_db, TestWorld};
    use crate::DbError;
    use chrono::Utc;

    #[tokio::test]
    async fn test_busy_customers_threshold_is_strict() {
        let db = test_db().await;
        let world = TestWorld::seed(&db).await;
        place_test_order(&db, &world, 1).await;
        place_test_order(&db, &world, 1).await;

        // Two active orders: > 1 qualifies, > 2 does not.
        let rows = db.reports().busy_customers(1).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].customer_id, world.customer_id);
        assert_eq!(rows[0].email, "ada@example.com");
        assert_eq!(rows[0].active_orders, 2);

        let rows = db.reports().busy_customers(2).await.unwrap();
        assert!(rows.is_empty());

        let err = db.reports().busy_customers(-1).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }

    #[tokio::test]
    async fn test_join_report_filter_and_cap() {
        let db = test_db().await;
        let world = TestWorld::seed(&db).await;
        let other = db
            .restaurants()
            .create("Mario's", "2 Side St", "555-0102")
            .await
            .unwrap();
        let other_item = db
            .menu_items()
            .create(other.restaurant_id, "Lasagna", None, 900)
            .await
            .unwrap();

        for _ in 0..55 {
            place_test_order(&db, &world, 1).await;
        }
        db.workflow()
            .place_order(
                world.customer_id,
                other.restaurant_id,
                Utc::now(),
                other_item.menu_item_id,
                1,
            )
            .await
            .unwrap();

        // Unfiltered: capped at 50 of the 56 orders.
        let all = db.reports().order_join_report(None).await.unwrap();
        assert_eq!(all.len(), 50);

        // Filtered: every order of that restaurant, no cap interplay.
        let filtered = db
            .reports()
            .order_join_report(Some(other.restaurant_id))
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].restaurant_name, "Mario's");
        // No delivery assigned yet: LEFT JOIN columns are empty.
        assert!(filtered[0].driver_name.is_none());
        assert!(filtered[0].delivery_fee_cents.is_none());
    }

    #[tokio::test]
    async fn test_join_report_carries_delivery_fields() {
        let db = test_db().await;
        let world = TestWorld::seed(&db).await;
        let order_id = place_test_order(&db, &world, 1).await;
        db.workflow()
            .assign_delivery(order_id, world.restaurant_id, world.driver_id, "12 Elm St", 350)
            .await
            .unwrap();

        let rows = db.reports().order_join_report(None).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].driver_name.as_deref(), Some("Max Verst"));
        assert_eq!(rows[0].delivery_location.as_deref(), Some("12 Elm St"));
        assert_eq!(rows[0].delivery_fee_cents, Some(350));
    }

    #[tokio::test]
    async fn test_restaurant_aggregate_exact_cents() {
        let db = test_db().await;
        let world = TestWorld::seed(&db).await;
        // Menu item priced so three orders total $10, $20, $30.
        let item = db
            .menu_items()
            .create(world.restaurant_id, "Slice", None, 1000)
            .await
            .unwrap();
        for qty in [1, 2, 3] {
            db.workflow()
                .place_order(
                    world.customer_id,
                    world.restaurant_id,
                    Utc::now(),
                    item.menu_item_id,
                    qty,
                )
                .await
                .unwrap();
        }

        let report = db
            .reports()
            .aggregate_report(AggregateVariant::Restaurants)
            .await
            .unwrap();
        let rows = match report {
            AggregateReport::Restaurants(rows) => rows,
            other => panic!("expected restaurant report, got {other:?}"),
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].order_count, 3);
        assert_eq!(rows[0].total_revenue.cents(), 6000);
        assert_eq!(rows[0].avg_revenue.cents(), 2000);
        assert_eq!(rows[0].max_revenue.cents(), 3000);
        assert_eq!(rows[0].min_revenue.cents(), 1000);
    }

    #[tokio::test]
    async fn test_driver_aggregate_includes_idle_drivers() {
        let db = test_db().await;
        let world = TestWorld::seed(&db).await;
        let idle = db
            .drivers()
            .create("Lewis", "Ham", "Midtown", "Harbor")
            .await
            .unwrap();
        let order_id = place_test_order(&db, &world, 1).await;
        db.workflow()
            .assign_delivery(order_id, world.restaurant_id, world.driver_id, "12 Elm St", 500)
            .await
            .unwrap();

        let report = db
            .reports()
            .aggregate_report(AggregateVariant::Drivers)
            .await
            .unwrap();
        let rows = match report {
            AggregateReport::Drivers(rows) => rows,
            other => panic!("expected driver report, got {other:?}"),
        };
        assert_eq!(rows.len(), 2);
        // Earners first, idle driver with zeros still present.
        assert_eq!(rows[0].driver_id, world.driver_id);
        assert_eq!(rows[0].total_fees.cents(), 500);
        assert_eq!(rows[1].driver_id, idle.driver_id);
        assert_eq!(rows[1].delivery_count, 0);
        assert!(rows[1].total_fees.is_zero());
        assert!(rows[1].avg_fee.is_zero());
    }

    #[tokio::test]
    async fn test_customer_aggregate_excludes_orderless() {
        let db = test_db().await;
        let world = TestWorld::seed(&db).await;
        db.customers()
            .create("Grace", "Hopper", "555-0103", "grace@example.com")
            .await
            .unwrap();
        place_test_order(&db, &world, 2).await;

        let report = db
            .reports()
            .aggregate_report(AggregateVariant::Customers)
            .await
            .unwrap();
        let rows = match report {
            AggregateReport::Customers(rows) => rows,
            other => panic!("expected customer report, got {other:?}"),
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].customer_name, "Ada Lovelace");
        assert_eq!(rows[0].total_spend.cents(), world.menu_price_cents * 2);
    }

    #[tokio::test]
    async fn test_dashboard_counts() {
        let db = test_db().await;
        let world = TestWorld::seed(&db).await;
        let order_id = place_test_order(&db, &world, 1).await;
        db.workflow()
            .assign_delivery(order_id, world.restaurant_id, world.driver_id, "12 Elm St", 350)
            .await
            .unwrap();

        let counts = db.reports().dashboard_counts().await.unwrap();
        assert_eq!(counts.orders, 1);
        assert_eq!(counts.deliveries, 1);
        assert_eq!(counts.drivers, 1);
        assert_eq!(counts.restaurants, 1);
    }
}
