//! # Transactional Workflow Service
//!
//! PlaceOrder and AssignDelivery as single atomic operations.
//!
//! ## PlaceOrder Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      PlaceOrder Transaction                             │
//! │                                                                         │
//! │  validate quantity (> 0)                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │   ├── customer exists?          ── no ──► Reference, rollback           │
//! │   ├── restaurant exists?        ── no ──► Reference, rollback           │
//! │   ├── menu item exists?         ── no ──► Reference, rollback           │
//! │   ├── item on that restaurant?  ── no ──► Conflict,  rollback           │
//! │   ├── INSERT order   (total = price × quantity)                         │
//! │   ├── INSERT order item                                                 │
//! │   └── INSERT customer_current_orders row                                │
//! │  COMMIT ──► OrderID                                                     │
//! │                                                                         │
//! │  Any storage failure mid-sequence drops the transaction, which rolls    │
//! │  back every statement above: no partial state is ever visible.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! These two operations replace the stored procedures of the original
//! system with explicit application-level transactions producing the same
//! computed values (order total, active-order count).

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use dishpatch_core::validation::{validate_fee_cents, validate_location, validate_quantity};
use dishpatch_core::Money;

/// Executes the multi-step order-placement and delivery-assignment
/// workflows, each inside one transaction.
#[derive(Debug, Clone)]
pub struct WorkflowService {
    pool: SqlitePool,
}

impl WorkflowService {
    /// Creates a new WorkflowService.
    pub fn new(pool: SqlitePool) -> Self {
        WorkflowService { pool }
    }

    /// Places an order: one Order row, one OrderItem row, one
    /// customer_current_orders row, all inside one transaction.
    ///
    /// ## Arguments
    /// * `customer_id` / `restaurant_id` / `menu_item_id` - must reference
    ///   existing rows; the menu item must belong to the restaurant
    /// * `order_date` - caller-supplied order timestamp
    /// * `quantity` - positive line quantity
    ///
    /// ## Returns
    /// The new order's id. `Order.total_cents` is the menu item's price
    /// multiplied by the quantity.
    ///
    /// ## Errors
    /// * `DbError::Validation` - quantity out of range
    /// * `DbError::Reference` - customer, restaurant or menu item missing
    /// * `DbError::Conflict` - menu item belongs to a different restaurant
    /// * `DbError::Transaction` - storage failure; everything rolled back
    pub async fn place_order(
        &self,
        customer_id: i64,
        restaurant_id: i64,
        order_date: DateTime<Utc>,
        menu_item_id: i64,
        quantity: i64,
    ) -> DbResult<i64> {
        validate_quantity(quantity)?;

        debug!(
            customer_id,
            restaurant_id, menu_item_id, quantity, "Placing order"
        );

        let mut tx = self.pool.begin().await?;

        let customer: Option<i64> =
            sqlx::query_scalar("SELECT customer_id FROM customers WHERE customer_id = ?1")
                .bind(customer_id)
                .fetch_optional(&mut *tx)
                .await?;
        if customer.is_none() {
            return Err(DbError::reference("Customer", customer_id));
        }

        let restaurant: Option<i64> =
            sqlx::query_scalar("SELECT restaurant_id FROM restaurants WHERE restaurant_id = ?1")
                .bind(restaurant_id)
                .fetch_optional(&mut *tx)
                .await?;
        if restaurant.is_none() {
            return Err(DbError::reference("Restaurant", restaurant_id));
        }

        let menu_item: Option<(i64, i64)> = sqlx::query_as(
            "SELECT restaurant_id, price_cents FROM menu_items WHERE menu_item_id = ?1",
        )
        .bind(menu_item_id)
        .fetch_optional(&mut *tx)
        .await?;
        let (item_restaurant_id, price_cents) = match menu_item {
            Some(row) => row,
            None => return Err(DbError::reference("MenuItem", menu_item_id)),
        };

        if item_restaurant_id != restaurant_id {
            return Err(DbError::conflict(format!(
                "menu item {} does not belong to restaurant {}",
                menu_item_id, restaurant_id
            )));
        }

        // Total is frozen at placement time: price × quantity.
        let total = Money::from_cents(price_cents).multiply_quantity(quantity);

        let order_result = sqlx::query(
            r#"
            INSERT INTO orders (customer_id, restaurant_id, order_date, total_cents)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(customer_id)
        .bind(restaurant_id)
        .bind(order_date)
        .bind(total.cents())
        .execute(&mut *tx)
        .await?;
        let order_id = order_result.last_insert_rowid();

        sqlx::query(
            r#"
            INSERT INTO order_items (order_id, menu_item_id, quantity, line_total_cents)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(order_id)
        .bind(menu_item_id)
        .bind(quantity)
        .bind(total.cents())
        .execute(&mut *tx)
        .await?;

        // The order is active until delivered or deleted; the nested report
        // counts these rows.
        sqlx::query(
            r#"
            INSERT INTO customer_current_orders (customer_id, order_id)
            VALUES (?1, ?2)
            "#,
        )
        .bind(customer_id)
        .bind(order_id)
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::Transaction(e.to_string()))?;

        info!(order_id, total = %total, "Order placed");
        Ok(order_id)
    }

    /// Assigns a delivery to an order: one Delivery row with pickup time
    /// set to now, inside one transaction.
    ///
    /// ## Policy
    /// At most one active delivery per order; a second assignment is a
    /// `Conflict`. The restaurant id is honored as a cross-check: the order
    /// must belong to it.
    ///
    /// ## Errors
    /// * `DbError::Validation` - negative fee or empty location
    /// * `DbError::Reference` - order or driver missing
    /// * `DbError::Conflict` - duplicate delivery or restaurant mismatch
    /// * `DbError::Transaction` - storage failure; rolled back
    pub async fn assign_delivery(
        &self,
        order_id: i64,
        restaurant_id: i64,
        driver_id: i64,
        location: &str,
        fee_cents: i64,
    ) -> DbResult<i64> {
        validate_fee_cents(fee_cents)?;
        validate_location(location)?;

        debug!(order_id, driver_id, fee_cents, "Assigning delivery");

        let mut tx = self.pool.begin().await?;

        let order_restaurant: Option<i64> =
            sqlx::query_scalar("SELECT restaurant_id FROM orders WHERE order_id = ?1")
                .bind(order_id)
                .fetch_optional(&mut *tx)
                .await?;
        let order_restaurant = match order_restaurant {
            Some(id) => id,
            None => return Err(DbError::reference("Order", order_id)),
        };

        if order_restaurant != restaurant_id {
            return Err(DbError::conflict(format!(
                "order {} does not belong to restaurant {}",
                order_id, restaurant_id
            )));
        }

        let driver: Option<i64> =
            sqlx::query_scalar("SELECT driver_id FROM drivers WHERE driver_id = ?1")
                .bind(driver_id)
                .fetch_optional(&mut *tx)
                .await?;
        if driver.is_none() {
            return Err(DbError::reference("Driver", driver_id));
        }

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM deliveries WHERE order_id = ?1")
            .bind(order_id)
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            return Err(DbError::conflict(format!(
                "order {} already has an active delivery",
                order_id
            )));
        }

        let pickup_time = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO deliveries (order_id, driver_id, pickup_time, location, fee_cents)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(order_id)
        .bind(driver_id)
        .bind(pickup_time)
        .bind(location)
        .bind(fee_cents)
        .execute(&mut *tx)
        .await?;
        let delivery_id = result.last_insert_rowid();

        tx.commit()
            .await
            .map_err(|e| DbError::Transaction(e.to_string()))?;

        info!(delivery_id, order_id, driver_id, "Delivery assigned");
        Ok(delivery_id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::fixtures::{place_test_order, test_db, TestWorld};
    use crate::DbError;
    use chrono::Utc;

    #[tokio::test]
    async fn test_place_order_computes_total() {
        let db = test_db().await;
        let world = TestWorld::seed(&db).await;

        let order_id = db
            .workflow()
            .place_order(
                world.customer_id,
                world.restaurant_id,
                Utc::now(),
                world.menu_item_id,
                3,
            )
            .await
            .unwrap();

        let order = db.orders().get_by_id(order_id).await.unwrap().unwrap();
        assert_eq!(order.total_cents, world.menu_price_cents * 3);

        // Exactly one order, one item, one current-orders row.
        let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(db.pool())
            .await
            .unwrap();
        let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(orders, 1);
        assert_eq!(items, 1);
        assert_eq!(
            db.orders()
                .active_order_count(world.customer_id)
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_place_order_rejects_nonpositive_quantity() {
        let db = test_db().await;
        let world = TestWorld::seed(&db).await;

        for qty in [0, -1] {
            let err = db
                .workflow()
                .place_order(
                    world.customer_id,
                    world.restaurant_id,
                    Utc::now(),
                    world.menu_item_id,
                    qty,
                )
                .await
                .unwrap_err();
            assert!(matches!(err, DbError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn test_place_order_missing_references() {
        let db = test_db().await;
        let world = TestWorld::seed(&db).await;

        let err = db
            .workflow()
            .place_order(999, world.restaurant_id, Utc::now(), world.menu_item_id, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Reference { .. }));

        let err = db
            .workflow()
            .place_order(world.customer_id, world.restaurant_id, Utc::now(), 999, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Reference { .. }));
    }

    #[tokio::test]
    async fn test_place_order_wrong_restaurant_leaves_no_rows() {
        let db = test_db().await;
        let world = TestWorld::seed(&db).await;
        let other = db
            .restaurants()
            .create("Mario's", "2 Side St", "555-0102")
            .await
            .unwrap();

        let err = db
            .workflow()
            .place_order(
                world.customer_id,
                other.restaurant_id,
                Utc::now(),
                world.menu_item_id,
                1,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict { .. }));

        // Rollback: nothing was written.
        let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(orders, 0);
        assert_eq!(
            db.orders()
                .active_order_count(world.customer_id)
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_place_order_rolls_back_partial_writes_on_failure() {
        let db = test_db().await;
        let world = TestWorld::seed(&db).await;

        // Make the workflow's final INSERT fail after the order and its
        // item rows were already written inside the transaction.
        sqlx::query(
            r#"
            CREATE TRIGGER fail_current_orders
            BEFORE INSERT ON customer_current_orders
            BEGIN
                SELECT RAISE(ABORT, 'simulated storage failure');
            END
            "#,
        )
        .execute(db.pool())
        .await
        .unwrap();

        let err = db
            .workflow()
            .place_order(
                world.customer_id,
                world.restaurant_id,
                Utc::now(),
                world.menu_item_id,
                1,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::QueryFailed(_)));

        // Rollback erased the writes that had already happened.
        for table in ["orders", "order_items", "customer_current_orders"] {
            let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
                .fetch_one(db.pool())
                .await
                .unwrap();
            assert_eq!(count, 0, "{} should be empty", table);
        }
    }

    #[tokio::test]
    async fn test_assign_delivery() {
        let db = test_db().await;
        let world = TestWorld::seed(&db).await;
        let order_id = place_test_order(&db, &world, 1).await;

        let delivery_id = db
            .workflow()
            .assign_delivery(order_id, world.restaurant_id, world.driver_id, "12 Elm St", 350)
            .await
            .unwrap();

        let deliveries = db.orders().deliveries_for_order(order_id).await.unwrap();
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].delivery_id, delivery_id);
        assert_eq!(deliveries[0].fee().cents(), 350);
        assert_eq!(deliveries[0].location, "12 Elm St");
    }

    #[tokio::test]
    async fn test_assign_delivery_duplicate_is_conflict() {
        let db = test_db().await;
        let world = TestWorld::seed(&db).await;
        let order_id = place_test_order(&db, &world, 1).await;

        db.workflow()
            .assign_delivery(order_id, world.restaurant_id, world.driver_id, "12 Elm St", 350)
            .await
            .unwrap();

        let err = db
            .workflow()
            .assign_delivery(order_id, world.restaurant_id, world.driver_id, "12 Elm St", 350)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_delivery_blocked_by_schema() {
        let db = test_db().await;
        let world = TestWorld::seed(&db).await;
        let order_id = place_test_order(&db, &world, 1).await;
        db.workflow()
            .assign_delivery(order_id, world.restaurant_id, world.driver_id, "12 Elm St", 350)
            .await
            .unwrap();

        // Even a raw insert bypassing the workflow cannot create a second
        // delivery for the same order: deliveries.order_id is UNIQUE.
        let result = sqlx::query(
            r#"
            INSERT INTO deliveries (order_id, driver_id, pickup_time, location, fee_cents)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(order_id)
        .bind(world.driver_id)
        .bind(Utc::now())
        .bind("88 Oak Ave")
        .bind(400_i64)
        .execute(db.pool())
        .await;
        assert!(result.is_err());

        let deliveries = db.orders().deliveries_for_order(order_id).await.unwrap();
        assert_eq!(deliveries.len(), 1);
    }

    #[tokio::test]
    async fn test_assign_delivery_missing_order_or_driver() {
        let db = test_db().await;
        let world = TestWorld::seed(&db).await;
        let order_id = place_test_order(&db, &world, 1).await;

        let err = db
            .workflow()
            .assign_delivery(999, world.restaurant_id, world.driver_id, "12 Elm St", 350)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Reference { .. }));

        let err = db
            .workflow()
            .assign_delivery(order_id, world.restaurant_id, 999, "12 Elm St", 350)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Reference { .. }));
    }

    #[tokio::test]
    async fn test_assign_delivery_rejects_negative_fee() {
        let db = test_db().await;
        let world = TestWorld::seed(&db).await;
        let order_id = place_test_order(&db, &world, 1).await;

        let err = db
            .workflow()
            .assign_delivery(order_id, world.restaurant_id, world.driver_id, "12 Elm St", -1)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }
}
