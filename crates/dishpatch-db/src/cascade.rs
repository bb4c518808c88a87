//! # Cascading Delete Engine
//!
//! All deletes in one place, each inside one transaction.
//!
//! ## Deletion Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Children Before Parents                                │
//! │                                                                         │
//! │  delete_customer                                                        │
//! │   └── for each of the customer's orders:                                │
//! │        deliveries → order_items → current-orders row → order            │
//! │       then the customer row                                             │
//! │                                                                         │
//! │  delete_order                                                           │
//! │   └── deliveries → order_items → current-orders rows → order            │
//! │                                                                         │
//! │  delete_restaurant / delete_driver / delete_menu_item                   │
//! │   └── direct DELETE; a foreign-key rejection is translated into the     │
//! │       name of the blocking relationship and nothing is removed          │
//! │                                                                         │
//! │  delete_delivery                                                        │
//! │   └── leaf row, nothing references it                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Foreign keys are enforced on every connection, so the explicit ordering
//! above is not just convention: deleting a parent with live children fails
//! at the storage layer too.

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

/// Row counts removed by a single order deletion.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDeleteOutcome {
    pub deleted_deliveries: u64,
    pub deleted_items: u64,
}

/// Summary of a customer deletion, for confirmation messages.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerDeleteOutcome {
    pub deleted_orders: u64,
    pub customer_name: String,
}

/// Executes cascading and guarded deletes.
#[derive(Debug, Clone)]
pub struct DeleteEngine {
    pool: SqlitePool,
}

impl DeleteEngine {
    /// Creates a new DeleteEngine.
    pub fn new(pool: SqlitePool) -> Self {
        DeleteEngine { pool }
    }

    /// Deletes an order and everything hanging off it, in one transaction.
    ///
    /// Removes deliveries, order items, and any current-orders rows for the
    /// order before the order row itself. The outcome counts deliveries and
    /// items only; current-orders rows are bookkeeping, not user data.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - order doesn't exist
    /// * `DbError::Transaction` - storage failure; nothing removed
    pub async fn delete_order(&self, order_id: i64) -> DbResult<OrderDeleteOutcome> {
        debug!(order_id, "Deleting order");

        let mut tx = self.pool.begin().await?;

        let exists: Option<i64> =
            sqlx::query_scalar("SELECT order_id FROM orders WHERE order_id = ?1")
                .bind(order_id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Err(DbError::not_found("Order", order_id));
        }

        let deleted_deliveries = sqlx::query("DELETE FROM deliveries WHERE order_id = ?1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted_items = sqlx::query("DELETE FROM order_items WHERE order_id = ?1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM customer_current_orders WHERE order_id = ?1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM orders WHERE order_id = ?1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::Transaction(e.to_string()))?;

        info!(order_id, deleted_deliveries, deleted_items, "Order deleted");
        Ok(OrderDeleteOutcome {
            deleted_deliveries,
            deleted_items,
        })
    }

    /// Deletes a customer and their entire order history, in one transaction.
    ///
    /// Walks every order the customer has and removes its children first,
    /// then the orders, then the customer row. Returns the number of orders
    /// removed and the customer's name for confirmation.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - customer doesn't exist
    /// * `DbError::Transaction` - storage failure; nothing removed
    pub async fn delete_customer(&self, customer_id: i64) -> DbResult<CustomerDeleteOutcome> {
        debug!(customer_id, "Deleting customer");

        let mut tx = self.pool.begin().await?;

        let name: Option<(String, String)> = sqlx::query_as(
            "SELECT first_name, last_name FROM customers WHERE customer_id = ?1",
        )
        .bind(customer_id)
        .fetch_optional(&mut *tx)
        .await?;
        let customer_name = match name {
            Some((first, last)) => format!("{} {}", first, last),
            None => return Err(DbError::not_found("Customer", customer_id)),
        };

        sqlx::query(
            r#"
            DELETE FROM deliveries
            WHERE order_id IN (SELECT order_id FROM orders WHERE customer_id = ?1)
            "#,
        )
        .bind(customer_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            DELETE FROM order_items
            WHERE order_id IN (SELECT order_id FROM orders WHERE customer_id = ?1)
            "#,
        )
        .bind(customer_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM customer_current_orders WHERE customer_id = ?1")
            .bind(customer_id)
            .execute(&mut *tx)
            .await?;

        let deleted_orders = sqlx::query("DELETE FROM orders WHERE customer_id = ?1")
            .bind(customer_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM customers WHERE customer_id = ?1")
            .bind(customer_id)
            .execute(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::Transaction(e.to_string()))?;

        info!(customer_id, deleted_orders, "Customer deleted");
        Ok(CustomerDeleteOutcome {
            deleted_orders,
            customer_name,
        })
    }

    /// Deletes a restaurant if nothing references it.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - restaurant doesn't exist
    /// * `DbError::ReferentialIntegrity` - restaurant owns menu items or is
    ///   referenced by orders; nothing removed
    pub async fn delete_restaurant(&self, restaurant_id: i64) -> DbResult<()> {
        debug!(restaurant_id, "Deleting restaurant");

        match self
            .try_direct_delete("restaurants", "restaurant_id", restaurant_id, "Restaurant")
            .await
        {
            Err(DbError::ForeignKeyViolation { .. }) => {
                let blocked_by = self.classify_restaurant_block(restaurant_id).await?;
                Err(DbError::blocked("Restaurant", restaurant_id, blocked_by))
            }
            other => other,
        }
    }

    /// Deletes a driver if no deliveries reference them.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - driver doesn't exist
    /// * `DbError::ReferentialIntegrity` - driver has deliveries assigned
    pub async fn delete_driver(&self, driver_id: i64) -> DbResult<()> {
        debug!(driver_id, "Deleting driver");

        match self
            .try_direct_delete("drivers", "driver_id", driver_id, "Driver")
            .await
        {
            Err(DbError::ForeignKeyViolation { .. }) => Err(DbError::blocked(
                "Driver",
                driver_id,
                "has deliveries assigned",
            )),
            other => other,
        }
    }

    /// Deletes a menu item if no order items reference it.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - menu item doesn't exist
    /// * `DbError::ReferentialIntegrity` - item is referenced by order items
    pub async fn delete_menu_item(&self, menu_item_id: i64) -> DbResult<()> {
        debug!(menu_item_id, "Deleting menu item");

        match self
            .try_direct_delete("menu_items", "menu_item_id", menu_item_id, "MenuItem")
            .await
        {
            Err(DbError::ForeignKeyViolation { .. }) => Err(DbError::blocked(
                "MenuItem",
                menu_item_id,
                "is referenced by order items",
            )),
            other => other,
        }
    }

    /// Deletes a delivery. Deliveries are leaves, so no cascade is needed.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - delivery doesn't exist
    pub async fn delete_delivery(&self, delivery_id: i64) -> DbResult<()> {
        debug!(delivery_id, "Deleting delivery");

        let result = sqlx::query("DELETE FROM deliveries WHERE delivery_id = ?1")
            .bind(delivery_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Delivery", delivery_id));
        }

        info!(delivery_id, "Delivery deleted");
        Ok(())
    }

    /// Attempts a single-row delete; a foreign-key rejection surfaces as
    /// `ForeignKeyViolation` for the caller to classify. The table and
    /// column names are compile-time constants from this module only.
    async fn try_direct_delete(
        &self,
        table: &str,
        id_column: &str,
        id: i64,
        entity: &str,
    ) -> DbResult<()> {
        let sql = format!("DELETE FROM {} WHERE {} = ?1", table, id_column);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(entity, id));
        }

        info!(entity, id, "Deleted");
        Ok(())
    }

    /// Names the relationship that blocked a restaurant delete.
    async fn classify_restaurant_block(&self, restaurant_id: i64) -> DbResult<String> {
        let menu_items: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM menu_items WHERE restaurant_id = ?1")
                .bind(restaurant_id)
                .fetch_one(&self.pool)
                .await?;
        if menu_items > 0 {
            return Ok("owns menu items".to_string());
        }

        Ok("is referenced by orders".to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::fixtures::{place_test_order, test_db, TestWorld};
    use crate::DbError;

    #[tokio::test]
    async fn test_delete_order_cascades() {
        let db = test_db().await;
        let world = TestWorld::seed(&db).await;
        let order_id = place_test_order(&db, &world, 2).await;
        db.workflow()
            .assign_delivery(order_id, world.restaurant_id, world.driver_id, "12 Elm St", 350)
            .await
            .unwrap();

        let outcome = db.deletes().delete_order(order_id).await.unwrap();
        assert_eq!(outcome.deleted_deliveries, 1);
        assert_eq!(outcome.deleted_items, 1);

        assert!(db.orders().get_by_id(order_id).await.unwrap().is_none());
        assert_eq!(
            db.orders()
                .active_order_count(world.customer_id)
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_delete_order_missing() {
        let db = test_db().await;

        let err = db.deletes().delete_order(999).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_customer_removes_history() {
        let db = test_db().await;
        let world = TestWorld::seed(&db).await;
        let order_id = place_test_order(&db, &world, 1).await;
        place_test_order(&db, &world, 2).await;
        db.workflow()
            .assign_delivery(order_id, world.restaurant_id, world.driver_id, "12 Elm St", 350)
            .await
            .unwrap();

        let outcome = db.deletes().delete_customer(world.customer_id).await.unwrap();
        assert_eq!(outcome.deleted_orders, 2);
        assert_eq!(outcome.customer_name, "Ada Lovelace");

        for table in ["orders", "order_items", "deliveries", "customer_current_orders"] {
            let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
                .fetch_one(db.pool())
                .await
                .unwrap();
            assert_eq!(count, 0, "{} should be empty", table);
        }
        assert!(db
            .customers()
            .get_by_id(world.customer_id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_customer_failure_leaves_store_unchanged() {
        let db = test_db().await;
        let world = TestWorld::seed(&db).await;
        let order_id = place_test_order(&db, &world, 1).await;
        place_test_order(&db, &world, 2).await;
        db.workflow()
            .assign_delivery(order_id, world.restaurant_id, world.driver_id, "12 Elm St", 350)
            .await
            .unwrap();

        // Fail the cascade's last statement, after the order history was
        // already deleted inside the transaction.
        sqlx::query(
            r#"
            CREATE TRIGGER fail_customer_delete
            BEFORE DELETE ON customers
            BEGIN
                SELECT RAISE(ABORT, 'simulated storage failure');
            END
            "#,
        )
        .execute(db.pool())
        .await
        .unwrap();

        let err = db
            .deletes()
            .delete_customer(world.customer_id)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::QueryFailed(_)));

        // Rollback: the full history is still there.
        for (table, expected) in [
            ("customers", 1),
            ("orders", 2),
            ("order_items", 2),
            ("deliveries", 1),
            ("customer_current_orders", 2),
        ] {
            let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
                .fetch_one(db.pool())
                .await
                .unwrap();
            assert_eq!(count, expected, "{} should be unchanged", table);
        }
    }

    #[tokio::test]
    async fn test_delete_restaurant_blocked_by_menu() {
        let db = test_db().await;
        let world = TestWorld::seed(&db).await;

        let err = db
            .deletes()
            .delete_restaurant(world.restaurant_id)
            .await
            .unwrap_err();
        match err {
            DbError::ReferentialIntegrity { blocked_by, .. } => {
                assert_eq!(blocked_by, "owns menu items");
            }
            other => panic!("expected ReferentialIntegrity, got {other:?}"),
        }

        // Nothing was removed.
        assert!(db
            .restaurants()
            .get_by_id(world.restaurant_id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_delete_restaurant_unreferenced() {
        let db = test_db().await;
        let r = db
            .restaurants()
            .create("Mario's", "2 Side St", "555-0102")
            .await
            .unwrap();

        db.deletes().delete_restaurant(r.restaurant_id).await.unwrap();
        assert!(db
            .restaurants()
            .get_by_id(r.restaurant_id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_driver_blocked_by_delivery() {
        let db = test_db().await;
        let world = TestWorld::seed(&db).await;
        let order_id = place_test_order(&db, &world, 1).await;
        db.workflow()
            .assign_delivery(order_id, world.restaurant_id, world.driver_id, "12 Elm St", 350)
            .await
            .unwrap();

        let err = db.deletes().delete_driver(world.driver_id).await.unwrap_err();
        match err {
            DbError::ReferentialIntegrity { blocked_by, .. } => {
                assert_eq!(blocked_by, "has deliveries assigned");
            }
            other => panic!("expected ReferentialIntegrity, got {other:?}"),
        }

        // Deleting the delivery unblocks the driver.
        let deliveries = db.orders().deliveries_for_order(order_id).await.unwrap();
        db.deletes()
            .delete_delivery(deliveries[0].delivery_id)
            .await
            .unwrap();
        db.deletes().delete_driver(world.driver_id).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_menu_item_blocked_by_order_items() {
        let db = test_db().await;
        let world = TestWorld::seed(&db).await;
        place_test_order(&db, &world, 1).await;

        let err = db
            .deletes()
            .delete_menu_item(world.menu_item_id)
            .await
            .unwrap_err();
        match err {
            DbError::ReferentialIntegrity { blocked_by, .. } => {
                assert_eq!(blocked_by, "is referenced by order items");
            }
            other => panic!("expected ReferentialIntegrity, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_delivery_missing() {
        let db = test_db().await;

        let err = db.deletes().delete_delivery(999).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
