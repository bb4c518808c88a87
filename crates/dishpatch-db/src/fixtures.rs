//! Shared test fixtures: an in-memory database and a small seeded world
//! (one customer, one restaurant with a menu item, one driver).

use chrono::Utc;

use crate::pool::{Database, DbConfig};

/// Opens a fresh in-memory database with migrations applied.
pub(crate) async fn test_db() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database")
}

/// Ids of the seeded rows, so tests can reference them without re-querying.
pub(crate) struct TestWorld {
    pub customer_id: i64,
    pub restaurant_id: i64,
    pub menu_item_id: i64,
    pub menu_price_cents: i64,
    pub driver_id: i64,
}

impl TestWorld {
    pub(crate) async fn seed(db: &Database) -> Self {
        let customer = db
            .customers()
            .create("Ada", "Lovelace", "555-0100", "ada@example.com")
            .await
            .expect("seed customer");

        let restaurant = db
            .restaurants()
            .create("Luigi's", "1 Main St", "555-0101")
            .await
            .expect("seed restaurant");

        let menu_item = db
            .menu_items()
            .create(restaurant.restaurant_id, "Margherita", Some("Classic"), 1250)
            .await
            .expect("seed menu item");

        let driver = db
            .drivers()
            .create("Max", "Verst", "Downtown", "Uptown")
            .await
            .expect("seed driver");

        TestWorld {
            customer_id: customer.customer_id,
            restaurant_id: restaurant.restaurant_id,
            menu_item_id: menu_item.menu_item_id,
            menu_price_cents: menu_item.price_cents,
            driver_id: driver.driver_id,
        }
    }
}

/// Places an order for the seeded customer at the seeded restaurant.
pub(crate) async fn place_test_order(db: &Database, world: &TestWorld, quantity: i64) -> i64 {
    db.workflow()
        .place_order(
            world.customer_id,
            world.restaurant_id,
            Utc::now(),
            world.menu_item_id,
            quantity,
        )
        .await
        .expect("place test order")
}
