//! # Menu Item Repository
//!
//! Database operations for menu items. Every menu item belongs to exactly
//! one restaurant; the owning restaurant must exist when an item is created.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use dishpatch_core::validation::{validate_name, validate_price_cents};
use dishpatch_core::MenuItem;

/// Repository for menu item database operations.
#[derive(Debug, Clone)]
pub struct MenuItemRepository {
    pool: SqlitePool,
}

impl MenuItemRepository {
    /// Creates a new MenuItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MenuItemRepository { pool }
    }

    /// Inserts a new menu item and returns it with its assigned id.
    ///
    /// ## Errors
    /// * `DbError::Validation` - empty name or negative price
    /// * `DbError::Reference` - owning restaurant doesn't exist
    pub async fn create(
        &self,
        restaurant_id: i64,
        name: &str,
        description: Option<&str>,
        price_cents: i64,
    ) -> DbResult<MenuItem> {
        validate_name("name", name)?;
        validate_price_cents(price_cents)?;

        debug!(restaurant_id, name, price_cents, "Creating menu item");

        let exists: Option<i64> =
            sqlx::query_scalar("SELECT restaurant_id FROM restaurants WHERE restaurant_id = ?1")
                .bind(restaurant_id)
                .fetch_optional(&self.pool)
                .await?;
        if exists.is_none() {
            return Err(DbError::reference("Restaurant", restaurant_id));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO menu_items (restaurant_id, name, description, price_cents)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(restaurant_id)
        .bind(name)
        .bind(description)
        .bind(price_cents)
        .execute(&self.pool)
        .await?;

        Ok(MenuItem {
            menu_item_id: result.last_insert_rowid(),
            restaurant_id,
            name: name.to_string(),
            description: description.map(str::to_string),
            price_cents,
        })
    }

    /// Updates an existing menu item.
    pub async fn update(
        &self,
        menu_item_id: i64,
        restaurant_id: i64,
        name: &str,
        description: Option<&str>,
        price_cents: i64,
    ) -> DbResult<()> {
        validate_name("name", name)?;
        validate_price_cents(price_cents)?;

        debug!(menu_item_id, "Updating menu item");

        let result = sqlx::query(
            r#"
            UPDATE menu_items
            SET restaurant_id = ?2, name = ?3, description = ?4, price_cents = ?5
            WHERE menu_item_id = ?1
            "#,
        )
        .bind(menu_item_id)
        .bind(restaurant_id)
        .bind(name)
        .bind(description)
        .bind(price_cents)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("MenuItem", menu_item_id));
        }

        Ok(())
    }

    /// Gets a menu item by id.
    pub async fn get_by_id(&self, menu_item_id: i64) -> DbResult<Option<MenuItem>> {
        let item = sqlx::query_as::<_, MenuItem>(
            r#"
            SELECT menu_item_id, restaurant_id, name, description, price_cents
            FROM menu_items
            WHERE menu_item_id = ?1
            "#,
        )
        .bind(menu_item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Lists all menu items, newest first.
    pub async fn list(&self) -> DbResult<Vec<MenuItem>> {
        let items = sqlx::query_as::<_, MenuItem>(
            r#"
            SELECT menu_item_id, restaurant_id, name, description, price_cents
            FROM menu_items
            ORDER BY menu_item_id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists the menu of a single restaurant, ordered by name.
    pub async fn list_for_restaurant(&self, restaurant_id: i64) -> DbResult<Vec<MenuItem>> {
        let items = sqlx::query_as::<_, MenuItem>(
            r#"
            SELECT menu_item_id, restaurant_id, name, description, price_cents
            FROM menu_items
            WHERE restaurant_id = ?1
            ORDER BY name
            "#,
        )
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}
