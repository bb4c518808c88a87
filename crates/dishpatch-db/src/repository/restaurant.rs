//! # Restaurant Repository
//!
//! Database operations for restaurants.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use dishpatch_core::validation::validate_name;
use dishpatch_core::Restaurant;

/// Repository for restaurant database operations.
#[derive(Debug, Clone)]
pub struct RestaurantRepository {
    pool: SqlitePool,
}

impl RestaurantRepository {
    /// Creates a new RestaurantRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RestaurantRepository { pool }
    }

    /// Inserts a new restaurant and returns it with its assigned id.
    pub async fn create(&self, name: &str, address: &str, phone: &str) -> DbResult<Restaurant> {
        validate_name("name", name)?;
        validate_name("address", address)?;

        debug!(name, "Creating restaurant");

        let result = sqlx::query(
            r#"
            INSERT INTO restaurants (name, address, phone)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(name)
        .bind(address)
        .bind(phone)
        .execute(&self.pool)
        .await?;

        Ok(Restaurant {
            restaurant_id: result.last_insert_rowid(),
            name: name.to_string(),
            address: address.to_string(),
            phone: phone.to_string(),
        })
    }

    /// Updates an existing restaurant.
    pub async fn update(
        &self,
        restaurant_id: i64,
        name: &str,
        address: &str,
        phone: &str,
    ) -> DbResult<()> {
        validate_name("name", name)?;
        validate_name("address", address)?;

        debug!(restaurant_id, "Updating restaurant");

        let result = sqlx::query(
            r#"
            UPDATE restaurants
            SET name = ?2, address = ?3, phone = ?4
            WHERE restaurant_id = ?1
            "#,
        )
        .bind(restaurant_id)
        .bind(name)
        .bind(address)
        .bind(phone)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Restaurant", restaurant_id));
        }

        Ok(())
    }

    /// Gets a restaurant by id.
    pub async fn get_by_id(&self, restaurant_id: i64) -> DbResult<Option<Restaurant>> {
        let restaurant = sqlx::query_as::<_, Restaurant>(
            r#"
            SELECT restaurant_id, name, address, phone
            FROM restaurants
            WHERE restaurant_id = ?1
            "#,
        )
        .bind(restaurant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(restaurant)
    }

    /// Lists restaurants, newest first.
    pub async fn list(&self) -> DbResult<Vec<Restaurant>> {
        let restaurants = sqlx::query_as::<_, Restaurant>(
            r#"
            SELECT restaurant_id, name, address, phone
            FROM restaurants
            ORDER BY restaurant_id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(restaurants)
    }
}
