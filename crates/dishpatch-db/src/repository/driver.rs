//! # Driver Repository
//!
//! Database operations for delivery drivers.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use dishpatch_core::validation::validate_name;
use dishpatch_core::Driver;

/// Repository for driver database operations.
#[derive(Debug, Clone)]
pub struct DriverRepository {
    pool: SqlitePool,
}

impl DriverRepository {
    /// Creates a new DriverRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DriverRepository { pool }
    }

    /// Inserts a new driver and returns it with its assigned id.
    pub async fn create(
        &self,
        first_name: &str,
        last_name: &str,
        pickup_area: &str,
        destination_area: &str,
    ) -> DbResult<Driver> {
        validate_name("first_name", first_name)?;
        validate_name("last_name", last_name)?;

        debug!(first_name, last_name, "Creating driver");

        let result = sqlx::query(
            r#"
            INSERT INTO drivers (first_name, last_name, pickup_area, destination_area)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(pickup_area)
        .bind(destination_area)
        .execute(&self.pool)
        .await?;

        Ok(Driver {
            driver_id: result.last_insert_rowid(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            pickup_area: pickup_area.to_string(),
            destination_area: destination_area.to_string(),
        })
    }

    /// Updates an existing driver.
    pub async fn update(
        &self,
        driver_id: i64,
        first_name: &str,
        last_name: &str,
        pickup_area: &str,
        destination_area: &str,
    ) -> DbResult<()> {
        validate_name("first_name", first_name)?;
        validate_name("last_name", last_name)?;

        debug!(driver_id, "Updating driver");

        let result = sqlx::query(
            r#"
            UPDATE drivers
            SET first_name = ?2, last_name = ?3, pickup_area = ?4, destination_area = ?5
            WHERE driver_id = ?1
            "#,
        )
        .bind(driver_id)
        .bind(first_name)
        .bind(last_name)
        .bind(pickup_area)
        .bind(destination_area)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Driver", driver_id));
        }

        Ok(())
    }

    /// Gets a driver by id.
    pub async fn get_by_id(&self, driver_id: i64) -> DbResult<Option<Driver>> {
        let driver = sqlx::query_as::<_, Driver>(
            r#"
            SELECT driver_id, first_name, last_name, pickup_area, destination_area
            FROM drivers
            WHERE driver_id = ?1
            "#,
        )
        .bind(driver_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(driver)
    }

    /// Lists drivers, newest first.
    pub async fn list(&self) -> DbResult<Vec<Driver>> {
        let drivers = sqlx::query_as::<_, Driver>(
            r#"
            SELECT driver_id, first_name, last_name, pickup_area, destination_area
            FROM drivers
            ORDER BY driver_id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(drivers)
    }
}
