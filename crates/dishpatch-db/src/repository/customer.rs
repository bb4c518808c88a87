//! # Customer Repository
//!
//! Database operations for customers.
//!
//! Deletion is not here: removing a customer cascades through orders,
//! order items, deliveries and the derived current-orders table, so it
//! belongs to [`crate::cascade::DeleteEngine`].

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use dishpatch_core::validation::validate_name;
use dishpatch_core::Customer;

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Inserts a new customer and returns it with its assigned id.
    pub async fn create(
        &self,
        first_name: &str,
        last_name: &str,
        phone: &str,
        email: &str,
    ) -> DbResult<Customer> {
        validate_name("first_name", first_name)?;
        validate_name("last_name", last_name)?;

        debug!(first_name, last_name, "Creating customer");

        let result = sqlx::query(
            r#"
            INSERT INTO customers (first_name, last_name, phone, email)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(phone)
        .bind(email)
        .execute(&self.pool)
        .await?;

        Ok(Customer {
            customer_id: result.last_insert_rowid(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
        })
    }

    /// Updates an existing customer.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Customer doesn't exist
    pub async fn update(
        &self,
        customer_id: i64,
        first_name: &str,
        last_name: &str,
        phone: &str,
        email: &str,
    ) -> DbResult<()> {
        validate_name("first_name", first_name)?;
        validate_name("last_name", last_name)?;

        debug!(customer_id, "Updating customer");

        let result = sqlx::query(
            r#"
            UPDATE customers
            SET first_name = ?2, last_name = ?3, phone = ?4, email = ?5
            WHERE customer_id = ?1
            "#,
        )
        .bind(customer_id)
        .bind(first_name)
        .bind(last_name)
        .bind(phone)
        .bind(email)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", customer_id));
        }

        Ok(())
    }

    /// Gets a customer by id.
    pub async fn get_by_id(&self, customer_id: i64) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT customer_id, first_name, last_name, phone, email
            FROM customers
            WHERE customer_id = ?1
            "#,
        )
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Lists customers, newest first.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT customer_id, first_name, last_name, phone, email
            FROM customers
            ORDER BY customer_id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Counts customers (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::fixtures::test_db;
    use crate::DbError;

    #[tokio::test]
    async fn test_create_and_get() {
        let db = test_db().await;

        let created = db
            .customers()
            .create("Ada", "Lovelace", "555-0100", "ada@example.com")
            .await
            .unwrap();
        assert!(created.customer_id > 0);

        let fetched = db
            .customers()
            .get_by_id(created.customer_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.full_name(), "Ada Lovelace");
        assert_eq!(fetched.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_update_missing_customer() {
        let db = test_db().await;

        let err = db
            .customers()
            .update(999, "A", "B", "p", "e")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_name() {
        let db = test_db().await;

        let err = db
            .customers()
            .create("", "Lovelace", "555-0100", "ada@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }
}
