//! # Database Migrations
//!
//! Embedded SQL migrations plus the startup schema capability check.
//!
//! ## How Migrations Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Migration Process                                  │
//! │                                                                         │
//! │  Startup                                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Check _sqlx_migrations table (created if missing)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Compare embedded migrations vs applied, run pending ones in order      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  verify_schema: every required table must exist                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Startup continues (or fails with SchemaMissing)                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Adding New Migrations
//!
//! 1. Create a new file in `migrations/sqlite/` with the next sequence number
//! 2. Name format: `NNN_description.sql`
//! 3. **NEVER** modify existing migrations - always add new ones

use sqlx::SqlitePool;
use tracing::info;

use crate::error::{DbError, DbResult};

/// Embedded migrations from the `migrations/sqlite` directory.
///
/// The `sqlx::migrate!()` macro embeds all SQL files from the specified
/// directory into the binary at compile time. No runtime file access needed.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Tables every operation in this crate relies on.
///
/// Checked once at startup instead of wrapping each query in a
/// "does this table exist" fallback.
const REQUIRED_TABLES: &[&str] = &[
    "customers",
    "restaurants",
    "menu_items",
    "drivers",
    "orders",
    "order_items",
    "deliveries",
    "customer_current_orders",
];

/// Runs all pending database migrations.
///
/// ## Safety
/// - Idempotent: safe to run multiple times
/// - Transactional: each migration runs in a transaction
/// - Ordered: migrations run in filename order (001, 002, ...)
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Verifies that every required table exists.
///
/// ## Why At Startup
/// The repositories and report queries assume the full schema. Resolving
/// that capability once here means a missing table surfaces as a single
/// clear [`DbError::SchemaMissing`] instead of per-request query failures
/// silently treated as empty results.
pub async fn verify_schema(pool: &SqlitePool) -> DbResult<()> {
    for table in REQUIRED_TABLES {
        let found: Option<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
        )
        .bind(table)
        .fetch_optional(pool)
        .await?;

        if found.is_none() {
            return Err(DbError::SchemaMissing {
                table: (*table).to_string(),
            });
        }
    }

    info!(tables = REQUIRED_TABLES.len(), "Schema verified");
    Ok(())
}

/// Returns information about migrations.
///
/// ## Returns
/// Tuple of (total_migrations, applied_migrations), for diagnostics.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok((total, applied as usize))
}
