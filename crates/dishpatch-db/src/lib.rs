//! # dishpatch-db: Storage Layer for dishpatch
//!
//! This crate provides database access for the order-delivery system.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       dishpatch Data Flow                               │
//! │                                                                         │
//! │  External caller (HTTP layer, excluded)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    dishpatch-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │  ┌───────────┐ ┌──────────────┐ ┌──────────┐ ┌──────────────┐ │   │
//! │  │  │ Database  │ │ Repositories │ │ Workflow │ │ DeleteEngine │ │   │
//! │  │  │ (pool.rs) │ │ (per entity) │ │ Service  │ │ + Reports    │ │   │
//! │  │  └───────────┘ └──────────────┘ └──────────┘ └──────────────┘ │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database (WAL, foreign keys ON)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations and the startup schema check
//! - [`error`] - Storage error taxonomy
//! - [`repository`] - Per-entity repositories (customer, restaurant, ...)
//! - [`workflow`] - PlaceOrder / AssignDelivery as atomic operations
//! - [`cascade`] - Cascading delete engine
//! - [`reports`] - Parameterized reporting query engine
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dishpatch_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/dishpatch.db")).await?;
//!
//! let order_id = db
//!     .workflow()
//!     .place_order(customer_id, restaurant_id, Utc::now(), menu_item_id, 2)
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cascade;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod reports;
pub mod repository;
pub mod workflow;

#[cfg(test)]
pub(crate) mod fixtures;

// =============================================================================
// Re-exports
// =============================================================================

pub use cascade::{CustomerDeleteOutcome, DeleteEngine, OrderDeleteOutcome};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use reports::{AggregateReport, AggregateVariant, ReportService};
pub use workflow::WorkflowService;

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::driver::DriverRepository;
pub use repository::menu_item::MenuItemRepository;
pub use repository::order::OrderRepository;
pub use repository::restaurant::RestaurantRepository;
