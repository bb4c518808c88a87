//! # Repository Module
//!
//! Per-entity database repositories.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  External caller                                                        │
//! │       │                                                                 │
//! │       │  db.customers().create("Ada", "Lovelace", ...)                  │
//! │       ▼                                                                 │
//! │  CustomerRepository                                                     │
//! │  ├── create / update                                                    │
//! │  ├── get_by_id(&self, id)                                               │
//! │  └── list(&self)                                                        │
//! │       │                                                                 │
//! │       │  parameterized SQL                                              │
//! │       ▼                                                                 │
//! │  SQLite database                                                        │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • SQL is isolated in one place per entity                              │
//! │  • Inputs validated in the core crate before any statement runs         │
//! │  • Every value is bound, never interpolated into query text             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Orders and deliveries have no `create` here: they are produced only by
//! the [`crate::workflow`] service, and removed only by [`crate::cascade`].
//!
//! ## Available Repositories
//!
//! - [`customer::CustomerRepository`] - Customer CRUD
//! - [`restaurant::RestaurantRepository`] - Restaurant CRUD
//! - [`menu_item::MenuItemRepository`] - Menu item CRUD
//! - [`driver::DriverRepository`] - Driver CRUD
//! - [`order::OrderRepository`] - Order read side (search, detail, counts)

pub mod customer;
pub mod driver;
pub mod menu_item;
pub mod order;
pub mod restaurant;
