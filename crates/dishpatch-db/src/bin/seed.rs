//! # Seed Data Generator
//!
//! Populates the database with development data: customers, restaurants
//! with menus, drivers, and a batch of placed orders with deliveries.
//!
//! ## Usage
//! ```bash
//! # Seed with defaults
//! cargo run -p dishpatch-db --bin seed
//!
//! # Custom order count and database path
//! cargo run -p dishpatch-db --bin seed -- --orders 200 --db ./data/dishpatch.db
//! ```
//!
//! Orders go through the real placement workflow, so totals and the
//! current-orders table come out exactly as they would in production.

use chrono::{Duration, Utc};
use dishpatch_db::{Database, DbConfig};
use std::env;

const CUSTOMERS: &[(&str, &str, &str)] = &[
    ("Ada", "Lovelace", "555-0100"),
    ("Grace", "Hopper", "555-0101"),
    ("Alan", "Turing", "555-0102"),
    ("Edsger", "Dijkstra", "555-0103"),
    ("Barbara", "Liskov", "555-0104"),
    ("Donald", "Knuth", "555-0105"),
    ("Tony", "Hoare", "555-0106"),
    ("Margaret", "Hamilton", "555-0107"),
];

const RESTAURANTS: &[(&str, &str, &[(&str, i64)])] = &[
    (
        "Luigi's Pizzeria",
        "1 Main St",
        &[
            ("Margherita", 1250),
            ("Calzone", 1400),
            ("Quattro Formaggi", 1550),
            ("Garlic Bread", 450),
        ],
    ),
    (
        "Golden Dragon",
        "42 Canal St",
        &[
            ("Kung Pao Chicken", 1375),
            ("Fried Rice", 950),
            ("Spring Rolls", 550),
            ("Mapo Tofu", 1200),
        ],
    ),
    (
        "Taco Verde",
        "7 Mission Blvd",
        &[
            ("Carnitas Taco", 425),
            ("Veggie Burrito", 1050),
            ("Chips & Guac", 675),
        ],
    ),
    (
        "Curry House",
        "19 Spice Lane",
        &[
            ("Chicken Tikka", 1495),
            ("Dal Makhani", 1100),
            ("Naan", 300),
            ("Samosa", 500),
        ],
    ),
];

const DRIVERS: &[(&str, &str, &str, &str)] = &[
    ("Max", "Verst", "Downtown", "Uptown"),
    ("Lewis", "Ham", "Midtown", "Harbor"),
    ("Charles", "Leclair", "Harbor", "Downtown"),
    ("Lando", "Norse", "Uptown", "Midtown"),
];

const LOCATIONS: &[&str] = &[
    "12 Elm St",
    "88 Oak Ave",
    "3 Birch Rd",
    "47 Maple Dr",
    "230 Pine Ct",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut order_count: usize = 100;
    let mut db_path = String::from("./dishpatch_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--orders" | "-n" => {
                if i + 1 < args.len() {
                    order_count = args[i + 1].parse().unwrap_or(100);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Dishpatch Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -n, --orders <N>   Number of orders to place (default: 100)");
                println!("  -d, --db <PATH>    Database file path (default: ./dishpatch_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Dishpatch Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!("Orders:   {}", order_count);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.customers().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} customers", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Seeding base data...");

    let mut customer_ids = Vec::new();
    for (first, last, phone) in CUSTOMERS {
        let email = format!(
            "{}.{}@example.com",
            first.to_lowercase(),
            last.to_lowercase()
        );
        let customer = db.customers().create(first, last, phone, &email).await?;
        customer_ids.push(customer.customer_id);
    }
    println!("  {} customers", customer_ids.len());

    // (restaurant_id, menu_item_id) pairs so orders always match an item
    // to its owning restaurant.
    let mut menu_pairs = Vec::new();
    for (idx, (name, address, menu)) in RESTAURANTS.iter().enumerate() {
        let phone = format!("555-02{:02}", idx);
        let restaurant = db.restaurants().create(name, address, &phone).await?;
        for (item_name, price_cents) in *menu {
            let item = db
                .menu_items()
                .create(restaurant.restaurant_id, item_name, None, *price_cents)
                .await?;
            menu_pairs.push((restaurant.restaurant_id, item.menu_item_id));
        }
    }
    println!("  {} restaurants, {} menu items", RESTAURANTS.len(), menu_pairs.len());

    let mut driver_ids = Vec::new();
    for (first, last, pickup, destination) in DRIVERS {
        let driver = db.drivers().create(first, last, pickup, destination).await?;
        driver_ids.push(driver.driver_id);
    }
    println!("  {} drivers", driver_ids.len());

    println!();
    println!("Placing orders...");

    let start = std::time::Instant::now();
    let mut placed = 0;
    let mut delivered = 0;

    for seed in 0..order_count {
        let customer_id = customer_ids[seed % customer_ids.len()];
        let (restaurant_id, menu_item_id) = menu_pairs[(seed * 7) % menu_pairs.len()];
        let quantity = (seed % 4 + 1) as i64;
        // Spread order dates over the past two weeks
        let order_date = Utc::now() - Duration::hours((seed % 336) as i64);

        let order_id = match db
            .workflow()
            .place_order(customer_id, restaurant_id, order_date, menu_item_id, quantity)
            .await
        {
            Ok(id) => id,
            Err(e) => {
                eprintln!("Failed to place order {}: {}", seed, e);
                continue;
            }
        };
        placed += 1;

        // Assign a delivery to roughly two thirds of the orders
        if seed % 3 != 0 {
            let driver_id = driver_ids[seed % driver_ids.len()];
            let location = LOCATIONS[seed % LOCATIONS.len()];
            let fee_cents = 250 + ((seed * 31) % 400) as i64;

            match db
                .workflow()
                .assign_delivery(order_id, restaurant_id, driver_id, location, fee_cents)
                .await
            {
                Ok(_) => delivered += 1,
                Err(e) => eprintln!("Failed to assign delivery for order {}: {}", order_id, e),
            }
        }

        if placed % 50 == 0 {
            println!("  Placed {} orders...", placed);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!(
        "✓ Placed {} orders ({} with deliveries) in {:?}",
        placed, delivered, elapsed
    );

    println!();
    println!("Verifying reports...");
    let counts = db.reports().dashboard_counts().await?;
    println!(
        "  Dashboard: {} orders, {} deliveries, {} drivers, {} restaurants",
        counts.orders, counts.deliveries, counts.drivers, counts.restaurants
    );
    let busy = db.reports().busy_customers(0).await?;
    println!("  Customers with active orders: {}", busy.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
