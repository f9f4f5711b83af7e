//! # Seed Data Generator
//!
//! Populates the database with demo products for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p storex-db --bin seed
//!
//! # Specify database path and product count
//! cargo run -p storex-db --bin seed -- --db ./data/storex.db --count 200
//! ```

use chrono::Utc;
use std::env;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use storex_core::Product;
use storex_db::{Database, DbConfig};

/// Demo catalog: (category, names)
const CATALOG: &[(&str, &[&str])] = &[
    (
        "Beverages",
        &[
            "Arabica Coffee 250g",
            "Green Tea 20 Bags",
            "Orange Juice 1L",
            "Sparkling Water 500ml",
            "Cola 330ml",
            "Lemonade 1L",
        ],
    ),
    (
        "Dairy",
        &[
            "Whole Milk 1L",
            "Greek Yogurt 500g",
            "Cheddar Cheese 200g",
            "Butter 250g",
            "Eggs Dozen",
        ],
    ),
    (
        "Grocery",
        &[
            "Rice 1kg",
            "Spaghetti 500g",
            "Sugar 1kg",
            "Salt 500g",
            "Olive Oil 750ml",
            "Canned Tomatoes 400g",
            "Honey 350g",
        ],
    ),
    (
        "Snacks",
        &[
            "Potato Chips 150g",
            "Dark Chocolate 100g",
            "Mixed Nuts 200g",
            "Oat Cookies 300g",
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args: Vec<String> = env::args().collect();

    let mut count: usize = usize::MAX;
    let mut db_path = String::from("./storex_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(usize::MAX);
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
                println!("StoreX Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Max products to generate (default: full catalog)");
                println!("  -d, --db <PATH>    Database file path (default: ./storex_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("StoreX Seed Data Generator");
    println!("==========================");
    println!("Database: {}", db_path);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected, migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    let mut generated = 0usize;
    for (category, names) in CATALOG {
        for (idx, name) in names.iter().enumerate() {
            if generated >= count {
                break;
            }

            let product = demo_product(category, name, generated * 31 + idx);
            db.products().insert(&product).await?;
            generated += 1;
        }
    }

    println!("✓ Seeded {} products", generated);

    let hits = db.products().search("coffee", 10).await?;
    println!("  Search 'coffee': {} result(s)", hits.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds one demo product with deterministic-ish price and stock.
fn demo_product(category: &str, name: &str, seed: usize) -> Product {
    let now = Utc::now();

    // $0.99 - $15.99, varied by seed
    let price_cents = 99 + ((seed * 37) % 1500) as i64;
    let stock = (3 + seed * 7 % 40) as i64;

    Product {
        id: Uuid::new_v4().to_string(),
        barcode: Some(format!("590{:010}", seed)),
        name: name.to_string(),
        description: None,
        price_cents,
        stock,
        category: Some(category.to_string()),
        created_at: now,
        updated_at: now,
    }
}
