//! # Seed Data Generator
//!
//! Populates the database with development data: a small sellable catalog,
//! a couple of vouchers, a demo cashier, and checkout settings.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p meridian-store --bin seed
//!
//! # Specify database path
//! cargo run -p meridian-store --bin seed -- --db ./data/meridian.db
//! ```

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;
use uuid::Uuid;

use meridian_core::{Money, Product, Role, Voucher};
use meridian_store::repository::settings::{KEY_CURRENCY, KEY_TAX_RATE};
use meridian_store::{Store, StoreConfig, StoreError};

/// Demo catalog: (name, price, barcode, category)
const CATALOG: &[(&str, &str, &str, &str)] = &[
    ("Coca-Cola 330ml", "1.50", "5449000000996", "Beverages"),
    ("Fanta Orange 330ml", "1.40", "5449000011527", "Beverages"),
    ("Still Water 500ml", "0.90", "5449000131805", "Beverages"),
    ("Orange Juice 1L", "3.25", "5411188110835", "Beverages"),
    ("Lays Classic 150g", "2.49", "8710398155193", "Snacks"),
    ("Doritos Nacho 180g", "2.99", "8710398506313", "Snacks"),
    ("Milk Chocolate Bar", "1.75", "7622210449283", "Snacks"),
    ("Whole Milk 1L", "1.20", "5411866004016", "Dairy"),
    ("Greek Yogurt 500g", "2.80", "5201054017559", "Dairy"),
    ("Cheddar Cheese 200g", "3.60", "5000295142893", "Dairy"),
    ("White Bread Loaf", "1.10", "5010003005402", "Bakery"),
    ("Croissant 2-pack", "2.20", "3256220112345", "Bakery"),
    ("Spaghetti 500g", "1.35", "8076800195057", "Grocery"),
    ("Basmati Rice 1kg", "2.95", "5011157888888", "Grocery"),
    ("Canned Tomatoes 400g", "0.99", "8001440123456", "Grocery"),
];

/// Demo cashier identity used by local development flows.
const DEMO_CASHIER: &str = "00000000-0000-0000-0000-0000000000c1";
/// Demo admin identity (creates the vouchers).
const DEMO_ADMIN: &str = "00000000-0000-0000-0000-0000000000a1";

#[tokio::main]
async fn main() -> Result<(), StoreError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let db_path = parse_db_arg().unwrap_or_else(|| "./meridian.db".to_string());
    tracing::info!(db = %db_path, "Seeding development data");

    let store = Store::connect(StoreConfig::new(&db_path)).await?;

    seed_products(&store).await?;
    seed_vouchers(&store).await?;
    seed_roles(&store).await?;
    seed_settings(&store).await?;

    tracing::info!("Seed complete");
    Ok(())
}

/// Parses `--db <path>` from the command line.
fn parse_db_arg() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    args.iter()
        .position(|a| a == "--db")
        .and_then(|i| args.get(i + 1))
        .cloned()
}

async fn seed_products(store: &Store) -> Result<(), StoreError> {
    let repo = store.products();
    let now = Utc::now();

    for (name, price, barcode, category) in CATALOG {
        let unit_price = Decimal::from_str(price).map_err(|e| StoreError::Decode {
            column: "unit_price".to_string(),
            reason: e.to_string(),
        })?;

        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: (*name).to_string(),
            unit_price: Money::new(unit_price),
            barcode: Some((*barcode).to_string()),
            sku: None,
            category: Some((*category).to_string()),
            cost_price: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        // re-running the seed against an existing db hits barcode uniques
        match repo.insert(&product).await {
            Ok(()) => {}
            Err(StoreError::UniqueViolation { .. }) => {
                tracing::debug!(name = %product.name, "Product already seeded, skipping");
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(count = CATALOG.len(), "Products seeded");
    Ok(())
}

async fn seed_vouchers(store: &Store) -> Result<(), StoreError> {
    let repo = store.vouchers();
    let now = Utc::now();

    let vouchers = [
        Voucher {
            id: Uuid::new_v4().to_string(),
            code: "WELCOME10".to_string(),
            description: Some("10% off for new customers".to_string()),
            value: Decimal::from(10),
            is_percentage: true,
            min_purchase: Money::from_major_minor(20, 0),
            max_uses: Some(100),
            uses_count: 0,
            expires_at: Some(now + Duration::days(90)),
            is_active: true,
            created_by: DEMO_ADMIN.to_string(),
            created_at: now,
        },
        Voucher {
            id: Uuid::new_v4().to_string(),
            code: "SAVE5".to_string(),
            description: Some("5.00 off any purchase over 15.00".to_string()),
            value: Decimal::from(5),
            is_percentage: false,
            min_purchase: Money::from_major_minor(15, 0),
            max_uses: None,
            uses_count: 0,
            expires_at: None,
            is_active: true,
            created_by: DEMO_ADMIN.to_string(),
            created_at: now,
        },
    ];

    for voucher in vouchers {
        match repo.insert(&voucher).await {
            Ok(()) => {}
            Err(StoreError::UniqueViolation { .. }) => {
                tracing::debug!(code = %voucher.code, "Voucher already seeded, skipping");
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!("Vouchers seeded");
    Ok(())
}

async fn seed_roles(store: &Store) -> Result<(), StoreError> {
    let repo = store.roles();

    repo.grant(DEMO_ADMIN, Role::Admin).await?;
    repo.grant(DEMO_CASHIER, Role::Cashier).await?;

    tracing::info!("Roles seeded");
    Ok(())
}

async fn seed_settings(store: &Store) -> Result<(), StoreError> {
    let repo = store.settings();

    repo.set(KEY_TAX_RATE, "7.5", Some(DEMO_ADMIN)).await?;
    repo.set(KEY_CURRENCY, "USD", Some(DEMO_ADMIN)).await?;

    tracing::info!("Settings seeded");
    Ok(())
}
