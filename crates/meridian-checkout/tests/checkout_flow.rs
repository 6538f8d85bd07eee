//! End-to-end checkout flows against a real (in-memory SQLite) store.
//!
//! These tests wire the engine exactly as production does: `Store` as the
//! persistence façade, `StoreAccessPolicy` over the `user_roles` table, and
//! configuration loaded from `app_settings`.

use chrono::Utc;
use rust_decimal_macros::dec;
use uuid::Uuid;

use meridian_checkout::{
    CheckoutConfig, CheckoutEngine, CheckoutError, CheckoutSession, PaymentEntry,
    StoreAccessPolicy, TracingReceiptSink,
};
use meridian_core::{
    CatalogIndex, Money, PaymentMethod, Product, Role, TransactionStatus, Voucher, VoucherError,
};
use meridian_store::repository::settings::{KEY_CURRENCY, KEY_TAX_RATE};
use meridian_store::{Store, StoreConfig};

const CASHIER: &str = "cashier-1";
const ADMIN: &str = "admin-1";

fn product(name: &str, major: i64, minor: u32, barcode: Option<&str>) -> Product {
    let now = Utc::now();
    Product {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        unit_price: Money::from_major_minor(major, minor),
        barcode: barcode.map(str::to_string),
        sku: None,
        category: None,
        cost_price: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

fn voucher(code: &str, percent: i64, min_major: i64, max_uses: Option<i64>) -> Voucher {
    Voucher {
        id: Uuid::new_v4().to_string(),
        code: code.to_string(),
        description: None,
        value: rust_decimal::Decimal::from(percent),
        is_percentage: true,
        min_purchase: Money::from_major_minor(min_major, 0),
        max_uses,
        uses_count: 0,
        expires_at: None,
        is_active: true,
        created_by: ADMIN.to_string(),
        created_at: Utc::now(),
    }
}

/// Seeds the reference fixture: two products (10.00 and 5.00), a cashier
/// role grant, and 7.5% USD checkout settings.
async fn seeded_store() -> (Store, Product, Product) {
    let store = Store::connect(StoreConfig::in_memory()).await.unwrap();

    let ten = product("Ten Dollar Item", 10, 0, Some("1000000000001"));
    let five = product("Five Dollar Item", 5, 0, None);
    store.products().insert(&ten).await.unwrap();
    store.products().insert(&five).await.unwrap();

    store.roles().grant(CASHIER, Role::Cashier).await.unwrap();

    let settings = store.settings();
    settings.set(KEY_TAX_RATE, "7.5", Some(ADMIN)).await.unwrap();
    settings.set(KEY_CURRENCY, "USD", Some(ADMIN)).await.unwrap();

    (store, ten, five)
}

async fn production_engine(
    store: &Store,
    user: &str,
) -> CheckoutEngine<Store, StoreAccessPolicy, TracingReceiptSink> {
    let config = CheckoutConfig::load(store).await.unwrap();
    let access = StoreAccessPolicy::new(store.clone(), Some(user.to_string()));
    CheckoutEngine::new(store.clone(), access, TracingReceiptSink, config)
}

/// Builds the reference cart [{10.00 × 2}, {5.00 × 1}] through the catalog
/// index, the way the POS screen would.
async fn reference_session(store: &Store, ten: &Product, five: &Product) -> CheckoutSession {
    let catalog = CatalogIndex::new(store.products().list_active().await.unwrap());

    let mut session = CheckoutSession::new();
    let scanned = catalog.lookup("1000000000001").unwrap();
    assert_eq!(scanned.id, ten.id);
    session.add_product(scanned, 1).unwrap();
    session.add_product(scanned, 1).unwrap(); // second scan merges
    let searched = catalog.lookup("five dollar").unwrap();
    assert_eq!(searched.id, five.id);
    session.add_product(searched, 1).unwrap();
    assert_eq!(session.subtotal(), Money::from_major_minor(25, 0));

    session
}

fn split_tender() -> Vec<PaymentEntry> {
    vec![
        PaymentEntry {
            method: PaymentMethod::Cash,
            amount: Money::from_major_minor(15, 0),
        },
        PaymentEntry {
            method: PaymentMethod::Card,
            amount: Money::from_major_minor(11, 38),
        },
    ]
}

#[tokio::test]
async fn completed_sale_persists_header_items_payments_and_redemption() {
    let (store, ten, five) = seeded_store().await;
    store
        .vouchers()
        .insert(&voucher("WELCOME10", 10, 20, Some(100)))
        .await
        .unwrap();

    let engine = production_engine(&store, CASHIER).await;
    let mut session = reference_session(&store, &ten, &five).await;

    let quoted = engine
        .apply_voucher(&mut session, "welcome10")
        .await
        .unwrap();
    assert_eq!(quoted.amount(), dec!(2.5));

    let outcome = engine
        .process(session.to_request(split_tender()))
        .await
        .unwrap();
    session.reset();

    assert_eq!(outcome.totals.total.amount(), dec!(24.375));
    assert_eq!(outcome.transaction.total.to_display_string(), "24.38");
    assert!(outcome.receipt_error.is_none());

    // everything visible from a fresh read of the store
    let txns = store.transactions();
    let stored = txns
        .get_by_id(&outcome.transaction.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, TransactionStatus::Completed);
    assert_eq!(stored.created_by, CASHIER);
    assert_eq!(stored.total.amount(), dec!(24.375));

    let items = txns.get_items(&stored.id).await.unwrap();
    assert_eq!(items.len(), 2);
    let item_sum: Money = items.iter().map(|i| i.subtotal).sum();
    assert_eq!(item_sum, stored.subtotal);

    let payments = txns.get_payments(&stored.id).await.unwrap();
    assert_eq!(payments.len(), 2);
    let paid: Money = payments.iter().map(|p| p.amount).sum();
    assert_eq!(paid, Money::from_major_minor(26, 38));

    // redeemed exactly once
    assert_eq!(store.vouchers().uses_count("WELCOME10").await.unwrap(), 1);
}

#[tokio::test]
async fn voucher_below_minimum_is_rejected_at_apply_and_sale_proceeds_without_it() {
    let (store, ten, five) = seeded_store().await;
    store
        .vouchers()
        .insert(&voucher("WELCOME10", 10, 30, None))
        .await
        .unwrap();

    let engine = production_engine(&store, CASHIER).await;
    let mut session = reference_session(&store, &ten, &five).await;

    // 25.00 subtotal < 30.00 minimum → rejected, no pending discount
    let err = engine
        .apply_voucher(&mut session, "WELCOME10")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::Voucher(VoucherError::MinimumPurchaseNotMet { .. })
    ));
    assert!(session.pending_voucher().is_none());

    // checkout proceeds with discount = 0
    let outcome = engine
        .process(session.to_request(split_tender()))
        .await
        .unwrap();
    assert_eq!(outcome.totals.discount, Money::zero());
    assert_eq!(outcome.totals.total.amount(), dec!(26.875));
    assert_eq!(store.vouchers().uses_count("WELCOME10").await.unwrap(), 0);
}

#[tokio::test]
async fn cart_shrinking_after_apply_is_caught_at_checkout() {
    let (store, ten, five) = seeded_store().await;
    store
        .vouchers()
        .insert(&voucher("WELCOME10", 10, 20, None))
        .await
        .unwrap();

    let engine = production_engine(&store, CASHIER).await;
    let mut session = reference_session(&store, &ten, &five).await;

    engine
        .apply_voucher(&mut session, "WELCOME10")
        .await
        .unwrap();

    // cart shrinks below the minimum after the voucher was applied
    session.change_quantity(&ten.id, -2);
    assert_eq!(session.subtotal(), Money::from_major_minor(5, 0));
    assert!(session.pending_voucher().is_some());

    let err = engine
        .process(session.to_request(split_tender()))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::Voucher(VoucherError::MinimumPurchaseNotMet { .. })
    ));

    // nothing persisted, nothing redeemed
    assert_eq!(store.vouchers().uses_count("WELCOME10").await.unwrap(), 0);
}

#[tokio::test]
async fn concurrent_redemption_surfaces_exhausted_and_sale_is_not_finalized() {
    let (store, ten, five) = seeded_store().await;
    store
        .vouchers()
        .insert(&voucher("LASTONE", 10, 20, Some(1)))
        .await
        .unwrap();

    let engine = production_engine(&store, CASHIER).await;
    let mut session = reference_session(&store, &ten, &five).await;

    // passes evaluation: one use still available
    engine.apply_voucher(&mut session, "LASTONE").await.unwrap();

    // another register consumes the last use before we persist
    assert!(store.vouchers().redeem("LASTONE").await.unwrap());

    let err = engine
        .process(session.to_request(split_tender()))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::Voucher(VoucherError::Exhausted { .. })
    ));

    // the counter was not double-incremented, and no transaction of any
    // status carries the discount - the re-validation read caught the
    // exhaustion before a single write happened. (The narrower race, where
    // the loser is only caught by the conditional increment itself, is
    // exercised at the repository level and in the engine unit tests.)
    assert_eq!(store.vouchers().uses_count("LASTONE").await.unwrap(), 1);

    let total_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(total_rows, 0);
}

#[tokio::test]
async fn viewer_is_refused_by_role_store() {
    let (store, ten, five) = seeded_store().await;
    store.roles().grant("viewer-1", Role::Viewer).await.unwrap();

    let engine = production_engine(&store, "viewer-1").await;
    let session = reference_session(&store, &ten, &five).await;

    let err = engine
        .process(session.to_request(split_tender()))
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::NotAuthorized { .. }));
}

#[tokio::test]
async fn closed_store_is_persistence_unavailable() {
    let (store, ten, five) = seeded_store().await;

    let engine = production_engine(&store, CASHIER).await;
    let session = reference_session(&store, &ten, &five).await;

    store.close().await;

    let err = engine
        .process(session.to_request(split_tender()))
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::PersistenceUnavailable(_)));
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn config_load_reads_settings() {
    let (store, _, _) = seeded_store().await;

    let config = CheckoutConfig::load(&store).await.unwrap();
    assert_eq!(config.tax_rate.fraction(), dec!(0.075));
    assert_eq!(config.currency, "USD");
    assert_eq!(
        config.authorized_roles,
        vec![Role::Admin, Role::Manager, Role::Cashier]
    );
}
