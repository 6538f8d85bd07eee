//! # Checkout Engine
//!
//! The orchestrator for a single checkout attempt.
//!
//! ## Attempt State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Checkout Attempt                                 │
//! │                                                                         │
//! │  Idle ──► Validating ──► Pricing ──► Authorizing ──► Persisting        │
//! │               │             │             │               │             │
//! │               │             │             │               ├──► Completed│
//! │               ▼             ▼             ▼               ▼             │
//! │           Failed(       Failed(       Failed(        Failed(           │
//! │           Validation)   Voucher)      Authorization) Unavailable /     │
//! │                                                      PartialCommit /   │
//! │                                                      Voucher)          │
//! │                                                                         │
//! │  No automatic retries. A failed attempt requires a fresh user-initiated │
//! │  retry, which re-enters at Validating with fresh cart/voucher           │
//! │  snapshots.                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Persistence Saga
//! The five writes (header, items, payments, voucher redemption, finalize)
//! are one logical unit. Each is keyed by a client-generated UUID and is
//! idempotent at the store, so a retry with the same keys resumes rather
//! than double-writes. A failure after the header is written surfaces as
//! [`CheckoutError::PartialCommit`] with the transaction id; prior writes
//! are not rolled back automatically.
//!
//! ## Cancellation
//! Abandoning the attempt (dropping the future) before `Persisting` begins
//! has no side effects. Once persistence starts, the caller must let the
//! attempt run to `Completed` or `Failed`; cancel controls should be
//! disabled at that point.

use chrono::Utc;
use std::fmt;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::{CheckoutError, PersistStep};
use crate::facade::{AccessPolicy, CheckoutStore};
use crate::receipt::{Receipt, ReceiptError, ReceiptSink};
use crate::session::CheckoutSession;
use meridian_core::pricing::{self, Totals};
use meridian_core::validation::{
    normalize_voucher_code, validate_customer_name, validate_customer_phone,
    validate_payment_amount, validate_quantity, validate_unit_price, validate_uuid,
};
use meridian_core::voucher::{self, VoucherDiscount};
use meridian_core::{
    currency, Cart, Money, PaymentMethod, Role, TaxRate, Transaction, TransactionItem,
    TransactionPayment, TransactionStatus, ValidationError, VoucherError,
};
use meridian_store::{Store, StoreError, StoreResult};

// =============================================================================
// Configuration
// =============================================================================

/// Explicit checkout configuration, passed in by the caller.
///
/// Nothing here is read from global state: the caller loads the tax rate
/// and currency from settings (see [`CheckoutConfig::load`]) and owns the
/// refresh contract. The authorized role set is configuration too - the
/// engine never hard-codes policy.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Tax rate applied to the recomputed subtotal.
    pub tax_rate: TaxRate,

    /// ISO 4217 currency code; resolved to a symbol for receipts.
    pub currency: String,

    /// Roles allowed to process a checkout. Default: admin, manager, cashier.
    pub authorized_roles: Vec<Role>,
}

impl CheckoutConfig {
    /// Creates a configuration with the default authorized role set.
    pub fn new(tax_rate: TaxRate, currency: impl Into<String>) -> Self {
        CheckoutConfig {
            tax_rate,
            currency: currency.into(),
            authorized_roles: vec![Role::Admin, Role::Manager, Role::Cashier],
        }
    }

    /// Overrides the authorized role set.
    pub fn authorized_roles(mut self, roles: Vec<Role>) -> Self {
        self.authorized_roles = roles;
        self
    }

    /// Loads tax rate and currency from the settings store.
    ///
    /// Missing keys fall back to a zero rate and USD; the caller decides
    /// when (and whether) to re-load.
    pub async fn load(store: &Store) -> StoreResult<Self> {
        let settings = store.settings();
        let tax_rate = settings.tax_rate().await?.unwrap_or_default();
        let currency = settings
            .currency()
            .await?
            .unwrap_or_else(|| "USD".to_string());

        Ok(CheckoutConfig::new(tax_rate, currency))
    }
}

// =============================================================================
// Request / Outcome
// =============================================================================

/// One tender line in a checkout request.
///
/// The method is typed, so an unrecognized method cannot reach the engine;
/// it is rejected at the deserialization boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentEntry {
    pub method: PaymentMethod,
    pub amount: Money,
}

/// A checkout request: cart snapshot, customer info, tender, pending voucher.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub cart: Cart,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub payments: Vec<PaymentEntry>,
    /// Normalized voucher code pending from the session, if any.
    pub voucher_code: Option<String>,
    pub notes: Option<String>,
}

/// A completed checkout.
#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    pub transaction: Transaction,
    pub items: Vec<TransactionItem>,
    pub payments: Vec<TransactionPayment>,
    pub totals: Totals,
    /// Overpayment owed back to the customer; zero when paid at or under
    /// the total (the permissive tender policy accepts both).
    pub change_due: Money,
    /// Set when receipt emission failed. The sale stands regardless.
    pub receipt_error: Option<ReceiptError>,
}

/// Phases of a checkout attempt, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CheckoutPhase {
    Validating,
    Pricing,
    Authorizing,
    Persisting,
}

impl fmt::Display for CheckoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckoutPhase::Validating => "validating",
            CheckoutPhase::Pricing => "pricing",
            CheckoutPhase::Authorizing => "authorizing",
            CheckoutPhase::Persisting => "persisting",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Engine
// =============================================================================

/// The checkout orchestrator.
///
/// Generic over its three collaborator seams so production wiring and tests
/// choose their own implementations:
/// - `S`: the persistence façade ([`CheckoutStore`])
/// - `A`: identity and role checks ([`AccessPolicy`])
/// - `R`: receipt emission ([`ReceiptSink`])
#[derive(Debug, Clone)]
pub struct CheckoutEngine<S, A, R> {
    store: S,
    access: A,
    receipts: R,
    config: CheckoutConfig,
}

impl<S, A, R> CheckoutEngine<S, A, R>
where
    S: CheckoutStore,
    A: AccessPolicy,
    R: ReceiptSink,
{
    /// Creates an engine from its collaborators and configuration.
    pub fn new(store: S, access: A, receipts: R, config: CheckoutConfig) -> Self {
        CheckoutEngine {
            store,
            access,
            receipts,
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &CheckoutConfig {
        &self.config
    }

    /// Applies a voucher code to a session (the cashier's "Apply" button).
    ///
    /// Looks the code up, evaluates it against the session's current
    /// subtotal, and - on success - records it as the session's pending
    /// discount. Read-only with respect to the voucher: usage only
    /// increments when a transaction completes.
    pub async fn apply_voucher(
        &self,
        session: &mut CheckoutSession,
        code: &str,
    ) -> Result<Money, CheckoutError> {
        let normalized = normalize_voucher_code(code)?;
        let lookup = self
            .store
            .find_voucher(&normalized)
            .await
            .map_err(CheckoutError::PersistenceUnavailable)?;

        let discount = session.apply_voucher(lookup.as_ref(), &normalized, Utc::now())?;
        debug!(code = %normalized, discount = %discount, "Voucher applied to session");
        Ok(discount)
    }

    /// Processes a checkout request end to end.
    ///
    /// Validates the payload, recomputes pricing from the current cart
    /// state (a client-supplied total is never trusted), authorizes the
    /// acting user, persists the transaction as a saga, and emits the
    /// receipt. Either the whole sale commits (header, items, payments,
    /// voucher usage, finalize) or the error reports exactly what happened.
    pub async fn process(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        // ---- Validating ----------------------------------------------------
        debug!(phase = %CheckoutPhase::Validating, lines = request.cart.line_count(), "Checkout attempt started");
        let (customer_name, customer_phone) = self.validate(&request)?;

        // ---- Pricing -------------------------------------------------------
        debug!(phase = %CheckoutPhase::Pricing, "Recomputing totals");
        let subtotal = request.cart.subtotal();

        // a pending voucher is re-validated against the RECOMPUTED subtotal;
        // the cart may have changed since apply time
        let discount = match &request.voucher_code {
            Some(code) => Some(self.resolve_voucher(code, subtotal).await?),
            None => None,
        };
        let discount_amount = discount
            .as_ref()
            .map(|d| d.amount)
            .unwrap_or_else(Money::zero);

        let totals = pricing::price(subtotal, self.config.tax_rate, discount_amount);

        // ---- Authorizing ---------------------------------------------------
        debug!(phase = %CheckoutPhase::Authorizing, "Checking operator roles");
        let user_id = self.authorize().await?;

        // ---- Persisting ----------------------------------------------------
        debug!(phase = %CheckoutPhase::Persisting, user_id = %user_id, total = %totals.total, "Persisting transaction");
        self.persist(
            request,
            customer_name,
            customer_phone,
            totals,
            discount,
            user_id,
        )
        .await
    }

    // -------------------------------------------------------------------------
    // Phase: Validating
    // -------------------------------------------------------------------------

    /// Validates the request shape. First failure aborts; nothing persists.
    fn validate(
        &self,
        request: &CheckoutRequest,
    ) -> Result<(Option<String>, Option<String>), CheckoutError> {
        if request.cart.is_empty() {
            return Err(ValidationError::Empty {
                field: "cart".to_string(),
            }
            .into());
        }

        for line in &request.cart.lines {
            validate_uuid(&line.product_id, "product id")?;
            validate_unit_price(line.unit_price)?;
            validate_quantity(line.quantity)?;
        }

        if request.payments.is_empty() {
            return Err(ValidationError::Empty {
                field: "payments".to_string(),
            }
            .into());
        }

        for payment in &request.payments {
            validate_payment_amount(payment.amount)?;
        }

        let customer_name = validate_customer_name(request.customer_name.as_deref())?;
        let customer_phone = validate_customer_phone(request.customer_phone.as_deref())?;

        Ok((customer_name, customer_phone))
    }

    // -------------------------------------------------------------------------
    // Phase: Pricing
    // -------------------------------------------------------------------------

    /// Re-validates a pending voucher code against the recomputed subtotal.
    async fn resolve_voucher(
        &self,
        code: &str,
        subtotal: Money,
    ) -> Result<VoucherDiscount, CheckoutError> {
        let normalized = normalize_voucher_code(code)?;
        let lookup = self
            .store
            .find_voucher(&normalized)
            .await
            .map_err(CheckoutError::PersistenceUnavailable)?;

        let voucher = lookup.ok_or(VoucherError::NotFound {
            code: normalized.clone(),
        })?;

        Ok(voucher::evaluate(&voucher, subtotal, Utc::now())?)
    }

    // -------------------------------------------------------------------------
    // Phase: Authorizing
    // -------------------------------------------------------------------------

    /// Resolves the acting user and checks them against the configured
    /// authorized role set. Any role in the set suffices.
    async fn authorize(&self) -> Result<String, CheckoutError> {
        let user_id = self
            .access
            .current_user()
            .ok_or(CheckoutError::NotAuthenticated)?;

        for role in &self.config.authorized_roles {
            let holds = self
                .access
                .has_role(&user_id, *role)
                .await
                .map_err(CheckoutError::PersistenceUnavailable)?;
            if holds {
                return Ok(user_id);
            }
        }

        warn!(user_id = %user_id, "Checkout refused: no authorized role");
        Err(CheckoutError::NotAuthorized { user_id })
    }

    // -------------------------------------------------------------------------
    // Phase: Persisting
    // -------------------------------------------------------------------------

    /// Runs the persistence saga and, on success, emits the receipt.
    async fn persist(
        &self,
        request: CheckoutRequest,
        customer_name: Option<String>,
        customer_phone: Option<String>,
        totals: Totals,
        discount: Option<VoucherDiscount>,
        user_id: String,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let now = Utc::now();
        let transaction_id = Uuid::new_v4().to_string();

        let transaction = Transaction {
            id: transaction_id.clone(),
            transaction_number: generate_transaction_number(),
            customer_name,
            customer_phone,
            customer_email: request.customer_email.clone(),
            status: TransactionStatus::Pending,
            subtotal: totals.subtotal,
            tax: totals.tax,
            discount: totals.discount,
            total: totals.total,
            notes: request.notes.clone(),
            created_by: user_id,
            created_at: now,
        };

        let items: Vec<TransactionItem> = request
            .cart
            .lines
            .iter()
            .map(|line| TransactionItem {
                id: Uuid::new_v4().to_string(),
                transaction_id: transaction_id.clone(),
                product_id: line.product_id.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
                subtotal: line.line_total(),
                created_at: now,
            })
            .collect();

        let payments: Vec<TransactionPayment> = request
            .payments
            .iter()
            .map(|entry| TransactionPayment {
                id: Uuid::new_v4().to_string(),
                transaction_id: transaction_id.clone(),
                method: entry.method,
                amount: entry.amount,
                reference: None,
                voucher_id: match entry.method {
                    PaymentMethod::Voucher => discount.as_ref().map(|d| d.voucher_id.clone()),
                    _ => None,
                },
                created_at: now,
            })
            .collect();

        // Step 1: header. A failure here means nothing was written, so the
        // attempt is still cleanly retryable.
        self.store
            .insert_transaction(&transaction)
            .await
            .map_err(CheckoutError::PersistenceUnavailable)?;

        // Steps 2-5 run after the header exists; any failure is a partial
        // commit and must carry the transaction id for reconciliation.
        self.store
            .insert_items(&items)
            .await
            .map_err(|e| self.partial_commit(&transaction_id, PersistStep::Items, e))?;

        self.store
            .insert_payments(&payments)
            .await
            .map_err(|e| self.partial_commit(&transaction_id, PersistStep::Payments, e))?;

        if let Some(d) = &discount {
            let redeemed = self
                .store
                .redeem_voucher(&d.code)
                .await
                .map_err(|e| self.partial_commit(&transaction_id, PersistStep::VoucherRedemption, e))?;

            if !redeemed {
                // a concurrent checkout consumed the last use between our
                // evaluation and this write; the sale must not finalize
                // with the discount applied
                warn!(
                    transaction_id = %transaction_id,
                    code = %d.code,
                    "Voucher exhausted at redemption time, cancelling pending transaction"
                );
                if let Err(cancel_err) = self.store.cancel_transaction(&transaction_id).await {
                    error!(
                        transaction_id = %transaction_id,
                        error = %cancel_err,
                        "Failed to cancel pending transaction after exhausted voucher"
                    );
                }
                return Err(VoucherError::Exhausted {
                    code: d.code.clone(),
                }
                .into());
            }
        }

        self.store
            .finalize_transaction(&transaction_id)
            .await
            .map_err(|e| self.partial_commit(&transaction_id, PersistStep::Finalize, e))?;

        let transaction = Transaction {
            status: TransactionStatus::Completed,
            ..transaction
        };

        info!(
            transaction_id = %transaction_id,
            number = %transaction.transaction_number,
            total = %transaction.total,
            items = items.len(),
            "Transaction completed"
        );

        // Receipt emission is fire-and-forget: a failure is reported on the
        // outcome, never as a checkout error.
        let paid: Money = payments.iter().map(|p| p.amount).sum();
        let change_due = Money::zero().max(paid - totals.total);
        let symbol = currency::symbol(&self.config.currency);
        let receipt = Receipt::build(&transaction, &request.cart, &payments, symbol, change_due);

        let receipt_error = self.receipts.emit(&receipt).err();
        if let Some(e) = &receipt_error {
            warn!(transaction_id = %transaction_id, error = %e, "Receipt emission failed; sale stands");
        }

        Ok(CheckoutOutcome {
            transaction,
            items,
            payments,
            totals,
            change_due,
            receipt_error,
        })
    }

    /// Logs and shapes a partial-commit failure.
    fn partial_commit(
        &self,
        transaction_id: &str,
        step: PersistStep,
        source: StoreError,
    ) -> CheckoutError {
        error!(
            transaction_id = %transaction_id,
            step = %step,
            error = %source,
            "Checkout write failed after header was persisted"
        );
        CheckoutError::PartialCommit {
            transaction_id: transaction_id.to_string(),
            step,
            source,
        }
    }
}

/// Generates a human-readable transaction number from the current instant.
fn generate_transaction_number() -> String {
    format!("TXN-{}", Utc::now().timestamp_millis())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use meridian_core::{Product, Voucher};
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    // -------------------------------------------------------------------------
    // In-memory fakes
    // -------------------------------------------------------------------------

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum FailPoint {
        FindVoucher,
        Header,
        Items,
        Payments,
        Redeem,
        Finalize,
    }

    #[derive(Default)]
    struct MemStore {
        vouchers: Mutex<Vec<Voucher>>,
        headers: Mutex<Vec<Transaction>>,
        items: Mutex<Vec<TransactionItem>>,
        payments: Mutex<Vec<TransactionPayment>>,
        finalized: Mutex<Vec<String>>,
        cancelled: Mutex<Vec<String>>,
        redeem_denied: Mutex<bool>,
        fail_at: Mutex<Option<FailPoint>>,
        write_calls: AtomicUsize,
    }

    impl MemStore {
        fn with_voucher(voucher: Voucher) -> Arc<Self> {
            let store = MemStore::default();
            store.vouchers.lock().unwrap().push(voucher);
            Arc::new(store)
        }

        fn fail_at(self: &Arc<Self>, point: FailPoint) {
            *self.fail_at.lock().unwrap() = Some(point);
        }

        fn deny_redeem(self: &Arc<Self>) {
            *self.redeem_denied.lock().unwrap() = true;
        }

        fn check(&self, point: FailPoint) -> Result<(), StoreError> {
            if *self.fail_at.lock().unwrap() == Some(point) {
                return Err(StoreError::QueryFailed("injected failure".to_string()));
            }
            Ok(())
        }
    }

    impl CheckoutStore for Arc<MemStore> {
        async fn find_voucher(&self, code: &str) -> Result<Option<Voucher>, StoreError> {
            if *self.fail_at.lock().unwrap() == Some(FailPoint::FindVoucher) {
                return Err(StoreError::Unavailable("store offline".to_string()));
            }
            Ok(self
                .vouchers
                .lock()
                .unwrap()
                .iter()
                .find(|v| v.code == code && v.is_active)
                .cloned())
        }

        async fn insert_transaction(&self, txn: &Transaction) -> Result<bool, StoreError> {
            self.check(FailPoint::Header)?;
            self.write_calls.fetch_add(1, Ordering::SeqCst);
            self.headers.lock().unwrap().push(txn.clone());
            Ok(true)
        }

        async fn insert_items(&self, items: &[TransactionItem]) -> Result<(), StoreError> {
            self.check(FailPoint::Items)?;
            self.write_calls.fetch_add(1, Ordering::SeqCst);
            self.items.lock().unwrap().extend_from_slice(items);
            Ok(())
        }

        async fn insert_payments(
            &self,
            payments: &[TransactionPayment],
        ) -> Result<(), StoreError> {
            self.check(FailPoint::Payments)?;
            self.write_calls.fetch_add(1, Ordering::SeqCst);
            self.payments.lock().unwrap().extend_from_slice(payments);
            Ok(())
        }

        async fn redeem_voucher(&self, code: &str) -> Result<bool, StoreError> {
            self.check(FailPoint::Redeem)?;
            if *self.redeem_denied.lock().unwrap() {
                return Ok(false);
            }
            let mut vouchers = self.vouchers.lock().unwrap();
            match vouchers.iter_mut().find(|v| v.code == code) {
                Some(v) => {
                    v.uses_count += 1;
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn finalize_transaction(&self, id: &str) -> Result<(), StoreError> {
            self.check(FailPoint::Finalize)?;
            self.finalized.lock().unwrap().push(id.to_string());
            Ok(())
        }

        async fn cancel_transaction(&self, id: &str) -> Result<(), StoreError> {
            self.cancelled.lock().unwrap().push(id.to_string());
            Ok(())
        }
    }

    #[derive(Clone)]
    struct StaticPolicy {
        user: Option<String>,
        roles: Vec<Role>,
    }

    impl StaticPolicy {
        fn cashier() -> Self {
            StaticPolicy {
                user: Some("cashier-1".to_string()),
                roles: vec![Role::Cashier],
            }
        }
    }

    impl AccessPolicy for StaticPolicy {
        fn current_user(&self) -> Option<String> {
            self.user.clone()
        }

        async fn has_role(&self, _user_id: &str, role: Role) -> Result<bool, StoreError> {
            Ok(self.roles.contains(&role))
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSink {
        emitted: Arc<Mutex<Vec<Receipt>>>,
        fail: bool,
    }

    impl ReceiptSink for RecordingSink {
        fn emit(&self, receipt: &Receipt) -> Result<(), ReceiptError> {
            if self.fail {
                return Err(ReceiptError("printer offline".to_string()));
            }
            self.emitted.lock().unwrap().push(receipt.clone());
            Ok(())
        }
    }

    // -------------------------------------------------------------------------
    // Fixtures
    // -------------------------------------------------------------------------

    fn product(tag: &str, major: i64, minor: u32) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4().to_string(),
            name: format!("Product {}", tag),
            unit_price: Money::from_major_minor(major, minor),
            barcode: None,
            sku: None,
            category: None,
            cost_price: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// The reference cart: [{10.00 × 2}, {5.00 × 1}] → subtotal 25.00
    fn reference_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(&product("a", 10, 0), 2).unwrap();
        cart.add(&product("b", 5, 0), 1).unwrap();
        cart
    }

    fn welcome10(min_major: i64) -> Voucher {
        Voucher {
            id: "v-1".to_string(),
            code: "WELCOME10".to_string(),
            description: None,
            value: dec!(10),
            is_percentage: true,
            min_purchase: Money::from_major_minor(min_major, 0),
            max_uses: Some(100),
            uses_count: 0,
            expires_at: None,
            is_active: true,
            created_by: "admin-1".to_string(),
            created_at: Utc::now(),
        }
    }

    fn request(cart: Cart, payments: Vec<PaymentEntry>, voucher: Option<&str>) -> CheckoutRequest {
        CheckoutRequest {
            cart,
            customer_name: None,
            customer_phone: None,
            customer_email: None,
            payments,
            voucher_code: voucher.map(str::to_string),
            notes: None,
        }
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

    fn engine(
        store: Arc<MemStore>,
        policy: StaticPolicy,
        sink: RecordingSink,
    ) -> CheckoutEngine<Arc<MemStore>, StaticPolicy, RecordingSink> {
        CheckoutEngine::new(
            store,
            policy,
            sink,
            CheckoutConfig::new(TaxRate::from_bps(750), "USD"),
        )
    }

    // -------------------------------------------------------------------------
    // Tests
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_happy_path_with_voucher() {
        let store = MemStore::with_voucher(welcome10(20));
        let sink = RecordingSink::default();
        let eng = engine(store.clone(), StaticPolicy::cashier(), sink.clone());

        let outcome = eng
            .process(request(reference_cart(), split_tender(), Some("WELCOME10")))
            .await
            .unwrap();

        // 25.00 subtotal, 2.50 discount, 1.875 tax, 24.375 total
        assert_eq!(outcome.totals.subtotal.amount(), dec!(25));
        assert_eq!(outcome.totals.discount.amount(), dec!(2.5));
        assert_eq!(outcome.totals.tax.amount(), dec!(1.875));
        assert_eq!(outcome.totals.total.amount(), dec!(24.375));
        assert_eq!(outcome.transaction.total.to_display_string(), "24.38");
        assert_eq!(outcome.transaction.status, TransactionStatus::Completed);

        // all saga steps ran
        assert_eq!(store.headers.lock().unwrap().len(), 1);
        assert_eq!(store.items.lock().unwrap().len(), 2);
        assert_eq!(store.payments.lock().unwrap().len(), 2);
        assert_eq!(store.finalized.lock().unwrap().len(), 1);
        assert_eq!(store.vouchers.lock().unwrap()[0].uses_count, 1);

        // item subtotals sum to the transaction subtotal
        let item_sum: Money = outcome.items.iter().map(|i| i.subtotal).sum();
        assert_eq!(item_sum, outcome.transaction.subtotal);

        // permissive tender: 26.38 paid against 24.375 → change 2.005
        assert_eq!(outcome.change_due.amount(), dec!(2.005));

        // receipt went out once with the configured currency symbol
        let emitted = sink.emitted.lock().unwrap();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].currency_symbol, "$");
    }

    #[tokio::test]
    async fn test_empty_cart_never_reaches_persistence() {
        let store = Arc::new(MemStore::default());
        let eng = engine(store.clone(), StaticPolicy::cashier(), RecordingSink::default());

        let err = eng
            .process(request(Cart::new(), split_tender(), None))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Validation(_)));
        assert_eq!(store.write_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_payments_rejected() {
        let store = Arc::new(MemStore::default());
        let eng = engine(store.clone(), StaticPolicy::cashier(), RecordingSink::default());

        let err = eng
            .process(request(reference_cart(), vec![], None))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Validation(_)));
        assert_eq!(store.write_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_nonpositive_payment_rejected() {
        let store = Arc::new(MemStore::default());
        let eng = engine(store.clone(), StaticPolicy::cashier(), RecordingSink::default());

        let payments = vec![PaymentEntry {
            method: PaymentMethod::Cash,
            amount: Money::zero(),
        }];
        let err = eng
            .process(request(reference_cart(), payments, None))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Validation(_)));
    }

    #[tokio::test]
    async fn test_underpayment_accepted() {
        // documented permissive policy: the sum need not equal the total
        let store = Arc::new(MemStore::default());
        let eng = engine(store.clone(), StaticPolicy::cashier(), RecordingSink::default());

        let payments = vec![PaymentEntry {
            method: PaymentMethod::Cash,
            amount: Money::from_major_minor(1, 0),
        }];
        let outcome = eng
            .process(request(reference_cart(), payments, None))
            .await
            .unwrap();

        assert_eq!(outcome.totals.total.amount(), dec!(26.875));
        assert_eq!(outcome.change_due, Money::zero());
    }

    #[tokio::test]
    async fn test_unauthenticated_rejected() {
        let store = Arc::new(MemStore::default());
        let policy = StaticPolicy {
            user: None,
            roles: vec![],
        };
        let eng = engine(store.clone(), policy, RecordingSink::default());

        let err = eng
            .process(request(reference_cart(), split_tender(), None))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::NotAuthenticated));
        assert_eq!(store.write_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_viewer_role_not_authorized() {
        let store = Arc::new(MemStore::default());
        let policy = StaticPolicy {
            user: Some("viewer-1".to_string()),
            roles: vec![Role::Viewer],
        };
        let eng = engine(store.clone(), policy, RecordingSink::default());

        let err = eng
            .process(request(reference_cart(), split_tender(), None))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::NotAuthorized { .. }));
        assert_eq!(store.write_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_authorized_roles_are_configuration() {
        // a config that only trusts admins refuses the cashier
        let store = Arc::new(MemStore::default());
        let eng = CheckoutEngine::new(
            store.clone(),
            StaticPolicy::cashier(),
            RecordingSink::default(),
            CheckoutConfig::new(TaxRate::from_bps(750), "USD")
                .authorized_roles(vec![Role::Admin]),
        );

        let err = eng
            .process(request(reference_cart(), split_tender(), None))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::NotAuthorized { .. }));
    }

    #[tokio::test]
    async fn test_voucher_below_minimum_fails_checkout() {
        // min purchase 30.00 against a 25.00 cart: the pending code is
        // re-validated at checkout and rejects the attempt
        let store = MemStore::with_voucher(welcome10(30));
        let eng = engine(store.clone(), StaticPolicy::cashier(), RecordingSink::default());

        let err = eng
            .process(request(reference_cart(), split_tender(), Some("WELCOME10")))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::Voucher(VoucherError::MinimumPurchaseNotMet { .. })
        ));
        assert_eq!(store.write_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_voucher_code_fails_checkout() {
        let store = Arc::new(MemStore::default());
        let eng = engine(store.clone(), StaticPolicy::cashier(), RecordingSink::default());

        let err = eng
            .process(request(reference_cart(), split_tender(), Some("NOPE")))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::Voucher(VoucherError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_voucher_exhausted_at_write_time() {
        // evaluation passes, but the conditional increment loses the race
        let store = MemStore::with_voucher(welcome10(20));
        store.deny_redeem();
        let sink = RecordingSink::default();
        let eng = engine(store.clone(), StaticPolicy::cashier(), sink.clone());

        let err = eng
            .process(request(reference_cart(), split_tender(), Some("WELCOME10")))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::Voucher(VoucherError::Exhausted { .. })
        ));

        // the pending header was compensated, never finalized, no receipt
        assert!(store.finalized.lock().unwrap().is_empty());
        assert_eq!(store.cancelled.lock().unwrap().len(), 1);
        assert!(sink.emitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_offline_before_any_write_is_unavailable() {
        let store = MemStore::with_voucher(welcome10(20));
        store.fail_at(FailPoint::FindVoucher);
        let eng = engine(store.clone(), StaticPolicy::cashier(), RecordingSink::default());

        let err = eng
            .process(request(reference_cart(), split_tender(), Some("WELCOME10")))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::PersistenceUnavailable(_)));
        assert!(err.is_recoverable());
        assert_eq!(store.write_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_header_failure_is_retryable_not_partial() {
        let store = Arc::new(MemStore::default());
        store.fail_at(FailPoint::Header);
        let eng = engine(store.clone(), StaticPolicy::cashier(), RecordingSink::default());

        let err = eng
            .process(request(reference_cart(), split_tender(), None))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::PersistenceUnavailable(_)));
        assert!(store.headers.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_items_failure_is_partial_commit() {
        let store = Arc::new(MemStore::default());
        store.fail_at(FailPoint::Items);
        let sink = RecordingSink::default();
        let eng = engine(store.clone(), StaticPolicy::cashier(), sink.clone());

        let err = eng
            .process(request(reference_cart(), split_tender(), None))
            .await
            .unwrap_err();

        let headers = store.headers.lock().unwrap();
        assert_eq!(headers.len(), 1);
        match err {
            CheckoutError::PartialCommit {
                transaction_id,
                step,
                ..
            } => {
                assert_eq!(step, PersistStep::Items);
                assert_eq!(transaction_id, headers[0].id);
            }
            other => panic!("expected PartialCommit, got {:?}", other),
        }

        // never finalized, no receipt
        assert!(store.finalized.lock().unwrap().is_empty());
        assert!(sink.emitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_finalize_failure_is_partial_commit() {
        let store = Arc::new(MemStore::default());
        store.fail_at(FailPoint::Finalize);
        let eng = engine(store.clone(), StaticPolicy::cashier(), RecordingSink::default());

        let err = eng
            .process(request(reference_cart(), split_tender(), None))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::PartialCommit {
                step: PersistStep::Finalize,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_receipt_failure_does_not_fail_the_sale() {
        let store = Arc::new(MemStore::default());
        let sink = RecordingSink {
            emitted: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        };
        let eng = engine(store.clone(), StaticPolicy::cashier(), sink);

        let outcome = eng
            .process(request(reference_cart(), split_tender(), None))
            .await
            .unwrap();

        assert!(outcome.receipt_error.is_some());
        assert_eq!(outcome.transaction.status, TransactionStatus::Completed);
        assert_eq!(store.finalized.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_apply_voucher_is_read_only() {
        let store = MemStore::with_voucher(welcome10(20));
        let eng = engine(store.clone(), StaticPolicy::cashier(), RecordingSink::default());

        let mut session = CheckoutSession::new();
        session.add_product(&product("a", 25, 0), 1).unwrap();

        // applying twice does not touch uses_count
        let d1 = eng.apply_voucher(&mut session, "welcome10").await.unwrap();
        let d2 = eng.apply_voucher(&mut session, " WELCOME10 ").await.unwrap();

        assert_eq!(d1.amount(), dec!(2.5));
        assert_eq!(d1, d2);
        assert_eq!(store.vouchers.lock().unwrap()[0].uses_count, 0);
    }

    #[tokio::test]
    async fn test_voucher_tender_rows_link_voucher_id() {
        let store = MemStore::with_voucher(welcome10(20));
        let eng = engine(store.clone(), StaticPolicy::cashier(), RecordingSink::default());

        let payments = vec![
            PaymentEntry {
                method: PaymentMethod::Voucher,
                amount: Money::from_major_minor(10, 0),
            },
            PaymentEntry {
                method: PaymentMethod::Cash,
                amount: Money::from_major_minor(14, 38),
            },
        ];
        let outcome = eng
            .process(request(reference_cart(), payments, Some("WELCOME10")))
            .await
            .unwrap();

        let voucher_row = outcome
            .payments
            .iter()
            .find(|p| p.method == PaymentMethod::Voucher)
            .unwrap();
        assert_eq!(voucher_row.voucher_id.as_deref(), Some("v-1"));

        let cash_row = outcome
            .payments
            .iter()
            .find(|p| p.method == PaymentMethod::Cash)
            .unwrap();
        assert!(cash_row.voucher_id.is_none());
    }
}
