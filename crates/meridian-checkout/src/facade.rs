//! # Collaborator Façades
//!
//! The traits the checkout engine consumes from its environment, plus the
//! production implementations backed by [`meridian_store::Store`].
//!
//! ## Why Traits Here
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The engine never talks to sqlx or the auth system directly:            │
//! │                                                                         │
//! │  CheckoutEngine ──► CheckoutStore  ──► Store (SQLite)   [production]    │
//! │                │                  └──► in-memory fake   [tests]         │
//! │                │                                                        │
//! │                ├──► AccessPolicy  ──► StoreAccessPolicy [production]    │
//! │                │                  └──► static fake      [tests]         │
//! │                │                                                        │
//! │                └──► ReceiptSink   ──► printer bridge    [production]    │
//! │                                   └──► recording fake   [tests]         │
//! │                                                                         │
//! │  Authorization policy (WHICH roles may check out) stays in              │
//! │  CheckoutConfig; the AccessPolicy only answers identity questions.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use meridian_core::{Role, Transaction, TransactionItem, TransactionPayment, Voucher};
use meridian_store::{Store, StoreError};

// =============================================================================
// Persistence Façade
// =============================================================================

/// The persistence façade the checkout engine calls in sequence.
///
/// One logical unit of work spans `insert_transaction` through
/// `finalize_transaction`; every step is idempotent on its client-generated
/// id so a retry can resume instead of double-writing.
pub trait CheckoutStore {
    /// Looks up an active voucher by normalized code.
    async fn find_voucher(&self, code: &str) -> Result<Option<Voucher>, StoreError>;

    /// Writes the transaction header. Returns `false` when a header with
    /// this id already existed (idempotent resume).
    async fn insert_transaction(&self, txn: &Transaction) -> Result<bool, StoreError>;

    /// Bulk-inserts line items.
    async fn insert_items(&self, items: &[TransactionItem]) -> Result<(), StoreError>;

    /// Bulk-inserts payments.
    async fn insert_payments(&self, payments: &[TransactionPayment]) -> Result<(), StoreError>;

    /// Atomically consumes one voucher use; `false` means the voucher was
    /// exhausted (or deactivated) between evaluation and this write.
    async fn redeem_voucher(&self, code: &str) -> Result<bool, StoreError>;

    /// Flips the transaction status pending → completed.
    async fn finalize_transaction(&self, id: &str) -> Result<(), StoreError>;

    /// Marks a pending transaction cancelled (compensation path).
    async fn cancel_transaction(&self, id: &str) -> Result<(), StoreError>;
}

impl CheckoutStore for Store {
    async fn find_voucher(&self, code: &str) -> Result<Option<Voucher>, StoreError> {
        self.vouchers().find_active_by_code(code).await
    }

    async fn insert_transaction(&self, txn: &Transaction) -> Result<bool, StoreError> {
        self.transactions().insert_transaction(txn).await
    }

    async fn insert_items(&self, items: &[TransactionItem]) -> Result<(), StoreError> {
        self.transactions().insert_items(items).await
    }

    async fn insert_payments(&self, payments: &[TransactionPayment]) -> Result<(), StoreError> {
        self.transactions().insert_payments(payments).await
    }

    async fn redeem_voucher(&self, code: &str) -> Result<bool, StoreError> {
        self.vouchers().redeem(code).await
    }

    async fn finalize_transaction(&self, id: &str) -> Result<(), StoreError> {
        self.transactions().finalize(id).await
    }

    async fn cancel_transaction(&self, id: &str) -> Result<(), StoreError> {
        self.transactions().cancel(id).await
    }
}

// =============================================================================
// Access Policy
// =============================================================================

/// Identity and role-check capability, provided by the external auth system.
///
/// The engine asks two questions: "who is acting?" and "does that user hold
/// role X?". Which roles are sufficient is engine configuration, not policy
/// implementation.
pub trait AccessPolicy {
    /// The opaque identity of the acting user, if any.
    fn current_user(&self) -> Option<String>;

    /// Whether the user holds the given role.
    async fn has_role(&self, user_id: &str, role: Role) -> Result<bool, StoreError>;
}

/// Access policy backed by the role store, with the current identity pinned
/// at construction (the auth session resolves it once per operator login).
#[derive(Debug, Clone)]
pub struct StoreAccessPolicy {
    store: Store,
    current_user: Option<String>,
}

impl StoreAccessPolicy {
    /// Creates a policy for the given signed-in user (or `None` when no
    /// operator session exists).
    pub fn new(store: Store, current_user: Option<String>) -> Self {
        StoreAccessPolicy {
            store,
            current_user,
        }
    }
}

impl AccessPolicy for StoreAccessPolicy {
    fn current_user(&self) -> Option<String> {
        self.current_user.clone()
    }

    async fn has_role(&self, user_id: &str, role: Role) -> Result<bool, StoreError> {
        self.store.roles().has_role(user_id, role).await
    }
}
