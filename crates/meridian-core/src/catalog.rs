//! # Catalog Index
//!
//! An in-memory index of active sellable products.
//!
//! ## Why In-Memory?
//! The POS screen resolves every barcode scan and search keystroke against
//! the sellable catalog. Holding the active products in memory keeps lookups
//! off the persistence layer's hot path; the owner refreshes the index from
//! the product repository on its own schedule.
//!
//! ## Lookup Resolution Order
//! ```text
//! scanner / search box input
//!        │
//!        ▼
//!  exact barcode match ──found──► product
//!        │
//!     not found
//!        │
//!        ▼
//!  case-insensitive name substring ──first match──► product
//!        │
//!     not found
//!        │
//!        ▼
//!      None (caller reports "Product not found")
//! ```

use crate::types::Product;

/// In-memory list of active sellable products with barcode and name lookup.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    products: Vec<Product>,
}

impl CatalogIndex {
    /// Builds an index from a product list, keeping only active products.
    pub fn new(products: Vec<Product>) -> Self {
        let mut index = CatalogIndex {
            products: Vec::new(),
        };
        index.refresh(products);
        index
    }

    /// Replaces the index contents with a fresh product list.
    ///
    /// Inactive products are dropped; the caller decides when to refresh
    /// (typically on screen load, matching the source of truth lazily).
    pub fn refresh(&mut self, products: Vec<Product>) {
        self.products = products.into_iter().filter(|p| p.is_active).collect();
    }

    /// Finds a product by exact barcode match.
    pub fn find_by_barcode(&self, barcode: &str) -> Option<&Product> {
        self.products
            .iter()
            .find(|p| p.barcode.as_deref() == Some(barcode))
    }

    /// Finds a product by id.
    pub fn find_by_id(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Returns all products whose name contains the query, case-insensitively.
    pub fn search_name(&self, query: &str) -> Vec<&Product> {
        let query = query.to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&query))
            .collect()
    }

    /// Resolves scanner/search-box input to a single product.
    ///
    /// Tries an exact barcode match first, then falls back to the first
    /// case-insensitive name substring match.
    pub fn lookup(&self, input: &str) -> Option<&Product> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        self.find_by_barcode(input).or_else(|| {
            let needle = input.to_lowercase();
            self.products
                .iter()
                .find(|p| p.name.to_lowercase().contains(&needle))
        })
    }

    /// Number of active products in the index.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Checks if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Iterates over the indexed products.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
