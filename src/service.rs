//! Sales service
//!
//! Stateless façade over the [`Store`]: every business rule is enforced here
//! before the store is touched, so a failed call never leaves partial state
//! behind.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{
    customers::{Customer, CustomerId},
    products::{Product, ProductId},
    report::SaleReportRow,
    sales::{LineItemRequest, Sale},
    store::Store,
};

/// Errors raised by the service before any state is mutated.
///
/// All of these are recoverable: the caller corrects the input and retries.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SalesServiceError {
    /// Customer name was empty or whitespace-only.
    #[error("customer name is required")]
    MissingCustomerName,

    /// Product name was empty or whitespace-only.
    #[error("product name is required")]
    MissingProductName,

    /// Price did not parse, or was not positive.
    #[error("invalid price")]
    InvalidPrice,

    /// Stock did not parse, or was negative.
    #[error("invalid stock")]
    InvalidStock,

    /// The referenced customer does not exist.
    #[error("customer {0} not found")]
    CustomerNotFound(CustomerId),

    /// The referenced product does not exist.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// A sale must carry at least one line item.
    #[error("a sale must have at least one item")]
    EmptySale,

    /// A line item carried a zero quantity.
    #[error("quantity must be positive")]
    InvalidQuantity,

    /// Requested quantity exceeds the product's current stock.
    #[error("insufficient stock for product: {product}. Available: {available}")]
    InsufficientStock {
        /// Name of the product that ran short.
        product: String,

        /// Units currently in stock.
        available: u32,
    },
}

/// Business-rule layer over a [`Store`].
///
/// Owns the store it was constructed with; tests build isolated instances by
/// handing in their own store.
#[derive(Debug)]
pub struct SalesService {
    store: Store,
}

impl SalesService {
    /// Wraps the given store.
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Read access to the underlying store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Registers a customer.
    ///
    /// # Errors
    ///
    /// Returns [`SalesServiceError::MissingCustomerName`] if the name is
    /// empty or whitespace-only.
    pub fn register_customer(&mut self, name: &str) -> Result<Customer, SalesServiceError> {
        if name.trim().is_empty() {
            return Err(SalesServiceError::MissingCustomerName);
        }

        Ok(self.store.add_customer(name))
    }

    /// Registers a product from raw form-field text.
    ///
    /// Price and stock arrive as text from the caller's input fields and are
    /// parsed here; the store only ever sees typed values.
    ///
    /// # Errors
    ///
    /// - [`SalesServiceError::MissingProductName`]: empty name.
    /// - [`SalesServiceError::InvalidPrice`]: price not a positive number.
    /// - [`SalesServiceError::InvalidStock`]: stock not a non-negative
    ///   integer.
    pub fn register_product(
        &mut self,
        name: &str,
        price: &str,
        stock: &str,
    ) -> Result<Product, SalesServiceError> {
        if name.trim().is_empty() {
            return Err(SalesServiceError::MissingProductName);
        }

        let price: Decimal = price
            .trim()
            .parse()
            .map_err(|_err| SalesServiceError::InvalidPrice)?;

        if price <= Decimal::ZERO {
            return Err(SalesServiceError::InvalidPrice);
        }

        let stock: u32 = stock
            .trim()
            .parse()
            .map_err(|_err| SalesServiceError::InvalidStock)?;

        Ok(self.store.add_product(name, price, stock))
    }

    /// All registered customers.
    #[must_use]
    pub fn customers(&self) -> &[Customer] {
        self.store.customers()
    }

    /// The product catalogue.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        self.store.products()
    }

    /// Validates and records a sale as a single logical unit.
    ///
    /// Every line item is checked before anything is written: the customer
    /// must exist, the request must be non-empty, every product must exist
    /// and have enough stock. Quantities are aggregated per product first,
    /// so a product listed twice cannot pass validation and then oversell.
    /// Only once the whole request passes does the store record the sale,
    /// its line items (snapshotting each product's current price) and the
    /// stock decrements.
    ///
    /// The returned [`Sale`] carries no line items; callers wanting them
    /// fetch the report.
    ///
    /// # Errors
    ///
    /// - [`SalesServiceError::CustomerNotFound`]: unknown customer id.
    /// - [`SalesServiceError::EmptySale`]: no line items.
    /// - [`SalesServiceError::InvalidQuantity`]: a zero quantity.
    /// - [`SalesServiceError::ProductNotFound`]: unknown product id.
    /// - [`SalesServiceError::InsufficientStock`]: requested quantity over
    ///   the available stock.
    ///
    /// On any of these the store is left untouched.
    pub fn complete_sale(
        &mut self,
        customer_id: CustomerId,
        requests: &[LineItemRequest],
    ) -> Result<Sale, SalesServiceError> {
        if self.store.customer(customer_id).is_none() {
            return Err(SalesServiceError::CustomerNotFound(customer_id));
        }

        if requests.is_empty() {
            return Err(SalesServiceError::EmptySale);
        }

        // Pre-flight pass: no mutation until every line checks out.
        let mut requested: FxHashMap<ProductId, u64> = FxHashMap::default();

        for request in requests {
            if request.quantity == 0 {
                return Err(SalesServiceError::InvalidQuantity);
            }

            let product = self
                .store
                .product(request.product_id)
                .ok_or(SalesServiceError::ProductNotFound(request.product_id))?;

            let total = requested.entry(request.product_id).or_insert(0);
            *total += u64::from(request.quantity);

            if *total > u64::from(product.stock) {
                return Err(SalesServiceError::InsufficientStock {
                    product: product.name.clone(),
                    available: product.stock,
                });
            }
        }

        let sale = self.store.create_sale(customer_id);

        for request in requests {
            // Validated above; skipping a vanished product mirrors the
            // store's own defensive guard.
            let Some(unit_price) = self
                .store
                .product(request.product_id)
                .map(|product| product.price)
            else {
                continue;
            };

            self.store
                .add_sale_line_item(sale.id, request.product_id, request.quantity, unit_price);
            self.store.decrement_stock(request.product_id, request.quantity);
        }

        Ok(sale)
    }

    /// The joined report of all past sales.
    #[must_use]
    pub fn sales_report(&self) -> Vec<SaleReportRow> {
        self.store.sales_report()
    }
}
