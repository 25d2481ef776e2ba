//! Till
//!
//! Till is the business core of a small sales tracker: register customers
//! and products, complete stock-checked sales assembled from line items, and
//! build a joined report of past sales.
//!
//! State lives in an in-memory [`store::Store`] that mirrors itself to a
//! pluggable persistence slot after every mutation; all business rules are
//! enforced by [`service::SalesService`] before the store is touched. There
//! is no network, no async and no presentation layer here — an external
//! caller drives the service and renders its results.
//!
//! ```
//! use till::{
//!     sales::LineItemRequest,
//!     service::SalesService,
//!     store::Store,
//! };
//!
//! # fn main() -> Result<(), till::service::SalesServiceError> {
//! let mut service = SalesService::new(Store::new());
//!
//! let customer = service.register_customer("Alice")?;
//! let product = service.register_product("Coffee", "3.50", "10")?;
//!
//! let sale = service.complete_sale(
//!     customer.id,
//!     &[LineItemRequest { product_id: product.id, quantity: 3 }],
//! )?;
//!
//! assert_eq!(sale.id.get(), 1);
//! assert_eq!(service.sales_report().len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod customers;
pub mod ids;
pub mod products;
pub mod report;
pub mod sales;
pub mod service;
pub mod store;
