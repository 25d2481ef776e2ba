//! Products

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::RecordId;

/// Product identifier
pub type ProductId = RecordId<Product>;

/// A product in the catalogue.
///
/// Stock is the only mutable field; it is decremented by completed sales and
/// can never go negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Unit price
    pub price: Decimal,

    /// Units currently in stock
    pub stock: u32,
}
