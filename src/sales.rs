//! Sales and sale line items

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{customers::CustomerId, ids::RecordId, products::ProductId};

/// Sale identifier
pub type SaleId = RecordId<Sale>;

/// Status of a recorded sale.
///
/// Sales are only ever recorded after they have gone through stock
/// validation, so `Completed` is currently the sole status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    /// The sale was validated and committed.
    Completed,
}

/// A recorded sale.
///
/// Created atomically with its line items and immutable thereafter. Line
/// items are stored separately, keyed by [`SaleId`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    /// Sale identifier
    pub id: SaleId,

    /// The customer the sale was made to.
    ///
    /// By-value reference: the customer existed when the sale was created,
    /// but nothing prevents it from being absent from later lookups.
    pub customer_id: CustomerId,

    /// When the sale was recorded.
    pub recorded_at: Timestamp,

    /// Sale status
    pub status: SaleStatus,
}

/// A single line of a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineItem {
    /// The sale this line belongs to.
    pub sale_id: SaleId,

    /// The product sold.
    pub product_id: ProductId,

    /// Units sold
    pub quantity: u32,

    /// Snapshot of the product's price at sale time.
    pub unit_price: Decimal,

    /// `quantity` × `unit_price`
    pub subtotal: Decimal,
}

/// Caller input for one line of a sale to be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineItemRequest {
    /// The product to sell.
    pub product_id: ProductId,

    /// Units requested
    pub quantity: u32,
}
