//! Sales report
//!
//! Joined, display-ready rows for past sales, plus a plain text-table
//! rendering for callers that want one.

use jiff::Timestamp;
use rust_decimal::Decimal;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use crate::{
    customers::CustomerId,
    products::ProductId,
    sales::{SaleId, SaleStatus},
};

/// Label shown when a sale's customer is absent from lookups.
pub const UNKNOWN_CUSTOMER: &str = "Unknown";

/// Label shown when a line item's product is absent from lookups.
pub const REMOVED_PRODUCT: &str = "Removed product";

/// One line of a reported sale, enriched with the product name.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    /// The product sold.
    pub product_id: ProductId,

    /// Product name, or [`REMOVED_PRODUCT`] if the product is gone.
    pub product_name: String,

    /// Units sold
    pub quantity: u32,

    /// Unit price at sale time
    pub unit_price: Decimal,

    /// `quantity` × `unit_price`
    pub subtotal: Decimal,
}

/// One sale in the report, with its lines joined in.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleReportRow {
    /// Sale identifier
    pub sale_id: SaleId,

    /// The customer the sale was made to.
    pub customer_id: CustomerId,

    /// Customer name, or [`UNKNOWN_CUSTOMER`] if the customer is gone.
    pub customer_name: String,

    /// When the sale was recorded.
    pub recorded_at: Timestamp,

    /// Sale status
    pub status: SaleStatus,

    /// The sale's line items, in recorded order.
    pub lines: Vec<ReportLine>,

    /// Sum of the line subtotals.
    pub total: Decimal,
}

/// Renders report rows as a plain text table, one row per line item.
#[must_use]
pub fn render(rows: &[SaleReportRow]) -> String {
    let mut builder = Builder::default();

    builder.push_record([
        "Sale", "Date", "Customer", "Product", "Qty", "Unit", "Subtotal", "Total",
    ]);

    for row in rows {
        let date = row.recorded_at.strftime("%Y-%m-%d %H:%M").to_string();

        if row.lines.is_empty() {
            builder.push_record([
                row.sale_id.to_string(),
                date,
                row.customer_name.clone(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                row.total.to_string(),
            ]);

            continue;
        }

        for (idx, line) in row.lines.iter().enumerate() {
            let first = idx == 0;
            let last = idx == row.lines.len() - 1;

            builder.push_record([
                if first {
                    row.sale_id.to_string()
                } else {
                    String::new()
                },
                if first { date.clone() } else { String::new() },
                if first {
                    row.customer_name.clone()
                } else {
                    String::new()
                },
                line.product_name.clone(),
                line.quantity.to_string(),
                line.unit_price.to_string(),
                line.subtotal.to_string(),
                if last {
                    row.total.to_string()
                } else {
                    String::new()
                },
            ]);
        }
    }

    let mut table = builder.build();
    table.with(Style::sharp());
    table.modify(Columns::new(4..), Alignment::right());

    table.to_string()
}
