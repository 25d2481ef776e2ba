//! In-memory store
//!
//! Sole owner of all records. Every mutation is followed by a wholesale
//! snapshot write to the configured persistence slot; slot failures are
//! logged and otherwise swallowed, so the store keeps working without
//! persistence.

use jiff::Timestamp;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use tracing::warn;

use crate::{
    customers::{Customer, CustomerId},
    products::{Product, ProductId},
    report::{REMOVED_PRODUCT, ReportLine, SaleReportRow, UNKNOWN_CUSTOMER},
    sales::{Sale, SaleId, SaleLineItem, SaleStatus},
};

pub mod slot;

use slot::{NullSlot, Snapshot, SnapshotSlot};

/// Owner of all customers, products, sales and line items.
///
/// An explicit instance, constructed once and handed to the service layer;
/// tests construct isolated instances freely. The store performs no
/// validation, that is the service's job.
#[derive(Debug)]
pub struct Store {
    customers: Vec<Customer>,
    products: Vec<Product>,
    sales: Vec<Sale>,
    line_items: Vec<SaleLineItem>,
    next_customer_id: u32,
    next_product_id: u32,
    next_sale_id: u32,
    slot: Box<dyn SnapshotSlot>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Creates a store with no persistence medium.
    #[must_use]
    pub fn new() -> Self {
        Self::with_slot(Box::new(NullSlot))
    }

    /// Creates a store mirrored to the given slot, restoring whatever state
    /// the slot already holds.
    ///
    /// A slot that cannot be read, or holds data that cannot be parsed, is
    /// logged and treated as empty: the store starts fresh.
    #[must_use]
    pub fn with_slot(slot: Box<dyn SnapshotSlot>) -> Self {
        let mut store = Self {
            customers: Vec::new(),
            products: Vec::new(),
            sales: Vec::new(),
            line_items: Vec::new(),
            next_customer_id: 1,
            next_product_id: 1,
            next_sale_id: 1,
            slot,
        };

        store.restore();

        store
    }

    /// Appends a customer with the next id and returns it.
    pub fn add_customer(&mut self, name: impl Into<String>) -> Customer {
        let customer = Customer {
            id: CustomerId::from_raw(self.next_customer_id),
            name: name.into(),
        };

        self.next_customer_id += 1;
        self.customers.push(customer.clone());
        self.persist();

        customer
    }

    /// Appends a product with the next id and returns it.
    pub fn add_product(&mut self, name: impl Into<String>, price: Decimal, stock: u32) -> Product {
        let product = Product {
            id: ProductId::from_raw(self.next_product_id),
            name: name.into(),
            price,
            stock,
        };

        self.next_product_id += 1;
        self.products.push(product.clone());
        self.persist();

        product
    }

    /// Looks up a product by id.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Looks up a customer by id.
    #[must_use]
    pub fn customer(&self, id: CustomerId) -> Option<&Customer> {
        self.customers.iter().find(|customer| customer.id == id)
    }

    /// Subtracts `quantity` from a product's stock, saturating at zero.
    ///
    /// A missing product is a silent no-op. Upstream validation never lets
    /// that happen; this is a defensive guard only.
    pub fn decrement_stock(&mut self, id: ProductId, quantity: u32) {
        if let Some(product) = self.products.iter_mut().find(|product| product.id == id) {
            product.stock = product.stock.saturating_sub(quantity);
            self.persist();
        }
    }

    /// Records a sale for the given customer, stamped with the current time.
    pub fn create_sale(&mut self, customer_id: CustomerId) -> Sale {
        let sale = Sale {
            id: SaleId::from_raw(self.next_sale_id),
            customer_id,
            recorded_at: Timestamp::now(),
            status: SaleStatus::Completed,
        };

        self.next_sale_id += 1;
        self.sales.push(sale.clone());
        self.persist();

        sale
    }

    /// Records one line of a sale, computing its subtotal.
    pub fn add_sale_line_item(
        &mut self,
        sale_id: SaleId,
        product_id: ProductId,
        quantity: u32,
        unit_price: Decimal,
    ) -> SaleLineItem {
        let line = SaleLineItem {
            sale_id,
            product_id,
            quantity,
            unit_price,
            subtotal: Decimal::from(quantity) * unit_price,
        };

        self.line_items.push(line.clone());
        self.persist();

        line
    }

    /// All registered customers, in registration order.
    #[must_use]
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// The product catalogue, in registration order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// All recorded sales, in creation order.
    #[must_use]
    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    /// All recorded line items, in creation order.
    #[must_use]
    pub fn line_items(&self) -> &[SaleLineItem] {
        &self.line_items
    }

    /// Joins every sale with its customer name and enriched line items.
    ///
    /// Records referenced by a sale may have gone missing; they fall back to
    /// the [`UNKNOWN_CUSTOMER`] and [`REMOVED_PRODUCT`] labels rather than
    /// failing. Pure read.
    #[must_use]
    pub fn sales_report(&self) -> Vec<SaleReportRow> {
        let customer_names: FxHashMap<CustomerId, &str> = self
            .customers
            .iter()
            .map(|customer| (customer.id, customer.name.as_str()))
            .collect();

        let product_names: FxHashMap<ProductId, &str> = self
            .products
            .iter()
            .map(|product| (product.id, product.name.as_str()))
            .collect();

        self.sales
            .iter()
            .map(|sale| {
                let lines: Vec<ReportLine> = self
                    .line_items
                    .iter()
                    .filter(|line| line.sale_id == sale.id)
                    .map(|line| ReportLine {
                        product_id: line.product_id,
                        product_name: product_names
                            .get(&line.product_id)
                            .copied()
                            .unwrap_or(REMOVED_PRODUCT)
                            .to_owned(),
                        quantity: line.quantity,
                        unit_price: line.unit_price,
                        subtotal: line.subtotal,
                    })
                    .collect();

                let total = lines.iter().map(|line| line.subtotal).sum();

                SaleReportRow {
                    sale_id: sale.id,
                    customer_id: sale.customer_id,
                    customer_name: customer_names
                        .get(&sale.customer_id)
                        .copied()
                        .unwrap_or(UNKNOWN_CUSTOMER)
                        .to_owned(),
                    recorded_at: sale.recorded_at,
                    status: sale.status,
                    lines,
                    total,
                }
            })
            .collect()
    }

    /// Clears all state and deletes the slot entry.
    pub fn reset(&mut self) {
        self.customers.clear();
        self.products.clear();
        self.sales.clear();
        self.line_items.clear();
        self.next_customer_id = 1;
        self.next_product_id = 1;
        self.next_sale_id = 1;

        if let Err(error) = self.slot.clear() {
            warn!(%error, "failed to clear the persistence slot");
        }
    }

    /// Copies the full state into a [`Snapshot`].
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            customers: self.customers.clone(),
            products: self.products.clone(),
            sales: self.sales.clone(),
            line_items: self.line_items.clone(),
            next_customer_id: self.next_customer_id,
            next_product_id: self.next_product_id,
            next_sale_id: self.next_sale_id,
        }
    }

    fn apply(&mut self, snapshot: Snapshot) {
        self.customers = snapshot.customers;
        self.products = snapshot.products;
        self.sales = snapshot.sales;
        self.line_items = snapshot.line_items;
        self.next_customer_id = snapshot.next_customer_id;
        self.next_product_id = snapshot.next_product_id;
        self.next_sale_id = snapshot.next_sale_id;
    }

    fn restore(&mut self) {
        match self.slot.load() {
            Ok(Some(raw)) => match serde_json::from_str::<Snapshot>(&raw) {
                Ok(snapshot) => self.apply(snapshot),
                Err(error) => {
                    warn!(%error, "slot data is unreadable, starting with empty state");
                }
            },
            Ok(None) => {}
            Err(error) => {
                warn!(%error, "slot could not be read, starting with empty state");
            }
        }
    }

    fn persist(&self) {
        match serde_json::to_string(&self.snapshot()) {
            Ok(raw) => {
                if let Err(error) = self.slot.save(&raw) {
                    warn!(%error, "failed to mirror state to the persistence slot");
                }
            }
            Err(error) => warn!(%error, "failed to serialize state snapshot"),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::store::slot::MemorySlot;

    use super::*;

    fn price(minor: i64) -> Decimal {
        Decimal::new(minor, 2)
    }

    #[test]
    fn customer_ids_are_sequential() {
        let mut store = Store::new();

        let first = store.add_customer("Alice");
        let second = store.add_customer("Bob");

        assert_eq!(first.id, CustomerId::from_raw(1));
        assert_eq!(second.id, CustomerId::from_raw(2));
        assert_eq!(store.customers().len(), 2);
    }

    #[test]
    fn decrement_stock_saturates_and_ignores_missing_products() {
        let mut store = Store::new();
        let product = store.add_product("Coffee", price(350), 3);

        store.decrement_stock(product.id, 5);
        store.decrement_stock(ProductId::from_raw(99), 1);

        let remaining = store.product(product.id).map(|product| product.stock);
        assert_eq!(remaining, Some(0));
    }

    #[test]
    fn line_item_subtotal_is_quantity_times_unit_price() {
        let mut store = Store::new();
        let customer = store.add_customer("Alice");
        let sale = store.create_sale(customer.id);

        let line = store.add_sale_line_item(sale.id, ProductId::from_raw(1), 3, price(350));

        assert_eq!(line.subtotal, price(1050));
    }

    #[test]
    fn report_joins_names_and_totals() -> TestResult {
        let mut store = Store::new();
        let customer = store.add_customer("Alice");
        let product = store.add_product("Coffee", price(350), 10);

        let sale = store.create_sale(customer.id);
        store.add_sale_line_item(sale.id, product.id, 2, product.price);
        store.add_sale_line_item(sale.id, product.id, 1, product.price);

        let report = store.sales_report();

        assert_eq!(report.len(), 1);

        let row = report.first().ok_or("missing report row")?;
        assert_eq!(row.customer_name, "Alice");
        assert_eq!(row.lines.len(), 2);
        assert_eq!(row.total, price(1050));

        Ok(())
    }

    #[test]
    fn report_falls_back_to_sentinel_labels() -> TestResult {
        let mut store = Store::new();

        // A sale referencing records that were never registered.
        let sale = store.create_sale(CustomerId::from_raw(42));
        store.add_sale_line_item(sale.id, ProductId::from_raw(7), 1, price(100));

        let report = store.sales_report();
        let row = report.first().ok_or("missing report row")?;

        assert_eq!(row.customer_name, UNKNOWN_CUSTOMER);

        let line = row.lines.first().ok_or("missing report line")?;
        assert_eq!(line.product_name, REMOVED_PRODUCT);

        Ok(())
    }

    #[test]
    fn report_of_empty_store_is_empty() {
        let store = Store::new();

        assert!(store.sales_report().is_empty());
    }

    #[test]
    fn state_round_trips_through_a_slot() -> TestResult {
        let slot = MemorySlot::new();

        let mut store = Store::with_slot(Box::new(slot.clone()));
        let customer = store.add_customer("Alice");
        let product = store.add_product("Coffee", price(350), 10);
        let sale = store.create_sale(customer.id);
        store.add_sale_line_item(sale.id, product.id, 2, product.price);

        let reloaded = Store::with_slot(Box::new(slot));

        assert_eq!(reloaded.snapshot(), store.snapshot());

        Ok(())
    }

    #[test]
    fn id_counters_survive_a_reload() {
        let slot = MemorySlot::new();

        let mut store = Store::with_slot(Box::new(slot.clone()));
        store.add_customer("Alice");
        store.add_customer("Bob");
        drop(store);

        let mut reloaded = Store::with_slot(Box::new(slot));
        let next = reloaded.add_customer("Carol");

        assert_eq!(next.id, CustomerId::from_raw(3));
    }

    #[test]
    fn corrupt_slot_data_degrades_to_empty_state() {
        let slot = MemorySlot::new();
        slot.seed("not json at all {");

        let store = Store::with_slot(Box::new(slot));

        assert!(store.customers().is_empty());
        assert!(store.products().is_empty());
        assert!(store.sales().is_empty());
    }

    #[test]
    fn reset_clears_state_and_the_slot() -> TestResult {
        let slot = MemorySlot::new();

        let mut store = Store::with_slot(Box::new(slot.clone()));
        store.add_customer("Alice");
        assert!(slot.raw().is_some(), "mutation should mirror to the slot");

        store.reset();

        assert!(store.customers().is_empty());
        assert_eq!(slot.raw(), None);

        let next = store.add_customer("Bob");
        assert_eq!(next.id, CustomerId::from_raw(1));

        Ok(())
    }
}
