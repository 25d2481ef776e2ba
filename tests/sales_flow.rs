//! End-to-end workflow test for the sales service.
//!
//! Drives the full caller-facing surface the way a presentation layer
//! would: register customers and products, complete a mixed sale, then
//! check the report and the remaining stock.

use rust_decimal::Decimal;
use testresult::TestResult;

use till::{sales::LineItemRequest, service::SalesService, store::Store};

#[test]
fn full_sales_workflow() -> TestResult {
    let mut service = SalesService::new(Store::new());

    let alice = service.register_customer("Alice")?;
    let bob = service.register_customer("Bob")?;

    let coffee = service.register_product("Coffee", "3.50", "10")?;
    let tea = service.register_product("Tea", "2.25", "5")?;

    assert_eq!(service.customers().len(), 2);
    assert_eq!(service.products().len(), 2);

    // Alice buys 2 coffees and 1 tea: total 2 x 3.50 + 2.25 = 9.25.
    let first = service.complete_sale(
        alice.id,
        &[
            LineItemRequest {
                product_id: coffee.id,
                quantity: 2,
            },
            LineItemRequest {
                product_id: tea.id,
                quantity: 1,
            },
        ],
    )?;

    // Bob buys the rest of the tea.
    let second = service.complete_sale(
        bob.id,
        &[LineItemRequest {
            product_id: tea.id,
            quantity: 4,
        }],
    )?;

    assert!(first.id < second.id, "sale ids should increase");

    let coffee_stock = service.store().product(coffee.id).map(|p| p.stock);
    let tea_stock = service.store().product(tea.id).map(|p| p.stock);
    assert_eq!(coffee_stock, Some(8));
    assert_eq!(tea_stock, Some(0));

    let report = service.sales_report();
    assert_eq!(report.len(), 2);

    for row in &report {
        let expected: Decimal = row.lines.iter().map(|line| line.subtotal).sum();
        assert_eq!(row.total, expected, "report total must equal line sum");
    }

    let first_row = report.first().ok_or("missing first report row")?;
    assert_eq!(first_row.customer_name, "Alice");
    assert_eq!(first_row.lines.len(), 2);
    assert_eq!(first_row.total, Decimal::new(925, 2));

    // Tea is gone now; another tea sale must fail and change nothing.
    let sold_out = service.complete_sale(
        bob.id,
        &[LineItemRequest {
            product_id: tea.id,
            quantity: 1,
        }],
    );

    assert!(sold_out.is_err(), "tea is out of stock");
    assert_eq!(service.sales_report().len(), 2);

    let rendered = till::report::render(&report);
    assert!(rendered.contains("Coffee"), "rendered report lists products");
    assert!(rendered.contains("9.25"), "rendered report lists totals");

    Ok(())
}
