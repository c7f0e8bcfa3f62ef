use super::ui;
use crate::core::order::{DATE_FORMAT, OrderRow};
use crate::core::store::OrderStore;
use anyhow::Result;
use comfy_table::Cell;
use rust_decimal::Decimal;

pub fn display_orders(orders: &[OrderRow]) -> String {
    if orders.is_empty() {
        return ui::style_text("No orders stored yet.", ui::StyleType::Subtle);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Order"),
        ui::header_cell("Price"),
        ui::header_cell("Delivery date"),
        ui::header_cell("Price (RUB)"),
    ]);

    for order in orders {
        table.add_row(vec![
            ui::number_cell(order.order_id),
            ui::number_cell(order.price),
            Cell::new(order.delivery_date.format(DATE_FORMAT)),
            ui::number_cell(order.rub_price),
        ]);
    }

    let total: Decimal = orders.iter().map(|order| order.rub_price).sum();
    format!(
        "{}\n\n{}: {}",
        table,
        ui::style_text("Total (RUB)", ui::StyleType::TotalLabel),
        ui::style_text(&total.to_string(), ui::StyleType::TotalValue)
    )
}

pub async fn run(store: &dyn OrderStore) -> Result<()> {
    let orders = store.list_all().await?;
    println!("{}", display_orders(&orders));
    Ok(())
}
