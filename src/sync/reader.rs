//! Snapshot readers for both sides of a reconciliation pass.

use crate::core::error::{Result, SyncError};
use crate::core::order::{OrderId, OrderRow};
use crate::core::{CurrencyRateProvider, OrderStore, SheetSource};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Date format used by the spreadsheet's delivery column.
pub const SHEET_DATE_FORMAT: &str = "%d.%m.%Y";

/// Orders read from the spreadsheet together with the rate used to price them.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetSnapshot {
    pub rate: Decimal,
    pub orders: Vec<OrderRow>,
}

/// Reads the order range of one spreadsheet and prices it in roubles.
pub struct SpreadsheetReader {
    source: Arc<dyn SheetSource>,
    rates: Arc<dyn CurrencyRateProvider>,
    sheet_id: String,
    range: String,
    currency: String,
}

impl SpreadsheetReader {
    pub fn new(
        source: Arc<dyn SheetSource>,
        rates: Arc<dyn CurrencyRateProvider>,
        sheet_id: &str,
        range: &str,
        currency: &str,
    ) -> Self {
        SpreadsheetReader {
            source,
            rates,
            sheet_id: sheet_id.to_string(),
            range: range.to_string(),
            currency: currency.to_string(),
        }
    }

    pub async fn read_orders(&self) -> Result<Vec<OrderRow>> {
        Ok(self.read_snapshot().await?.orders)
    }

    pub async fn read_snapshot(&self) -> Result<SheetSnapshot> {
        let values = self
            .source
            .fetch_values(&self.sheet_id, &self.range)
            .await?;
        if values.is_empty() {
            return Err(SyncError::DataNotFound(self.range.clone()));
        }

        let rate = self.rates.get_rate(&self.currency).await?;
        let orders = parse_sheet_rows(&values, rate)?;
        debug!(rows = orders.len(), %rate, "Read spreadsheet snapshot");
        Ok(SheetSnapshot { rate, orders })
    }
}

/// Returns every stored order in the same shape the spreadsheet reader produces.
pub async fn read_store_orders(store: &dyn OrderStore) -> Result<Vec<OrderRow>> {
    let orders = store.list_all().await?;
    debug!(rows = orders.len(), "Read store snapshot");
    Ok(orders)
}

/// Turns raw sheet cells into priced orders.
///
/// Row 0 is the header and column 0 the sheet's own row number; both are
/// dropped. The remaining columns are `order_id`, `price`, `delivery_date`.
pub fn parse_sheet_rows(values: &[Vec<String>], rate: Decimal) -> Result<Vec<OrderRow>> {
    let mut orders: Vec<OrderRow> = Vec::with_capacity(values.len().saturating_sub(1));
    let mut seen: HashMap<OrderId, usize> = HashMap::new();

    for (index, row) in values.iter().enumerate().skip(1) {
        let row_number = index + 1;
        let cells = row.get(1..).unwrap_or_default();
        if cells.iter().all(|cell| cell.trim().is_empty()) {
            warn!(row = row_number, "Skipping blank sheet row");
            continue;
        }

        let order = parse_row(row_number, cells, rate)?;
        match seen.get(&order.order_id) {
            Some(&position) if orders[position] != order => {
                return Err(SyncError::InvalidRow {
                    row: row_number,
                    order_id: order.order_id.to_string(),
                    reason: "duplicate order id with different values".to_string(),
                });
            }
            Some(_) => {}
            None => {
                seen.insert(order.order_id, orders.len());
            }
        }
        orders.push(order);
    }
    Ok(orders)
}

fn parse_row(row_number: usize, cells: &[String], rate: Decimal) -> Result<OrderRow> {
    let cell = |i: usize| cells.get(i).map(|c| c.trim()).filter(|c| !c.is_empty());
    let raw_id = cell(0).unwrap_or_default();
    let invalid = |reason: String| SyncError::InvalidRow {
        row: row_number,
        order_id: raw_id.to_string(),
        reason,
    };

    let order_id = raw_id
        .parse::<OrderId>()
        .map_err(|e| invalid(format!("order id: {e}")))?;

    let raw_price = cell(1).ok_or_else(|| invalid("missing price".to_string()))?;
    let price = Decimal::from_str(&raw_price.replace(',', "."))
        .map_err(|e| invalid(format!("price '{raw_price}': {e}")))?;

    let raw_date = cell(2).ok_or_else(|| invalid("missing delivery date".to_string()))?;
    let delivery_date = NaiveDate::parse_from_str(raw_date, SHEET_DATE_FORMAT)
        .map_err(|e| invalid(format!("delivery date '{raw_date}': {e}")))?;

    let rub_price = convert_price(price, rate)
        .ok_or_else(|| invalid(format!("price '{raw_price}' times rate {rate} overflows")))?;

    Ok(OrderRow {
        order_id,
        price,
        delivery_date,
        rub_price,
    })
}

/// `price × rate` rounded half-to-even to kopecks, or `None` on overflow.
pub fn convert_price(price: Decimal, rate: Decimal) -> Option<Decimal> {
    let mut converted = price.checked_mul(rate)?.round_dp(2);
    converted.rescale(2);
    Some(converted)
}
