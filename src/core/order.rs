//! Order records shared by the spreadsheet and store snapshots

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

pub type OrderId = u64;

/// Date format used for stored records and canonical keys.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const KEY_DELIMITER: char = '~';

/// One order as seen by either snapshot.
///
/// Both the spreadsheet reader and the store reader produce this type, so the
/// field order and types of the two snapshots cannot drift apart. Equality and
/// hashing are field-wise; decimals compare numerically (`10.0 == 10.00`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderRow {
    pub order_id: OrderId,
    pub price: Decimal,
    pub delivery_date: NaiveDate,
    pub rub_price: Decimal,
}

/// Mutable columns of a stored order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderField {
    Price,
    DeliveryDate,
    RubPrice,
}

/// Fields overwritten when a changed spreadsheet row updates a stored order.
pub const UPDATE_FIELDS: [OrderField; 3] = [
    OrderField::Price,
    OrderField::DeliveryDate,
    OrderField::RubPrice,
];

impl OrderRow {
    /// Copies the given fields from `source` into `self`. The id is never touched.
    pub fn copy_fields(&mut self, source: &OrderRow, fields: &[OrderField]) {
        for field in fields {
            match field {
                OrderField::Price => self.price = source.price,
                OrderField::DeliveryDate => self.delivery_date = source.delivery_date,
                OrderField::RubPrice => self.rub_price = source.rub_price,
            }
        }
    }
}

/// Renders the canonical key `order~price~delivery_date~rub_price`.
impl Display for OrderRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{KEY_DELIMITER}{}{KEY_DELIMITER}{}{KEY_DELIMITER}{}",
            self.order_id,
            self.price,
            self.delivery_date.format(DATE_FORMAT),
            self.rub_price
        )
    }
}

impl FromStr for OrderRow {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(KEY_DELIMITER).collect();
        let [order_id, price, delivery_date, rub_price] = parts.as_slice() else {
            return Err(anyhow::anyhow!(
                "Invalid order key '{}': expected 4 fields, found {}",
                s,
                parts.len()
            ));
        };

        Ok(OrderRow {
            order_id: order_id.parse()?,
            price: Decimal::from_str(price)?,
            delivery_date: NaiveDate::parse_from_str(delivery_date, DATE_FORMAT)?,
            rub_price: Decimal::from_str(rub_price)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(order_id: OrderId, price: &str, date: &str, rub_price: &str) -> OrderRow {
        OrderRow {
            order_id,
            price: Decimal::from_str(price).unwrap(),
            delivery_date: NaiveDate::parse_from_str(date, DATE_FORMAT).unwrap(),
            rub_price: Decimal::from_str(rub_price).unwrap(),
        }
    }

    #[test]
    fn test_canonical_key_round_trip() {
        let original = row(42, "10.50", "2024-03-01", "1051.23");
        let key = original.to_string();
        assert_eq!(key, "42~10.50~2024-03-01~1051.23");

        let parsed: OrderRow = key.parse().unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_invalid_key_is_rejected() {
        let result = "1~10.00~2024-01-01".parse::<OrderRow>();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("expected 4 fields"));

        assert!("x~10.00~2024-01-01~1.00".parse::<OrderRow>().is_err());
        assert!("1~10.00~01.01.2024~1.00".parse::<OrderRow>().is_err());
    }

    #[test]
    fn test_decimal_scale_does_not_affect_equality() {
        let a = row(1, "10.0", "2024-01-01", "1050");
        let b = row(1, "10.00", "2024-01-01", "1050.00");
        assert_eq!(a, b);

        let set: std::collections::HashSet<OrderRow> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_copy_fields_keeps_order_id() {
        let mut stored = row(7, "12.00", "2024-01-01", "1260.00");
        let sheet = row(8, "10.00", "2024-02-02", "1050.00");

        stored.copy_fields(&sheet, &[OrderField::Price]);
        assert_eq!(stored.price, sheet.price);
        assert_eq!(stored.delivery_date, row(0, "0", "2024-01-01", "0").delivery_date);

        stored.copy_fields(&sheet, &UPDATE_FIELDS);
        assert_eq!(stored.order_id, 7);
        assert_eq!(stored.delivery_date, sheet.delivery_date);
        assert_eq!(stored.rub_price, sheet.rub_price);
    }
}
