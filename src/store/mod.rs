pub mod disk;
pub mod memory;

use crate::core::error::{Result, SyncError};
use crate::core::order::{OrderId, OrderRow};
use crate::core::store::StoreOp;
use std::collections::BTreeMap;

pub use disk::DiskOrderStore;
pub use memory::MemoryOrderStore;

/// Applies one operation to a staged view of the orders table.
///
/// Stores stage a whole transaction through this function and only publish the
/// result once every operation has succeeded.
pub(crate) fn apply_op(table: &mut BTreeMap<OrderId, OrderRow>, op: StoreOp) -> Result<()> {
    match op {
        StoreOp::Delete(ids) => {
            for id in ids {
                table.remove(&id);
            }
        }
        StoreOp::Create(orders) => {
            for order in orders {
                if table.contains_key(&order.order_id) {
                    return Err(SyncError::Store(format!(
                        "order {} already exists",
                        order.order_id
                    )));
                }
                table.insert(order.order_id, order);
            }
        }
        StoreOp::Update { orders, fields } => {
            for order in orders {
                let stored = table.get_mut(&order.order_id).ok_or_else(|| {
                    SyncError::Store(format!("order {} does not exist", order.order_id))
                })?;
                stored.copy_fields(&order, &fields);
            }
        }
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_utils::order;
    use super::*;
    use crate::core::order::UPDATE_FIELDS;

    fn table(orders: Vec<OrderRow>) -> BTreeMap<OrderId, OrderRow> {
        orders.into_iter().map(|o| (o.order_id, o)).collect()
    }

    #[test]
    fn test_delete_ignores_unknown_ids() {
        let mut t = table(vec![order(1, "1", "2024-01-01", "100")]);
        apply_op(&mut t, StoreOp::Delete(vec![1, 99])).unwrap();
        assert!(t.is_empty());
    }

    #[test]
    fn test_create_rejects_existing_id() {
        let mut t = table(vec![order(1, "1", "2024-01-01", "100")]);
        let result = apply_op(
            &mut t,
            StoreOp::Create(vec![order(1, "2", "2024-01-01", "200")]),
        );
        assert_eq!(
            result.unwrap_err().to_string(),
            "store error: order 1 already exists"
        );
    }

    #[test]
    fn test_update_only_touches_listed_fields() {
        let mut t = table(vec![order(1, "1", "2024-01-01", "100")]);
        let changed = order(1, "2", "2024-05-05", "200");
        apply_op(
            &mut t,
            StoreOp::Update {
                orders: vec![changed.clone()],
                fields: vec![crate::core::OrderField::Price],
            },
        )
        .unwrap();
        assert_eq!(t[&1].price, changed.price);
        assert_ne!(t[&1].delivery_date, changed.delivery_date);

        apply_op(
            &mut t,
            StoreOp::Update {
                orders: vec![changed.clone()],
                fields: UPDATE_FIELDS.to_vec(),
            },
        )
        .unwrap();
        assert_eq!(t[&1], changed);
    }

    #[test]
    fn test_update_missing_order_fails() {
        let mut t = BTreeMap::new();
        let result = apply_op(
            &mut t,
            StoreOp::Update {
                orders: vec![order(5, "1", "2024-01-01", "100")],
                fields: UPDATE_FIELDS.to_vec(),
            },
        );
        assert!(result.is_err());
    }
}
