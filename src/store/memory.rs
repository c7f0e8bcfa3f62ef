use crate::core::error::Result;
use crate::core::order::{OrderId, OrderRow};
use crate::core::store::{OrderStore, StoreOp};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory order store. Transactions are staged on a copy of the table and
/// swapped in only when every operation succeeds.
#[derive(Clone, Default)]
pub struct MemoryOrderStore {
    inner: Arc<Mutex<BTreeMap<OrderId, OrderRow>>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orders(orders: impl IntoIterator<Item = OrderRow>) -> Self {
        let table = orders
            .into_iter()
            .map(|order| (order.order_id, order))
            .collect();
        Self {
            inner: Arc::new(Mutex::new(table)),
        }
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn list_all(&self) -> Result<Vec<OrderRow>> {
        let table = self.inner.lock().await;
        Ok(table.values().cloned().collect())
    }

    async fn lookup_by_key(&self, ids: &[OrderId]) -> Result<HashMap<OrderId, OrderRow>> {
        let table = self.inner.lock().await;
        Ok(ids
            .iter()
            .filter_map(|id| table.get(id).map(|order| (*id, order.clone())))
            .collect())
    }

    async fn apply(&self, ops: Vec<StoreOp>) -> Result<()> {
        let mut table = self.inner.lock().await;
        let mut staged = table.clone();
        for op in ops {
            debug!(?op, "Staging store operation");
            super::apply_op(&mut staged, op)?;
        }
        *table = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_utils::order;

    #[tokio::test]
    async fn test_bulk_operations() {
        let store = MemoryOrderStore::new();
        assert!(store.list_all().await.unwrap().is_empty());

        store
            .bulk_create(vec![
                order(2, "20", "2024-01-02", "2000"),
                order(1, "10", "2024-01-01", "1000"),
            ])
            .await
            .unwrap();

        let all = store.list_all().await.unwrap();
        assert_eq!(all.iter().map(|o| o.order_id).collect::<Vec<_>>(), [1, 2]);

        let found = store.lookup_by_key(&[2, 3]).await.unwrap();
        assert_eq!(found.len(), 1);
        assert!(found.contains_key(&2));

        store.filter_delete(&[1]).await.unwrap();
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_transaction_leaves_store_untouched() {
        let store = MemoryOrderStore::with_orders(vec![
            order(1, "10", "2024-01-01", "1000"),
            order(2, "20", "2024-01-02", "2000"),
        ]);

        let result = store
            .apply(vec![
                StoreOp::Delete(vec![1]),
                StoreOp::Create(vec![order(2, "30", "2024-01-03", "3000")]),
            ])
            .await;
        assert!(result.is_err());

        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1], order(2, "20", "2024-01-02", "2000"));
    }

    #[tokio::test]
    async fn test_filter_by_delivery_date() {
        let store = MemoryOrderStore::with_orders(vec![
            order(1, "10", "2024-01-01", "1000"),
            order(2, "20", "2024-01-02", "2000"),
            order(3, "30", "2024-01-02", "3000"),
        ]);
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let delivered = store.filter_by_delivery_date(date).await.unwrap();
        assert_eq!(
            delivered.iter().map(|o| o.order_id).collect::<Vec<_>>(),
            [2, 3]
        );
    }
}
