//! Stages the result of a diff and applies it to the store in one transaction.

use crate::core::error::{Result, SyncError};
use crate::core::order::{OrderId, OrderRow, UPDATE_FIELDS};
use crate::core::store::{OrderStore, StoreOp};
use std::collections::HashMap;
use tracing::{debug, info};

pub struct StoreWriter<'a> {
    store: &'a dyn OrderStore,
    ops: Vec<StoreOp>,
}

impl<'a> StoreWriter<'a> {
    pub fn new(store: &'a dyn OrderStore) -> Self {
        Self {
            store,
            ops: Vec::new(),
        }
    }

    /// Stages removal of every order in `order_ids`.
    pub fn delete(&mut self, order_ids: &[OrderId]) {
        if order_ids.is_empty() {
            return;
        }
        debug!(count = order_ids.len(), "Staging deletions");
        self.ops.push(StoreOp::Delete(order_ids.to_vec()));
    }

    /// Stages insertion of new orders. The ids must not exist in the store yet.
    pub fn create(&mut self, records: &[OrderRow]) {
        if records.is_empty() {
            return;
        }
        debug!(count = records.len(), "Staging creations");
        self.ops.push(StoreOp::Create(records.to_vec()));
    }

    /// Stages an update of existing orders from changed sheet rows.
    ///
    /// Each record is joined to its stored counterpart by `order_id`; only
    /// price, delivery date and rouble price are overwritten.
    pub fn update(
        &mut self,
        existing: &HashMap<OrderId, OrderRow>,
        records: &[OrderRow],
    ) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let mut updated = Vec::with_capacity(records.len());
        for record in records {
            let mut stored = existing.get(&record.order_id).cloned().ok_or_else(|| {
                SyncError::Store(format!(
                    "order {} has no stored record to update",
                    record.order_id
                ))
            })?;
            stored.copy_fields(record, &UPDATE_FIELDS);
            updated.push(stored);
        }

        debug!(count = updated.len(), "Staging updates");
        self.ops.push(StoreOp::Update {
            orders: updated,
            fields: UPDATE_FIELDS.to_vec(),
        });
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn staged(&self) -> &[StoreOp] {
        &self.ops
    }

    /// Applies everything staged so far as a single store transaction.
    pub async fn commit(self) -> Result<()> {
        if self.ops.is_empty() {
            return Ok(());
        }
        let count = self.ops.len();
        self.store.apply(self.ops).await?;
        info!(operations = count, "Committed changes to store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryOrderStore;
    use crate::store::test_utils::order;

    #[tokio::test]
    async fn test_update_pairs_records_by_order_id() {
        let store = MemoryOrderStore::with_orders(vec![
            order(1, "1.00", "2024-01-01", "100.00"),
            order(2, "2.00", "2024-01-02", "200.00"),
            order(3, "3.00", "2024-01-03", "300.00"),
        ]);
        let existing = store.lookup_by_key(&[3, 1, 2]).await.unwrap();

        // Records deliberately ordered unlike any map iteration order.
        let records = vec![
            order(3, "30.00", "2024-03-03", "3000.00"),
            order(1, "10.00", "2024-03-01", "1000.00"),
            order(2, "20.00", "2024-03-02", "2000.00"),
        ];

        let mut writer = StoreWriter::new(&store);
        writer.update(&existing, &records).unwrap();
        writer.commit().await.unwrap();

        let mut expected = records.clone();
        expected.sort_by_key(|r| r.order_id);
        assert_eq!(store.list_all().await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_update_without_stored_record_fails() {
        let store = MemoryOrderStore::new();
        let mut writer = StoreWriter::new(&store);
        let err = writer
            .update(&HashMap::new(), &[order(9, "1", "2024-01-01", "1")])
            .unwrap_err();
        assert!(err.to_string().contains("order 9 has no stored record"));
        assert!(writer.is_empty());
    }

    #[tokio::test]
    async fn test_delete_and_create_commit_together() {
        let store = MemoryOrderStore::with_orders(vec![order(1, "1", "2024-01-01", "100")]);

        let mut writer = StoreWriter::new(&store);
        writer.delete(&[1]);
        writer.create(&[order(2, "2", "2024-01-02", "200")]);
        writer.create(&[]);
        assert_eq!(writer.staged().len(), 2);
        writer.commit().await.unwrap();

        assert_eq!(
            store.list_all().await.unwrap(),
            vec![order(2, "2", "2024-01-02", "200")]
        );
    }

    #[tokio::test]
    async fn test_failed_commit_applies_nothing() {
        let store = MemoryOrderStore::with_orders(vec![
            order(1, "1", "2024-01-01", "100"),
            order(2, "2", "2024-01-02", "200"),
        ]);

        let mut writer = StoreWriter::new(&store);
        writer.delete(&[1]);
        // Collides with the stored order 2.
        writer.create(&[order(2, "5", "2024-01-05", "500")]);
        assert!(writer.commit().await.is_err());

        assert_eq!(store.list_all().await.unwrap().len(), 2);
    }
}
