use crate::core::error::Result;
use crate::core::order::{OrderId, OrderRow};
use crate::core::store::{OrderStore, StoreOp};
use async_trait::async_trait;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use tracing::debug;

const ORDERS_PARTITION: &str = "orders";

/// Order store backed by a fjall keyspace.
///
/// Keys are big-endian order ids so iteration yields orders sorted by id;
/// values are JSON encoded [`OrderRow`]s.
pub struct DiskOrderStore {
    keyspace: Keyspace,
    orders: PartitionHandle,
}

impl DiskOrderStore {
    pub fn open(path: &Path) -> Result<Self> {
        let keyspace = fjall::Config::new(path).open()?;
        let orders = keyspace.open_partition(ORDERS_PARTITION, PartitionCreateOptions::default())?;
        debug!("Opened order store at {}", path.display());
        Ok(Self { keyspace, orders })
    }

    fn get(&self, id: OrderId) -> Result<Option<OrderRow>> {
        match self.orders.get(id.to_be_bytes())? {
            Some(value) => Ok(Some(serde_json::from_slice(&value)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl OrderStore for DiskOrderStore {
    async fn list_all(&self) -> Result<Vec<OrderRow>> {
        self.orders
            .iter()
            .map(|kv| -> Result<OrderRow> {
                let (_, value) = kv?;
                Ok(serde_json::from_slice(&value)?)
            })
            .collect()
    }

    async fn lookup_by_key(&self, ids: &[OrderId]) -> Result<HashMap<OrderId, OrderRow>> {
        let mut found = HashMap::with_capacity(ids.len());
        for id in ids {
            if let Some(order) = self.get(*id)? {
                found.insert(*id, order);
            }
        }
        Ok(found)
    }

    async fn apply(&self, ops: Vec<StoreOp>) -> Result<()> {
        let touched: BTreeSet<OrderId> = ops.iter().flat_map(StoreOp::order_ids).collect();

        // Stage every touched row in memory, then write them in one batch.
        let mut staged = BTreeMap::new();
        for id in &touched {
            if let Some(order) = self.get(*id)? {
                staged.insert(*id, order);
            }
        }
        let existed: BTreeSet<OrderId> = staged.keys().copied().collect();

        for op in ops {
            debug!(?op, "Staging store operation");
            super::apply_op(&mut staged, op)?;
        }

        let mut batch = self.keyspace.batch();
        for id in &touched {
            match staged.get(id) {
                Some(order) => {
                    let value = serde_json::to_vec(order)?;
                    batch.insert(&self.orders, id.to_be_bytes().to_vec(), value);
                }
                None if existed.contains(id) => {
                    batch.remove(&self.orders, id.to_be_bytes().to_vec());
                }
                None => {}
            }
        }
        batch.commit()?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!(rows = touched.len(), "Committed store batch");
        Ok(())
    }
}
