//! Persistent order store abstractions

use crate::core::error::Result;
use crate::core::order::{OrderField, OrderId, OrderRow};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

/// A single bulk operation against the store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreOp {
    /// Remove every order whose id is listed. Unknown ids are ignored.
    Delete(Vec<OrderId>),
    /// Insert new orders. Fails if any id already exists.
    Create(Vec<OrderRow>),
    /// Overwrite `fields` of existing orders. Fails if any id is missing.
    Update {
        orders: Vec<OrderRow>,
        fields: Vec<OrderField>,
    },
}

impl StoreOp {
    pub fn order_ids(&self) -> Vec<OrderId> {
        match self {
            StoreOp::Delete(ids) => ids.clone(),
            StoreOp::Create(orders) | StoreOp::Update { orders, .. } => {
                orders.iter().map(|order| order.order_id).collect()
            }
        }
    }
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Returns every stored order sorted by id.
    async fn list_all(&self) -> Result<Vec<OrderRow>>;

    /// Returns the stored orders among `ids`, keyed by id. Missing ids are absent.
    async fn lookup_by_key(&self, ids: &[OrderId]) -> Result<HashMap<OrderId, OrderRow>>;

    /// Applies `ops` in order as one transaction: either all of them take
    /// effect or none do.
    async fn apply(&self, ops: Vec<StoreOp>) -> Result<()>;

    async fn bulk_create(&self, orders: Vec<OrderRow>) -> Result<()> {
        self.apply(vec![StoreOp::Create(orders)]).await
    }

    async fn bulk_update(&self, orders: Vec<OrderRow>, fields: &[OrderField]) -> Result<()> {
        self.apply(vec![StoreOp::Update {
            orders,
            fields: fields.to_vec(),
        }])
        .await
    }

    async fn filter_delete(&self, ids: &[OrderId]) -> Result<()> {
        self.apply(vec![StoreOp::Delete(ids.to_vec())]).await
    }

    async fn filter_by_delivery_date(&self, date: NaiveDate) -> Result<Vec<OrderRow>> {
        Ok(self
            .list_all()
            .await?
            .into_iter()
            .filter(|order| order.delivery_date == date)
            .collect())
    }
}
