//! One reconciliation pass: read both snapshots, diff, apply.

use crate::core::error::Result;
use crate::core::order::{OrderId, OrderRow};
use crate::core::store::OrderStore;
use crate::sync::diff::{compute_changes, compute_deletions};
use crate::sync::reader::{SpreadsheetReader, read_store_orders};
use crate::sync::writer::StoreWriter;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

/// Outcome of a reconciliation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PassReport {
    /// Exchange rate used to price the spreadsheet snapshot.
    pub rate: Decimal,
    pub deleted: Vec<OrderId>,
    pub updated: Vec<OrderId>,
    pub created: Vec<OrderId>,
    /// False for dry runs and for passes with nothing to apply.
    pub committed: bool,
}

impl PassReport {
    pub fn is_noop(&self) -> bool {
        self.deleted.is_empty() && self.updated.is_empty() && self.created.is_empty()
    }
}

/// Runs reconciliation passes between a spreadsheet and an order store.
///
/// Passes on the same `Reconciler` never overlap: a second caller waits until
/// the running pass has finished.
pub struct Reconciler {
    reader: SpreadsheetReader,
    store: Arc<dyn OrderStore>,
    pass_lock: Mutex<()>,
}

impl Reconciler {
    pub fn new(reader: SpreadsheetReader, store: Arc<dyn OrderStore>) -> Self {
        Self {
            reader,
            store,
            pass_lock: Mutex::new(()),
        }
    }

    #[instrument(name = "ReconciliationPass", skip(self))]
    pub async fn run_pass(&self, dry_run: bool) -> Result<PassReport> {
        let _guard = self.pass_lock.lock().await;

        let snapshot = self.reader.read_snapshot().await?;
        let store_rows = read_store_orders(self.store.as_ref()).await?;
        let mut writer = StoreWriter::new(self.store.as_ref());

        let deleted = compute_deletions(&snapshot.orders, &store_rows);
        writer.delete(&deleted);

        let changes = compute_changes(&snapshot.orders, &store_rows);
        let (mut updated, mut created) = (Vec::new(), Vec::new());
        if !changes.is_empty() {
            let ids: Vec<OrderId> = changes.iter().map(|row| row.order_id).collect();
            let existing = self.store.lookup_by_key(&ids).await?;
            let (to_update, to_create): (Vec<OrderRow>, Vec<OrderRow>) = changes
                .into_iter()
                .partition(|row| existing.contains_key(&row.order_id));

            writer.update(&existing, &to_update)?;
            writer.create(&to_create);
            updated = to_update.iter().map(|row| row.order_id).collect();
            created = to_create.iter().map(|row| row.order_id).collect();
        }

        let committed = !dry_run && !writer.is_empty();
        if committed {
            writer.commit().await?;
        } else {
            debug!(dry_run, "Nothing committed");
        }

        let report = PassReport {
            rate: snapshot.rate,
            deleted,
            updated,
            created,
            committed,
        };
        info!(
            rate = %report.rate,
            deleted = report.deleted.len(),
            updated = report.updated.len(),
            created = report.created.len(),
            committed = report.committed,
            "Reconciliation pass finished"
        );
        Ok(report)
    }
}
