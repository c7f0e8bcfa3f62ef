//! Delivery notifications for orders due today.

use crate::core::error::Result;
use crate::core::notify::Notifier;
use crate::core::order::{OrderId, OrderRow};
use crate::core::store::OrderStore;
use chrono::NaiveDate;
use tracing::{info, warn};

pub fn delivery_message(order: &OrderRow) -> String {
    format!("Order #{} was delivered", order.order_id)
}

/// Sends one message per stored order delivered on `today`.
///
/// A failed send is logged and skipped so one bad message does not hold back
/// the rest. Returns the ids whose message was accepted by the sink.
pub async fn notify_delivered(
    store: &dyn OrderStore,
    notifier: &dyn Notifier,
    today: NaiveDate,
) -> Result<Vec<OrderId>> {
    let delivered = store.filter_by_delivery_date(today).await?;
    let mut notified = Vec::with_capacity(delivered.len());
    for order in &delivered {
        match notifier.send(&delivery_message(order)).await {
            Ok(()) => notified.push(order.order_id),
            Err(e) => warn!(order_id = order.order_id, error = %e, "Delivery notification failed"),
        }
    }
    info!(
        delivered = delivered.len(),
        notified = notified.len(),
        "Delivery notifications sent"
    );
    Ok(notified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::SyncError;
    use crate::store::MemoryOrderStore;
    use crate::store::test_utils::order;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<String>>,
        reject: Option<String>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, message: &str) -> Result<()> {
            if self.reject.as_deref() == Some(message) {
                return Err(SyncError::Notify("rejected".to_string()));
            }
            self.sent.lock().await.push(message.to_string());
            Ok(())
        }
    }

    fn store() -> MemoryOrderStore {
        MemoryOrderStore::with_orders(vec![
            order(1, "1", "2024-05-01", "100"),
            order(2, "2", "2024-05-02", "200"),
            order(3, "3", "2024-05-02", "300"),
        ])
    }

    #[tokio::test]
    async fn test_only_todays_orders_are_notified() {
        let notifier = RecordingNotifier::default();
        let today = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();

        let notified = notify_delivered(&store(), &notifier, today).await.unwrap();
        assert_eq!(notified, vec![2, 3]);
        assert_eq!(
            *notifier.sent.lock().await,
            vec!["Order #2 was delivered", "Order #3 was delivered"]
        );
    }

    #[tokio::test]
    async fn test_failed_send_does_not_stop_the_rest() {
        let notifier = RecordingNotifier {
            reject: Some("Order #2 was delivered".to_string()),
            ..Default::default()
        };
        let today = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();

        let notified = notify_delivered(&store(), &notifier, today).await.unwrap();
        assert_eq!(notified, vec![3]);
    }

    #[tokio::test]
    async fn test_no_deliveries_today() {
        let notifier = RecordingNotifier::default();
        let today = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        assert!(notify_delivered(&store(), &notifier, today).await.unwrap().is_empty());
        assert!(notifier.sent.lock().await.is_empty());
    }
}
