use crate::core::notify::Notifier;
use crate::core::store::OrderStore;
use crate::sync::delivery::notify_delivered;
use anyhow::{Context, Result};
use chrono::Local;

pub async fn run(store: &dyn OrderStore, notifier: &dyn Notifier) -> Result<()> {
    let today = Local::now().date_naive();
    let notified = notify_delivered(store, notifier, today)
        .await
        .context("Failed to send delivery notifications")?;
    println!(
        "Sent {} delivery notification(s) for {}",
        notified.len(),
        today
    );
    Ok(())
}
