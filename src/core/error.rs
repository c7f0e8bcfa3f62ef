//! Error types for a reconciliation pass.

use thiserror::Error;

/// All errors that can abort a reconciliation pass.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The rate feed did not answer in time or answered with nothing usable.
    #[error("rate feed unavailable: {0}")]
    Timeout(String),

    /// The requested currency code is absent from the rate feed.
    #[error("currency {0} not found in rate feed")]
    CurrencyNotFound(String),

    /// The spreadsheet range returned zero rows.
    #[error("no data found in sheet range {0}")]
    DataNotFound(String),

    /// A spreadsheet row could not be parsed into an order.
    #[error("invalid sheet row {row} (order '{order_id}'): {reason}")]
    InvalidRow {
        row: usize,
        order_id: String,
        reason: String,
    },

    #[error("malformed rate feed: {0}")]
    RateFeed(String),

    #[error("spreadsheet error: {0}")]
    Sheet(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("disk store error: {0}")]
    Disk(#[from] fjall::Error),

    #[error("store JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("notification error: {0}")]
    Notify(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;
